//! Tests for game mode to provider mapping.

use std::sync::Arc;
use std::time::Duration;

use gomoku_arena::{
    AgentConfig, AgentLibrary, Color, GameMode, GameSettings, ProviderKind, ProviderChoice,
    SubmitMove,
};
use tokio::sync::{Mutex, mpsc};

fn llm(agent: &str) -> ProviderChoice {
    ProviderChoice::LanguageModel {
        agent: agent.to_string(),
    }
}

#[test]
fn test_local_vs_local() {
    let lineup = GameSettings::new(GameMode::LocalVsLocal)
        .lineup()
        .expect("Lineup failed");
    assert_eq!(lineup.black, ProviderChoice::LocalInput);
    assert_eq!(lineup.white, ProviderChoice::LocalInput);
}

#[test]
fn test_random_ai_plays_white() {
    let lineup = GameSettings::new(GameMode::LocalVsRandomAI)
        .lineup()
        .expect("Lineup failed");
    assert_eq!(lineup.get(Color::Black), &ProviderChoice::LocalInput);
    assert_eq!(lineup.get(Color::White), &ProviderChoice::RandomPolicy);
}

#[test]
fn test_llm_color_is_configurable() {
    let mut settings = GameSettings::new(GameMode::LocalVsLanguageModel);
    settings.agent = Some("Gemini".to_string());

    settings.llm_color = Color::White;
    let lineup = settings.lineup().expect("Lineup failed");
    assert_eq!(lineup.black, ProviderChoice::LocalInput);
    assert_eq!(lineup.white, llm("Gemini"));

    settings.llm_color = Color::Black;
    let lineup = settings.lineup().expect("Lineup failed");
    assert_eq!(lineup.black, llm("Gemini"));
    assert_eq!(lineup.white, ProviderChoice::LocalInput);
}

#[test]
fn test_llm_vs_llm_needs_both_agents() {
    let mut settings = GameSettings::new(GameMode::LanguageModelVsLanguageModel);
    settings.black_agent = Some("DeepSeek".to_string());
    assert!(settings.lineup().is_err());

    settings.white_agent = Some("QwQ".to_string());
    let lineup = settings.lineup().expect("Lineup failed");
    assert_eq!(lineup.black, llm("DeepSeek"));
    assert_eq!(lineup.white, llm("QwQ"));
}

#[test]
fn test_local_vs_llm_needs_agent() {
    let settings = GameSettings::new(GameMode::LocalVsLanguageModel);
    assert!(settings.lineup().is_err());
}

#[test]
fn test_coordinator_config_uses_move_delay() {
    let mut settings = GameSettings::new(GameMode::LanguageModelVsLanguageModel);
    settings.move_delay = Duration::from_millis(250);
    let config = settings.coordinator_config();
    assert_eq!(config.move_delay, Duration::from_millis(250));
    assert_eq!(config.retry_limit, 3);
}

#[test]
fn test_default_is_local_vs_local() {
    assert_eq!(GameMode::default(), GameMode::LocalVsLocal);
    assert!(GameMode::LocalVsLocal.has_local_player());
    assert!(!GameMode::LanguageModelVsLanguageModel.has_local_player());
    assert!(GameMode::LocalVsLanguageModel.uses_language_model());
    assert!(!GameMode::LocalVsRandomAI.uses_language_model());
}

#[test]
fn test_build_local_and_random() {
    let (_tx, rx) = mpsc::unbounded_channel::<SubmitMove>();
    let rx = Arc::new(Mutex::new(rx));
    let lineup = GameSettings::new(GameMode::LocalVsRandomAI)
        .lineup()
        .expect("Lineup failed");

    let [black, white] = lineup
        .build(&AgentLibrary::default(), &rx)
        .expect("Build failed");

    assert_eq!(black.kind(), ProviderKind::LocalInput);
    assert_eq!(white.kind(), ProviderKind::RandomPolicy);
}

#[test]
fn test_build_unknown_agent_fails() {
    let (_tx, rx) = mpsc::unbounded_channel::<SubmitMove>();
    let rx = Arc::new(Mutex::new(rx));
    let library = AgentLibrary::from_agents(vec![AgentConfig::new("Known".to_string())]);

    let mut settings = GameSettings::new(GameMode::LocalVsLanguageModel);
    settings.agent = Some("Unknown".to_string());
    let lineup = settings.lineup().expect("Lineup failed");

    let err = lineup.build(&library, &rx).err().expect("Unknown agent should fail");
    assert!(err.message.contains("Unknown"));
}
