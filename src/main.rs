//! Gomoku Arena - Unified CLI
//!
//! Terminal UI, headless LLM arena and agent preset listing.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use gomoku_arena::{
    AgentLibrary, CoordinatorConfig, GameEvent, GameMode, GameResult, GameSettings,
    TranscriptWriter, TurnCoordinator,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Tui {
            mode,
            llm_color,
            agent,
            black_agent,
            white_agent,
            delay_ms,
            agents_dir,
            transcript_dir,
        } => {
            let settings = GameSettings {
                mode,
                llm_color,
                agent,
                black_agent,
                white_agent,
                move_delay: Duration::from_millis(delay_ms),
            };
            let library = if mode.uses_language_model() {
                load_library(agents_dir)?
            } else {
                AgentLibrary::default()
            };
            gomoku_arena::tui::run_tui(settings, library, transcript_dir).await
        }
        Command::Arena {
            black_agent,
            white_agent,
            games,
            delay_ms,
            agents_dir,
            transcript_dir,
        } => {
            init_stderr_logging();
            let settings = GameSettings {
                black_agent: Some(black_agent),
                white_agent: Some(white_agent),
                move_delay: Duration::from_millis(delay_ms),
                ..GameSettings::new(GameMode::LanguageModelVsLanguageModel)
            };
            run_arena(settings, load_library(agents_dir)?, games, transcript_dir).await
        }
        Command::Agents { agents_dir } => {
            init_stderr_logging();
            let library = load_library(agents_dir)?;
            for agent in library.agents() {
                println!(
                    "{:<16} {:?} {} (key: ${})",
                    agent.name(),
                    agent.llm_provider(),
                    agent.llm_model(),
                    agent.api_key_var()
                );
            }
            Ok(())
        }
    }
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_library(agents_dir: Option<PathBuf>) -> Result<AgentLibrary> {
    let dir = agents_dir.unwrap_or_else(AgentLibrary::default_config_dir);
    AgentLibrary::scan(&dir)
        .with_context(|| format!("Failed to load agent presets from {}", dir.display()))
}

/// Plays `games` LLM-vs-LLM games back to back.
#[instrument(skip(settings, library, transcript_dir))]
async fn run_arena(
    settings: GameSettings,
    library: AgentLibrary,
    games: u32,
    transcript_dir: Option<PathBuf>,
) -> Result<()> {
    let lineup = settings.lineup()?;
    let config: CoordinatorConfig = settings.coordinator_config();
    let mut transcripts = match transcript_dir {
        Some(dir) => Some(
            TranscriptWriter::open(&dir)
                .with_context(|| format!("Failed to open transcripts in {}", dir.display()))?,
        ),
        None => None,
    };

    // No local players in this mode; the channel only satisfies the builder.
    let (_input_tx, input_rx) = mpsc::unbounded_channel();
    let input_rx = Arc::new(Mutex::new(input_rx));

    let mut results = Vec::with_capacity(games as usize);
    for game in 1..=games {
        info!(game, "Starting arena game");
        println!("=== Game {} of {} ===", game, games);

        let [black, white] = lineup.build(&library, &input_rx)?;
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let mut coordinator = TurnCoordinator::new(black, white, event_tx, config);
        let handle = tokio::spawn(async move { coordinator.run().await });

        while let Some(event) = event_rx.recv().await {
            if let Some(writer) = transcripts.as_mut() {
                if let Err(e) = writer.record(&event) {
                    warn!(error = %e, "Failed to write transcript");
                }
            }
            print_event(&event);
        }

        let result = handle.await??;
        println!("Result: {}", result.announcement());
        results.push(result);
    }

    print_summary(&results);
    if let Some(writer) = &transcripts {
        println!("Transcripts written to {}", writer.dir().display());
    }
    Ok(())
}

fn print_event(event: &GameEvent) {
    match event {
        GameEvent::GameStarted { black, white } => {
            println!("Black: {}  White: {}", black, white)
        }
        GameEvent::TurnStarted { color, provider } => {
            println!("\n-- {} to move ({}) --", color, provider)
        }
        // Prompts are long; they go to the transcripts only.
        GameEvent::PromptIssued { .. } => {}
        GameEvent::ResponseFragment { text, .. } => print!("{}", text),
        GameEvent::InvalidMove {
            color,
            reason,
            attempt,
        } => println!("\n{} invalid move: {} (attempt {})", color, reason, attempt),
        GameEvent::MoveApplied { color, mv, snapshot } => {
            println!("\n{} plays {}\n{}", color, mv, snapshot.display())
        }
        GameEvent::Forfeit { color, reason } => println!("{} forfeits: {}", color, reason),
        GameEvent::Win { color } => println!("{} wins", color),
        GameEvent::Draw => println!("Draw"),
        GameEvent::CommunicationError { color, message } => {
            println!("{} communication error: {}", color, message)
        }
    }
}

fn print_summary(results: &[GameResult]) {
    let mut black = 0;
    let mut white = 0;
    let mut other = 0;
    for result in results {
        match result.winner() {
            Some(gomoku_arena::Color::Black) => black += 1,
            Some(gomoku_arena::Color::White) => white += 1,
            None => other += 1,
        }
    }
    println!(
        "\n=== Summary: {} games | Black {} | White {} | No winner {} ===",
        results.len(),
        black,
        white,
        other
    );
}
