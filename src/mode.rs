//! Game mode selection: who supplies each color's moves.

use crate::agent_library::AgentLibrary;
use crate::games::gomoku::Color;
use crate::orchestrator::CoordinatorConfig;
use crate::players::{LocalInput, MoveProvider, RandomPolicy, SubmitMove};
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tracing::{info, instrument};

/// Game mode - who plays whom?
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    clap::ValueEnum,
)]
pub enum GameMode {
    /// Two people at one keyboard.
    #[default]
    #[value(alias = "pvp")]
    LocalVsLocal,
    /// Person (Black) against the random AI (White).
    #[value(alias = "pve")]
    LocalVsRandomAI,
    /// Person against a language model playing a configurable color.
    #[value(alias = "pvllm")]
    LocalVsLanguageModel,
    /// Two language models.
    #[value(alias = "aivai")]
    LanguageModelVsLanguageModel,
}

impl GameMode {
    /// Returns display name.
    pub fn name(&self) -> &str {
        match self {
            GameMode::LocalVsLocal => "Player vs Player",
            GameMode::LocalVsRandomAI => "Player vs Random AI",
            GameMode::LocalVsLanguageModel => "Player vs LLM",
            GameMode::LanguageModelVsLanguageModel => "LLM vs LLM",
        }
    }

    /// Whether the mode needs a person's input at all.
    pub fn has_local_player(&self) -> bool {
        !matches!(self, GameMode::LanguageModelVsLanguageModel)
    }

    /// Whether the mode needs agent presets.
    pub fn uses_language_model(&self) -> bool {
        matches!(
            self,
            GameMode::LocalVsLanguageModel | GameMode::LanguageModelVsLanguageModel
        )
    }
}

/// Which kind of provider plays one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderChoice {
    /// Local input.
    LocalInput,
    /// Random AI.
    RandomPolicy,
    /// Language model preset, by agent name.
    LanguageModel {
        /// Agent name in the [`AgentLibrary`].
        agent: String,
    },
}

/// Provider assignment for both colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lineup {
    /// Black's provider.
    pub black: ProviderChoice,
    /// White's provider.
    pub white: ProviderChoice,
}

impl Lineup {
    /// Provider for one color.
    pub fn get(&self, color: Color) -> &ProviderChoice {
        match color {
            Color::Black => &self.black,
            Color::White => &self.white,
        }
    }

    /// Instantiates both providers.
    ///
    /// Local players read from `input_rx`; language-model players are
    /// looked up in `library`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an agent is unknown or its API key is missing.
    #[instrument(skip(self, library, input_rx))]
    pub fn build(
        &self,
        library: &AgentLibrary,
        input_rx: &Arc<Mutex<mpsc::UnboundedReceiver<SubmitMove>>>,
    ) -> Result<[Box<dyn MoveProvider>; 2], ConfigError> {
        Ok([
            build_provider(&self.black, Color::Black, library, input_rx)?,
            build_provider(&self.white, Color::White, library, input_rx)?,
        ])
    }
}

fn build_provider(
    choice: &ProviderChoice,
    color: Color,
    library: &AgentLibrary,
    input_rx: &Arc<Mutex<mpsc::UnboundedReceiver<SubmitMove>>>,
) -> Result<Box<dyn MoveProvider>, ConfigError> {
    info!(?choice, ?color, "Building provider");
    Ok(match choice {
        ProviderChoice::LocalInput => Box::new(LocalInput::shared(
            format!("Player ({})", color),
            Arc::clone(input_rx),
        )),
        ProviderChoice::RandomPolicy => Box::new(RandomPolicy::new("Random AI")),
        ProviderChoice::LanguageModel { agent } => {
            let config = library
                .find(agent)
                .ok_or_else(|| ConfigError::new(format!("Unknown agent: {}", agent)))?;
            Box::new(config.create_provider()?)
        }
    })
}

/// User-configurable settings for a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    /// Selected mode.
    pub mode: GameMode,
    /// Color the language model plays in [`GameMode::LocalVsLanguageModel`].
    pub llm_color: Color,
    /// Agent for [`GameMode::LocalVsLanguageModel`].
    pub agent: Option<String>,
    /// Black's agent for [`GameMode::LanguageModelVsLanguageModel`].
    pub black_agent: Option<String>,
    /// White's agent for [`GameMode::LanguageModelVsLanguageModel`].
    pub white_agent: Option<String>,
    /// Pause before each move in [`GameMode::LanguageModelVsLanguageModel`].
    pub move_delay: Duration,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            llm_color: Color::White,
            agent: None,
            black_agent: None,
            white_agent: None,
            move_delay: CoordinatorConfig::default().move_delay,
        }
    }
}

impl GameSettings {
    /// Creates settings for a mode with defaults elsewhere.
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Maps each color to a provider choice.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a language-model side has no agent.
    #[instrument(skip(self), fields(mode = ?self.mode))]
    pub fn lineup(&self) -> Result<Lineup, ConfigError> {
        let lineup = match self.mode {
            GameMode::LocalVsLocal => Lineup {
                black: ProviderChoice::LocalInput,
                white: ProviderChoice::LocalInput,
            },
            GameMode::LocalVsRandomAI => Lineup {
                black: ProviderChoice::LocalInput,
                white: ProviderChoice::RandomPolicy,
            },
            GameMode::LocalVsLanguageModel => {
                let llm = ProviderChoice::LanguageModel {
                    agent: required(&self.agent, "--agent")?,
                };
                match self.llm_color {
                    Color::Black => Lineup {
                        black: llm,
                        white: ProviderChoice::LocalInput,
                    },
                    Color::White => Lineup {
                        black: ProviderChoice::LocalInput,
                        white: llm,
                    },
                }
            }
            GameMode::LanguageModelVsLanguageModel => Lineup {
                black: ProviderChoice::LanguageModel {
                    agent: required(&self.black_agent, "--black-agent")?,
                },
                white: ProviderChoice::LanguageModel {
                    agent: required(&self.white_agent, "--white-agent")?,
                },
            },
        };
        Ok(lineup)
    }

    /// Coordinator timing for these settings.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::default().with_move_delay(self.move_delay)
    }
}

fn required(agent: &Option<String>, flag: &str) -> Result<String, ConfigError> {
    agent
        .clone()
        .ok_or_else(|| ConfigError::new(format!("{} is required for this mode", flag)))
}
