//! Gomoku Arena library - five in a row for people, random AI and LLM agents
//!
//! # Architecture
//!
//! - **Games**: 15x15 board, win detection and the per-game state machine
//! - **Players**: move providers (local input, random AI, streamed LLM)
//! - **Orchestrator**: turn coordination, retry budget and game events
//! - **Mode**: which provider plays which color
//! - **TUI**: terminal front end; **Transcript**: per-color logs
//!
//! # Example
//!
//! ```no_run
//! use gomoku_arena::{
//!     CoordinatorConfig, LocalInput, RandomPolicy, TurnCoordinator,
//! };
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let (_input_tx, input_rx) = mpsc::unbounded_channel();
//! let (event_tx, _event_rx) = mpsc::unbounded_channel();
//! let mut coordinator = TurnCoordinator::new(
//!     Box::new(LocalInput::new("Player", input_rx)),
//!     Box::new(RandomPolicy::new("Random AI")),
//!     event_tx,
//!     CoordinatorConfig::default(),
//! );
//! let result = coordinator.run().await?;
//! println!("{}", result.announcement());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod agent_config;
mod agent_library;
mod llm_client;
mod mode;
mod orchestrator;
mod transcript;

pub mod games;
pub mod players;
pub mod tui;

// Crate-level exports - Agent configuration
pub use agent_config::{AgentConfig, ConfigError};
pub use agent_library::{AGENTS_DIR_VAR, AgentLibrary};

// Crate-level exports - LLM client
pub use llm_client::{FragmentStream, LlmClient, LlmConfig, LlmError, LlmProvider, SseDecoder};

// Crate-level exports - Game types
pub use games::gomoku::{
    BOARD_SIZE, Board, BoardSnapshot, Cell, Color, GameResult, GameSession, Move, PlaceError,
    Proposal, RetryPolicy, SessionError, TurnState, Verdict, WIN_LENGTH, check_win,
};

// Crate-level exports - Players
pub use players::{
    CoordinateParser, LanguageModelProvider, LocalInput, MoveProvider, PromptBuilder,
    ProviderError, ProviderKind, RandomPolicy, Reply, ResponseStream, StreamMessage,
    StreamSender, SubmitMove,
};

// Crate-level exports - Coordination
pub use mode::{GameMode, GameSettings, Lineup, ProviderChoice};
pub use orchestrator::{CancelFlag, CoordinatorConfig, EventSink, GameEvent, TurnCoordinator};
pub use transcript::{TranscriptWriter, transcript_file_name};
