//! Move providers and their shared contract.

mod language_model;
mod local;
mod parser;
mod prompt;
mod random;
mod stream;

pub use language_model::LanguageModelProvider;
pub use local::{LocalInput, SubmitMove};
pub use parser::CoordinateParser;
pub use prompt::PromptBuilder;
pub use random::RandomPolicy;
pub use stream::{ResponseStream, StreamMessage, StreamSender};

use crate::games::gomoku::{BoardSnapshot, Color, Proposal, RetryPolicy};
use crate::llm_client::LlmError;
use derive_more::{Display, Error, From};

/// Family a provider belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum ProviderKind {
    /// Moves submitted by a person through the presentation layer.
    #[strum(to_string = "local")]
    LocalInput,
    /// Uniformly random empty cell.
    #[strum(to_string = "random")]
    RandomPolicy,
    /// Streamed language-model response.
    #[strum(to_string = "language model")]
    LanguageModel,
}

impl ProviderKind {
    /// Whether invalid proposals from this family consume the retry budget.
    pub fn retry_policy(self) -> RetryPolicy {
        match self {
            ProviderKind::LanguageModel => RetryPolicy::Counted,
            ProviderKind::LocalInput | ProviderKind::RandomPolicy => RetryPolicy::Unlimited,
        }
    }

    /// Whether the provider moves without a person's input.
    pub fn is_automatic(self) -> bool {
        !matches!(self, ProviderKind::LocalInput)
    }
}

/// A provider's answer to one move request.
#[derive(Debug)]
pub enum Reply {
    /// Proposal available immediately.
    Ready(Proposal),
    /// Proposal arrives as streamed text, parsed after the stream ends.
    Streaming(ResponseStream),
}

/// Failures that end a move request without a proposal.
#[derive(Debug, Clone, Display, Error, From)]
pub enum ProviderError {
    /// No empty cell is left.
    #[display("no legal moves remain")]
    BoardFull,
    /// The external service could not be reached or failed mid-request.
    #[display("{_0}")]
    #[from]
    Communication(LlmError),
    /// The input source shut down (the session is being torn down).
    #[display("input channel closed")]
    InputClosed,
}

/// Source of moves for one color.
///
/// Providers only ever see a snapshot and return a proposal; validation
/// and board mutation belong to the turn coordinator.
#[async_trait::async_trait]
pub trait MoveProvider: Send {
    /// Requests a move for `color` on the given position.
    async fn produce_move(
        &mut self,
        board: &BoardSnapshot,
        color: Color,
    ) -> Result<Reply, ProviderError>;

    /// Returns the provider's display name.
    fn name(&self) -> &str;

    /// Returns the provider family.
    fn kind(&self) -> ProviderKind;
}
