//! Channel contract for streamed responses.
//!
//! A streamed provider starts a background task and hands the coordinator
//! a [`ResponseStream`]. The task pushes fragments in receipt order through
//! the paired [`StreamSender`] and ends with exactly one terminal message.
//! Parsing only ever sees the complete concatenated text.

use super::parser::CoordinateParser;
use crate::games::gomoku::Proposal;
use crate::llm_client::LlmError;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// One message on a response channel.
#[derive(Debug, Clone)]
pub enum StreamMessage {
    /// Next piece of response text.
    Fragment(String),
    /// The response is complete.
    Finished,
    /// The provider failed; no more fragments follow.
    Failed(LlmError),
}

/// Producer half, owned by the background task.
#[derive(Debug)]
pub struct StreamSender {
    tx: mpsc::UnboundedSender<StreamMessage>,
}

impl StreamSender {
    /// Sends a fragment. Returns `false` once the receiver is gone.
    pub fn fragment(&self, text: impl Into<String>) -> bool {
        self.tx.send(StreamMessage::Fragment(text.into())).is_ok()
    }

    /// Marks the response complete.
    pub fn finish(self) {
        if self.tx.send(StreamMessage::Finished).is_err() {
            debug!("Response receiver dropped before completion");
        }
    }

    /// Marks the response failed.
    pub fn fail(self, error: LlmError) {
        if self.tx.send(StreamMessage::Failed(error)).is_err() {
            debug!("Response receiver dropped before failure was reported");
        }
    }
}

/// Consumer half, read by the turn coordinator.
#[derive(Debug)]
pub struct ResponseStream {
    prompt: String,
    rx: mpsc::UnboundedReceiver<StreamMessage>,
    parser: CoordinateParser,
}

impl ResponseStream {
    /// Creates a connected sender/stream pair for one request.
    pub fn channel(prompt: impl Into<String>, parser: CoordinateParser) -> (StreamSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            StreamSender { tx },
            Self {
                prompt: prompt.into(),
                rx,
                parser,
            },
        )
    }

    /// Prompt that started this response.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Waits for the next message. `None` if the sender vanished without a
    /// terminal message.
    pub async fn recv(&mut self) -> Option<StreamMessage> {
        self.rx.recv().await
    }

    /// Reads the stream to its end, calling `on_fragment` for each piece in
    /// order, and returns the concatenated text.
    ///
    /// # Errors
    ///
    /// Returns the provider's error, or an [`LlmError`] if the sender was
    /// dropped without finishing.
    #[instrument(skip_all)]
    pub async fn drain(&mut self, mut on_fragment: impl FnMut(&str)) -> Result<String, LlmError> {
        let mut text = String::new();
        loop {
            match self.recv().await {
                Some(StreamMessage::Fragment(fragment)) => {
                    on_fragment(&fragment);
                    text.push_str(&fragment);
                }
                Some(StreamMessage::Finished) => {
                    debug!(text_len = text.len(), "Response stream finished");
                    return Ok(text);
                }
                Some(StreamMessage::Failed(e)) => {
                    warn!(error = %e, "Response stream failed");
                    return Err(e);
                }
                None => {
                    return Err(LlmError::new(
                        "response stream closed before completion".to_string(),
                    ));
                }
            }
        }
    }

    /// Turns the complete response into a proposal.
    pub fn proposal(&self, text: String) -> Proposal {
        match self.parser.parse(&text) {
            Some(mv) => Proposal::Move(mv),
            None => Proposal::Unparsable { response: text },
        }
    }
}
