//! Local player fed by the presentation layer.

use super::{MoveProvider, ProviderError, ProviderKind, Reply};
use crate::games::gomoku::{BoardSnapshot, Color, Move, Proposal};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, instrument};

/// A move submitted by a person, e.g. a click or key press on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitMove {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl From<SubmitMove> for Move {
    fn from(submit: SubmitMove) -> Self {
        Move::new(submit.row, submit.col)
    }
}

/// Human player reading submissions from a channel.
///
/// Both local players of a hot-seat game share one receiver; only the
/// provider whose turn it is reads from it.
pub struct LocalInput {
    name: String,
    input_rx: Arc<Mutex<mpsc::UnboundedReceiver<SubmitMove>>>,
}

impl LocalInput {
    /// Creates a local player with its own input channel.
    pub fn new(name: impl Into<String>, input_rx: mpsc::UnboundedReceiver<SubmitMove>) -> Self {
        Self::shared(name, Arc::new(Mutex::new(input_rx)))
    }

    /// Creates a local player reading from a shared input channel.
    pub fn shared(
        name: impl Into<String>,
        input_rx: Arc<Mutex<mpsc::UnboundedReceiver<SubmitMove>>>,
    ) -> Self {
        let name = name.into();
        info!(name = %name, "Creating local player");
        Self { name, input_rx }
    }
}

#[async_trait::async_trait]
impl MoveProvider for LocalInput {
    #[instrument(skip(self, _board), fields(player = %self.name))]
    async fn produce_move(
        &mut self,
        _board: &BoardSnapshot,
        _color: Color,
    ) -> Result<Reply, ProviderError> {
        let mut input_rx = self.input_rx.lock().await;

        // Submissions made while it was not a local turn are stale.
        while let Ok(stale) = input_rx.try_recv() {
            debug!(?stale, "Discarding stale submission");
        }

        debug!("Waiting for local input");
        let submit = input_rx.recv().await.ok_or(ProviderError::InputClosed)?;
        debug!(?submit, "Received local move");
        Ok(Reply::Ready(Proposal::Move(submit.into())))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::LocalInput
    }
}
