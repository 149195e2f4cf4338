//! Random AI: picks any empty cell.

use super::{MoveProvider, ProviderError, ProviderKind, Reply};
use crate::games::gomoku::{BoardSnapshot, Color, Proposal};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// Plays a uniformly random empty cell.
pub struct RandomPolicy {
    name: String,
    rng: StdRng,
}

impl RandomPolicy {
    /// Creates a random player seeded from the OS.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a reproducible random player.
    pub fn seeded(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

#[async_trait::async_trait]
impl MoveProvider for RandomPolicy {
    #[instrument(skip(self, board), fields(ai = %self.name))]
    async fn produce_move(
        &mut self,
        board: &BoardSnapshot,
        _color: Color,
    ) -> Result<Reply, ProviderError> {
        let empty = board.empty_cells();
        if empty.is_empty() {
            return Err(ProviderError::BoardFull);
        }
        let mv = empty[self.rng.random_range(0..empty.len())];
        debug!(%mv, "Random AI chose move");
        Ok(Reply::Ready(Proposal::Move(mv)))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::RandomPolicy
    }
}
