//! Turn state machine for a single game session.
//!
//! [`GameSession`] owns the board and the retry bookkeeping. It is a plain,
//! synchronous value: the async turn coordinator feeds it proposals and
//! reacts to the returned [`Verdict`], which keeps every rule testable
//! without providers or a display.

use super::board::{Board, BoardSnapshot, PlaceError};
use super::rules::check_win;
use super::types::{Color, GameResult, Move};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Consecutive invalid responses tolerated before a forfeit.
pub const DEFAULT_RETRY_LIMIT: u8 = 3;

/// Reason recorded when the retry budget runs out.
pub const FORFEIT_REASON: &str = "too many invalid responses";

/// Position of the session in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnState {
    /// Not started, or restarted.
    Idle,
    /// Waiting for the given color's provider.
    AwaitingMove(Color),
    /// A proposal from the given color is being checked.
    Validating(Color),
    /// A valid move by the given color is being applied.
    Applying(Color),
    /// Session is over. Absorbing until [`GameSession::restart`].
    Terminal(GameResult),
}

/// What a move provider handed back for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposal {
    /// A coordinate pair, not yet validated against the board.
    Move(Move),
    /// The response contained no coordinate pair.
    Unparsable {
        /// Full response text.
        response: String,
    },
}

/// Whether invalid proposals consume the retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Each rejection counts; the limit forfeits the game.
    Counted,
    /// Rejections are re-requested indefinitely (local players).
    Unlimited,
}

/// Why a proposal was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum RejectReason {
    /// No coordinate pair could be extracted.
    #[display("no coordinates found in response")]
    Unparsable,
    /// The board refused the placement.
    #[display("{_0}")]
    Placement(PlaceError),
}

/// Result of submitting a proposal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The move was applied.
    Accepted {
        /// Color that moved.
        color: Color,
        /// Applied move.
        mv: Move,
        /// `InProgress`, `Win` or `Draw`.
        result: GameResult,
    },
    /// The proposal was refused.
    Rejected {
        /// Color whose proposal was refused.
        color: Color,
        /// Why.
        reason: RejectReason,
        /// Consecutive rejections so far (0 when not counted).
        attempts: u8,
        /// `InProgress` to re-prompt, `Forfeit` when the budget ran out.
        result: GameResult,
    },
}

/// Misuse of the state machine.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum SessionError {
    /// A proposal or abort arrived while no move was expected.
    #[display("no move is expected in state {_0:?}")]
    NotAwaitingMove(#[error(not(source))] TurnState),
    /// `start` was called on a session that already started.
    #[display("session already started")]
    AlreadyStarted,
}

/// Consecutive invalid responses, tracked per color.
///
/// With strict alternation a color's turn only ends on its own accepted
/// move or a terminal state, so a per-color streak never interleaves with
/// the opponent's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryCounter {
    counts: [u8; 2],
}

impl RetryCounter {
    /// Current streak for a color.
    pub fn get(&self, color: Color) -> u8 {
        self.counts[color.index()]
    }

    /// Records one more failure and returns the new streak.
    pub fn increment(&mut self, color: Color) -> u8 {
        let count = &mut self.counts[color.index()];
        *count = count.saturating_add(1);
        *count
    }

    /// Clears a color's streak.
    pub fn reset(&mut self, color: Color) {
        self.counts[color.index()] = 0;
    }

    /// Clears both streaks.
    pub fn clear(&mut self) {
        self.counts = [0; 2];
    }
}

/// Everything that changes during one game.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    state: TurnState,
    retries: RetryCounter,
    retry_limit: u8,
    history: Vec<(Color, Move)>,
}

impl GameSession {
    /// Creates an idle session with the given retry limit (at least 1).
    #[instrument]
    pub fn new(retry_limit: u8) -> Self {
        Self {
            board: Board::new(),
            state: TurnState::Idle,
            retries: RetryCounter::default(),
            retry_limit: retry_limit.max(1),
            history: Vec::new(),
        }
    }

    /// Leaves `Idle`; Black always moves first.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> Result<Color, SessionError> {
        if self.state != TurnState::Idle {
            return Err(SessionError::AlreadyStarted);
        }
        info!("Game session started");
        self.state = TurnState::AwaitingMove(Color::Black);
        Ok(Color::Black)
    }

    /// Clears the board and counters and returns to `Idle`.
    #[instrument(skip(self), fields(moves = self.history.len()))]
    pub fn restart(&mut self) {
        info!("Restarting game session");
        self.board.reset();
        self.retries.clear();
        self.history.clear();
        self.state = TurnState::Idle;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> &TurnState {
        &self.state
    }

    /// Color expected to move, if any.
    pub fn to_move(&self) -> Option<Color> {
        match self.state {
            TurnState::AwaitingMove(color) => Some(color),
            _ => None,
        }
    }

    /// Current result; `InProgress` unless terminal.
    pub fn result(&self) -> GameResult {
        match &self.state {
            TurnState::Terminal(result) => result.clone(),
            _ => GameResult::InProgress,
        }
    }

    /// Whether the session has ended.
    pub fn is_over(&self) -> bool {
        matches!(self.state, TurnState::Terminal(_))
    }

    /// Read access to the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Independently owned copy of the board.
    pub fn snapshot(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    /// Accepted moves in order.
    pub fn history(&self) -> &[(Color, Move)] {
        &self.history
    }

    /// Current invalid-response streak of a color.
    pub fn retries(&self, color: Color) -> u8 {
        self.retries.get(color)
    }

    /// Configured retry limit.
    pub fn retry_limit(&self) -> u8 {
        self.retry_limit
    }

    /// Validates and, if legal, applies a proposal from the color to move.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotAwaitingMove`] unless the session is in
    /// `AwaitingMove`. The board is not touched in that case.
    #[instrument(skip(self), fields(state = ?self.state))]
    pub fn submit(
        &mut self,
        proposal: Proposal,
        policy: RetryPolicy,
    ) -> Result<Verdict, SessionError> {
        let TurnState::AwaitingMove(color) = self.state else {
            warn!("Proposal received while no move is expected");
            return Err(SessionError::NotAwaitingMove(self.state.clone()));
        };
        self.state = TurnState::Validating(color);

        let mv = match proposal {
            Proposal::Move(mv) => mv,
            Proposal::Unparsable { response } => {
                debug!(response_len = response.len(), "Unparsable response");
                return Ok(self.reject(color, RejectReason::Unparsable, policy));
            }
        };

        if let Err(e) = self.board.place(mv, color) {
            return Ok(self.reject(color, RejectReason::Placement(e), policy));
        }

        self.state = TurnState::Applying(color);
        self.retries.reset(color);
        self.history.push((color, mv));

        let result = if check_win(&self.board, mv, color) {
            GameResult::Win(color)
        } else if self.board.is_full() {
            GameResult::Draw
        } else {
            GameResult::InProgress
        };

        info!(?color, %mv, ?result, moves = self.history.len(), "Move applied");
        self.state = if result.is_terminal() {
            TurnState::Terminal(result.clone())
        } else {
            TurnState::AwaitingMove(color.opponent())
        };

        Ok(Verdict::Accepted { color, mv, result })
    }

    /// Ends the game as a draw because the provider had no legal move.
    #[instrument(skip(self))]
    pub fn declare_draw(&mut self) -> Result<GameResult, SessionError> {
        self.finish(GameResult::Draw)
    }

    /// Ends the game because the color's provider failed to communicate.
    #[instrument(skip(self, message))]
    pub fn abort(&mut self, color: Color, message: String) -> Result<GameResult, SessionError> {
        self.finish(GameResult::Aborted { color, message })
    }

    fn finish(&mut self, result: GameResult) -> Result<GameResult, SessionError> {
        if !matches!(self.state, TurnState::AwaitingMove(_)) {
            return Err(SessionError::NotAwaitingMove(self.state.clone()));
        }
        info!(?result, "Game session ended");
        self.state = TurnState::Terminal(result.clone());
        Ok(result)
    }

    fn reject(&mut self, color: Color, reason: RejectReason, policy: RetryPolicy) -> Verdict {
        let attempts = match policy {
            RetryPolicy::Counted => self.retries.increment(color),
            RetryPolicy::Unlimited => 0,
        };
        warn!(?color, %reason, attempts, limit = self.retry_limit, "Proposal rejected");

        let result = if policy == RetryPolicy::Counted && attempts >= self.retry_limit {
            GameResult::Forfeit {
                color,
                reason: FORFEIT_REASON.to_string(),
            }
        } else {
            GameResult::InProgress
        };

        self.state = if result.is_terminal() {
            TurnState::Terminal(result.clone())
        } else {
            TurnState::AwaitingMove(color)
        };

        Verdict::Rejected {
            color,
            reason,
            attempts,
            result,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_LIMIT)
    }
}
