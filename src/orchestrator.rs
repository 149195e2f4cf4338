//! Turn coordination between two move providers.

use crate::games::gomoku::{
    BoardSnapshot, Color, DEFAULT_RETRY_LIMIT, GameResult, GameSession, Move, Proposal,
    SessionError, Verdict,
};
use crate::players::{MoveProvider, ProviderError, Reply};
use crate::llm_client::LlmError;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Messages sent from the coordinator to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new game began.
    GameStarted {
        /// Black provider name.
        black: String,
        /// White provider name.
        white: String,
    },
    /// A provider was asked for a move.
    TurnStarted {
        /// Color to move.
        color: Color,
        /// Provider name.
        provider: String,
    },
    /// Prompt sent to a streamed provider.
    PromptIssued {
        /// Color to move.
        color: Color,
        /// Prompt text.
        text: String,
    },
    /// Piece of a streamed response, in receipt order.
    ResponseFragment {
        /// Color to move.
        color: Color,
        /// Fragment text.
        text: String,
    },
    /// A proposal was rejected and will be re-requested.
    InvalidMove {
        /// Color whose proposal was rejected.
        color: Color,
        /// Why.
        reason: String,
        /// Consecutive counted failures (0 for uncounted providers).
        attempt: u8,
    },
    /// A move was applied to the board.
    MoveApplied {
        /// Color that moved.
        color: Color,
        /// Applied move.
        mv: Move,
        /// Board after the move.
        snapshot: BoardSnapshot,
    },
    /// Game over: the color exceeded its retry budget.
    Forfeit {
        /// Forfeiting color.
        color: Color,
        /// Reason.
        reason: String,
    },
    /// Game over: the color made five in a row.
    Win {
        /// Winning color.
        color: Color,
    },
    /// Game over: full board.
    Draw,
    /// Game over: a provider could not be reached.
    CommunicationError {
        /// Color whose provider failed.
        color: Color,
        /// Error message.
        message: String,
    },
}

impl GameEvent {
    /// Whether this is the end-of-game notification.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GameEvent::Forfeit { .. }
                | GameEvent::Win { .. }
                | GameEvent::Draw
                | GameEvent::CommunicationError { .. }
        )
    }

    /// Terminal notification for a finished result.
    pub fn for_result(result: &GameResult) -> Option<Self> {
        match result {
            GameResult::InProgress => None,
            GameResult::Win(color) => Some(GameEvent::Win { color: *color }),
            GameResult::Draw => Some(GameEvent::Draw),
            GameResult::Forfeit { color, reason } => Some(GameEvent::Forfeit {
                color: *color,
                reason: reason.clone(),
            }),
            GameResult::Aborted { color, message } => Some(GameEvent::CommunicationError {
                color: *color,
                message: message.clone(),
            }),
        }
    }
}

/// Sending half of the event channel.
///
/// A closed channel is not an error: the presentation layer may have moved
/// on to a new game.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<GameEvent>,
}

impl EventSink {
    /// Wraps an event sender.
    pub fn new(tx: mpsc::UnboundedSender<GameEvent>) -> Self {
        Self { tx }
    }

    /// Sends an event.
    pub fn emit(&self, event: GameEvent) {
        if self.tx.send(event).is_err() {
            debug!("Event receiver dropped");
        }
    }
}

/// Session-level game-over flag.
///
/// Checked before each move is scheduled and after each provider call
/// returns; results that arrive after cancellation are discarded.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the flag is set.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Timing and retry settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Pause before each move when both sides are automatic.
    pub move_delay: Duration,
    /// Pause before re-prompting an automatic provider.
    pub retry_delay: Duration,
    /// Consecutive invalid responses before a forfeit.
    pub retry_limit: u8,
}

impl CoordinatorConfig {
    /// Config with no pauses, for tests and batch runs.
    pub fn immediate() -> Self {
        Self {
            move_delay: Duration::ZERO,
            retry_delay: Duration::ZERO,
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }

    /// Sets the inter-move delay.
    pub fn with_move_delay(mut self, delay: Duration) -> Self {
        self.move_delay = delay;
        self
    }

    /// Sets the retry limit.
    pub fn with_retry_limit(mut self, limit: u8) -> Self {
        self.retry_limit = limit;
        self
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            move_delay: Duration::from_millis(1000),
            retry_delay: Duration::from_millis(200),
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }
}

/// Drives one game: asks the active provider for a move, validates it,
/// applies it and decides what happens next.
///
/// The coordinator is the only owner of the board.
pub struct TurnCoordinator {
    session: GameSession,
    providers: [Box<dyn MoveProvider>; 2],
    events: EventSink,
    config: CoordinatorConfig,
    cancel: CancelFlag,
}

impl TurnCoordinator {
    /// Creates a coordinator for a fresh game.
    pub fn new(
        black: Box<dyn MoveProvider>,
        white: Box<dyn MoveProvider>,
        event_tx: mpsc::UnboundedSender<GameEvent>,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            session: GameSession::new(config.retry_limit),
            providers: [black, white],
            events: EventSink::new(event_tx),
            config,
            cancel: CancelFlag::new(),
        }
    }

    /// Flag that stops this game from scheduling further moves.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    fn auto_play(&self) -> bool {
        self.providers.iter().all(|p| p.kind().is_automatic())
    }

    /// Runs the game loop until a terminal state or cancellation.
    ///
    /// Returns the final result (`InProgress` if cancelled or if the input
    /// source closed).
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session was already started.
    #[instrument(skip(self), fields(black = %self.providers[0].name(), white = %self.providers[1].name()))]
    pub async fn run(&mut self) -> Result<GameResult, SessionError> {
        info!("Starting game orchestration");
        self.session.start()?;
        self.events.emit(GameEvent::GameStarted {
            black: self.providers[0].name().to_string(),
            white: self.providers[1].name().to_string(),
        });

        let mut pause = Duration::ZERO;
        loop {
            if self.cancel.is_cancelled() {
                info!("Game cancelled before next move");
                return Ok(self.session.result());
            }
            let Some(color) = self.session.to_move() else {
                return Ok(self.session.result());
            };

            if !pause.is_zero() {
                tokio::time::sleep(pause).await;
                if self.cancel.is_cancelled() {
                    info!("Game cancelled during pause");
                    return Ok(self.session.result());
                }
            }

            let proposal = match self.request_move(color).await {
                Ok(Some(proposal)) => proposal,
                Ok(None) => return Ok(self.session.result()),
                Err(ProviderError::BoardFull) => {
                    let result = self.session.declare_draw()?;
                    return Ok(self.finish(result));
                }
                Err(ProviderError::Communication(e)) => {
                    return self.fail_communication(color, e);
                }
                Err(ProviderError::InputClosed) => {
                    info!("Input closed, ending game loop");
                    return Ok(self.session.result());
                }
            };

            let kind = self.providers[color.index()].kind();
            match self.session.submit(proposal, kind.retry_policy())? {
                Verdict::Accepted { color, mv, result } => {
                    self.events.emit(GameEvent::MoveApplied {
                        color,
                        mv,
                        snapshot: self.session.snapshot(),
                    });
                    if result.is_terminal() {
                        return Ok(self.finish(result));
                    }
                    pause = if self.auto_play() {
                        self.config.move_delay
                    } else {
                        Duration::ZERO
                    };
                }
                Verdict::Rejected {
                    color,
                    reason,
                    attempts,
                    result,
                } => {
                    self.events.emit(GameEvent::InvalidMove {
                        color,
                        reason: reason.to_string(),
                        attempt: attempts,
                    });
                    if result.is_terminal() {
                        return Ok(self.finish(result));
                    }
                    pause = if kind.is_automatic() {
                        self.config.retry_delay
                    } else {
                        Duration::ZERO
                    };
                }
            }
        }
    }

    /// Asks the active provider for a proposal, reading streamed replies to
    /// the end. `Ok(None)` means the game was cancelled meanwhile.
    #[instrument(skip(self))]
    async fn request_move(&mut self, color: Color) -> Result<Option<Proposal>, ProviderError> {
        let snapshot = self.session.snapshot();
        let provider = &mut self.providers[color.index()];
        self.events.emit(GameEvent::TurnStarted {
            color,
            provider: provider.name().to_string(),
        });

        debug!(provider = %provider.name(), "Waiting for move");
        let proposal = match provider.produce_move(&snapshot, color).await? {
            Reply::Ready(proposal) => proposal,
            Reply::Streaming(mut stream) => {
                self.events.emit(GameEvent::PromptIssued {
                    color,
                    text: stream.prompt().to_string(),
                });
                let events = self.events.clone();
                let text = stream
                    .drain(|fragment| {
                        events.emit(GameEvent::ResponseFragment {
                            color,
                            text: fragment.to_string(),
                        })
                    })
                    .await;
                if self.cancel.is_cancelled() {
                    info!("Discarding response that completed after cancellation");
                    return Ok(None);
                }
                stream.proposal(text?)
            }
        };

        if self.cancel.is_cancelled() {
            info!("Discarding move that arrived after cancellation");
            return Ok(None);
        }
        Ok(Some(proposal))
    }

    fn fail_communication(
        &mut self,
        color: Color,
        error: LlmError,
    ) -> Result<GameResult, SessionError> {
        warn!(?color, error = %error, "Provider communication failed");
        let result = self.session.abort(color, error.message)?;
        Ok(self.finish(result))
    }

    /// Emits the single end-of-game notification.
    fn finish(&self, result: GameResult) -> GameResult {
        info!(announcement = %result.announcement(), "Game over");
        if let Some(event) = GameEvent::for_result(&result) {
            self.events.emit(event);
        }
        result
    }
}
