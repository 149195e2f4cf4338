//! Application state and logic.

use crate::games::gomoku::{BOARD_SIZE, BoardSnapshot, Color, GameResult, Move};
use crate::orchestrator::GameEvent;
use tracing::debug;

/// Transcript panes keep at most this many bytes.
const TRANSCRIPT_CAP: usize = 32 * 1024;

/// Main application state, mirrored from coordinator events.
pub struct App {
    title: String,
    board: BoardSnapshot,
    cursor: Move,
    last_move: Option<Move>,
    transcripts: [String; 2],
    status_message: String,
    to_move: Option<Color>,
    game_over: bool,
}

impl App {
    /// Creates a new application.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            board: BoardSnapshot::default(),
            cursor: Move::new(BOARD_SIZE / 2, BOARD_SIZE / 2),
            last_move: None,
            transcripts: [String::new(), String::new()],
            status_message: "Waiting for game to start...".to_string(),
            to_move: None,
            game_over: false,
        }
    }

    /// Window title (the game mode).
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Board as last reported.
    pub fn board(&self) -> &BoardSnapshot {
        &self.board
    }

    /// Keyboard cursor.
    pub fn cursor(&self) -> Move {
        self.cursor
    }

    /// Moves the keyboard cursor.
    pub fn set_cursor(&mut self, cursor: Move) {
        self.cursor = cursor;
    }

    /// Most recently applied move.
    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Transcript text for one color.
    pub fn transcript(&self, color: Color) -> &str {
        &self.transcripts[color.index()]
    }

    /// Gets the current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Color currently asked to move.
    pub fn to_move(&self) -> Option<Color> {
        self.to_move
    }

    /// Whether the game has ended.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    fn append(&mut self, color: Color, text: &str) {
        let buf = &mut self.transcripts[color.index()];
        buf.push_str(text);
        if buf.len() > TRANSCRIPT_CAP {
            let mut cut = buf.len() - TRANSCRIPT_CAP;
            while !buf.is_char_boundary(cut) {
                cut += 1;
            }
            buf.drain(..cut);
        }
    }

    /// Handles a game event from the coordinator.
    pub fn handle_event(&mut self, event: GameEvent) {
        debug!(?event, "Handling game event");

        match event {
            GameEvent::GameStarted { black, white } => {
                self.status_message = format!("{} (Black) vs {} (White)", black, white);
            }
            GameEvent::TurnStarted { color, provider } => {
                self.to_move = Some(color);
                self.status_message = format!("{} to move: {}", color, provider);
            }
            GameEvent::PromptIssued { color, text } => {
                self.append(color, &format!("\n--- Prompt ---\n{}\n--- Response ---\n", text));
                self.status_message = format!("{} is thinking...", color);
            }
            GameEvent::ResponseFragment { color, text } => {
                self.append(color, &text);
            }
            GameEvent::InvalidMove {
                color,
                reason,
                attempt,
            } => {
                self.append(color, &format!("\n[invalid move] {}\n", reason));
                self.status_message = if attempt > 0 {
                    format!("{}: invalid move ({}), attempt {}", color, reason, attempt)
                } else {
                    format!("{}: invalid move ({}), try again", color, reason)
                };
            }
            GameEvent::MoveApplied { color, mv, snapshot } => {
                self.board = snapshot;
                self.last_move = Some(mv);
                self.append(color, &format!("\n[played] {}\n", mv));
                self.status_message = format!("{} played {}", color, mv);
            }
            GameEvent::CommunicationError { color, message } => {
                self.append(color, &format!("\n[error] {}\n", message));
                self.finish(&GameResult::Aborted { color, message });
            }
            GameEvent::Forfeit { color, reason } => {
                self.finish(&GameResult::Forfeit { color, reason });
            }
            GameEvent::Win { color } => self.finish(&GameResult::Win(color)),
            GameEvent::Draw => self.finish(&GameResult::Draw),
        }
    }

    fn finish(&mut self, result: &GameResult) {
        self.game_over = true;
        self.to_move = None;
        self.status_message = format!(
            "{} Press 'r' to restart or 'q' to quit.",
            result.announcement()
        );
    }

    /// Restarts the game.
    pub fn restart(&mut self) {
        debug!("Restarting game");
        self.board = BoardSnapshot::default();
        self.last_move = None;
        self.transcripts = [String::new(), String::new()];
        self.status_message = "Game restarted.".to_string();
        self.to_move = None;
        self.game_over = false;
    }
}
