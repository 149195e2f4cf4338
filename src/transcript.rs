//! Per-color transcript files.
//!
//! Each color gets its own append-only log holding the prompts it was sent,
//! the streamed response text, rejected moves and the final outcome.

use crate::games::gomoku::Color;
use crate::orchestrator::GameEvent;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// File name of a color's transcript.
pub fn transcript_file_name(color: Color) -> &'static str {
    match color {
        Color::Black => "black_output.log",
        Color::White => "white_output.log",
    }
}

/// Appends game events to `black_output.log` and `white_output.log`.
#[derive(Debug)]
pub struct TranscriptWriter {
    dir: PathBuf,
    files: [File; 2],
}

impl TranscriptWriter {
    /// Opens (or creates) both transcript files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the directory or a file cannot be opened.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub fn open(dir: impl AsRef<Path>) -> io::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let open = |color: Color| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(transcript_file_name(color)))
        };
        let files = [open(Color::Black)?, open(Color::White)?];
        info!("Transcript files opened");
        Ok(Self { dir, files })
    }

    /// Directory holding the transcripts.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of one color's transcript.
    pub fn path(&self, color: Color) -> PathBuf {
        self.dir.join(transcript_file_name(color))
    }

    fn file(&mut self, color: Color) -> &mut File {
        &mut self.files[color.index()]
    }

    fn both(&mut self, text: &str) -> io::Result<()> {
        for file in &mut self.files {
            file.write_all(text.as_bytes())?;
            file.flush()?;
        }
        Ok(())
    }

    /// Writes one event to the transcript(s) it concerns.
    ///
    /// # Errors
    ///
    /// Returns the underlying write error.
    pub fn record(&mut self, event: &GameEvent) -> io::Result<()> {
        match event {
            GameEvent::GameStarted { black, white } => {
                let header = format!(
                    "\n===== Game started {} | Black: {} | White: {} =====\n",
                    Local::now().format("%Y-%m-%d %H:%M:%S"),
                    black,
                    white
                );
                self.both(&header)
            }
            GameEvent::TurnStarted { .. } | GameEvent::MoveApplied { .. } => Ok(()),
            GameEvent::PromptIssued { color, text } => {
                let file = self.file(*color);
                writeln!(file, "\n--- Prompt ---\n{}\n--- Response ---", text)?;
                file.flush()
            }
            GameEvent::ResponseFragment { color, text } => {
                let file = self.file(*color);
                file.write_all(text.as_bytes())?;
                file.flush()
            }
            GameEvent::InvalidMove {
                color,
                reason,
                attempt,
            } => {
                let file = self.file(*color);
                writeln!(file, "\n[invalid move] {} (attempt {})", reason, attempt)?;
                file.flush()
            }
            GameEvent::Forfeit { color, reason } => {
                debug!(?color, "Recording forfeit");
                self.both(&format!("\n[game over] {} forfeits: {}\n", color, reason))
            }
            GameEvent::Win { color } => self.both(&format!("\n[game over] {} wins\n", color)),
            GameEvent::Draw => self.both("\n[game over] draw\n"),
            GameEvent::CommunicationError { color, message } => {
                let file = self.file(*color);
                writeln!(file, "\n[error] {}", message)?;
                file.flush()?;
                self.both(&format!(
                    "\n[game over] communication error ({}): {}\n",
                    color, message
                ))
            }
        }
    }
}
