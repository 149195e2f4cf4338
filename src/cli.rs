//! Command-line interface for gomoku_arena.

use clap::{Parser, Subcommand};
use gomoku_arena::{Color, GameMode};
use std::path::PathBuf;

/// Gomoku Arena - 15x15 five-in-a-row for people, random AI and LLMs
#[derive(Parser, Debug)]
#[command(name = "gomoku_arena")]
#[command(about = "Gomoku arena for local players and LLM agents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Tui {
        /// Who plays whom
        #[arg(short, long, value_enum, default_value_t = GameMode::LocalVsLocal)]
        mode: GameMode,

        /// Color the LLM plays in local-vs-llm mode
        #[arg(long, value_enum, default_value_t = Color::White)]
        llm_color: Color,

        /// Agent preset for local-vs-llm mode
        #[arg(long)]
        agent: Option<String>,

        /// Black's agent preset for llm-vs-llm mode
        #[arg(long)]
        black_agent: Option<String>,

        /// White's agent preset for llm-vs-llm mode
        #[arg(long)]
        white_agent: Option<String>,

        /// Pause between moves in llm-vs-llm mode (milliseconds)
        #[arg(long, default_value = "1000")]
        delay_ms: u64,

        /// Directory containing agent .toml config files
        #[arg(long)]
        agents_dir: Option<PathBuf>,

        /// Write black_output.log and white_output.log to this directory
        #[arg(long)]
        transcript_dir: Option<PathBuf>,
    },

    /// Play LLM-vs-LLM games headlessly, printing events to stdout
    Arena {
        /// Black's agent preset
        #[arg(long)]
        black_agent: String,

        /// White's agent preset
        #[arg(long)]
        white_agent: String,

        /// Number of games to play
        #[arg(short, long, default_value = "1")]
        games: u32,

        /// Pause between moves (milliseconds)
        #[arg(long, default_value = "1000")]
        delay_ms: u64,

        /// Directory containing agent .toml config files
        #[arg(long)]
        agents_dir: Option<PathBuf>,

        /// Write black_output.log and white_output.log to this directory
        #[arg(long)]
        transcript_dir: Option<PathBuf>,
    },

    /// List the available agent presets
    Agents {
        /// Directory containing agent .toml config files
        #[arg(long)]
        agents_dir: Option<PathBuf>,
    },
}
