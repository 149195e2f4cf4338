//! Terminal UI for Gomoku Arena.

mod app;
mod input;
mod ui;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::agent_library::AgentLibrary;
use crate::mode::{GameSettings, Lineup};
use crate::orchestrator::{CancelFlag, CoordinatorConfig, GameEvent, TurnCoordinator};
use crate::players::SubmitMove;
use crate::transcript::TranscriptWriter;
use app::App;

/// Log file used while the terminal is in raw mode.
pub const TUI_LOG_FILE: &str = "gomoku_arena.log";

type Backend = CrosstermBackend<Stdout>;

/// Run the TUI client.
pub async fn run_tui(
    settings: GameSettings,
    library: AgentLibrary,
    transcript_dir: Option<PathBuf>,
) -> Result<()> {
    // Setup logging to file to avoid interfering with TUI
    let log_file = std::fs::File::create(TUI_LOG_FILE)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized

    info!(mode = ?settings.mode, "Starting Gomoku Arena TUI");

    // Fail before touching the terminal if the lineup is unusable.
    let lineup = settings.lineup()?;
    let transcripts = match transcript_dir {
        Some(dir) => {
            let writer = TranscriptWriter::open(dir)?;
            info!(dir = %writer.dir().display(), "Recording transcripts");
            Some(writer)
        }
        None => None,
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_game_loop(
        &mut terminal,
        &settings,
        &lineup,
        &library,
        transcripts,
    )
    .await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "Game loop error");
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// A coordinator running on its own task.
struct RunningGame {
    events: mpsc::UnboundedReceiver<GameEvent>,
    cancel: CancelFlag,
    task: JoinHandle<()>,
}

impl RunningGame {
    #[instrument(skip_all)]
    fn start(
        lineup: &Lineup,
        library: &AgentLibrary,
        input_rx: &Arc<Mutex<mpsc::UnboundedReceiver<SubmitMove>>>,
        config: CoordinatorConfig,
    ) -> Result<Self> {
        let [black, white] = lineup.build(library, input_rx)?;
        let (event_tx, events) = mpsc::unbounded_channel();
        let mut coordinator = TurnCoordinator::new(black, white, event_tx, config);
        let cancel = coordinator.cancel_flag();

        let task = tokio::spawn(async move {
            match coordinator.run().await {
                Ok(result) => info!(?result, "Coordinator finished"),
                Err(e) => error!(error = %e, "Coordinator failed"),
            }
        });

        Ok(Self {
            events,
            cancel,
            task,
        })
    }

    /// Stops the game. Responses still in flight are dropped with the task.
    fn stop(self) {
        self.cancel.cancel();
        self.task.abort();
    }
}

#[instrument(skip_all)]
async fn run_game_loop(
    terminal: &mut Terminal<Backend>,
    settings: &GameSettings,
    lineup: &Lineup,
    library: &AgentLibrary,
    mut transcripts: Option<TranscriptWriter>,
) -> Result<()> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<SubmitMove>();
    let input_rx = Arc::new(Mutex::new(input_rx));
    let config = settings.coordinator_config();

    let mut app = App::new(settings.mode.name());
    let mut game = RunningGame::start(lineup, library, &input_rx, config)?;

    loop {
        while let Ok(event) = game.events.try_recv() {
            if let Some(writer) = transcripts.as_mut() {
                if let Err(e) = writer.record(&event) {
                    warn!(error = %e, "Failed to write transcript");
                }
            }
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => {
                info!("User quit");
                game.stop();
                return Ok(());
            }
            KeyCode::Char('r') => {
                info!("Restarting game");
                game.stop();
                app.restart();
                game = RunningGame::start(lineup, library, &input_rx, config)?;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                if app.is_game_over() {
                    continue;
                }
                let cursor = app.cursor();
                debug!(%cursor, "Submitting local move");
                input_tx.send(SubmitMove {
                    row: cursor.row,
                    col: cursor.col,
                })?;
            }
            code @ (KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right) => {
                app.set_cursor(input::move_cursor(app.cursor(), code));
            }
            _ => {}
        }
    }
}
