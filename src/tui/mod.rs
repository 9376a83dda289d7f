//! Terminal UI for Strictly Codenames.

mod app;
mod ui;

pub use app::App;

use crate::codenames::{
    Board, ChannelDisplay, ClueSource, DisplayEvent, EngineTiming, GameReport, GuessSource,
};
use crate::session::{Collaborators, GameSession};
use anyhow::{Context, Result, anyhow};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

/// Log file used while the terminal is in raw mode.
pub const LOG_FILE: &str = "strictly_codenames.log";

/// Sends logs to [`LOG_FILE`] so they do not corrupt the screen.
///
/// # Errors
///
/// Returns an error if the log file cannot be created or a global
/// subscriber is already installed.
pub fn init_logging() -> Result<()> {
    init_logging_to(LOG_FILE)
}

/// Sends logs to the file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or a global subscriber
/// is already installed.
pub fn init_logging_to(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let log_file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(crate::DEFAULT_LOG_FILTER)),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;
    Ok(())
}

/// Plays a game on `board` in the terminal.
///
/// Returns the report, or `None` if the engine task could not be joined.
///
/// # Errors
///
/// Returns an error if the terminal cannot be set up or the session fails
/// to start.
#[instrument(skip_all, fields(clue_giver = %clue_source.name(), guesser = %guess_source.name()))]
pub async fn run_tui(
    board: Board,
    clue_source: Arc<dyn ClueSource>,
    guess_source: Arc<dyn GuessSource>,
    timing: EngineTiming,
) -> Result<Option<GameReport>> {
    info!("Starting Strictly Codenames TUI");

    let words = board.all_words().to_vec();
    let (display, mut event_rx) = ChannelDisplay::channel();
    let collaborators = Collaborators::new(clue_source, guess_source, Arc::new(display));
    let mut session = GameSession::new(board, collaborators, timing);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = match session.start() {
        Ok(()) => run_game(&mut terminal, App::new(words), &mut event_rx, &session).await,
        Err(e) => Err(e.into()),
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "Game loop error");
        session.stop();
        return Err(err);
    }

    info!("Waiting for the engine to stop");
    match session.wait().await {
        Ok(report) => Ok(Some(report)),
        Err(e) => {
            error!(error = %e, "Session did not finish cleanly");
            Ok(None)
        }
    }
}

/// Draw loop: applies display events and polls the keyboard.
#[instrument(skip_all)]
async fn run_game<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    event_rx: &mut mpsc::UnboundedReceiver<DisplayEvent>,
    session: &GameSession,
) -> Result<()>
where
    B::Error: std::error::Error + Send + Sync + 'static,
{
    loop {
        while let Ok(event) = event_rx.try_recv() {
            app.handle_event(event);
        }

        terminal.draw(|f| ui::draw(f, &app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if app.is_finished() {
                    debug!("Key pressed after game end");
                    return Ok(());
                }
                if key.code == KeyCode::Char('q') {
                    info!("User quit");
                    session.stop();
                    return Ok(());
                }
            }
        }

        tokio::task::yield_now().await;
    }
}
