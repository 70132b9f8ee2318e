//! Binary entry point and terminal session management.
//!
//! Bridges [`warden_engine`] (game state and turn orchestration) and
//! [`warden_tui`] (rendering), with RAII terminal cleanup. The event loop
//! polls the keyboard on a fixed cadence; at most one turn is in flight at a
//! time, its outcome delivered back over a channel.

use std::{
    env,
    fs::{self, OpenOptions},
    io::{Stdout, stdout},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use warden_engine::{GameConfig, Orchestrator, SubmitError, TurnOutcome};
use warden_providers::{ApiKey, GeminiClient};
use warden_tui::{DraftInput, Intent, Theme, ViewState, draw, handle_key};

const API_KEY_ENV: &str = "GEMINI_API_KEY";
const MODEL_ENV: &str = "WARDEN_MODEL";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const POLL_INTERVAL: Duration = Duration::from_millis(16);

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    if let Some((path, file)) = open_log_file() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        tracing::info!(path = %path.display(), "Logging initialized");
        return;
    }

    // Without a log file, prefer "no logs" over corrupting the TUI by
    // writing to stdout/stderr.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> Option<(PathBuf, std::fs::File)> {
    let mut candidates = Vec::new();
    if let Some(config_path) = GameConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("warden.log"));
    }
    candidates.push(PathBuf::from(".warden").join("logs").join("warden.log"));

    for candidate in candidates {
        if let Some(parent) = candidate.parent()
            && fs::create_dir_all(parent).is_err()
        {
            continue;
        }
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&candidate) {
            return Some((candidate, file));
        }
    }
    None
}

/// RAII wrapper for raw mode plus the alternate screen.
///
/// Restores the terminal on drop so it stays usable after panics or early
/// returns.
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        let terminal = match Terminal::new(CrosstermBackend::new(out)) {
            Ok(t) => t,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(stdout(), LeaveAlternateScreen);
                return Err(err.into());
            }
        };
        Ok(Self { terminal })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = GameConfig::load().context("failed to load game config")?;

    let raw_key = env::var(API_KEY_ENV).unwrap_or_default();
    if raw_key.trim().is_empty() {
        bail!("{API_KEY_ENV} is not set; export a Google AI Studio key to play");
    }
    let api_key = ApiKey::new(raw_key);
    let model = env::var(MODEL_ENV).unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    let backend = GeminiClient::new(api_key, model).with_params(config.generation().clone());
    let orchestrator = Arc::new(Orchestrator::new(config, backend));

    let mut session = TerminalSession::new()?;
    let result = run(&mut session.terminal, &orchestrator).await;
    drop(session);
    result
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    orchestrator: &Arc<Orchestrator<GeminiClient>>,
) -> Result<()> {
    let mut state = orchestrator.new_session();
    let mut draft = DraftInput::default();
    let mut theme = Theme::default();
    let mut show_tips = false;
    let mut notice: Option<String> = None;
    let mut pending = false;

    let (outcome_tx, mut outcome_rx) = mpsc::channel::<Result<TurnOutcome, SubmitError>>(1);

    loop {
        if let Ok(outcome) = outcome_rx.try_recv() {
            pending = false;
            match outcome {
                Ok(TurnOutcome { state: next, notice: turn_notice }) => {
                    state = next;
                    notice = turn_notice;
                }
                Err(err) => {
                    tracing::warn!(%err, "Turn rejected");
                }
            }
        }

        terminal.draw(|frame| {
            draw(
                frame,
                &ViewState {
                    session: &state,
                    draft: &draft,
                    pending,
                    notice: notice.as_deref(),
                    show_tips,
                    secret_phrase: orchestrator.config().secret_phrase().expose(),
                    theme,
                },
            );
        })?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        let locked = pending || state.status().is_terminal();
        let Some(intent) = handle_key(key, &mut draft, locked) else {
            continue;
        };

        match intent {
            Intent::Quit => break,
            Intent::Reset => {
                state = state.reset();
                notice = None;
            }
            Intent::ToggleTips => show_tips = !show_tips,
            Intent::CycleTheme => theme = theme.next(),
            Intent::Submit(text) => {
                pending = true;
                notice = None;
                let orchestrator = Arc::clone(orchestrator);
                let snapshot = state.clone();
                let tx = outcome_tx.clone();
                tokio::spawn(async move {
                    let outcome = orchestrator.submit(&snapshot, &text).await;
                    let _ = tx.send(outcome).await;
                });
            }
        }
    }

    Ok(())
}
