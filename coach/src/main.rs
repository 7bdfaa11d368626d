mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chess_client::{ChessClient, ClientConfig};
use clap::Parser;
use coach::{spawn_coach, CoachConfig, CoachEvent, CoachHandle, CoachState, DiagnosticEntry};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Input;

#[derive(Parser)]
#[command(name = "coach", about = "Move-by-move chess coach backed by a remote analysis service")]
struct Cli {
    /// Base URL of the analysis backend (overrides COACH_API_URL)
    #[arg(short, long)]
    api_url: Option<String>,

    /// Username whose moves are analysed (overrides COACH_USERNAME)
    #[arg(short, long)]
    username: Option<String>,

    /// Directory for rolling log files (overrides COACH_LOG_DIR)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Per-request timeout in seconds (overrides COACH_TIMEOUT_SECS)
    #[arg(short, long)]
    timeout_secs: Option<u64>,

    /// Number of games to list for review (overrides COACH_GAMES_LIMIT)
    #[arg(short, long)]
    games_limit: Option<usize>,
}

impl Cli {
    fn apply(self, mut config: CoachConfig) -> CoachConfig {
        if let Some(url) = self.api_url {
            config.api_url = url;
        }
        if let Some(name) = self.username {
            let name = name.trim().to_string();
            config.username = (!name.is_empty()).then_some(name);
        }
        if let Some(dir) = self.log_dir {
            config.log_dir = dir;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = std::time::Duration::from_secs(secs);
        }
        if let Some(limit) = self.games_limit.filter(|n| *n > 0) {
            config.games_limit = limit;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse().apply(CoachConfig::from_env());

    std::fs::create_dir_all(&config.log_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "coach");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!(api_url = %config.api_url, "Coach starting up");

    let client = ChessClient::new(ClientConfig {
        base_url: config.api_url.clone(),
        timeout: config.timeout,
    })
    .context("Failed to create analysis client")?;

    let state = CoachState::new(config.username.as_deref(), config.games_limit);
    let handle = spawn_coach(state, Arc::new(client));
    let (snapshot, events) = handle.subscribe().await?;

    println!("Coach - analysing against {}", config.api_url);
    println!("Debug logs: {}/coach.YYYY-MM-DD", config.log_dir.display());
    println!("Type help for commands.");
    println!();
    print!("{}", cli::render_summary(&snapshot));

    let printer = tokio::spawn(print_updates(events, snapshot.log.last().cloned()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match cli::parse_command(&line) {
            Ok(None) => {}
            Ok(Some(Input::Quit)) => break,
            Ok(Some(input)) => run_input(&handle, input).await,
            Err(message) => println!("{message}"),
        }
    }

    handle.shutdown().await;
    printer.abort();

    tracing::info!("Coach shutting down");
    Ok(())
}

async fn run_input(handle: &CoachHandle, input: Input) {
    let result = match input {
        Input::Mode(mode) => handle.switch_mode(mode).await,
        Input::User(name) => handle.set_username(name).await,
        Input::Move(mv) => handle.play_move(mv).await,
        Input::Reset => handle.reset().await,
        Input::Games => handle.load_games().await,
        Input::Select(index) => handle.select_game(index).await,
        Input::Next => handle.step_forward().await,
        Input::Prev => handle.step_back().await,
        Input::Deep(kind) => handle.request_deep(kind).await,
        Input::Clear => handle.clear_log().await,
        Input::Log => handle.snapshot().await.map(|snapshot| {
            for entry in &snapshot.log {
                println!("{entry}");
            }
            snapshot
        }),
        Input::Show => handle.snapshot().await.map(|snapshot| {
            print!("{}", cli::render_summary(&snapshot));
            snapshot
        }),
        Input::Help => {
            println!("{}", cli::HELP);
            return;
        }
        Input::Quit => return,
    };

    if let Err(e) = result {
        println!("Error: {e}");
    }
}

/// Print diagnostic entries as they arrive.
async fn print_updates(
    mut events: broadcast::Receiver<CoachEvent>,
    mut last_seen: Option<DiagnosticEntry>,
) {
    loop {
        match events.recv().await {
            Ok(CoachEvent::Updated(snapshot)) => {
                for entry in cli::new_entries(&snapshot.log, last_seen.as_ref()) {
                    println!("  {entry}");
                }
                last_seen = snapshot.log.last().cloned();
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("Printer lagged by {} events", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
