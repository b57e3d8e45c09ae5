use std::io;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod ai;
mod app;
mod cli;
mod config;
mod context;
mod db;
mod error;
mod feed;
mod ingest;
mod models;
mod services;
#[cfg(test)]
mod test_support;
mod tui;

use app::App;
use cli::{Cli, Command};
use config::Config;
use context::AppContext;
use error::Result;
use tui::{draw, handle_key_event};

#[tokio::main]
async fn main() -> Result<()> {
    // Only warnings and errors by default; stderr keeps the TUI clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;
    let ctx = AppContext::new(&config).await?;

    match cli.command {
        None | Some(Command::Tui) => run_tui(ctx).await,
        Some(command) => cli::run(command, &ctx).await,
    }
}

async fn run_tui(ctx: AppContext) -> Result<()> {
    let mut app = App::new(ctx).await?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        app.poll_ingest_result().await?;
        app.poll_report_result();
        app.poll_refresh_result().await?;

        // Short poll so background results show up promptly
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) =
                        handle_key_event(key, app.input_mode.is_some(), app.show_help)
                    {
                        if app.handle_action(action).await? {
                            return Ok(());
                        }
                    }
                }
            }
        }
    }
}
