//! Terminal entry point.
//!
//! # Responsibility
//! - Resolve configuration, start file logging and the query runtime.
//! - Own terminal setup and teardown around the interactive loop.
//!
//! # Invariants
//! - The terminal is restored on normal exit, on error and on panic.
//! - The query runtime is never entered on the interactive thread.

mod app;
mod cli;
mod markdown;
mod modal;
mod ui;

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use cli::Cli;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::info;
use notepane_core::{init_logging, CredentialStore, FsNoteStore, NoteService, QueryDispatcher};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::time::Duration;

const RUNTIME_SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    let cli = Cli::parse();
    let base = std::env::current_dir().context("failed to read current directory")?;
    let config = cli.into_config().resolve_against(&base);

    init_logging(&config.log_level, &config.log_dir).map_err(anyhow::Error::msg)?;
    install_terminal_restore_hook();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("notepane-query")
        .build()
        .context("failed to start query runtime")?;

    let store = FsNoteStore::open(&config.notes_dir)
        .with_context(|| format!("failed to open notes directory {}", config.notes_dir.display()))?;
    let mut app = App::new(
        NoteService::new(store),
        CredentialStore::new(&config.credential_path),
        config.gateway.clone(),
        QueryDispatcher::new(runtime.handle().clone()),
    );
    app.start();

    let mut terminal = setup_terminal()?;
    let result = app.run(&mut terminal);
    restore_terminal()?;

    drop(app);
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_GRACE);
    info!("event=app_shutdown module=main status=ok");
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

// Chains onto the logging panic hook so the payload is still logged.
fn install_terminal_restore_hook() {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        previous_hook(info);
    }));
}
