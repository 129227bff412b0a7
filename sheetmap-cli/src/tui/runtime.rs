//! Terminal event loop
//!
//! One thread owns the app state. Key events and results of background jobs
//! both arrive as messages and go through `App::update` in arrival order.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

use super::app::App;
use super::command::Command;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run `A` until it issues [`Command::Quit`]
pub fn run<A: App>(handle: Handle, params: A::InitParams) -> Result<()> {
    let (mut state, init_cmd) = A::init(params);
    let (tx, mut rx) = unbounded_channel::<A::Msg>();

    let mut stdout = io::stdout();
    enable_raw_mode().context("Failed to enable raw mode")?;
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    if run_command(&handle, &tx, init_cmd) {
        return Ok(());
    }

    loop {
        terminal.draw(|f| A::view(f, &mut state))?;

        // Results of background jobs first, so they render on the next frame
        while let Ok(msg) = rx.try_recv() {
            let cmd = A::update(&mut state, msg);
            if run_command(&handle, &tx, cmd) {
                return Ok(());
            }
        }

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(msg) = A::on_key(&state, key) {
                let cmd = A::update(&mut state, msg);
                if run_command(&handle, &tx, cmd) {
                    return Ok(());
                }
            }
        }
    }
}

/// Execute a command; returns true when the app asked to quit
fn run_command<Msg: Send + 'static>(
    handle: &Handle,
    tx: &UnboundedSender<Msg>,
    cmd: Command<Msg>,
) -> bool {
    match cmd {
        Command::None => false,
        Command::Quit => true,
        Command::Perform(future) => {
            let tx = tx.clone();
            handle.spawn(async move {
                let msg = future.await;
                if tx.send(msg).is_err() {
                    log::debug!("Dropped message: event loop already closed");
                }
            });
            false
        }
    }
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}
