//! Live dashboard entry point.
//!
//! Ties the TUI components together: terminal setup/restore, the channels
//! between UI and worker, the main event loop, and graceful shutdown.

pub mod app;
pub mod ui;
pub mod worker;

pub use app::App;
pub use worker::SensorWorker;

use std::io::{self, stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;

use thingy_core::{Command, SensorEvent};

use app::MonitorStatus;

/// Set up the terminal for TUI rendering.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the dashboard.
///
/// Spawns the background worker, kicks off an automatic connect to the
/// target (or the first Thingy in range), and runs the event loop until the
/// user quits.
pub async fn run(target: Option<String>, capacity: usize) -> Result<()> {
    let (command_tx, command_rx) = mpsc::channel::<Command>(32);
    let (event_tx, event_rx) = mpsc::channel::<SensorEvent>(32);

    let worker = SensorWorker::new(command_rx, event_tx);
    let worker_handle = tokio::spawn(worker.run());

    let mut app = App::new(event_rx, target, capacity);

    let mut terminal = setup_terminal()?;

    // Auto-connect on startup; this is the "connect click" of the dashboard
    let _ = command_tx.try_send(Command::Connect {
        identifier: app.target.clone(),
    });

    let result = run_event_loop(&mut terminal, &mut app, &command_tx).await;

    let _ = command_tx.try_send(Command::Shutdown);

    restore_terminal()?;

    let _ = worker_handle.await;

    result
}

/// Main event loop: render, handle input, drain worker events.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_tx: &mpsc::Sender<Command>,
) -> Result<()> {
    while !app.should_quit() {
        app.tick_spinner();

        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(cmd) = handle_key(app, key.code)
        {
            let _ = command_tx.try_send(cmd);
        }

        // Non-blocking drain of worker events
        while let Ok(event) = app.event_rx.try_recv() {
            app.handle_sensor_event(event);
        }
    }

    Ok(())
}

/// Map a key press to a worker command, state-dependent.
fn handle_key(app: &mut App, code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('q') => {
            app.quit();
            None
        }
        KeyCode::Char('c') if app.status == MonitorStatus::Disconnected => {
            Some(Command::Connect {
                identifier: app.target.clone(),
            })
        }
        KeyCode::Char('d') if app.status == MonitorStatus::Subscribed => Some(Command::Disconnect),
        KeyCode::Esc if app.status == MonitorStatus::Connecting => Some(Command::CancelConnect),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let (_event_tx, event_rx) = mpsc::channel(8);
        App::new(event_rx, Some("Thingy".to_string()), 16)
    }

    #[test]
    fn test_quit_key() {
        let mut app = test_app();
        assert!(handle_key(&mut app, KeyCode::Char('q')).is_none());
        assert!(app.should_quit());
    }

    #[test]
    fn test_connect_key_only_when_disconnected() {
        let mut app = test_app();
        let cmd = handle_key(&mut app, KeyCode::Char('c'));
        assert!(matches!(
            cmd,
            Some(Command::Connect { identifier: Some(ref id) }) if id == "Thingy"
        ));

        app.status = MonitorStatus::Connecting;
        assert!(handle_key(&mut app, KeyCode::Char('c')).is_none());
    }

    #[test]
    fn test_disconnect_key_only_when_subscribed() {
        let mut app = test_app();
        assert!(handle_key(&mut app, KeyCode::Char('d')).is_none());

        app.status = MonitorStatus::Subscribed;
        assert!(matches!(
            handle_key(&mut app, KeyCode::Char('d')),
            Some(Command::Disconnect)
        ));
    }

    #[test]
    fn test_escape_cancels_connect() {
        let mut app = test_app();
        assert!(handle_key(&mut app, KeyCode::Esc).is_none());

        app.status = MonitorStatus::Connecting;
        assert!(matches!(
            handle_key(&mut app, KeyCode::Esc),
            Some(Command::CancelConnect)
        ));
    }
}
