//! Terminal-backed activity source.
//!
//! The production portal observes pointer, keyboard, scroll, and touch events
//! on its window; the CLI stands in with crossterm terminal events. Every
//! observed event maps to an [`ActivityKind`] and feeds the monitor; `q` or
//! Ctrl+C maps to a quit request instead.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tokio::sync::mpsc;

use sentinel_core::activity::ActivityKind;

/// What a terminal event means to the main loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalSignal {
    /// User interaction; resets the idle timer.
    Activity(ActivityKind),
    /// Quit the program without logging out.
    Quit,
}

// ── Raw-mode guard ─────────────────────────────────────────────────────────────

/// Puts the terminal in raw mode with mouse capture enabled, restoring both
/// on drop so a panic or early return cannot leave the terminal unusable.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> anyhow::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnableMouseCapture)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableMouseCapture);
        let _ = disable_raw_mode();
    }
}

// ── Event interpretation ───────────────────────────────────────────────────────

/// Map a crossterm event to a [`TerminalSignal`].
///
/// Key releases/repeats and window resizes are not user activity and map to
/// `None`.
pub fn interpret(event: &Event) -> Option<TerminalSignal> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            let is_ctrl_c =
                key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
            if is_ctrl_c || key.code == KeyCode::Char('q') {
                Some(TerminalSignal::Quit)
            } else {
                Some(TerminalSignal::Activity(ActivityKind::KeyPress))
            }
        }
        Event::Mouse(mouse) => {
            let kind = match mouse.kind {
                MouseEventKind::Down(_) => ActivityKind::PointerPress,
                MouseEventKind::Up(_) => ActivityKind::Click,
                MouseEventKind::Drag(_) | MouseEventKind::Moved => ActivityKind::PointerMove,
                MouseEventKind::ScrollUp
                | MouseEventKind::ScrollDown
                | MouseEventKind::ScrollLeft
                | MouseEventKind::ScrollRight => ActivityKind::Scroll,
            };
            Some(TerminalSignal::Activity(kind))
        }
        _ => None,
    }
}

// ── Reader task ────────────────────────────────────────────────────────────────

/// Spawn a blocking task that reads terminal events and forwards them as
/// [`TerminalSignal`]s until the receiver is dropped or a quit is sent.
pub fn spawn_reader(tx: mpsc::Sender<TerminalSignal>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            // Short poll so a dropped receiver is noticed promptly.
            match event::poll(Duration::from_millis(250)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event poll failed; stopping reader");
                    break;
                }
            }

            let ev = match event::read() {
                Ok(ev) => ev,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event read failed; stopping reader");
                    break;
                }
            };

            if let Some(signal) = interpret(&ev) {
                let quit = signal == TerminalSignal::Quit;
                if tx.blocking_send(signal).is_err() || quit {
                    break;
                }
            }
        }
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
