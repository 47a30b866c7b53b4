mod bootstrap;
mod terminal;

use anyhow::Result;
use sentinel_core::countdown::LogoutReason;
use sentinel_core::identity::{IdentityStore, SessionContext};
use sentinel_core::settings::Settings;
use sentinel_runtime::hooks::{LoggingNavigator, LoggingSignOut};
use sentinel_runtime::monitor::{IdleMonitor, MonitorConfig, MonitorEvent};
use terminal::TerminalSignal;

/// Why the main loop ended.
#[derive(Clone, Copy)]
enum Exit {
    /// Quit requested; the session stays signed in.
    Detached,
    /// The monitor completed a logout.
    LoggedOut(LogoutReason),
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Portal Sentinel v{} starting", env!("CARGO_PKG_VERSION"));
    settings.validate()?;

    let config = MonitorConfig::from_settings(&settings)?;

    let identity = IdentityStore::with_default_path()
        .ok_or_else(|| anyhow::anyhow!("could not determine home directory"))?;

    // Pick up the cached sign-in, or seed a local demo identity so the
    // monitor has a session to enforce.
    let session = match identity.load() {
        Some(ctx) => ctx,
        None => {
            let ctx = SessionContext::new("Demo Teacher", "demo@school.example", "t-000");
            identity.save(&ctx);
            ctx
        }
    };

    tracing::info!(
        teacher = %session.teacher_name,
        timeout_minutes = settings.timeout_minutes,
        warning_minutes = settings.warning_minutes,
        "monitoring session"
    );

    let (mut events, handle) = IdleMonitor::start(
        config,
        session,
        identity,
        Box::new(LoggingSignOut),
        Box::new(LoggingNavigator),
    );
    let activity = handle.activity_sender();

    let (signal_tx, mut signals) = tokio::sync::mpsc::channel(64);
    let guard = terminal::TerminalGuard::new()?;
    let reader = terminal::spawn_reader(signal_tx);

    // We also listen for Ctrl+C at the OS level so that signals received
    // while the terminal is in raw mode are handled cleanly.
    let exit = loop {
        tokio::select! {
            Some(signal) = signals.recv() => match signal {
                TerminalSignal::Activity(kind) => {
                    let _ = activity.send(kind).await;
                }
                TerminalSignal::Quit => {
                    tracing::info!("quit requested; detaching monitor");
                    break Exit::Detached;
                }
            },

            maybe_event = events.recv() => match maybe_event {
                Some(MonitorEvent::Warning { remaining_minutes }) => {
                    tracing::warn!(
                        remaining_minutes,
                        "session expires soon; any interaction extends it"
                    );
                }
                Some(MonitorEvent::LoggedOut { reason }) => break Exit::LoggedOut(reason),
                None => break Exit::Detached,
            },

            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received; detaching monitor");
                break Exit::Detached;
            }
        }
    };

    if matches!(exit, Exit::Detached) {
        handle.shutdown().await;
    }

    drop(guard);
    drop(signals);
    let _ = reader.await;

    match exit {
        Exit::Detached => println!("Monitor detached; session left signed in."),
        Exit::LoggedOut(reason) => println!("Signed out ({reason})."),
    }

    Ok(())
}
