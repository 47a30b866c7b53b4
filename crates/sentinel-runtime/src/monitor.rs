//! The idle session monitor.
//!
//! [`IdleMonitor::start`] spawns a tokio task that owns the entire timeout
//! mechanism: it observes activity events, keeps a single expiry deadline,
//! polls remaining time on a fixed interval for the countdown warning, and
//! performs the logout sequence on expiry or manual request.
//!
//! The loop structure makes the timer invariant structural: there is
//! exactly one `sleep_until` arm, recomputed from the last-activity instant on
//! every iteration, so at most one expiry callback can ever be pending and
//! resetting supersedes it synchronously.

use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant as TokioInstant};

use sentinel_core::activity::ActivityKind;
use sentinel_core::countdown::{should_warn, IdleCountdown, LogoutReason, MonitorState};
use sentinel_core::identity::{IdentityStore, SessionContext};
use sentinel_core::settings::Settings;
use sentinel_core::{Result, SentinelError};

use crate::hooks::{Navigator, SignOut};

// ── Public types ──────────────────────────────────────────────────────────────

/// Events the monitor surfaces to its host screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// Remaining time has entered the warning window. Emitted once per idle
    /// period; re-armed by any activity or explicit reset.
    Warning { remaining_minutes: u64 },
    /// The logout sequence completed and navigation to login was issued.
    LoggedOut { reason: LogoutReason },
}

/// Timing configuration for a monitor instance.
#[derive(Debug, Clone, Copy)]
pub struct MonitorConfig {
    /// Idle timeout after which the session is forcibly ended.
    pub timeout: Duration,
    /// Remaining whole minutes at which the warning surfaces.
    pub warning_minutes: u64,
    /// How often remaining time is re-checked for the warning.
    pub poll_interval: Duration,
}

impl MonitorConfig {
    /// Build a config from a timeout in minutes, with the standard warning
    /// threshold (5 minutes) and poll cadence (once per minute).
    pub fn new(timeout_minutes: u64) -> Result<Self> {
        if timeout_minutes == 0 {
            return Err(SentinelError::InvalidTimeout(timeout_minutes));
        }
        Ok(Self {
            timeout: Duration::from_secs(timeout_minutes * 60),
            warning_minutes: 5,
            poll_interval: Duration::from_secs(60),
        })
    }

    /// Build a config from validated CLI settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            timeout: settings.timeout(),
            warning_minutes: settings.warning_minutes,
            poll_interval: settings.poll_interval(),
        })
    }
}

// ── IdleMonitor ───────────────────────────────────────────────────────────────

/// Factory for the monitor task.
pub struct IdleMonitor;

impl IdleMonitor {
    /// Start monitoring the given session.
    ///
    /// Spawns the monitor loop and returns:
    /// - An `mpsc::Receiver<MonitorEvent>` for the host screen to consume.
    /// - A [`MonitorHandle`] exposing logout, reset, and remaining-time
    ///   queries. Dropping the handle tears the monitor down.
    pub fn start(
        config: MonitorConfig,
        session: SessionContext,
        identity: IdentityStore,
        signout: Box<dyn SignOut>,
        navigator: Box<dyn Navigator>,
    ) -> (mpsc::Receiver<MonitorEvent>, MonitorHandle) {
        let (activity_tx, activity_rx) = mpsc::channel(64);
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (events_tx, events_rx) = mpsc::channel(16);

        let now = TokioInstant::now().into_std();
        let (last_activity_tx, last_activity_rx) = watch::channel(now);
        let (state_tx, state_rx) = watch::channel(MonitorState::Active);

        let timeout = config.timeout;
        let monitor_loop = MonitorLoop {
            config,
            session,
            identity,
            signout,
            navigator,
            events_tx,
            last_activity_tx,
            state_tx,
        };

        let task = tokio::spawn(monitor_loop.run(activity_rx, cmd_rx));

        let handle = MonitorHandle {
            activity_tx,
            cmd_tx,
            last_activity_rx,
            state_rx,
            timeout,
            task,
        };

        (events_rx, handle)
    }
}

// ── MonitorHandle ─────────────────────────────────────────────────────────────

/// Host-screen handle to a running monitor.
///
/// Dropping the handle closes the monitor's channels; the loop exits and the
/// pending expiry deadline dies with it, leaving no dangling callbacks.
pub struct MonitorHandle {
    activity_tx: mpsc::Sender<ActivityKind>,
    cmd_tx: mpsc::Sender<Command>,
    last_activity_rx: watch::Receiver<Instant>,
    state_rx: watch::Receiver<MonitorState>,
    timeout: Duration,
    task: tokio::task::JoinHandle<()>,
}

impl MonitorHandle {
    /// A sender clone for activity sources. Every event delivered resets the
    /// idle timer, whatever its kind.
    pub fn activity_sender(&self) -> mpsc::Sender<ActivityKind> {
        self.activity_tx.clone()
    }

    /// Record current time as last-activity and supersede the pending expiry
    /// deadline.
    ///
    /// The warning modal's "extend" action calls this directly rather than
    /// relying on an incidental activity event.
    pub async fn reset_timer(&self) {
        if self.cmd_tx.send(Command::Reset).await.is_err() {
            tracing::debug!("reset ignored; monitor already stopped");
        }
    }

    /// Request logout. Safe to call any number of times and concurrently with
    /// automatic expiry; sign-out runs at most once.
    pub async fn logout(&self) {
        if self.cmd_tx.send(Command::Logout).await.is_err() {
            tracing::debug!("logout ignored; monitor already stopped");
        }
    }

    /// Time left before expiry. Pure read; zero once the monitor has reached
    /// its terminal state.
    pub fn remaining(&self) -> Duration {
        if !self.is_active() {
            return Duration::ZERO;
        }
        let countdown = IdleCountdown::new(self.timeout, *self.last_activity_rx.borrow());
        countdown.remaining(TokioInstant::now().into_std())
    }

    /// Whole minutes left before expiry. Never negative.
    pub fn remaining_minutes(&self) -> u64 {
        if !self.is_active() {
            return 0;
        }
        let countdown = IdleCountdown::new(self.timeout, *self.last_activity_rx.borrow());
        countdown.remaining_minutes(TokioInstant::now().into_std())
    }

    /// Current lifecycle state.
    pub fn state(&self) -> MonitorState {
        *self.state_rx.borrow()
    }

    /// Whether the monitor is still enforcing the timeout.
    pub fn is_active(&self) -> bool {
        self.state() == MonitorState::Active
    }

    /// Detach: stop observing, cancel the pending deadline, and wait for the
    /// loop to finish. Performs no logout.
    pub async fn shutdown(self) {
        let MonitorHandle { cmd_tx, task, .. } = self;
        if cmd_tx.send(Command::Shutdown).await.is_err() {
            // Loop already gone; nothing to wait for beyond the task itself.
        }
        let _ = task.await;
    }
}

// ── Internals ─────────────────────────────────────────────────────────────────

/// Commands the handle sends to the loop.
enum Command {
    Reset,
    Logout,
    Shutdown,
}

struct MonitorLoop {
    config: MonitorConfig,
    session: SessionContext,
    identity: IdentityStore,
    signout: Box<dyn SignOut>,
    navigator: Box<dyn Navigator>,
    events_tx: mpsc::Sender<MonitorEvent>,
    last_activity_tx: watch::Sender<Instant>,
    state_tx: watch::Sender<MonitorState>,
}

impl MonitorLoop {
    async fn run(
        self,
        mut activity_rx: mpsc::Receiver<ActivityKind>,
        mut cmd_rx: mpsc::Receiver<Command>,
    ) {
        let mut countdown = IdleCountdown::new(self.config.timeout, TokioInstant::now().into_std());
        let mut warned = false;

        let mut poll = time::interval(self.config.poll_interval);
        // Consume the immediate first tick; the countdown is full at start.
        poll.tick().await;

        tracing::info!(
            teacher_id = %self.session.teacher_id,
            timeout_secs = self.config.timeout.as_secs(),
            "idle monitor started"
        );

        loop {
            let deadline = TokioInstant::from_std(countdown.deadline());

            tokio::select! {
                maybe_activity = activity_rx.recv() => match maybe_activity {
                    Some(kind) => {
                        self.on_reset(&mut countdown, &mut warned);
                        tracing::trace!(%kind, "activity observed");
                    }
                    None => {
                        tracing::debug!("activity channel closed; detaching monitor");
                        break;
                    }
                },

                maybe_cmd = cmd_rx.recv() => match maybe_cmd {
                    Some(Command::Reset) => {
                        self.on_reset(&mut countdown, &mut warned);
                        tracing::debug!("idle timer reset");
                    }
                    Some(Command::Logout) => {
                        self.do_logout(LogoutReason::Manual).await;
                        break;
                    }
                    Some(Command::Shutdown) | None => {
                        tracing::debug!("monitor detached; pending timer cancelled");
                        break;
                    }
                },

                _ = time::sleep_until(deadline) => {
                    self.do_logout(LogoutReason::Expired).await;
                    break;
                }

                _ = poll.tick() => {
                    let remaining = countdown.remaining_minutes(TokioInstant::now().into_std());
                    if should_warn(remaining, self.config.warning_minutes) && !warned {
                        warned = true;
                        tracing::info!(remaining_minutes = remaining, "session expiry warning");
                        let _ = self
                            .events_tx
                            .send(MonitorEvent::Warning {
                                remaining_minutes: remaining,
                            })
                            .await;
                    }
                }
            }
        }
    }

    /// Restart the countdown and re-arm the warning.
    fn on_reset(&self, countdown: &mut IdleCountdown, warned: &mut bool) {
        let now = TokioInstant::now().into_std();
        countdown.record_activity(now);
        *warned = false;
        let _ = self.last_activity_tx.send(now);
    }

    /// The logout sequence: leave `Active`, sign out remotely (best-effort),
    /// clear cached identity, navigate to login, notify the host.
    async fn do_logout(&self, reason: LogoutReason) {
        let _ = self.state_tx.send(MonitorState::ExpiredOrLoggedOut);

        tracing::info!(
            %reason,
            teacher_id = %self.session.teacher_id,
            "logging out"
        );

        if let Err(e) = self.signout.sign_out().await {
            tracing::warn!(error = %e, "sign-out failed; proceeding with local logout");
        }

        if let Err(e) = self.identity.clear() {
            tracing::warn!(error = %e, "failed to clear cached identity");
        }

        self.navigator.to_login();

        let _ = self.events_tx.send(MonitorEvent::LoggedOut { reason }).await;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
