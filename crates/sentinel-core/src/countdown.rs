//! Idle countdown arithmetic and the monitor state machine.
//!
//! [`IdleCountdown`] is the pure core of the session-timeout component: it
//! tracks the last observed activity instant against a fixed timeout and
//! answers remaining-time queries. All functions take an explicit `now` so
//! the runtime can drive them from the tokio clock and tests can drive them
//! from synthetic instants.

use std::time::{Duration, Instant};

/// Milliseconds per minute, used for the whole-minute floor division.
const MINUTE_MS: u128 = 60_000;

// ── MonitorState ──────────────────────────────────────────────────────────────

/// Lifecycle state of an idle monitor.
///
/// `ExpiredOrLoggedOut` is terminal: a fresh monitor is created after
/// re-authentication, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    /// Timer running; countdown surfaced to the host only near expiry.
    Active,
    /// Timer cleared and navigation issued, by expiry or manual logout.
    ExpiredOrLoggedOut,
}

/// Why a logout was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutReason {
    /// The idle timeout elapsed with no observed activity.
    Expired,
    /// The user (or host screen) requested logout explicitly.
    Manual,
}

impl std::fmt::Display for LogoutReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogoutReason::Expired => f.write_str("expired"),
            LogoutReason::Manual => f.write_str("manual"),
        }
    }
}

// ── IdleCountdown ─────────────────────────────────────────────────────────────

/// Tracks the time since last activity against a fixed idle timeout.
#[derive(Debug, Clone, Copy)]
pub struct IdleCountdown {
    timeout: Duration,
    last_activity: Instant,
}

impl IdleCountdown {
    /// Create a countdown whose timer starts at `now`.
    pub fn new(timeout: Duration, now: Instant) -> Self {
        Self {
            timeout,
            last_activity: now,
        }
    }

    /// The configured idle timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The instant of the most recent observed activity.
    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Record activity at `now`, restarting the countdown.
    pub fn record_activity(&mut self, now: Instant) {
        self.last_activity = now;
    }

    /// The instant at which the session expires if no further activity occurs.
    pub fn deadline(&self) -> Instant {
        self.last_activity + self.timeout
    }

    /// Time left before expiry, saturating at zero.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.timeout
            .saturating_sub(now.saturating_duration_since(self.last_activity))
    }

    /// Whole minutes left before expiry: `floor(remaining_ms / 60_000)`.
    ///
    /// Never negative; returns zero at or past the deadline.
    pub fn remaining_minutes(&self, now: Instant) -> u64 {
        (self.remaining(now).as_millis() / MINUTE_MS) as u64
    }

    /// Whether the idle timeout has fully elapsed at `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        self.remaining(now).is_zero()
    }
}

// ── Warning decision ──────────────────────────────────────────────────────────

/// Whether the host should surface the countdown warning.
///
/// The warning shows when remaining time is at or below the threshold but the
/// session has not yet expired.
pub fn should_warn(remaining_minutes: u64, threshold_minutes: u64) -> bool {
    remaining_minutes > 0 && remaining_minutes <= threshold_minutes
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    // ── remaining / remaining_minutes ─────────────────────────────────────

    #[test]
    fn test_remaining_full_at_start() {
        let now = Instant::now();
        let cd = IdleCountdown::new(minutes(30), now);
        assert_eq!(cd.remaining(now), minutes(30));
        assert_eq!(cd.remaining_minutes(now), 30);
    }

    #[test]
    fn test_remaining_counts_down() {
        let start = Instant::now();
        let cd = IdleCountdown::new(minutes(30), start);

        assert_eq!(cd.remaining_minutes(start + minutes(25)), 5);
        assert_eq!(cd.remaining_minutes(start + minutes(29)), 1);
    }

    #[test]
    fn test_remaining_floors_partial_minutes() {
        let start = Instant::now();
        let cd = IdleCountdown::new(minutes(30), start);

        // 29m30s elapsed → 30s remaining → 0 whole minutes.
        let now = start + minutes(29) + Duration::from_secs(30);
        assert_eq!(cd.remaining_minutes(now), 0);
        assert!(!cd.is_expired(now));
    }

    #[test]
    fn test_remaining_never_negative() {
        let start = Instant::now();
        let cd = IdleCountdown::new(minutes(30), start);

        // Well past the deadline.
        let late = start + minutes(90);
        assert_eq!(cd.remaining(late), Duration::ZERO);
        assert_eq!(cd.remaining_minutes(late), 0);
        assert!(cd.is_expired(late));
    }

    #[test]
    fn test_remaining_with_now_before_last_activity() {
        // A now earlier than last_activity must not underflow.
        let start = Instant::now();
        let later = start + minutes(1);
        let cd = IdleCountdown::new(minutes(30), later);
        assert_eq!(cd.remaining_minutes(start), 30);
    }

    // ── record_activity ───────────────────────────────────────────────────

    #[test]
    fn test_record_activity_restarts_countdown() {
        let start = Instant::now();
        let mut cd = IdleCountdown::new(minutes(30), start);

        // Activity at minute 20 resets remaining to the full timeout.
        let at_20 = start + minutes(20);
        cd.record_activity(at_20);
        assert_eq!(cd.remaining_minutes(at_20), 30);

        // Minute 25 on the wall clock is minute 5 of the new countdown.
        assert_eq!(cd.remaining_minutes(start + minutes(25)), 25);
    }

    #[test]
    fn test_monotonic_reset_property() {
        // After any sequence of activity events, remaining_minutes immediately
        // after the last event is within one minute of the configured timeout.
        let start = Instant::now();
        let mut cd = IdleCountdown::new(minutes(30), start);

        let mut now = start;
        for step_secs in [10u64, 95, 3600, 1, 240] {
            now += Duration::from_secs(step_secs);
            cd.record_activity(now);
            assert_eq!(cd.remaining_minutes(now), 30);
        }
    }

    #[test]
    fn test_deadline_tracks_last_activity() {
        let start = Instant::now();
        let mut cd = IdleCountdown::new(minutes(30), start);
        assert_eq!(cd.deadline(), start + minutes(30));

        let at_20 = start + minutes(20);
        cd.record_activity(at_20);
        assert_eq!(cd.deadline(), at_20 + minutes(30));
    }

    // ── should_warn ───────────────────────────────────────────────────────

    #[test]
    fn test_should_warn_inside_window() {
        assert!(should_warn(5, 5));
        assert!(should_warn(1, 5));
    }

    #[test]
    fn test_should_warn_outside_window() {
        assert!(!should_warn(6, 5));
        assert!(!should_warn(30, 5));
    }

    #[test]
    fn test_should_warn_not_after_expiry() {
        // Zero remaining means expired, not warnable.
        assert!(!should_warn(0, 5));
    }

    // ── scenario: timeout=30, no activity ─────────────────────────────────

    #[test]
    fn test_scenario_idle_thirty_minutes() {
        let start = Instant::now();
        let cd = IdleCountdown::new(minutes(30), start);

        let at_25 = start + minutes(25);
        assert_eq!(cd.remaining_minutes(at_25), 5);
        assert!(should_warn(cd.remaining_minutes(at_25), 5));

        let at_30 = start + minutes(30);
        assert!(cd.is_expired(at_30));
    }

    // ── scenario: timeout=30, activity at minute 20 ───────────────────────

    #[test]
    fn test_scenario_activity_at_minute_twenty() {
        let start = Instant::now();
        let mut cd = IdleCountdown::new(minutes(30), start);

        cd.record_activity(start + minutes(20));

        // At wall-clock minute 25 only 5 minutes have elapsed; no warning.
        let at_25 = start + minutes(25);
        assert_eq!(cd.remaining_minutes(at_25), 25);
        assert!(!should_warn(cd.remaining_minutes(at_25), 5));
    }

    // ── LogoutReason display ──────────────────────────────────────────────

    #[test]
    fn test_logout_reason_display() {
        assert_eq!(LogoutReason::Expired.to_string(), "expired");
        assert_eq!(LogoutReason::Manual.to_string(), "manual");
    }
}
