//! Core types for the Portal Sentinel session-timeout component.
//!
//! Pure data and logic with no runtime dependencies: errors, CLI settings,
//! activity event kinds, the idle countdown state machine, and the cached
//! identity store cleared on logout.

pub mod activity;
pub mod countdown;
pub mod error;
pub mod identity;
pub mod settings;

pub use error::{Result, SentinelError};
