//! Runtime layer for the Portal Sentinel session-timeout component.
//!
//! Hosts the tokio-based idle monitor loop and the seams to the external
//! collaborators (authentication provider sign-out, login navigation).

pub mod hooks;
pub mod monitor;

pub use sentinel_core as core;
