use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the Portal Sentinel crates.
#[derive(Error, Debug)]
pub enum SentinelError {
    /// A state file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// An idle-timeout value is outside the accepted range.
    #[error("Invalid timeout: {0} minutes")]
    InvalidTimeout(u64),

    /// The external sign-out call failed.
    ///
    /// Logout still proceeds locally; this is surfaced for logging only.
    #[error("Sign-out failed: {0}")]
    SignOut(String),

    /// The monitor has already reached its terminal state.
    #[error("Monitor is no longer active")]
    MonitorStopped,

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the sentinel crates.
pub type Result<T> = std::result::Result<T, SentinelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SentinelError::FileRead {
            path: PathBuf::from("/some/identity.json"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/identity.json"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_invalid_timeout() {
        let err = SentinelError::InvalidTimeout(0);
        assert_eq!(err.to_string(), "Invalid timeout: 0 minutes");
    }

    #[test]
    fn test_error_display_sign_out() {
        let err = SentinelError::SignOut("provider returned 503".to_string());
        assert_eq!(err.to_string(), "Sign-out failed: provider returned 503");
    }

    #[test]
    fn test_error_display_monitor_stopped() {
        let err = SentinelError::MonitorStopped;
        assert_eq!(err.to_string(), "Monitor is no longer active");
    }

    #[test]
    fn test_error_display_config() {
        let err = SentinelError::Config("warning threshold exceeds timeout".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: warning threshold exceeds timeout"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SentinelError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: SentinelError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}
