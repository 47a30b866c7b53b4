//! Cached identity for the signed-in teacher.
//!
//! The portal caches a handful of identity fields locally so every screen can
//! render the signed-in teacher without a round trip. The monitor receives
//! these as an explicit [`SessionContext`] at construction and clears the
//! backing [`IdentityStore`] on logout; there is no ambient global state.
//!
//! State lives in `identity.json` under the config directory and uses the
//! same warn-and-fall-back loading discipline as the settings file: a missing
//! or corrupt file never panics, and save errors are logged as warnings.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SentinelError};

// ── SessionContext ────────────────────────────────────────────────────────────

/// Identity values for the signed-in teacher, passed to the monitor at
/// construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionContext {
    /// Display name of the teacher.
    pub teacher_name: String,
    /// E-mail used for sign-in.
    pub email: String,
    /// Identifier of the teacher record in the document store.
    pub teacher_id: String,
    /// When the current session was authenticated.
    pub signed_in_at: DateTime<Utc>,
}

impl SessionContext {
    /// Build a context authenticated right now.
    pub fn new(teacher_name: &str, email: &str, teacher_id: &str) -> Self {
        Self {
            teacher_name: teacher_name.to_string(),
            email: email.to_string(),
            teacher_id: teacher_id.to_string(),
            signed_in_at: Utc::now(),
        }
    }
}

// ── IdentityStore ─────────────────────────────────────────────────────────────

/// File-backed store for the cached identity fields.
///
/// # Example
///
/// ```no_run
/// use sentinel_core::identity::{IdentityStore, SessionContext};
/// use std::path::Path;
///
/// let store = IdentityStore::new(Path::new("/tmp/portal-sentinel"));
/// store.save(&SessionContext::new("A. Rivera", "rivera@school.edu", "t-041"));
/// let cached = store.load();
/// ```
pub struct IdentityStore {
    identity_file: PathBuf,
}

impl IdentityStore {
    /// Create a store that persists under `config_dir/identity.json`.
    pub fn new(config_dir: &Path) -> Self {
        Self {
            identity_file: config_dir.join("identity.json"),
        }
    }

    /// Create a store using the default `~/.portal-sentinel/` config
    /// directory.
    ///
    /// Returns `None` when the home directory cannot be determined.
    pub fn with_default_path() -> Option<Self> {
        let config_dir = dirs::home_dir()?.join(".portal-sentinel");
        Some(Self::new(&config_dir))
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.identity_file
    }

    /// Load the cached identity, or `None` when absent or unreadable.
    ///
    /// A corrupt file is treated the same as a missing one, with a warning.
    pub fn load(&self) -> Option<SessionContext> {
        if !self.identity_file.exists() {
            return None;
        }

        match std::fs::read_to_string(&self.identity_file) {
            Ok(content) => match serde_json::from_str::<SessionContext>(&content) {
                Ok(ctx) => Some(ctx),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        path = %self.identity_file.display(),
                        "failed to deserialise cached identity; treating as absent"
                    );
                    None
                }
            },
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.identity_file.display(),
                    "failed to read cached identity file; treating as absent"
                );
                None
            }
        }
    }

    /// Persist `context`, creating parent directories if needed.
    ///
    /// Errors are logged but never propagated; a failed save must not block
    /// sign-in.
    pub fn save(&self, context: &SessionContext) {
        if let Err(e) = self.try_save(context) {
            tracing::warn!(
                error = %e,
                path = %self.identity_file.display(),
                "failed to save cached identity"
            );
        }
    }

    /// Remove the cached identity fields.
    ///
    /// Called from the logout sequence; idempotent (clearing an already-empty
    /// store succeeds).
    pub fn clear(&self) -> Result<()> {
        if self.identity_file.exists() {
            std::fs::remove_file(&self.identity_file).map_err(|source| {
                SentinelError::FileRead {
                    path: self.identity_file.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    fn try_save(&self, context: &SessionContext) -> Result<()> {
        if let Some(parent) = self.identity_file.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(context)?;

        // Write to a temp file then rename for atomicity.
        let tmp = self.identity_file.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &self.identity_file)?;

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store(dir: &TempDir) -> IdentityStore {
        IdentityStore::new(dir.path())
    }

    fn sample_context() -> SessionContext {
        SessionContext::new("A. Rivera", "rivera@school.edu", "t-041")
    }

    // ── load / save ───────────────────────────────────────────────────────

    #[test]
    fn test_load_returns_none_when_absent() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);

        let ctx = sample_context();
        store.save(&ctx);

        let loaded = store.load().expect("identity should load after save");
        assert_eq!(loaded, ctx);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("deeply").join("nested");
        let store = IdentityStore::new(&nested);

        store.save(&sample_context());
        assert!(store.path().exists());
    }

    #[test]
    fn test_load_corrupt_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);
        std::fs::write(store.path(), b"not valid json at all").unwrap();

        assert!(store.load().is_none());
    }

    // ── clear ─────────────────────────────────────────────────────────────

    #[test]
    fn test_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);

        store.save(&sample_context());
        assert!(store.path().exists());

        store.clear().expect("clear should succeed");
        assert!(!store.path().exists());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = make_store(&dir);

        // Nothing saved; clearing twice must still succeed.
        store.clear().expect("first clear");
        store.clear().expect("second clear");
    }

    // ── SessionContext ────────────────────────────────────────────────────

    #[test]
    fn test_session_context_serialise_round_trip() {
        let ctx = sample_context();
        let json = serde_json::to_string(&ctx).unwrap();
        let back: SessionContext = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ctx);
    }

    #[test]
    fn test_session_context_fields() {
        let ctx = sample_context();
        assert_eq!(ctx.teacher_name, "A. Rivera");
        assert_eq!(ctx.email, "rivera@school.edu");
        assert_eq!(ctx.teacher_id, "t-041");
    }
}
