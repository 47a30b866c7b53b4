//! Seams to the monitor's external collaborators.
//!
//! The authentication provider and screen navigation are external to this
//! component, so the monitor talks to them through object-safe traits. The
//! sign-out call is the only asynchronous operation the monitor awaits; it is
//! allowed to fail without blocking the logout sequence.

use std::future::Future;
use std::pin::Pin;

use sentinel_core::Result;

/// Boxed future returned by [`SignOut::sign_out`], keeping the trait
/// object-safe without an async-trait dependency.
pub type SignOutFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Revokes the remote session with the authentication provider.
pub trait SignOut: Send + Sync {
    /// Parameterless, asynchronous, may fail. Failure must not trap the user
    /// on an authenticated screen; the monitor logs it and proceeds.
    fn sign_out(&self) -> SignOutFuture<'_>;
}

/// Issues navigation to the login screen after logout.
pub trait Navigator: Send + Sync {
    fn to_login(&self);
}

// ── Stub implementations ──────────────────────────────────────────────────────

/// Sign-out that only logs; used where no authentication provider is wired.
pub struct LoggingSignOut;

impl SignOut for LoggingSignOut {
    fn sign_out(&self) -> SignOutFuture<'_> {
        Box::pin(async {
            tracing::info!("sign-out requested (no provider configured)");
            Ok(())
        })
    }
}

/// Navigator that only logs the navigation target.
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn to_login(&self) {
        tracing::info!("navigating to login screen");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_logging_sign_out_succeeds() {
        let hook = LoggingSignOut;
        assert!(hook.sign_out().await.is_ok());
    }

    #[test]
    fn test_traits_are_object_safe() {
        let _signout: Box<dyn SignOut> = Box::new(LoggingSignOut);
        let _navigator: Box<dyn Navigator> = Box::new(LoggingNavigator);
    }
}
