//! Identity provider port.
//!
//! The provider owns credential storage, token issuance, and session
//! persistence. The flow consumes it through exactly four operations
//! and never sees a wire format.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::models::{Identity, Secret};

/// A classified provider failure.
///
/// The code is provider-defined and treated as opaque; the well-known
/// values live in [`crate::domain::models::codes`]. The message is
/// human-readable and surfaced verbatim when the code is unmapped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct ProviderFailure {
    /// Provider-defined classification code
    pub code: String,
    /// Human-readable description
    pub message: String,
}

impl ProviderFailure {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Runs its release action exactly once, on drop.
///
/// Subscriptions are scoped resources: acquiring one hands back this
/// guard, and every exit path (including errors during setup by the
/// caller) releases it.
pub struct ReleaseGuard(Option<Box<dyn FnOnce() + Send>>);

impl ReleaseGuard {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self(Some(Box::new(release)))
    }

    /// A guard with no release action, for providers that have nothing
    /// to clean up.
    pub fn noop() -> Self {
        Self(None)
    }
}

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        if let Some(release) = self.0.take() {
            release();
        }
    }
}

impl std::fmt::Debug for ReleaseGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseGuard")
            .field("armed", &self.0.is_some())
            .finish()
    }
}

/// Handle for one identity-change subscription.
///
/// Wraps a `watch` receiver holding the latest identity snapshot plus
/// the release guard that unsubscribes from the provider when the
/// handle is dropped.
#[derive(Debug)]
pub struct IdentityWatch {
    receiver: watch::Receiver<Option<Identity>>,
    _release: ReleaseGuard,
}

impl IdentityWatch {
    pub fn new(receiver: watch::Receiver<Option<Identity>>, release: ReleaseGuard) -> Self {
        Self {
            receiver,
            _release: release,
        }
    }

    /// The latest identity the provider has published.
    pub fn snapshot(&self) -> Option<Identity> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next published change. Resolves with an error only
    /// when the provider side has gone away.
    pub async fn changed(&mut self) -> Result<(), watch::error::RecvError> {
        self.receiver.changed().await
    }
}

/// The four operations the upgrade flow consumes.
///
/// One call each, no batching. Failures carry a classification code
/// and message; the flow maps them through the outcome table.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Attach an email/password credential to the given identity,
    /// upgrading it in place. Returns the upgraded identity.
    async fn link_credential(
        &self,
        identity: &Identity,
        email: &str,
        password: &Secret,
    ) -> Result<Identity, ProviderFailure>;

    /// Sign in with an existing credential. On success the provider
    /// replaces the current session identity and publishes the change.
    async fn sign_in(&self, email: &str, password: &Secret) -> Result<Identity, ProviderFailure>;

    /// Dispatch a password-reset notification for the given email.
    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderFailure>;

    /// Register one identity-change subscription. Dropping the
    /// returned handle releases it.
    async fn subscribe_identity_changes(&self) -> IdentityWatch;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_release_guard_runs_on_drop() {
        let released = Arc::new(AtomicBool::new(false));
        let flag = released.clone();

        let guard = ReleaseGuard::new(move || flag.store(true, Ordering::SeqCst));
        assert!(!released.load(Ordering::SeqCst));

        drop(guard);
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_watch_snapshot_tracks_sender() {
        let (tx, rx) = watch::channel(None);
        let watch_handle = IdentityWatch::new(rx, ReleaseGuard::noop());

        assert!(watch_handle.snapshot().is_none());

        let identity = Identity::transient();
        tx.send(Some(identity.clone())).unwrap();

        assert_eq!(watch_handle.snapshot(), Some(identity));
    }
}
