//! Identity observer service.
//!
//! Holds the currently known identity by subscribing to the provider's
//! change notifications. The rest of the flow reads this as the single
//! source of truth for "who is the current session".

use tracing::debug;

use crate::domain::models::Identity;
use crate::domain::ports::{IdentityProvider, IdentityWatch};

/// Observes the provider's current identity.
///
/// Activation registers exactly one subscription; dropping the
/// observer releases it unconditionally, on every exit path. If the
/// provider never publishes, `current_identity` stays `None`
/// indefinitely. That is a documented degradation, not an error, and
/// the observer never retries.
#[derive(Debug)]
pub struct IdentityObserver {
    watch: IdentityWatch,
}

impl IdentityObserver {
    /// Subscribe to the provider and start observing.
    pub async fn activate<P: IdentityProvider + ?Sized>(provider: &P) -> Self {
        let watch = provider.subscribe_identity_changes().await;
        debug!("identity observer activated");
        Self { watch }
    }

    /// The latest identity snapshot, if the provider has published one.
    pub fn current_identity(&self) -> Option<Identity> {
        self.watch.snapshot()
    }

    /// Wait until the provider publishes the next change.
    ///
    /// Returns `false` if the provider side has gone away; the last
    /// snapshot remains readable either way.
    pub async fn changed(&mut self) -> bool {
        self.watch.changed().await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::provider::InMemoryProvider;

    #[tokio::test]
    async fn test_observer_starts_empty_without_publication() {
        let provider = InMemoryProvider::new();
        let observer = IdentityObserver::activate(&provider).await;

        assert!(observer.current_identity().is_none());
    }

    #[tokio::test]
    async fn test_observer_tracks_published_identity() {
        let provider = InMemoryProvider::new();
        let observer = IdentityObserver::activate(&provider).await;

        let anon = provider.sign_in_anonymously().await;

        let current = observer.current_identity().expect("identity published");
        assert_eq!(current.id, anon.id);
        assert!(current.is_transient);
    }

    #[tokio::test]
    async fn test_observer_registers_exactly_one_subscription() {
        let provider = InMemoryProvider::new();
        let observer = IdentityObserver::activate(&provider).await;

        assert_eq!(provider.subscriber_count(), 1);

        drop(observer);
        assert_eq!(provider.subscriber_count(), 0);
    }
}
