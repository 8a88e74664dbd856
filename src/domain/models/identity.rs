//! Identity domain model.
//!
//! Identities are owned by the external provider; the flow only ever
//! observes snapshots of them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a session identity as published by the provider.
///
/// A transient identity has no durable credential attached and carries
/// no email. Linking upgrades it in place: same `id`, email set,
/// `is_transient` cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned unique identifier
    pub id: Uuid,
    /// Linked email, absent on transient identities
    pub email: Option<String>,
    /// Whether this identity is anonymous (no durable credential)
    pub is_transient: bool,
    /// When the provider created this identity
    pub created_at: DateTime<Utc>,
}

impl Identity {
    /// Create a fresh transient (anonymous) identity snapshot.
    pub fn transient() -> Self {
        Self {
            id: Uuid::new_v4(),
            email: None,
            is_transient: true,
            created_at: Utc::now(),
        }
    }

    /// Create a permanent identity snapshot bound to an email.
    pub fn permanent(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: Some(email.into()),
            is_transient: false,
            created_at: Utc::now(),
        }
    }

    /// The upgraded form of this identity after a successful link.
    ///
    /// Keeps the id and creation time; the identity is upgraded in
    /// place, not replaced.
    pub fn linked_to(&self, email: impl Into<String>) -> Self {
        Self {
            id: self.id,
            email: Some(email.into()),
            is_transient: false,
            created_at: self.created_at,
        }
    }

    /// Whether this identity can be upgraded by credential linking.
    pub fn is_upgradeable(&self) -> bool {
        self.is_transient && self.email.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_identity_has_no_email() {
        let identity = Identity::transient();
        assert!(identity.is_transient);
        assert!(identity.email.is_none());
        assert!(identity.is_upgradeable());
    }

    #[test]
    fn test_permanent_identity() {
        let identity = Identity::permanent("u@ex.com");
        assert!(!identity.is_transient);
        assert_eq!(identity.email.as_deref(), Some("u@ex.com"));
        assert!(!identity.is_upgradeable());
    }

    #[test]
    fn test_linked_to_upgrades_in_place() {
        let anon = Identity::transient();
        let linked = anon.linked_to("u@ex.com");

        assert_eq!(linked.id, anon.id);
        assert_eq!(linked.created_at, anon.created_at);
        assert!(!linked.is_transient);
        assert_eq!(linked.email.as_deref(), Some("u@ex.com"));
    }
}
