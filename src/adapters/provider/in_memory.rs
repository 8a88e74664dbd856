//! In-memory identity provider.
//!
//! The reference provider behind the lab: an account store, a current
//! session published over a watch channel, and the provider-side
//! policy that produces the real failure codes. No persistence; the
//! store lives and dies with the process.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::models::{codes, Identity, ProviderConfig, Secret};
use crate::domain::ports::{IdentityProvider, IdentityWatch, ProviderFailure, ReleaseGuard};

/// An account the provider owns.
#[derive(Debug, Clone)]
struct StoredAccount {
    password: String,
    identity: Identity,
}

/// Identity provider backed by process memory.
pub struct InMemoryProvider {
    policy: ProviderConfig,
    accounts: RwLock<HashMap<String, StoredAccount>>,
    current: watch::Sender<Option<Identity>>,
    subscribers: Arc<Mutex<HashSet<Uuid>>>,
    dispatched_resets: Mutex<Vec<String>>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::with_policy(ProviderConfig::default())
    }

    pub fn with_policy(policy: ProviderConfig) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            policy,
            accounts: RwLock::new(HashMap::new()),
            current,
            subscribers: Arc::new(Mutex::new(HashSet::new())),
            dispatched_resets: Mutex::new(Vec::new()),
        }
    }

    /// Build from config and seed the configured accounts.
    pub async fn from_config(policy: ProviderConfig) -> Self {
        let provider = Self::with_policy(policy.clone());
        for seed in &policy.seed_accounts {
            provider.seed_account(&seed.email, &seed.password).await;
        }
        provider
    }

    /// Create a pre-existing permanent account without touching the
    /// current session.
    pub async fn seed_account(&self, email: &str, password: &str) -> Identity {
        let identity = Identity::permanent(email);
        let mut accounts = self.accounts.write().await;
        accounts.insert(
            email.to_string(),
            StoredAccount {
                password: password.to_string(),
                identity: identity.clone(),
            },
        );
        debug!(email, "seeded provider account");
        identity
    }

    /// Start an anonymous session and publish it as current.
    pub async fn sign_in_anonymously(&self) -> Identity {
        let identity = Identity::transient();
        info!(identity = %identity.id, "anonymous session started");
        self.current.send_replace(Some(identity.clone()));
        identity
    }

    /// Live identity-change subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().expect("subscriber registry").len()
    }

    /// Emails password resets were dispatched to, in order.
    pub fn dispatched_resets(&self) -> Vec<String> {
        self.dispatched_resets.lock().expect("reset log").clone()
    }

    fn check_sign_in_method(&self) -> Result<(), ProviderFailure> {
        if self.policy.password_sign_in_enabled {
            Ok(())
        } else {
            Err(ProviderFailure::new(
                codes::OPERATION_NOT_ALLOWED,
                "The email/password sign-in method is disabled.",
            ))
        }
    }

    fn check_email(email: &str) -> Result<(), ProviderFailure> {
        let malformed = ProviderFailure::new(
            codes::INVALID_EMAIL,
            "The email address is badly formatted.",
        );
        let Some((local, domain)) = email.split_once('@') else {
            return Err(malformed);
        };
        if local.is_empty() || domain.is_empty() || !domain.contains('.') {
            return Err(malformed);
        }
        Ok(())
    }

    fn check_password_strength(&self, password: &Secret) -> Result<(), ProviderFailure> {
        if password.expose().len() < self.policy.min_password_length {
            return Err(ProviderFailure::new(
                codes::WEAK_PASSWORD,
                format!(
                    "Password should be at least {} characters.",
                    self.policy.min_password_length
                ),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for InMemoryProvider {
    async fn link_credential(
        &self,
        identity: &Identity,
        email: &str,
        password: &Secret,
    ) -> Result<Identity, ProviderFailure> {
        self.check_sign_in_method()?;
        Self::check_email(email)?;
        self.check_password_strength(password)?;

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(ProviderFailure::new(
                codes::CREDENTIAL_ALREADY_IN_USE,
                "This credential is already associated with a different account.",
            ));
        }

        let linked = identity.linked_to(email);
        accounts.insert(
            email.to_string(),
            StoredAccount {
                password: password.expose().to_string(),
                identity: linked.clone(),
            },
        );
        drop(accounts);

        info!(identity = %linked.id, "credential linked, identity upgraded");
        self.current.send_replace(Some(linked.clone()));
        Ok(linked)
    }

    async fn sign_in(&self, email: &str, password: &Secret) -> Result<Identity, ProviderFailure> {
        self.check_sign_in_method()?;

        let accounts = self.accounts.read().await;
        let account = accounts.get(email).ok_or_else(|| {
            ProviderFailure::new(codes::USER_NOT_FOUND, "No account exists for that email.")
        })?;
        if account.password != password.expose() {
            return Err(ProviderFailure::new(
                codes::WRONG_PASSWORD,
                "The password is invalid for that account.",
            ));
        }

        let identity = account.identity.clone();
        drop(accounts);

        info!(identity = %identity.id, "signed in, session replaced");
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderFailure> {
        let accounts = self.accounts.read().await;
        if !accounts.contains_key(email) {
            return Err(ProviderFailure::new(
                codes::USER_NOT_FOUND,
                "No account exists for that email.",
            ));
        }
        drop(accounts);

        self.dispatched_resets
            .lock()
            .expect("reset log")
            .push(email.to_string());
        info!(email, "password reset notification dispatched");
        Ok(())
    }

    async fn subscribe_identity_changes(&self) -> IdentityWatch {
        let id = Uuid::new_v4();
        self.subscribers
            .lock()
            .expect("subscriber registry")
            .insert(id);

        let registry = Arc::clone(&self.subscribers);
        let release = ReleaseGuard::new(move || {
            registry.lock().expect("subscriber registry").remove(&id);
        });

        IdentityWatch::new(self.current.subscribe(), release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::SeedAccount;

    #[tokio::test]
    async fn test_link_upgrades_current_session() {
        let provider = InMemoryProvider::new();
        let watch_handle = provider.subscribe_identity_changes().await;
        let anon = provider.sign_in_anonymously().await;

        let linked = provider
            .link_credential(&anon, "u@ex.com", &Secret::new("Secret1!"))
            .await
            .unwrap();

        assert_eq!(linked.id, anon.id);
        assert!(!linked.is_transient);
        assert_eq!(watch_handle.snapshot(), Some(linked));
    }

    #[tokio::test]
    async fn test_link_conflict_for_seeded_email() {
        let provider = InMemoryProvider::new();
        provider.seed_account("u@ex.com", "Existing9!").await;
        let anon = provider.sign_in_anonymously().await;

        let err = provider
            .link_credential(&anon, "u@ex.com", &Secret::new("Secret1!"))
            .await
            .unwrap_err();

        assert_eq!(err.code, codes::CREDENTIAL_ALREADY_IN_USE);
    }

    #[tokio::test]
    async fn test_link_rejects_malformed_email() {
        let provider = InMemoryProvider::new();
        let anon = provider.sign_in_anonymously().await;

        for email in ["plainaddress", "@ex.com", "u@", "u@nodot"] {
            let err = provider
                .link_credential(&anon, email, &Secret::new("Secret1!"))
                .await
                .unwrap_err();
            assert_eq!(err.code, codes::INVALID_EMAIL, "email {email}");
        }
    }

    #[tokio::test]
    async fn test_link_enforces_password_policy() {
        let provider = InMemoryProvider::new();
        let anon = provider.sign_in_anonymously().await;

        let err = provider
            .link_credential(&anon, "u@ex.com", &Secret::new("abc"))
            .await
            .unwrap_err();

        assert_eq!(err.code, codes::WEAK_PASSWORD);
    }

    #[tokio::test]
    async fn test_disabled_method_rejects_link_and_sign_in() {
        let policy = ProviderConfig {
            password_sign_in_enabled: false,
            ..Default::default()
        };
        let provider = InMemoryProvider::with_policy(policy);
        let anon = provider.sign_in_anonymously().await;

        let err = provider
            .link_credential(&anon, "u@ex.com", &Secret::new("Secret1!"))
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::OPERATION_NOT_ALLOWED);

        let err = provider
            .sign_in("u@ex.com", &Secret::new("Secret1!"))
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::OPERATION_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let provider = InMemoryProvider::new();
        provider.seed_account("u@ex.com", "Existing9!").await;

        let err = provider
            .sign_in("u@ex.com", &Secret::new("nope-wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.code, codes::WRONG_PASSWORD);
    }

    #[tokio::test]
    async fn test_sign_in_unknown_user() {
        let provider = InMemoryProvider::new();

        let err = provider
            .sign_in("nobody@ex.com", &Secret::new("Secret1!"))
            .await
            .unwrap_err();

        assert_eq!(err.code, codes::USER_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reset_requires_known_account() {
        let provider = InMemoryProvider::new();
        provider.seed_account("u@ex.com", "Existing9!").await;

        provider.send_password_reset("u@ex.com").await.unwrap();
        assert_eq!(provider.dispatched_resets(), vec!["u@ex.com".to_string()]);

        let err = provider
            .send_password_reset("nobody@ex.com")
            .await
            .unwrap_err();
        assert_eq!(err.code, codes::USER_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_from_config_seeds_accounts() {
        let policy = ProviderConfig {
            seed_accounts: vec![SeedAccount {
                email: "u@ex.com".to_string(),
                password: "Existing9!".to_string(),
            }],
            ..Default::default()
        };
        let provider = InMemoryProvider::from_config(policy).await;

        let identity = provider
            .sign_in("u@ex.com", &Secret::new("Existing9!"))
            .await
            .unwrap();
        assert_eq!(identity.email.as_deref(), Some("u@ex.com"));
    }
}
