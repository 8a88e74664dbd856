//! Scripted provider for testing.
//!
//! Returns queued responses per operation and records every call, so
//! tests can inject exact failure codes (network failures, arbitrary
//! unmapped codes) the behavioral fake never produces.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::models::{Identity, Secret};
use crate::domain::ports::{IdentityProvider, IdentityWatch, ProviderFailure, ReleaseGuard};

/// One scripted reply for a provider operation.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Succeed. For link, `None` derives the upgraded identity from
    /// the request; for sign-in, `None` fabricates a permanent
    /// identity for the requested email.
    Success(Option<Identity>),
    /// Fail with the given classification code and message.
    Failure { code: String, message: String },
}

impl ScriptedResponse {
    pub fn ok() -> Self {
        Self::Success(None)
    }

    pub fn success(identity: Identity) -> Self {
        Self::Success(Some(identity))
    }

    pub fn failure(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failure {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Scripted identity provider.
///
/// Operations pop from their script queue; an empty queue means
/// success with derived values. Successful link and sign-in publish
/// the resulting identity on the change channel, mirroring a real
/// provider's session replacement.
pub struct MockProvider {
    current: watch::Sender<Option<Identity>>,
    subscribers: Arc<Mutex<HashSet<Uuid>>>,
    link_script: Mutex<VecDeque<ScriptedResponse>>,
    sign_in_script: Mutex<VecDeque<ScriptedResponse>>,
    reset_script: Mutex<VecDeque<ScriptedResponse>>,
    link_call_count: AtomicUsize,
    sign_in_call_count: AtomicUsize,
    reset_emails: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            current,
            subscribers: Arc::new(Mutex::new(HashSet::new())),
            link_script: Mutex::new(VecDeque::new()),
            sign_in_script: Mutex::new(VecDeque::new()),
            reset_script: Mutex::new(VecDeque::new()),
            link_call_count: AtomicUsize::new(0),
            sign_in_call_count: AtomicUsize::new(0),
            reset_emails: Mutex::new(Vec::new()),
        }
    }

    /// Publish an identity on the change channel directly.
    pub fn publish_identity(&self, identity: Identity) {
        self.current.send_replace(Some(identity));
    }

    pub fn script_link(&self, response: ScriptedResponse) {
        self.link_script.lock().expect("mock lock").push_back(response);
    }

    pub fn script_sign_in(&self, response: ScriptedResponse) {
        self.sign_in_script.lock().expect("mock lock").push_back(response);
    }

    pub fn script_reset(&self, response: ScriptedResponse) {
        self.reset_script.lock().expect("mock lock").push_back(response);
    }

    pub fn link_calls(&self) -> usize {
        self.link_call_count.load(Ordering::SeqCst)
    }

    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_call_count.load(Ordering::SeqCst)
    }

    /// Emails password resets were dispatched to, in order.
    pub fn reset_emails(&self) -> Vec<String> {
        self.reset_emails.lock().expect("mock lock").clone()
    }

    /// Live identity-change subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().expect("mock lock").len()
    }

    fn next(script: &Mutex<VecDeque<ScriptedResponse>>) -> ScriptedResponse {
        script
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or_else(ScriptedResponse::ok)
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn link_credential(
        &self,
        identity: &Identity,
        email: &str,
        _password: &Secret,
    ) -> Result<Identity, ProviderFailure> {
        self.link_call_count.fetch_add(1, Ordering::SeqCst);
        match Self::next(&self.link_script) {
            ScriptedResponse::Success(scripted) => {
                let linked = scripted.unwrap_or_else(|| identity.linked_to(email));
                self.current.send_replace(Some(linked.clone()));
                Ok(linked)
            }
            ScriptedResponse::Failure { code, message } => Err(ProviderFailure::new(code, message)),
        }
    }

    async fn sign_in(&self, email: &str, _password: &Secret) -> Result<Identity, ProviderFailure> {
        self.sign_in_call_count.fetch_add(1, Ordering::SeqCst);
        match Self::next(&self.sign_in_script) {
            ScriptedResponse::Success(scripted) => {
                let identity = scripted.unwrap_or_else(|| Identity::permanent(email));
                self.current.send_replace(Some(identity.clone()));
                Ok(identity)
            }
            ScriptedResponse::Failure { code, message } => Err(ProviderFailure::new(code, message)),
        }
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), ProviderFailure> {
        match Self::next(&self.reset_script) {
            ScriptedResponse::Success(_) => {
                self.reset_emails
                    .lock()
                    .expect("mock lock")
                    .push(email.to_string());
                Ok(())
            }
            ScriptedResponse::Failure { code, message } => Err(ProviderFailure::new(code, message)),
        }
    }

    async fn subscribe_identity_changes(&self) -> IdentityWatch {
        let id = Uuid::new_v4();
        self.subscribers.lock().expect("mock lock").insert(id);

        let registry = Arc::clone(&self.subscribers);
        let release = ReleaseGuard::new(move || {
            registry.lock().expect("mock lock").remove(&id);
        });

        IdentityWatch::new(self.current.subscribe(), release)
    }
}
