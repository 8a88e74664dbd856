//! Link/resolve state machine service.
//!
//! The upgrade flow itself: collects candidate credentials, attempts
//! linking, classifies the result, and on a credential conflict
//! exposes the bounded override/merge decision. Nothing here retries
//! automatically; every failure is terminal for its attempt and a new
//! attempt is always an explicit caller action.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    ConflictDecision, CredentialCandidate, FlowOutcome, FlowState, Identity,
};
use crate::domain::ports::{IdentityProvider, ProviderFailure};
use crate::services::identity_observer::IdentityObserver;

/// The anonymous-to-permanent upgrade flow.
///
/// All mutating operations take `&mut self`: at most one attempt can
/// be in flight per flow instance, and a second `attempt_link` or
/// `resolve_override_sign_in` racing the first is unrepresentable.
/// Suspension happens only at the provider call boundary; every
/// transition around those awaits is synchronous.
pub struct LinkFlow<P: IdentityProvider> {
    provider: Arc<P>,
    observer: IdentityObserver,
    state: FlowState,
    outcome: FlowOutcome,
    candidate: CredentialCandidate,
    conflict: Option<ConflictDecision>,
}

impl<P: IdentityProvider> LinkFlow<P> {
    /// Subscribe to the provider and start an idle flow.
    pub async fn activate(provider: Arc<P>) -> Self {
        let observer = IdentityObserver::activate(provider.as_ref()).await;
        Self {
            provider,
            observer,
            state: FlowState::default(),
            outcome: FlowOutcome::default(),
            candidate: CredentialCandidate::default(),
            conflict: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn outcome(&self) -> &FlowOutcome {
        &self.outcome
    }

    pub fn candidate(&self) -> &CredentialCandidate {
        &self.candidate
    }

    pub fn conflict(&self) -> Option<&ConflictDecision> {
        self.conflict.as_ref()
    }

    /// The latest identity snapshot from the observer.
    pub fn current_identity(&self) -> Option<Identity> {
        self.observer.current_identity()
    }

    /// Wait for the provider to publish the next identity change.
    pub async fn identity_changed(&mut self) -> bool {
        self.observer.changed().await
    }

    /// Replace the candidate credentials. The input layer funnels all
    /// edits through here; the candidate is never shared out mutably.
    pub fn set_candidate(&mut self, email: impl Into<String>, password: impl Into<String>) {
        self.candidate = CredentialCandidate::new(email, password);
    }

    /// Attempt to link the candidate credential to the current
    /// identity, upgrading it in place.
    ///
    /// Guards (violating any is a silent no-op, state and candidate
    /// unchanged): an identity must be present and transient, the
    /// candidate complete, and the flow idle or re-attempting after a
    /// plain failure.
    pub async fn attempt_link(&mut self) -> FlowOutcome {
        let Some(identity) = self.observer.current_identity() else {
            debug!("attempt_link ignored: no current identity");
            return self.outcome.clone();
        };
        if !identity.is_transient {
            debug!(identity = %identity.id, "attempt_link ignored: identity not transient");
            return self.outcome.clone();
        }
        if !self.candidate.is_complete() {
            debug!("attempt_link ignored: incomplete candidate");
            return self.outcome.clone();
        }
        if !self.state.can_attempt_link() {
            debug!(state = self.state.as_str(), "attempt_link ignored: not idle");
            return self.outcome.clone();
        }

        self.transition(FlowState::Submitting);
        self.outcome = FlowOutcome::InProgress;

        let result = self
            .provider
            .link_credential(&identity, &self.candidate.email, &self.candidate.password)
            .await;

        match result {
            Ok(linked) => {
                info!(identity = %linked.id, email = %self.candidate.email, "credential linked");
                self.transition(FlowState::Linked);
                self.outcome = FlowOutcome::LinkSucceeded;
                self.candidate.clear_secret();
            }
            Err(failure) => {
                let outcome = FlowOutcome::classify_link(&failure.code, &failure.message);
                warn!(
                    code = %failure.code,
                    outcome = outcome.as_str(),
                    "link attempt failed"
                );
                if outcome == FlowOutcome::ConflictCredentialInUse {
                    self.conflict = Some(ConflictDecision::new(self.candidate.email.clone()));
                    self.transition(FlowState::Conflict);
                } else {
                    self.transition(FlowState::Failed);
                }
                self.outcome = outcome;
            }
        }

        self.outcome.clone()
    }

    /// Resolve an open conflict by signing in to the existing account
    /// that owns the credential, discarding the anonymous session.
    ///
    /// Valid only while the conflict decision is alive. Success
    /// replaces the current session identity: the provider publishes
    /// the new identity and the observer reflects it. This is an
    /// explicit, irreversible, user-acknowledged action.
    pub async fn resolve_override_sign_in(&mut self) -> FlowOutcome {
        if self.conflict.is_none() || !self.state.can_override_sign_in() {
            debug!(state = self.state.as_str(), "override ignored: no open conflict");
            return self.outcome.clone();
        }
        if !self.candidate.is_complete() {
            debug!("override ignored: incomplete candidate");
            return self.outcome.clone();
        }

        self.transition(FlowState::SubmittingOverride);
        self.outcome = FlowOutcome::InProgress;

        let result = self
            .provider
            .sign_in(&self.candidate.email, &self.candidate.password)
            .await;

        match result {
            Ok(identity) => {
                info!(identity = %identity.id, "override sign-in complete, anonymous session discarded");
                self.transition(FlowState::OverrideSignedIn);
                self.outcome = FlowOutcome::SignInSucceeded;
                self.candidate.clear_secret();
                self.conflict = None;
            }
            Err(failure) => {
                let outcome = FlowOutcome::classify_sign_in(&failure.code, &failure.message);
                warn!(
                    code = %failure.code,
                    outcome = outcome.as_str(),
                    "override sign-in failed"
                );
                if outcome == FlowOutcome::SignInWrongSecret {
                    self.transition(FlowState::ResetOffered);
                } else {
                    self.transition(FlowState::OverrideFailed);
                }
                self.outcome = outcome;
            }
        }

        self.outcome.clone()
    }

    /// The merge branch of the conflict decision.
    ///
    /// Present and selectable, but permanently unsupported: selecting
    /// it reports the error and changes nothing. It must never
    /// silently succeed.
    pub fn resolve_merge(&self) -> DomainResult<()> {
        if self.conflict.is_none() {
            return Err(DomainError::NoActiveConflict);
        }
        Err(DomainError::MergeUnsupported)
    }

    /// Dispatch a password-reset notification.
    ///
    /// Fire-and-forget relative to the machine: the result is returned
    /// to the caller directly and the flow state is never touched.
    pub async fn request_reset(&self, email: &str) -> Result<(), ProviderFailure> {
        let result = self.provider.send_password_reset(email).await;
        match &result {
            Ok(()) => info!(email, "password reset dispatched"),
            Err(failure) => warn!(email, code = %failure.code, "password reset dispatch failed"),
        }
        result
    }

    /// Re-arm the flow back to idle.
    ///
    /// Destroys the conflict decision, clears the outcome, and purges
    /// the stored password; the email survives to spare retyping.
    /// Rejected only while a provider call is in flight.
    pub fn cancel(&mut self) {
        if self.state.is_submitting() {
            debug!(state = self.state.as_str(), "cancel ignored while submitting");
            return;
        }
        self.conflict = None;
        self.outcome = FlowOutcome::Idle;
        self.state = FlowState::Idle;
        self.candidate.clear_secret();
        debug!("flow re-armed to idle");
    }

    /// Apply a transition, which must be in the state table. The
    /// public guards reject every invalid request before this point.
    fn transition(&mut self, next: FlowState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {} -> {}",
            self.state.as_str(),
            next.as_str()
        );
        debug!(from = self.state.as_str(), to = next.as_str(), "flow transition");
        self.state = next;
    }
}
