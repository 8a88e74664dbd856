//! Link/resolve flow states.
//!
//! The machine that carries an anonymous identity through credential
//! linking and conflict resolution. Transitions are validated against
//! a fixed table; everything outside it is a bug, not a runtime case.

use serde::{Deserialize, Serialize};

/// State of the upgrade flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowState {
    /// No attempt in progress
    Idle,
    /// A link attempt is in flight against the provider
    Submitting,
    /// Credential linked, identity upgraded
    Linked,
    /// The credential belongs to another identity; decision open
    Conflict,
    /// Link attempt failed with no decision sub-state
    Failed,
    /// An override sign-in is in flight
    SubmittingOverride,
    /// Override sign-in succeeded, session identity replaced
    OverrideSignedIn,
    /// Override sign-in failed for a non-recoverable reason
    OverrideFailed,
    /// Wrong password during override; reset affordance available
    ResetOffered,
}

impl Default for FlowState {
    fn default() -> Self {
        Self::Idle
    }
}

impl FlowState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Linked => "linked",
            Self::Conflict => "conflict",
            Self::Failed => "failed",
            Self::SubmittingOverride => "submitting_override",
            Self::OverrideSignedIn => "override_signed_in",
            Self::OverrideFailed => "override_failed",
            Self::ResetOffered => "reset_offered",
        }
    }

    /// Whether a provider call is in flight.
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting | Self::SubmittingOverride)
    }

    /// Terminal for the current attempt. The machine can always be
    /// re-armed back to `Idle` from these.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Linked | Self::OverrideSignedIn)
    }

    /// Whether the conflict decision sub-state is alive in this state.
    pub fn conflict_decision_open(&self) -> bool {
        matches!(
            self,
            Self::Conflict | Self::SubmittingOverride | Self::OverrideFailed | Self::ResetOffered
        )
    }

    /// Whether a new link attempt may start from this state.
    pub fn can_attempt_link(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }

    /// Whether an override sign-in may start from this state.
    pub fn can_override_sign_in(&self) -> bool {
        matches!(self, Self::Conflict | Self::OverrideFailed | Self::ResetOffered)
    }

    /// Valid transitions from this state.
    pub fn valid_transitions(&self) -> Vec<FlowState> {
        match self {
            Self::Idle => vec![Self::Submitting],
            Self::Submitting => vec![Self::Linked, Self::Conflict, Self::Failed],
            Self::Linked => vec![Self::Idle],
            Self::Conflict => vec![Self::SubmittingOverride, Self::Idle],
            Self::Failed => vec![Self::Submitting, Self::Idle],
            Self::SubmittingOverride => {
                vec![Self::OverrideSignedIn, Self::OverrideFailed, Self::ResetOffered]
            }
            Self::OverrideSignedIn => vec![Self::Idle],
            Self::OverrideFailed => vec![Self::SubmittingOverride, Self::Idle],
            Self::ResetOffered => vec![Self::SubmittingOverride, Self::Idle],
        }
    }

    pub fn can_transition_to(&self, next: Self) -> bool {
        self.valid_transitions().contains(&next)
    }
}
