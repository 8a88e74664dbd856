//! Conflict decision model.
//!
//! Entered only when a link attempt reports the credential as already
//! bound to a different identity. Offers exactly two branches, one of
//! which is a first-class disabled variant.

use serde::{Deserialize, Serialize};

/// A branch of the conflict decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictBranch {
    /// Merge the anonymous identity's data into the existing account.
    /// Present but permanently unsupported; selecting it must never
    /// silently succeed.
    Merge,
    /// Abandon the anonymous identity and sign in to the existing
    /// account that owns the credential. Destroys unsaved local state.
    OverrideSignIn,
}

impl ConflictBranch {
    pub fn is_supported(&self) -> bool {
        matches!(self, Self::OverrideSignIn)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge",
            Self::OverrideSignIn => "override_sign_in",
        }
    }

    /// Short description for presentation.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::Merge => "Merge the anonymous session's data into the existing account",
            Self::OverrideSignIn => {
                "Sign in to the existing account, discarding the anonymous session"
            }
        }
    }
}

/// The bounded decision offered while a credential conflict is open.
///
/// Created only from the credential-in-use classification; destroyed
/// when the user cancels or a branch completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictDecision {
    /// The email the conflict arose over
    pub email: String,
}

impl ConflictDecision {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }

    /// Both branches, in presentation order. The merge branch is
    /// always listed and always unsupported.
    pub fn branches(&self) -> [ConflictBranch; 2] {
        [ConflictBranch::Merge, ConflictBranch::OverrideSignIn]
    }

    /// The branches the user can actually take.
    pub fn actionable_branches(&self) -> Vec<ConflictBranch> {
        self.branches()
            .into_iter()
            .filter(ConflictBranch::is_supported)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_is_listed_but_unsupported() {
        let decision = ConflictDecision::new("u@ex.com");

        let branches = decision.branches();
        assert!(branches.contains(&ConflictBranch::Merge));
        assert!(!ConflictBranch::Merge.is_supported());
    }

    #[test]
    fn test_override_is_the_only_actionable_branch() {
        let decision = ConflictDecision::new("u@ex.com");
        assert_eq!(
            decision.actionable_branches(),
            vec![ConflictBranch::OverrideSignIn]
        );
    }
}
