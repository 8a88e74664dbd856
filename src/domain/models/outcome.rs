//! Flow outcome taxonomy and provider-failure classification.
//!
//! The classifier is a pure function from an opaque provider code to a
//! tagged variant, independent of any rendering, so the full mapping
//! table can be unit-tested without a live provider.

use serde::{Deserialize, Serialize};

/// Well-known provider classification codes.
///
/// Providers report failures as an opaque code plus a human-readable
/// message; these are the codes the flow knows how to classify. Any
/// other code falls through to [`FlowOutcome::OtherFailure`].
pub mod codes {
    pub const CREDENTIAL_ALREADY_IN_USE: &str = "credential-already-in-use";
    pub const OPERATION_NOT_ALLOWED: &str = "operation-not-allowed";
    pub const NETWORK_REQUEST_FAILED: &str = "network-request-failed";
    pub const WEAK_PASSWORD: &str = "weak-password";
    pub const INVALID_EMAIL: &str = "invalid-email";
    pub const WRONG_PASSWORD: &str = "wrong-password";
    pub const USER_NOT_FOUND: &str = "user-not-found";
}

/// Classified result of a link or sign-in attempt.
///
/// Exactly one outcome is active per flow at any time; each new
/// attempt replaces it atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FlowOutcome {
    /// No attempt has been made, or the flow was cancelled
    Idle,
    /// An attempt is in flight
    InProgress,
    /// Credential linked, identity upgraded in place
    LinkSucceeded,
    /// The credential already belongs to another identity
    ConflictCredentialInUse,
    /// Password sign-in is disabled on the provider
    ProviderDisabled,
    /// Transport failure talking to the provider
    NetworkFailure,
    /// Password fails the provider's strength policy
    WeakCredential,
    /// Malformed email address
    InvalidFormat,
    /// Unclassified provider failure, raw message carried verbatim
    OtherFailure { message: String },
    /// Override sign-in succeeded, session identity replaced
    SignInSucceeded,
    /// Override sign-in rejected for a wrong password
    SignInWrongSecret,
}

impl FlowOutcome {
    /// Classify a failed link attempt.
    ///
    /// Checked in precedence order, first match wins; unmatched codes
    /// carry the provider message through unmodified.
    pub fn classify_link(code: &str, message: &str) -> Self {
        match code {
            codes::CREDENTIAL_ALREADY_IN_USE => Self::ConflictCredentialInUse,
            codes::OPERATION_NOT_ALLOWED => Self::ProviderDisabled,
            codes::NETWORK_REQUEST_FAILED => Self::NetworkFailure,
            codes::WEAK_PASSWORD => Self::WeakCredential,
            codes::INVALID_EMAIL => Self::InvalidFormat,
            _ => Self::OtherFailure {
                message: message.to_string(),
            },
        }
    }

    /// Classify a failed override sign-in attempt.
    ///
    /// A wrong password is the one recoverable case (it unlocks the
    /// reset affordance); everything else maps exactly as a link
    /// failure does.
    pub fn classify_sign_in(code: &str, message: &str) -> Self {
        if code == codes::WRONG_PASSWORD {
            return Self::SignInWrongSecret;
        }
        Self::classify_link(code, message)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::InProgress => "in_progress",
            Self::LinkSucceeded => "link_succeeded",
            Self::ConflictCredentialInUse => "conflict_credential_in_use",
            Self::ProviderDisabled => "provider_disabled",
            Self::NetworkFailure => "network_failure",
            Self::WeakCredential => "weak_credential",
            Self::InvalidFormat => "invalid_format",
            Self::OtherFailure { .. } => "other_failure",
            Self::SignInSucceeded => "sign_in_succeeded",
            Self::SignInWrongSecret => "sign_in_wrong_secret",
        }
    }

    /// Whether this outcome reports a failed attempt.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::ConflictCredentialInUse
                | Self::ProviderDisabled
                | Self::NetworkFailure
                | Self::WeakCredential
                | Self::InvalidFormat
                | Self::OtherFailure { .. }
                | Self::SignInWrongSecret
        )
    }

    /// Whether re-attempting without changing anything may succeed.
    pub fn is_retry_safe(&self) -> bool {
        matches!(self, Self::NetworkFailure)
    }

    /// Operator remediation pointer, where one exists.
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::ProviderDisabled => Some(
                "Enable the email/password sign-in method in the provider's \
                 authentication settings.",
            ),
            Self::NetworkFailure => Some(
                "Check network connectivity. Consistent failures suggest a \
                 proxy or firewall blocking the provider endpoint.",
            ),
            _ => None,
        }
    }

    /// Short user-facing description of the outcome.
    pub fn user_message(&self) -> String {
        match self {
            Self::Idle => "No attempt in progress.".to_string(),
            Self::InProgress => "Working...".to_string(),
            Self::LinkSucceeded => {
                "Account linked. The anonymous identity is now permanent.".to_string()
            }
            Self::ConflictCredentialInUse => {
                "This email is already associated with another account.".to_string()
            }
            Self::ProviderDisabled => {
                "Password sign-in is not enabled on the provider.".to_string()
            }
            Self::NetworkFailure => "Could not reach the identity provider.".to_string(),
            Self::WeakCredential => {
                "The password is too weak. Use a longer password.".to_string()
            }
            Self::InvalidFormat => "The email address is not valid.".to_string(),
            Self::OtherFailure { message } => message.clone(),
            Self::SignInSucceeded => {
                "Signed in to the existing account. The previous anonymous session \
                 has been discarded."
                    .to_string()
            }
            Self::SignInWrongSecret => "Incorrect password.".to_string(),
        }
    }
}

impl Default for FlowOutcome {
    fn default() -> Self {
        Self::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_classification_table() {
        let cases = [
            (codes::CREDENTIAL_ALREADY_IN_USE, FlowOutcome::ConflictCredentialInUse),
            (codes::OPERATION_NOT_ALLOWED, FlowOutcome::ProviderDisabled),
            (codes::NETWORK_REQUEST_FAILED, FlowOutcome::NetworkFailure),
            (codes::WEAK_PASSWORD, FlowOutcome::WeakCredential),
            (codes::INVALID_EMAIL, FlowOutcome::InvalidFormat),
        ];

        for (code, expected) in cases {
            assert_eq!(FlowOutcome::classify_link(code, "msg"), expected, "code {code}");
        }
    }

    #[test]
    fn test_unmapped_code_carries_message_verbatim() {
        let outcome = FlowOutcome::classify_link("too-many-requests", "Quota exceeded.");
        assert_eq!(
            outcome,
            FlowOutcome::OtherFailure {
                message: "Quota exceeded.".to_string()
            }
        );
    }

    #[test]
    fn test_sign_in_wrong_password_is_special_cased() {
        let outcome = FlowOutcome::classify_sign_in(codes::WRONG_PASSWORD, "bad password");
        assert_eq!(outcome, FlowOutcome::SignInWrongSecret);
    }

    #[test]
    fn test_sign_in_other_codes_follow_link_table() {
        assert_eq!(
            FlowOutcome::classify_sign_in(codes::NETWORK_REQUEST_FAILED, "msg"),
            FlowOutcome::NetworkFailure
        );
        assert_eq!(
            FlowOutcome::classify_sign_in(codes::USER_NOT_FOUND, "No account for that email."),
            FlowOutcome::OtherFailure {
                message: "No account for that email.".to_string()
            }
        );
    }

    #[test]
    fn test_remediation_pointers() {
        assert!(FlowOutcome::ProviderDisabled.remediation().is_some());
        assert!(FlowOutcome::NetworkFailure.remediation().is_some());
        assert!(FlowOutcome::WeakCredential.remediation().is_none());
        assert!(FlowOutcome::LinkSucceeded.remediation().is_none());
    }

    #[test]
    fn test_only_network_failure_is_retry_safe() {
        assert!(FlowOutcome::NetworkFailure.is_retry_safe());
        assert!(!FlowOutcome::ProviderDisabled.is_retry_safe());
        assert!(!FlowOutcome::ConflictCredentialInUse.is_retry_safe());
    }

    #[test]
    fn test_failure_predicate() {
        assert!(FlowOutcome::ConflictCredentialInUse.is_failure());
        assert!(FlowOutcome::SignInWrongSecret.is_failure());
        assert!(!FlowOutcome::LinkSucceeded.is_failure());
        assert!(!FlowOutcome::InProgress.is_failure());
        assert!(!FlowOutcome::Idle.is_failure());
    }
}
