//! Credential candidate model.
//!
//! The (email, password) pair the user supplies for linking. Held only
//! in the flow's working memory, never persisted.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A password value that never renders itself.
///
/// `Debug` and `Display` are redacted so the secret cannot leak into
/// log output or error messages. Serialization is skipped entirely at
/// the candidate level.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the raw value for the provider call boundary.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrite the stored value with the empty string.
    pub fn purge(&mut self) {
        self.0.clear();
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// User-supplied credentials awaiting a link or sign-in attempt.
///
/// The password is purged after a successful link or a destructive
/// override sign-in; the email is retained so the user does not have
/// to retype it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialCandidate {
    /// Candidate email address
    pub email: String,
    /// Candidate password, redacted in all rendered output
    #[serde(skip)]
    pub password: Secret,
}

impl CredentialCandidate {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: Secret::new(password),
        }
    }

    /// Both fields non-empty. A violated guard is a silent no-op for
    /// the flow, not a reported error.
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }

    /// Purge the password, keeping the email for display.
    pub fn clear_secret(&mut self) {
        self.password.purge();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("Secret1!");
        assert_eq!(format!("{secret:?}"), "Secret([REDACTED])");
        assert_eq!(format!("{secret}"), "[REDACTED]");
    }

    #[test]
    fn test_candidate_completeness() {
        assert!(CredentialCandidate::new("u@ex.com", "Secret1!").is_complete());
        assert!(!CredentialCandidate::new("", "Secret1!").is_complete());
        assert!(!CredentialCandidate::new("u@ex.com", "").is_complete());
    }

    #[test]
    fn test_clear_secret_retains_email() {
        let mut candidate = CredentialCandidate::new("u@ex.com", "Secret1!");
        candidate.clear_secret();

        assert_eq!(candidate.email, "u@ex.com");
        assert!(candidate.password.is_empty());
        assert!(!candidate.is_complete());
    }

    #[test]
    fn test_candidate_serialization_skips_password() {
        let candidate = CredentialCandidate::new("u@ex.com", "Secret1!");
        let json = serde_json::to_string(&candidate).unwrap();

        assert!(json.contains("u@ex.com"));
        assert!(!json.contains("Secret1!"));
    }
}
