//! Tether - anonymous-to-permanent account upgrade flow
//!
//! Tether models the upgrade of a transient (anonymous) session
//! identity into a permanent one by attaching email/password
//! credentials, including the conflict resolution that follows when
//! the credentials already belong to a different account.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, the outcome taxonomy, and
//!   the identity provider port
//! - **Service Layer** (`services`): the identity observer and the
//!   link/resolve state machine
//! - **Adapters** (`adapters`): provider implementations (in-memory
//!   reference provider, scripted mock)
//! - **Infrastructure** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): the interactive lab and demo commands
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tether::adapters::provider::InMemoryProvider;
//! use tether::services::LinkFlow;
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = Arc::new(InMemoryProvider::new());
//!     provider.sign_in_anonymously().await;
//!
//!     let mut flow = LinkFlow::activate(provider).await;
//!     flow.set_candidate("u@ex.com", "Secret1!");
//!     let outcome = flow.attempt_link().await;
//!     println!("{}", outcome.user_message());
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::provider::{InMemoryProvider, MockProvider, ScriptedResponse};
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{
    codes, Config, ConflictBranch, ConflictDecision, CredentialCandidate, FlowOutcome, FlowState,
    Identity, LoggingConfig, ProviderConfig, Secret, SeedAccount,
};
pub use domain::ports::{IdentityProvider, IdentityWatch, ProviderFailure, ReleaseGuard};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{IdentityObserver, LinkFlow};
