pub mod candidate;
pub mod config;
pub mod conflict;
pub mod flow;
pub mod identity;
pub mod outcome;

pub use candidate::{CredentialCandidate, Secret};
pub use config::{Config, LoggingConfig, ProviderConfig, SeedAccount};
pub use conflict::{ConflictBranch, ConflictDecision};
pub use flow::FlowState;
pub use identity::Identity;
pub use outcome::{codes, FlowOutcome};
