//! Port trait definitions (Hexagonal Architecture)
//!
//! Async trait interfaces that adapters must implement:
//! - `IdentityProvider`: the external identity store the flow consumes
//!
//! These contracts keep the domain independent of any concrete
//! provider integration.

pub mod identity_provider;

pub use identity_provider::{IdentityProvider, IdentityWatch, ProviderFailure, ReleaseGuard};
