//! Infrastructure adapters implementing the domain ports.

pub mod provider;

pub use provider::{InMemoryProvider, MockProvider, ScriptedResponse};
