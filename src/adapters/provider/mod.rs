//! Identity provider adapters.

pub mod in_memory;
pub mod mock;

pub use in_memory::InMemoryProvider;
pub use mock::{MockProvider, ScriptedResponse};
