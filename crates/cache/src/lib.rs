#![warn(clippy::unwrap_used)]

pub mod local;
pub mod store;

pub use local::MemoryStore;
pub use store::{KeyValueStore, ScopedStore};
