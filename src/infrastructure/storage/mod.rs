//! Storage trait and the in-memory implementation

mod memory;
mod traits;

pub use memory::{InMemoryStorage, LatencyProfile};
pub use traits::Storage;
