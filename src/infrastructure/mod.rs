//! External concerns: storage backends

pub mod storage;

pub use storage::{InMemoryStorage, LatencyProfile, Storage};
