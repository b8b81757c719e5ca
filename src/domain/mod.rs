//! Core business entities and domain errors

pub mod calculation;
pub mod drop_zone;
pub mod errors;
pub mod event;
pub mod role;
pub mod user;
pub mod work_shift;

// Re-export commonly used types
pub use calculation::Calculation;
pub use drop_zone::{DropZone, DropZoneStatus};
pub use errors::{DomainError, DomainResult};
pub use event::Event;
pub use role::Role;
pub use user::{User, UserStatus};
pub use work_shift::{ShiftStatus, WorkShift};
