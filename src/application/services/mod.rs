//! Entity services
//!
//! Each service wraps the storage and enforces the business rules the
//! callers rely on (required fields, deletion guards, derived
//! counters). Storage itself stays rule-free.

pub mod calculations;
pub mod drop_zones;
pub mod events;
pub mod roles;
pub mod users;
pub mod work_shifts;

pub use calculations::CalculationService;
pub use drop_zones::{DropZoneService, NewDropZone, DropZoneUpdate};
pub use events::{EventService, NewEvent, EventUpdate};
pub use roles::{NewRole, RoleService, RoleUpdate};
pub use users::{NewUser, UserService, UserUpdate};
pub use work_shifts::{NewWorkShift, WorkShiftService, WorkShiftUpdate};

use crate::domain::{DomainError, DomainResult};

/// Reject blank or whitespace-only required fields.
pub(crate) fn require(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} is required", field)));
    }
    Ok(())
}
