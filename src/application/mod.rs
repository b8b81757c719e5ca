//! Business logic: entity services and the calculator state machine

pub mod calculator;
pub mod services;

pub use calculator::{CalcError, Calculator, CalculationEntry, Key, Operator};
pub use services::{
    CalculationService, DropZoneService, DropZoneUpdate, EventService, EventUpdate, NewDropZone,
    NewEvent, NewRole, NewUser, NewWorkShift, RoleService, RoleUpdate, UserService, UserUpdate,
    WorkShiftService, WorkShiftUpdate,
};
