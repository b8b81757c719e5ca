//! # SkyOps
//!
//! Operations management service for skydiving drop zones: staff,
//! roles and permissions, event and work calendars, plus a small
//! arithmetic calculator with a capped history log.
//!
//! ## Architecture
//!
//! - **domain**: Core entities and error types
//! - **permissions**: Pure role/permission evaluation
//! - **application**: Business-rule services and the calculator state machine
//! - **infrastructure**: Storage trait and the in-memory implementation
//! - **api**: REST API with Swagger documentation
//! - **config**: TOML configuration

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod permissions;

pub use config::{default_config_path, AppConfig};

// Re-export the REST router
pub use api::create_api_router;
