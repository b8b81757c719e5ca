//! Shared API DTOs and extractors

pub mod common;
pub mod validated_json;

pub use common::{ApiResponse, EmptyData, LimitQuery};
pub use validated_json::ValidatedJson;
