pub mod charging_dto;
pub mod common;
pub mod rotation_dto;
pub mod usage_dto;

pub use common::{ApiResponse, ValidatedJson, ValidatedPath};
