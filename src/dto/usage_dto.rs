use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Battery, UsageSession, Vehicle};
use crate::utils::validation::validate_non_negative_decimal;

// Request para iniciar un registro de uso
#[derive(Debug, Deserialize, Validate)]
pub struct StartUsageRequest {
    #[serde(rename = "vehicleId")]
    #[validate(range(min = 1))]
    pub vehicle_id: i64,
    #[serde(rename = "batteryId")]
    #[validate(range(min = 1))]
    pub battery_id: i64,
    #[serde(rename = "startCapacity")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub start_capacity: Decimal,
    #[validate(length(max = 255))]
    pub notes: Option<String>,
}

// Request para finalizar un registro de uso
#[derive(Debug, Deserialize, Validate)]
pub struct FinishUsageRequest {
    #[serde(rename = "endCapacity")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub end_capacity: Decimal,
    #[serde(rename = "hoursUsed")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub hours_used: Decimal,
    #[serde(rename = "closingNotes")]
    #[validate(length(max = 255))]
    pub closing_notes: Option<String>,
}

// Response de registro de uso con sus entidades relacionadas
#[derive(Debug, Serialize)]
pub struct UsageSessionResponse {
    #[serde(flatten)]
    pub session: UsageSession,
    pub vehicle: Option<Vehicle>,
    pub battery: Option<Battery>,
}
