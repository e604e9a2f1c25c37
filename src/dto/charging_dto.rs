use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Battery, ChargingSession};
use crate::utils::validation::validate_non_negative_decimal;

// Request para iniciar una sesión de carga
#[derive(Debug, Deserialize, Validate)]
pub struct StartChargingRequest {
    #[serde(rename = "batteryId")]
    #[validate(range(min = 1))]
    pub battery_id: i64,
    #[serde(rename = "startCapacity")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub start_capacity: Decimal,
    #[serde(rename = "chargerId")]
    #[validate(length(max = 50))]
    pub charger_id: Option<String>,
    #[validate(length(max = 255))]
    pub notes: Option<String>,
}

// Request para finalizar una sesión de carga
#[derive(Debug, Deserialize, Validate)]
pub struct FinishChargingRequest {
    #[serde(rename = "endCapacity")]
    #[validate(custom = "validate_non_negative_decimal")]
    pub end_capacity: Decimal,
    #[serde(rename = "closingNotes")]
    #[validate(length(max = 255))]
    pub closing_notes: Option<String>,
}

// Response de sesión de carga con su batería
#[derive(Debug, Serialize)]
pub struct ChargingSessionResponse {
    #[serde(flatten)]
    pub session: ChargingSession,
    pub battery: Option<Battery>,
}
