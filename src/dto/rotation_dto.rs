use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{Battery, RotationPlan, Vehicle};

// Request para asignar una batería a un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct AssignBatteryRequest {
    #[serde(rename = "vehicleId")]
    #[validate(range(min = 1))]
    pub vehicle_id: i64,
    #[serde(rename = "batteryId")]
    #[validate(range(min = 1))]
    pub battery_id: i64,
    #[validate(length(max = 255))]
    pub reason: Option<String>,
}

// Response de plan de rotación con vehículo y batería
#[derive(Debug, Serialize)]
pub struct RotationPlanResponse {
    #[serde(flatten)]
    pub plan: RotationPlan,
    pub vehicle: Option<Vehicle>,
    pub battery: Option<Battery>,
}

/// Sugerencia de batería para un vehículo; no reserva nada
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub vehicle_id: i64,
    pub suggested_battery_id: i64,
    pub battery_code: String,
    pub suggested_capacity: Decimal,
    pub required_capacity: Decimal,
    pub rationale: String,
    pub suggested_at: DateTime<Utc>,
    /// Todas las candidatas, de mayor a menor capacidad
    pub candidates: Vec<Battery>,
}
