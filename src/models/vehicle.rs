//! Modelo de Vehicle
//!
//! Vehículo (montacargas) que consume una batería a la vez.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Estado del vehículo - mapea al ENUM vehicle_state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VehicleState {
    Operational,
    Inactive,
    Maintenance,
}

/// Vehicle principal - mapea a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub code: String,
    pub model: String,
    pub load_capacity: Decimal,
    pub required_battery_capacity: Decimal,
    pub state: VehicleState,
    pub assigned_battery_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos de registro de un vehículo (alta externa)
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub code: String,
    pub model: String,
    pub load_capacity: Decimal,
    pub required_battery_capacity: Decimal,
    pub state: VehicleState,
}

/// Cambio sobre la asignación de batería de un vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleWrite {
    /// Deja `battery_id` como batería asignada
    Assign { vehicle_id: i64, battery_id: i64 },
    /// Quita la asignación solo si sigue apuntando a `battery_id`
    Release { vehicle_id: i64, battery_id: i64 },
}

impl VehicleWrite {
    pub fn vehicle_id(&self) -> i64 {
        match self {
            VehicleWrite::Assign { vehicle_id, .. } | VehicleWrite::Release { vehicle_id, .. } => {
                *vehicle_id
            }
        }
    }
}

impl Vehicle {
    /// Capacidad mínima que debe tener una batería candidata (80% de la requerida)
    pub fn min_candidate_capacity(&self) -> Decimal {
        self.required_battery_capacity * Decimal::new(8, 1)
    }
}
