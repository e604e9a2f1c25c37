//! Modelo de Battery
//!
//! Registro de batería, su máquina de estados y la transición pura que
//! calcula el nuevo estado para cada evento del ciclo de rotación.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use crate::utils::errors::{battery_state_conflict, AppResult};

/// Por debajo de esta capacidad una batería que sale de uso queda cargando
pub const LOW_CHARGE_THRESHOLD: i64 = 20;

/// Estado de la batería - mapea al ENUM battery_state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "battery_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BatteryState {
    Available,
    InUse,
    Charging,
    Maintenance,
}

impl fmt::Display for BatteryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BatteryState::Available => "available",
            BatteryState::InUse => "in_use",
            BatteryState::Charging => "charging",
            BatteryState::Maintenance => "maintenance",
        };
        f.write_str(name)
    }
}

/// Battery principal - mapea a la tabla batteries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Battery {
    pub id: i64,
    pub code: String,
    pub total_capacity: Decimal,
    pub current_capacity: Decimal,
    pub state: BatteryState,
    pub last_maintenance_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos de registro de una batería (el alta la hace un colaborador externo)
#[derive(Debug, Clone)]
pub struct NewBattery {
    pub code: String,
    pub total_capacity: Decimal,
    pub current_capacity: Decimal,
    pub state: BatteryState,
    pub last_maintenance_date: Option<NaiveDate>,
}

/// Eventos que mueven una batería entre estados
#[derive(Debug, Clone, PartialEq)]
pub enum BatteryEvent {
    UsageStarted,
    UsageFinished { end_capacity: Decimal },
    ChargingStarted { start_capacity: Decimal },
    ChargingFinished { end_capacity: Decimal },
    Assigned,
}

impl BatteryEvent {
    fn operation(&self) -> &'static str {
        match self {
            BatteryEvent::UsageStarted => "start usage on",
            BatteryEvent::UsageFinished { .. } => "finish usage on",
            BatteryEvent::ChargingStarted { .. } => "start charging",
            BatteryEvent::ChargingFinished { .. } => "finish charging",
            BatteryEvent::Assigned => "assign",
        }
    }
}

/// Escritura resultante de una transición, aplicada de forma condicionada:
/// solo se persiste si el estado almacenado sigue siendo `expected_state`.
#[derive(Debug, Clone, PartialEq)]
pub struct BatteryWrite {
    pub battery_id: i64,
    pub expected_state: BatteryState,
    pub new_state: BatteryState,
    pub current_capacity: Decimal,
}

impl Battery {
    /// Calcula la transición para `event` sin mutar nada.
    ///
    /// | evento            | desde              | hacia                        |
    /// |-------------------|--------------------|------------------------------|
    /// | UsageStarted      | Available          | InUse                        |
    /// | Assigned          | Available          | InUse                        |
    /// | UsageFinished     | InUse              | Charging (< 20) / Available  |
    /// | ChargingStarted   | cualquiera ≠ InUse | Charging                     |
    /// | ChargingFinished  | Charging           | Available                    |
    pub fn transition(&self, event: &BatteryEvent) -> AppResult<BatteryWrite> {
        let (allowed, new_state, current_capacity) = match event {
            BatteryEvent::UsageStarted | BatteryEvent::Assigned => (
                self.state == BatteryState::Available,
                BatteryState::InUse,
                self.current_capacity,
            ),
            BatteryEvent::UsageFinished { end_capacity } => {
                let next = if *end_capacity < Decimal::from(LOW_CHARGE_THRESHOLD) {
                    BatteryState::Charging
                } else {
                    BatteryState::Available
                };
                (self.state == BatteryState::InUse, next, *end_capacity)
            }
            BatteryEvent::ChargingStarted { start_capacity } => (
                self.state != BatteryState::InUse,
                BatteryState::Charging,
                *start_capacity,
            ),
            BatteryEvent::ChargingFinished { end_capacity } => (
                self.state == BatteryState::Charging,
                BatteryState::Available,
                *end_capacity,
            ),
        };

        if !allowed {
            return Err(battery_state_conflict(self, event.operation()));
        }

        Ok(BatteryWrite {
            battery_id: self.id,
            expected_state: self.state,
            new_state,
            current_capacity,
        })
    }

    pub fn is_available(&self) -> bool {
        self.state == BatteryState::Available
    }
}
