//! Modelo de ChargingSession (sesión de carga)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::ConstraintSet;

/// Duración mínima registrada para una carga, en horas
pub const MIN_CHARGING_HOURS: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ChargingSession {
    pub id: i64,
    pub battery_id: i64,
    pub charger_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub start_capacity: Decimal,
    pub end_capacity: Option<Decimal>,
    pub capacity_gained: Option<Decimal>,
    pub hours_charging: Option<Decimal>,
    pub notes: Option<String>,
    pub closing_notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewChargingSession {
    pub battery_id: i64,
    pub charger_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub start_capacity: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChargingSessionClose {
    pub session_id: i64,
    pub end_time: DateTime<Utc>,
    pub end_capacity: Decimal,
    pub capacity_gained: Decimal,
    pub hours_charging: Decimal,
    pub closing_notes: Option<String>,
}

/// Horas completas transcurridas, con mínimo de una hora
pub fn charging_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> Decimal {
    let hours = (end - start).num_hours().max(MIN_CHARGING_HOURS);
    Decimal::from(hours)
}

impl ChargingSession {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Valida `start ≤ end ≤ total_capacity` y calcula el cierre
    pub fn close(
        &self,
        end_capacity: Decimal,
        total_capacity: Decimal,
        closing_notes: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<ChargingSessionClose> {
        if !self.is_open() {
            return Err(AppError::AlreadyFinalized(format!(
                "Charging session {} was already finalized",
                self.id
            )));
        }

        ConstraintSet::new()
            .require(
                "endCapacity",
                end_capacity >= self.start_capacity,
                "gte_start_capacity",
                format!("end capacity must be at least the start capacity ({})", self.start_capacity),
                &end_capacity,
            )
            .require(
                "endCapacity",
                end_capacity <= total_capacity,
                "lte_total_capacity",
                format!("end capacity must not exceed the battery total capacity ({})", total_capacity),
                &end_capacity,
            )
            .evaluate()?;

        Ok(ChargingSessionClose {
            session_id: self.id,
            end_time: now,
            end_capacity,
            capacity_gained: end_capacity - self.start_capacity,
            hours_charging: charging_hours(self.start_time, now),
            closing_notes,
        })
    }
}
