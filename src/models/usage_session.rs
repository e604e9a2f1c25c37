//! Modelo de UsageSession (registro de uso)
//!
//! Intervalo durante el cual una batería alimenta a un vehículo.
//! Abierta mientras `end_time` es nulo; una vez cerrada es histórico inmutable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::ConstraintSet;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UsageSession {
    pub id: i64,
    pub vehicle_id: i64,
    pub battery_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub start_capacity: Decimal,
    pub end_capacity: Option<Decimal>,
    pub consumed_estimate: Option<Decimal>,
    pub hours_used: Option<Decimal>,
    pub notes: Option<String>,
    pub closing_notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewUsageSession {
    pub vehicle_id: i64,
    pub battery_id: i64,
    pub start_time: DateTime<Utc>,
    pub start_capacity: Decimal,
    pub notes: Option<String>,
}

/// Datos de cierre calculados por `UsageSession::close`
#[derive(Debug, Clone, PartialEq)]
pub struct UsageSessionClose {
    pub session_id: i64,
    pub end_time: DateTime<Utc>,
    pub end_capacity: Decimal,
    pub consumed_estimate: Decimal,
    pub hours_used: Decimal,
    pub closing_notes: Option<String>,
}

impl UsageSession {
    pub fn is_open(&self) -> bool {
        self.end_time.is_none()
    }

    /// Valida y calcula el cierre. La capacidad final no puede superar la inicial.
    pub fn close(
        &self,
        end_capacity: Decimal,
        hours_used: Decimal,
        closing_notes: Option<String>,
        now: DateTime<Utc>,
    ) -> AppResult<UsageSessionClose> {
        if !self.is_open() {
            return Err(AppError::AlreadyFinalized(format!(
                "Usage session {} was already finalized",
                self.id
            )));
        }

        ConstraintSet::new()
            .require(
                "endCapacity",
                end_capacity <= self.start_capacity,
                "lte_start_capacity",
                format!("end capacity must not exceed the start capacity ({})", self.start_capacity),
                &end_capacity,
            )
            .require(
                "endCapacity",
                end_capacity >= Decimal::ZERO,
                "non_negative",
                "end capacity must be zero or greater",
                &end_capacity,
            )
            .require(
                "hoursUsed",
                hours_used >= Decimal::ZERO,
                "non_negative",
                "hours used must be zero or greater",
                &hours_used,
            )
            .evaluate()?;

        Ok(UsageSessionClose {
            session_id: self.id,
            end_time: now,
            end_capacity,
            consumed_estimate: self.start_capacity - end_capacity,
            hours_used,
            closing_notes,
        })
    }
}
