//! Modelo de RotationPlan
//!
//! Registro histórico de una asignación deliberada batería → vehículo.
//! Es independiente del registro de uso que pueda acompañarla.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use crate::utils::errors::{conflict_error, AppResult};

/// Motivo registrado cuando la asignación no trae uno
pub const DEFAULT_ASSIGNMENT_REASON: &str = "Asignación por sugerencia del sistema.";

/// Estado del plan - mapea al ENUM plan_state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "plan_state", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlanState {
    Active,
    Finalized,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RotationPlan {
    pub id: i64,
    pub vehicle_id: i64,
    pub battery_id: i64,
    pub assigned_at: DateTime<Utc>,
    pub capacity_at_assignment: Decimal,
    pub reason: String,
    pub plan_state: PlanState,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewRotationPlan {
    pub vehicle_id: i64,
    pub battery_id: i64,
    pub assigned_at: DateTime<Utc>,
    pub capacity_at_assignment: Decimal,
    pub reason: String,
}

/// Resultado de cancelar un plan
#[derive(Debug, Clone, PartialEq)]
pub enum PlanCancellation {
    /// El plan pasa a Cancelled en `ended_at`
    Cancel { plan_id: i64, ended_at: DateTime<Utc> },
    /// Ya estaba cancelado; se conserva tal cual
    AlreadyCancelled,
}

impl RotationPlan {
    /// Un plan finalizado no se puede cancelar. Cancelar uno ya cancelado
    /// no vuelve a escribir el histórico.
    pub fn cancel(&self, now: DateTime<Utc>) -> AppResult<PlanCancellation> {
        match self.plan_state {
            PlanState::Finalized => Err(conflict_error(format!(
                "Rotation plan {} is already finalized",
                self.id
            ))),
            PlanState::Cancelled => Ok(PlanCancellation::AlreadyCancelled),
            PlanState::Active => Ok(PlanCancellation::Cancel {
                plan_id: self.id,
                ended_at: now,
            }),
        }
    }
}
