//! Almacenamiento PostgreSQL
//!
//! Cada unidad de escritura corre en una transacción. La escritura de la
//! batería es condicionada (`WHERE state = $expected`) y la de cierre de
//! sesión exige `end_time IS NULL`; si alguna no afecta filas la
//! transacción se descarta sin efectos.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use super::fleet_store::FleetStore;
use crate::models::{
    Battery, BatteryWrite, ChargingSession, ChargingSessionClose, NewBattery,
    NewChargingSession, NewRotationPlan, NewUsageSession, NewVehicle, PlanCancellation,
    PlanState, RotationPlan, UsageSession, UsageSessionClose, Vehicle, VehicleWrite,
};
use crate::utils::errors::{
    conflict_error, not_found_error, stale_battery_state, AppError, AppResult,
};

const UNIQUE_VIOLATION: &str = "23505";

/// Traduce violaciones de unicidad (código duplicado, segunda sesión abierta) a `Conflict`
fn map_unique_violation(error: sqlx::Error, message: impl Into<String>) -> AppError {
    match &error {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            conflict_error(message)
        }
        _ => AppError::Database(error),
    }
}

pub struct PgFleetStore {
    pool: PgPool,
}

impl PgFleetStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn apply_battery_write(
        tx: &mut Transaction<'_, Postgres>,
        write: &BatteryWrite,
    ) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE batteries
            SET state = $2, current_capacity = $3, updated_at = NOW()
            WHERE id = $1 AND state = $4
            "#,
        )
        .bind(write.battery_id)
        .bind(write.new_state)
        .bind(write.current_capacity)
        .bind(write.expected_state)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(stale_battery_state(write.battery_id, write.expected_state));
        }
        debug!("batería {} → {}", write.battery_id, write.new_state);
        Ok(())
    }

    async fn apply_vehicle_write(
        tx: &mut Transaction<'_, Postgres>,
        write: &VehicleWrite,
    ) -> AppResult<()> {
        let result = match *write {
            VehicleWrite::Assign { vehicle_id, battery_id } => {
                sqlx::query(
                    "UPDATE vehicles SET assigned_battery_id = $2, updated_at = NOW() WHERE id = $1",
                )
                .bind(vehicle_id)
                .bind(battery_id)
                .execute(&mut **tx)
                .await?
            }
            VehicleWrite::Release { vehicle_id, battery_id } => {
                // Solo se libera si sigue apuntando a esta batería
                sqlx::query(
                    r#"
                    UPDATE vehicles SET assigned_battery_id = NULL, updated_at = NOW()
                    WHERE id = $1 AND (assigned_battery_id = $2 OR assigned_battery_id IS NULL)
                    "#,
                )
                .bind(vehicle_id)
                .bind(battery_id)
                .execute(&mut **tx)
                .await?;
                return Ok(());
            }
        };

        if result.rows_affected() == 0 {
            return Err(not_found_error("Vehicle", write.vehicle_id()));
        }
        Ok(())
    }
}

#[async_trait]
impl FleetStore for PgFleetStore {
    async fn register_battery(&self, new: NewBattery) -> AppResult<Battery> {
        let code = new.code.clone();
        sqlx::query_as::<_, Battery>(
            r#"
            INSERT INTO batteries (code, total_capacity, current_capacity, state, last_maintenance_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.code)
        .bind(new.total_capacity)
        .bind(new.current_capacity)
        .bind(new.state)
        .bind(new.last_maintenance_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, format!("Battery with code '{}' already exists", code)))
    }

    async fn register_vehicle(&self, new: NewVehicle) -> AppResult<Vehicle> {
        let code = new.code.clone();
        sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (code, model, load_capacity, required_battery_capacity, state)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.code)
        .bind(new.model)
        .bind(new.load_capacity)
        .bind(new.required_battery_capacity)
        .bind(new.state)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, format!("Vehicle with code '{}' already exists", code)))
    }

    async fn find_battery(&self, id: i64) -> AppResult<Option<Battery>> {
        let battery = sqlx::query_as::<_, Battery>("SELECT * FROM batteries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(battery)
    }

    async fn find_vehicle(&self, id: i64) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vehicle)
    }

    async fn available_batteries(&self, min_capacity: Decimal) -> AppResult<Vec<Battery>> {
        let batteries = sqlx::query_as::<_, Battery>(
            r#"
            SELECT * FROM batteries
            WHERE state = 'available' AND current_capacity >= $1
            ORDER BY id
            "#,
        )
        .bind(min_capacity)
        .fetch_all(&self.pool)
        .await?;
        Ok(batteries)
    }

    async fn find_usage_session(&self, id: i64) -> AppResult<Option<UsageSession>> {
        let session = sqlx::query_as::<_, UsageSession>("SELECT * FROM usage_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    async fn list_usage_sessions(&self) -> AppResult<Vec<UsageSession>> {
        let sessions = sqlx::query_as::<_, UsageSession>(
            "SELECT * FROM usage_sessions ORDER BY start_time DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    async fn open_usage_session(
        &self,
        new: NewUsageSession,
        battery: BatteryWrite,
        vehicle: VehicleWrite,
    ) -> AppResult<UsageSession> {
        let mut tx = self.pool.begin().await?;
        Self::apply_battery_write(&mut tx, &battery).await?;
        Self::apply_vehicle_write(&mut tx, &vehicle).await?;

        let battery_id = new.battery_id;
        let session = sqlx::query_as::<_, UsageSession>(
            r#"
            INSERT INTO usage_sessions (vehicle_id, battery_id, start_time, start_capacity, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.vehicle_id)
        .bind(new.battery_id)
        .bind(new.start_time)
        .bind(new.start_capacity)
        .bind(new.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, format!("Battery {} already has an open usage session", battery_id))
        })?;

        tx.commit().await?;
        Ok(session)
    }

    async fn close_usage_session(
        &self,
        close: UsageSessionClose,
        battery: BatteryWrite,
        vehicle: VehicleWrite,
    ) -> AppResult<UsageSession> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, UsageSession>(
            r#"
            UPDATE usage_sessions
            SET end_time = $2, end_capacity = $3, consumed_estimate = $4, hours_used = $5, closing_notes = $6
            WHERE id = $1 AND end_time IS NULL
            RETURNING *
            "#,
        )
        .bind(close.session_id)
        .bind(close.end_time)
        .bind(close.end_capacity)
        .bind(close.consumed_estimate)
        .bind(close.hours_used)
        .bind(close.closing_notes)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::AlreadyFinalized(format!("Usage session {} was already finalized", close.session_id))
        })?;

        Self::apply_battery_write(&mut tx, &battery).await?;
        Self::apply_vehicle_write(&mut tx, &vehicle).await?;

        tx.commit().await?;
        Ok(session)
    }

    async fn find_charging_session(&self, id: i64) -> AppResult<Option<ChargingSession>> {
        let session =
            sqlx::query_as::<_, ChargingSession>("SELECT * FROM charging_sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(session)
    }

    async fn find_open_charging_session(&self, battery_id: i64) -> AppResult<Option<ChargingSession>> {
        let session = sqlx::query_as::<_, ChargingSession>(
            "SELECT * FROM charging_sessions WHERE battery_id = $1 AND end_time IS NULL",
        )
        .bind(battery_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    async fn list_charging_sessions(&self) -> AppResult<Vec<ChargingSession>> {
        let sessions = sqlx::query_as::<_, ChargingSession>(
            "SELECT * FROM charging_sessions ORDER BY start_time DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    async fn open_charging_session(
        &self,
        new: NewChargingSession,
        battery: BatteryWrite,
    ) -> AppResult<ChargingSession> {
        let mut tx = self.pool.begin().await?;
        Self::apply_battery_write(&mut tx, &battery).await?;

        let battery_id = new.battery_id;
        let session = sqlx::query_as::<_, ChargingSession>(
            r#"
            INSERT INTO charging_sessions (battery_id, charger_id, start_time, start_capacity, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(new.battery_id)
        .bind(new.charger_id)
        .bind(new.start_time)
        .bind(new.start_capacity)
        .bind(new.notes)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            map_unique_violation(e, format!("Battery {} already has an open charging session", battery_id))
        })?;

        tx.commit().await?;
        Ok(session)
    }

    async fn close_charging_session(
        &self,
        close: ChargingSessionClose,
        battery: BatteryWrite,
    ) -> AppResult<ChargingSession> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, ChargingSession>(
            r#"
            UPDATE charging_sessions
            SET end_time = $2, end_capacity = $3, capacity_gained = $4, hours_charging = $5, closing_notes = $6
            WHERE id = $1 AND end_time IS NULL
            RETURNING *
            "#,
        )
        .bind(close.session_id)
        .bind(close.end_time)
        .bind(close.end_capacity)
        .bind(close.capacity_gained)
        .bind(close.hours_charging)
        .bind(close.closing_notes)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::AlreadyFinalized(format!(
                "Charging session {} was already finalized",
                close.session_id
            ))
        })?;

        Self::apply_battery_write(&mut tx, &battery).await?;

        tx.commit().await?;
        Ok(session)
    }

    async fn find_rotation_plan(&self, id: i64) -> AppResult<Option<RotationPlan>> {
        let plan = sqlx::query_as::<_, RotationPlan>("SELECT * FROM rotation_plans WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(plan)
    }

    async fn list_rotation_plans(&self) -> AppResult<Vec<RotationPlan>> {
        let plans = sqlx::query_as::<_, RotationPlan>(
            "SELECT * FROM rotation_plans ORDER BY assigned_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(plans)
    }

    async fn create_rotation_plan(
        &self,
        new: NewRotationPlan,
        battery: BatteryWrite,
        vehicle: VehicleWrite,
    ) -> AppResult<RotationPlan> {
        let mut tx = self.pool.begin().await?;

        let plan = sqlx::query_as::<_, RotationPlan>(
            r#"
            INSERT INTO rotation_plans (vehicle_id, battery_id, assigned_at, capacity_at_assignment, reason, plan_state)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(new.vehicle_id)
        .bind(new.battery_id)
        .bind(new.assigned_at)
        .bind(new.capacity_at_assignment)
        .bind(new.reason)
        .bind(PlanState::Active)
        .fetch_one(&mut *tx)
        .await?;

        Self::apply_vehicle_write(&mut tx, &vehicle).await?;
        Self::apply_battery_write(&mut tx, &battery).await?;

        tx.commit().await?;
        Ok(plan)
    }

    async fn cancel_rotation_plan(&self, plan_id: i64, cancellation: PlanCancellation) -> AppResult<RotationPlan> {
        let ended_at = match cancellation {
            PlanCancellation::Cancel { ended_at, .. } => ended_at,
            PlanCancellation::AlreadyCancelled => {
                return self
                    .find_rotation_plan(plan_id)
                    .await?
                    .ok_or_else(|| not_found_error("Rotation plan", plan_id));
            }
        };

        let plan = sqlx::query_as::<_, RotationPlan>(
            r#"
            UPDATE rotation_plans
            SET plan_state = 'cancelled', ended_at = $2
            WHERE id = $1 AND plan_state = 'active'
            RETURNING *
            "#,
        )
        .bind(plan_id)
        .bind(ended_at)
        .fetch_optional(&self.pool)
        .await?;

        match plan {
            Some(plan) => Ok(plan),
            None => match self.find_rotation_plan(plan_id).await? {
                None => Err(not_found_error("Rotation plan", plan_id)),
                Some(current) if current.plan_state == PlanState::Finalized => Err(conflict_error(
                    format!("Rotation plan {} is already finalized", plan_id),
                )),
                Some(current) => Ok(current),
            },
        }
    }
}
