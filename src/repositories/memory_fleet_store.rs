//! Almacenamiento en memoria
//!
//! Todas las tablas viven detrás de un único `RwLock`; cada unidad de
//! escritura verifica sus condiciones antes de tocar nada, así una falla
//! no deja efectos parciales. Se usa en tests y con `STORAGE=memory`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::fleet_store::FleetStore;
use crate::models::{
    Battery, BatteryWrite, ChargingSession, ChargingSessionClose, NewBattery,
    NewChargingSession, NewRotationPlan, NewUsageSession, NewVehicle, PlanCancellation,
    PlanState, RotationPlan, UsageSession, UsageSessionClose, Vehicle, VehicleWrite,
};
use crate::utils::errors::{
    conflict_error, internal_error, not_found_error, stale_battery_state, AppError, AppResult,
};

#[derive(Default)]
struct Tables {
    batteries: BTreeMap<i64, Battery>,
    vehicles: BTreeMap<i64, Vehicle>,
    usage_sessions: BTreeMap<i64, UsageSession>,
    charging_sessions: BTreeMap<i64, ChargingSession>,
    rotation_plans: BTreeMap<i64, RotationPlan>,
}

fn next_id<V>(table: &BTreeMap<i64, V>) -> i64 {
    table.keys().next_back().map_or(1, |last| last + 1)
}

impl Tables {
    fn check_battery(&self, write: &BatteryWrite) -> AppResult<()> {
        let battery = self
            .batteries
            .get(&write.battery_id)
            .ok_or_else(|| not_found_error("Battery", write.battery_id))?;
        if battery.state != write.expected_state {
            return Err(stale_battery_state(write.battery_id, write.expected_state));
        }
        Ok(())
    }

    fn check_vehicle(&self, write: &VehicleWrite) -> AppResult<()> {
        if !self.vehicles.contains_key(&write.vehicle_id()) {
            return Err(not_found_error("Vehicle", write.vehicle_id()));
        }
        Ok(())
    }

    fn apply_battery(&mut self, write: &BatteryWrite) {
        if let Some(battery) = self.batteries.get_mut(&write.battery_id) {
            battery.state = write.new_state;
            battery.current_capacity = write.current_capacity;
            battery.updated_at = Utc::now();
        }
    }

    fn apply_vehicle(&mut self, write: &VehicleWrite) {
        match *write {
            VehicleWrite::Assign { vehicle_id, battery_id } => {
                if let Some(vehicle) = self.vehicles.get_mut(&vehicle_id) {
                    vehicle.assigned_battery_id = Some(battery_id);
                    vehicle.updated_at = Utc::now();
                }
            }
            VehicleWrite::Release { vehicle_id, battery_id } => {
                if let Some(vehicle) = self.vehicles.get_mut(&vehicle_id) {
                    if vehicle.assigned_battery_id == Some(battery_id) {
                        vehicle.assigned_battery_id = None;
                        vehicle.updated_at = Utc::now();
                    }
                }
            }
        }
    }
}

#[derive(Default)]
pub struct MemoryFleetStore {
    tables: RwLock<Tables>,
}

impl MemoryFleetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FleetStore for MemoryFleetStore {
    async fn register_battery(&self, new: NewBattery) -> AppResult<Battery> {
        let mut tables = self.tables.write().await;
        if tables.batteries.values().any(|b| b.code == new.code) {
            return Err(conflict_error(format!("Battery with code '{}' already exists", new.code)));
        }
        if new.current_capacity < Decimal::ZERO || new.current_capacity > new.total_capacity {
            return Err(AppError::MalformedRequest(
                "current capacity must be within [0, total capacity]".to_string(),
            ));
        }

        let now = Utc::now();
        let battery = Battery {
            id: next_id(&tables.batteries),
            code: new.code,
            total_capacity: new.total_capacity,
            current_capacity: new.current_capacity,
            state: new.state,
            last_maintenance_date: new.last_maintenance_date,
            created_at: now,
            updated_at: now,
        };
        tables.batteries.insert(battery.id, battery.clone());
        Ok(battery)
    }

    async fn register_vehicle(&self, new: NewVehicle) -> AppResult<Vehicle> {
        let mut tables = self.tables.write().await;
        if tables.vehicles.values().any(|v| v.code == new.code) {
            return Err(conflict_error(format!("Vehicle with code '{}' already exists", new.code)));
        }

        let now = Utc::now();
        let vehicle = Vehicle {
            id: next_id(&tables.vehicles),
            code: new.code,
            model: new.model,
            load_capacity: new.load_capacity,
            required_battery_capacity: new.required_battery_capacity,
            state: new.state,
            assigned_battery_id: None,
            created_at: now,
            updated_at: now,
        };
        tables.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    async fn find_battery(&self, id: i64) -> AppResult<Option<Battery>> {
        Ok(self.tables.read().await.batteries.get(&id).cloned())
    }

    async fn find_vehicle(&self, id: i64) -> AppResult<Option<Vehicle>> {
        Ok(self.tables.read().await.vehicles.get(&id).cloned())
    }

    async fn available_batteries(&self, min_capacity: Decimal) -> AppResult<Vec<Battery>> {
        let tables = self.tables.read().await;
        Ok(tables
            .batteries
            .values()
            .filter(|b| b.is_available() && b.current_capacity >= min_capacity)
            .cloned()
            .collect())
    }

    async fn find_usage_session(&self, id: i64) -> AppResult<Option<UsageSession>> {
        Ok(self.tables.read().await.usage_sessions.get(&id).cloned())
    }

    async fn list_usage_sessions(&self) -> AppResult<Vec<UsageSession>> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<UsageSession> = tables.usage_sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));
        Ok(sessions)
    }

    async fn open_usage_session(
        &self,
        new: NewUsageSession,
        battery: BatteryWrite,
        vehicle: VehicleWrite,
    ) -> AppResult<UsageSession> {
        let mut tables = self.tables.write().await;
        tables.check_battery(&battery)?;
        tables.check_vehicle(&vehicle)?;
        if tables
            .usage_sessions
            .values()
            .any(|s| s.battery_id == new.battery_id && s.is_open())
        {
            return Err(conflict_error(format!(
                "Battery {} already has an open usage session",
                new.battery_id
            )));
        }

        let session = UsageSession {
            id: next_id(&tables.usage_sessions),
            vehicle_id: new.vehicle_id,
            battery_id: new.battery_id,
            start_time: new.start_time,
            end_time: None,
            start_capacity: new.start_capacity,
            end_capacity: None,
            consumed_estimate: None,
            hours_used: None,
            notes: new.notes,
            closing_notes: None,
        };
        tables.usage_sessions.insert(session.id, session.clone());
        tables.apply_battery(&battery);
        tables.apply_vehicle(&vehicle);
        Ok(session)
    }

    async fn close_usage_session(
        &self,
        close: UsageSessionClose,
        battery: BatteryWrite,
        vehicle: VehicleWrite,
    ) -> AppResult<UsageSession> {
        let mut tables = self.tables.write().await;
        let open = tables
            .usage_sessions
            .get(&close.session_id)
            .ok_or_else(|| not_found_error("Usage session", close.session_id))?
            .is_open();
        if !open {
            return Err(AppError::AlreadyFinalized(format!(
                "Usage session {} was already finalized",
                close.session_id
            )));
        }
        tables.check_battery(&battery)?;
        tables.check_vehicle(&vehicle)?;

        let session = tables
            .usage_sessions
            .get_mut(&close.session_id)
            .ok_or_else(|| internal_error("usage session vanished under write lock"))?;
        session.end_time = Some(close.end_time);
        session.end_capacity = Some(close.end_capacity);
        session.consumed_estimate = Some(close.consumed_estimate);
        session.hours_used = Some(close.hours_used);
        session.closing_notes = close.closing_notes;
        let session = session.clone();

        tables.apply_battery(&battery);
        tables.apply_vehicle(&vehicle);
        Ok(session)
    }

    async fn find_charging_session(&self, id: i64) -> AppResult<Option<ChargingSession>> {
        Ok(self.tables.read().await.charging_sessions.get(&id).cloned())
    }

    async fn find_open_charging_session(&self, battery_id: i64) -> AppResult<Option<ChargingSession>> {
        let tables = self.tables.read().await;
        Ok(tables
            .charging_sessions
            .values()
            .find(|s| s.battery_id == battery_id && s.is_open())
            .cloned())
    }

    async fn list_charging_sessions(&self) -> AppResult<Vec<ChargingSession>> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<ChargingSession> = tables.charging_sessions.values().cloned().collect();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time).then(b.id.cmp(&a.id)));
        Ok(sessions)
    }

    async fn open_charging_session(
        &self,
        new: NewChargingSession,
        battery: BatteryWrite,
    ) -> AppResult<ChargingSession> {
        let mut tables = self.tables.write().await;
        tables.check_battery(&battery)?;
        if tables
            .charging_sessions
            .values()
            .any(|s| s.battery_id == new.battery_id && s.is_open())
        {
            return Err(conflict_error(format!(
                "Battery {} already has an open charging session",
                new.battery_id
            )));
        }

        let session = ChargingSession {
            id: next_id(&tables.charging_sessions),
            battery_id: new.battery_id,
            charger_id: new.charger_id,
            start_time: new.start_time,
            end_time: None,
            start_capacity: new.start_capacity,
            end_capacity: None,
            capacity_gained: None,
            hours_charging: None,
            notes: new.notes,
            closing_notes: None,
        };
        tables.charging_sessions.insert(session.id, session.clone());
        tables.apply_battery(&battery);
        Ok(session)
    }

    async fn close_charging_session(
        &self,
        close: ChargingSessionClose,
        battery: BatteryWrite,
    ) -> AppResult<ChargingSession> {
        let mut tables = self.tables.write().await;
        let open = tables
            .charging_sessions
            .get(&close.session_id)
            .ok_or_else(|| not_found_error("Charging session", close.session_id))?
            .is_open();
        if !open {
            return Err(AppError::AlreadyFinalized(format!(
                "Charging session {} was already finalized",
                close.session_id
            )));
        }
        tables.check_battery(&battery)?;

        let session = tables
            .charging_sessions
            .get_mut(&close.session_id)
            .ok_or_else(|| internal_error("charging session vanished under write lock"))?;
        session.end_time = Some(close.end_time);
        session.end_capacity = Some(close.end_capacity);
        session.capacity_gained = Some(close.capacity_gained);
        session.hours_charging = Some(close.hours_charging);
        session.closing_notes = close.closing_notes;
        let session = session.clone();

        tables.apply_battery(&battery);
        Ok(session)
    }

    async fn find_rotation_plan(&self, id: i64) -> AppResult<Option<RotationPlan>> {
        Ok(self.tables.read().await.rotation_plans.get(&id).cloned())
    }

    async fn list_rotation_plans(&self) -> AppResult<Vec<RotationPlan>> {
        let tables = self.tables.read().await;
        let mut plans: Vec<RotationPlan> = tables.rotation_plans.values().cloned().collect();
        plans.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at).then(b.id.cmp(&a.id)));
        Ok(plans)
    }

    async fn create_rotation_plan(
        &self,
        new: NewRotationPlan,
        battery: BatteryWrite,
        vehicle: VehicleWrite,
    ) -> AppResult<RotationPlan> {
        let mut tables = self.tables.write().await;
        tables.check_battery(&battery)?;
        tables.check_vehicle(&vehicle)?;

        let plan = RotationPlan {
            id: next_id(&tables.rotation_plans),
            vehicle_id: new.vehicle_id,
            battery_id: new.battery_id,
            assigned_at: new.assigned_at,
            capacity_at_assignment: new.capacity_at_assignment,
            reason: new.reason,
            plan_state: PlanState::Active,
            ended_at: None,
        };
        tables.rotation_plans.insert(plan.id, plan.clone());
        tables.apply_battery(&battery);
        tables.apply_vehicle(&vehicle);
        Ok(plan)
    }

    async fn cancel_rotation_plan(&self, plan_id: i64, cancellation: PlanCancellation) -> AppResult<RotationPlan> {
        let mut tables = self.tables.write().await;
        let plan = tables
            .rotation_plans
            .get_mut(&plan_id)
            .ok_or_else(|| not_found_error("Rotation plan", plan_id))?;

        if plan.plan_state == PlanState::Finalized {
            return Err(conflict_error(format!("Rotation plan {} is already finalized", plan_id)));
        }
        if let PlanCancellation::Cancel { ended_at, .. } = cancellation {
            if plan.plan_state == PlanState::Active {
                plan.plan_state = PlanState::Cancelled;
                plan.ended_at = Some(ended_at);
            }
        }
        Ok(plan.clone())
    }
}
