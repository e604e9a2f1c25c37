//! Contrato de persistencia del núcleo de rotación
//!
//! Cada operación `open_*` / `close_*` / `create_*` / `cancel_*` aplica
//! todos sus efectos como una sola unidad: o se escriben todos o ninguno.
//! Las escrituras de batería llevan el estado esperado y fallan con
//! `Conflict` si el registro cambió desde que se leyó.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{
    Battery, BatteryWrite, ChargingSession, ChargingSessionClose, NewBattery,
    NewChargingSession, NewRotationPlan, NewUsageSession, NewVehicle, PlanCancellation,
    RotationPlan, UsageSession, UsageSessionClose, Vehicle, VehicleWrite,
};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait FleetStore: Send + Sync {
    // Registro (alta externa; usado para sembrar datos)
    async fn register_battery(&self, battery: NewBattery) -> AppResult<Battery>;
    async fn register_vehicle(&self, vehicle: NewVehicle) -> AppResult<Vehicle>;

    async fn find_battery(&self, id: i64) -> AppResult<Option<Battery>>;
    async fn find_vehicle(&self, id: i64) -> AppResult<Option<Vehicle>>;

    /// Baterías disponibles con `current_capacity >= min_capacity`, en orden de id
    async fn available_batteries(&self, min_capacity: Decimal) -> AppResult<Vec<Battery>>;

    // Registros de uso
    async fn find_usage_session(&self, id: i64) -> AppResult<Option<UsageSession>>;
    /// Más recientes primero
    async fn list_usage_sessions(&self) -> AppResult<Vec<UsageSession>>;
    async fn open_usage_session(
        &self,
        session: NewUsageSession,
        battery: BatteryWrite,
        vehicle: VehicleWrite,
    ) -> AppResult<UsageSession>;
    /// Falla con `AlreadyFinalized` si la sesión ya estaba cerrada
    async fn close_usage_session(
        &self,
        close: UsageSessionClose,
        battery: BatteryWrite,
        vehicle: VehicleWrite,
    ) -> AppResult<UsageSession>;

    // Sesiones de carga
    async fn find_charging_session(&self, id: i64) -> AppResult<Option<ChargingSession>>;
    async fn find_open_charging_session(&self, battery_id: i64) -> AppResult<Option<ChargingSession>>;
    async fn list_charging_sessions(&self) -> AppResult<Vec<ChargingSession>>;
    async fn open_charging_session(
        &self,
        session: NewChargingSession,
        battery: BatteryWrite,
    ) -> AppResult<ChargingSession>;
    async fn close_charging_session(
        &self,
        close: ChargingSessionClose,
        battery: BatteryWrite,
    ) -> AppResult<ChargingSession>;

    // Planes de rotación
    async fn find_rotation_plan(&self, id: i64) -> AppResult<Option<RotationPlan>>;
    async fn list_rotation_plans(&self) -> AppResult<Vec<RotationPlan>>;
    async fn create_rotation_plan(
        &self,
        plan: NewRotationPlan,
        battery: BatteryWrite,
        vehicle: VehicleWrite,
    ) -> AppResult<RotationPlan>;
    /// Falla con `Conflict` si el plan quedó finalizado entre lectura y escritura
    async fn cancel_rotation_plan(&self, plan_id: i64, cancellation: PlanCancellation) -> AppResult<RotationPlan>;
}
