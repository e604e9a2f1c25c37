//! Registro de uso: una batería alimentando a un vehículo

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::dto::usage_dto::{FinishUsageRequest, StartUsageRequest, UsageSessionResponse};
use crate::models::{BatteryEvent, NewUsageSession, UsageSession, VehicleWrite};
use crate::repositories::FleetStore;
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::key_lock::{KeyedLocks, LockKey};
use crate::utils::validation::opening_capacity_constraints;

pub struct UsageController {
    store: Arc<dyn FleetStore>,
    locks: KeyedLocks,
}

impl UsageController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            locks: state.locks.clone(),
        }
    }

    pub async fn start(&self, request: StartUsageRequest) -> AppResult<UsageSessionResponse> {
        let _guard = self
            .locks
            .acquire(&[
                LockKey::Battery(request.battery_id),
                LockKey::Vehicle(request.vehicle_id),
            ])
            .await;

        let vehicle = self
            .store
            .find_vehicle(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", request.vehicle_id))?;
        let battery = self
            .store
            .find_battery(request.battery_id)
            .await?
            .ok_or_else(|| not_found_error("Battery", request.battery_id))?;

        opening_capacity_constraints("startCapacity", request.start_capacity, battery.total_capacity)
            .evaluate()?;
        let battery_write = battery.transition(&BatteryEvent::UsageStarted)?;

        let session = self
            .store
            .open_usage_session(
                NewUsageSession {
                    vehicle_id: vehicle.id,
                    battery_id: battery.id,
                    start_time: Utc::now(),
                    start_capacity: request.start_capacity,
                    notes: request.notes,
                },
                battery_write,
                VehicleWrite::Assign {
                    vehicle_id: vehicle.id,
                    battery_id: battery.id,
                },
            )
            .await?;

        info!(
            "🔋 Registro de uso {} iniciado: batería {} → vehículo {}",
            session.id, battery.code, vehicle.code
        );

        self.with_relations(session).await
    }

    pub async fn finish(&self, session_id: i64, request: FinishUsageRequest) -> AppResult<UsageSessionResponse> {
        let located = self.find_session(session_id).await?;

        let _guard = self
            .locks
            .acquire(&[
                LockKey::Battery(located.battery_id),
                LockKey::Vehicle(located.vehicle_id),
            ])
            .await;

        // Releer bajo el candado
        let session = self.find_session(session_id).await?;
        let close = session.close(
            request.end_capacity,
            request.hours_used,
            request.closing_notes,
            Utc::now(),
        )?;

        let battery = self
            .store
            .find_battery(session.battery_id)
            .await?
            .ok_or_else(|| not_found_error("Battery", session.battery_id))?;
        let battery_write = battery.transition(&BatteryEvent::UsageFinished {
            end_capacity: close.end_capacity,
        })?;
        let next_state = battery_write.new_state;

        let closed = self
            .store
            .close_usage_session(
                close,
                battery_write,
                VehicleWrite::Release {
                    vehicle_id: session.vehicle_id,
                    battery_id: session.battery_id,
                },
            )
            .await?;

        info!(
            "🔋 Registro de uso {} finalizado: batería {} queda {}",
            closed.id, battery.code, next_state
        );

        self.with_relations(closed).await
    }

    pub async fn get_by_id(&self, session_id: i64) -> AppResult<UsageSessionResponse> {
        let session = self.find_session(session_id).await?;
        self.with_relations(session).await
    }

    pub async fn list(&self) -> AppResult<Vec<UsageSessionResponse>> {
        let sessions = self.store.list_usage_sessions().await?;
        let mut response = Vec::with_capacity(sessions.len());
        for session in sessions {
            response.push(self.with_relations(session).await?);
        }
        Ok(response)
    }

    async fn find_session(&self, session_id: i64) -> AppResult<UsageSession> {
        self.store
            .find_usage_session(session_id)
            .await?
            .ok_or_else(|| not_found_error("Usage session", session_id))
    }

    async fn with_relations(&self, session: UsageSession) -> AppResult<UsageSessionResponse> {
        let vehicle = self.store.find_vehicle(session.vehicle_id).await?;
        let battery = self.store.find_battery(session.battery_id).await?;
        Ok(UsageSessionResponse {
            session,
            vehicle,
            battery,
        })
    }
}
