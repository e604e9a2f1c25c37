//! Sesiones de carga

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::dto::charging_dto::{ChargingSessionResponse, FinishChargingRequest, StartChargingRequest};
use crate::models::{BatteryEvent, ChargingSession, NewChargingSession};
use crate::repositories::FleetStore;
use crate::state::AppState;
use crate::utils::errors::{conflict_error, not_found_error, AppResult};
use crate::utils::key_lock::{KeyedLocks, LockKey};
use crate::utils::validation::opening_capacity_constraints;

pub struct ChargingController {
    store: Arc<dyn FleetStore>,
    locks: KeyedLocks,
}

impl ChargingController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            locks: state.locks.clone(),
        }
    }

    pub async fn start(&self, request: StartChargingRequest) -> AppResult<ChargingSessionResponse> {
        let _guard = self.locks.acquire(&[LockKey::Battery(request.battery_id)]).await;

        let battery = self
            .store
            .find_battery(request.battery_id)
            .await?
            .ok_or_else(|| not_found_error("Battery", request.battery_id))?;

        opening_capacity_constraints("startCapacity", request.start_capacity, battery.total_capacity)
            .evaluate()?;
        let battery_write = battery.transition(&BatteryEvent::ChargingStarted {
            start_capacity: request.start_capacity,
        })?;

        // Una batería que quedó en Charging al salir de uso acepta su sesión,
        // pero no una segunda
        if let Some(open) = self.store.find_open_charging_session(battery.id).await? {
            return Err(conflict_error(format!(
                "Battery '{}' already has an open charging session ({})",
                battery.code, open.id
            )));
        }

        let session = self
            .store
            .open_charging_session(
                NewChargingSession {
                    battery_id: battery.id,
                    charger_id: request.charger_id,
                    start_time: Utc::now(),
                    start_capacity: request.start_capacity,
                    notes: request.notes,
                },
                battery_write,
            )
            .await?;

        info!(
            "⚡ Sesión de carga {} iniciada: batería {} desde {}",
            session.id, battery.code, session.start_capacity
        );

        self.with_battery(session).await
    }

    pub async fn finish(&self, session_id: i64, request: FinishChargingRequest) -> AppResult<ChargingSessionResponse> {
        let located = self.find_session(session_id).await?;
        let _guard = self.locks.acquire(&[LockKey::Battery(located.battery_id)]).await;

        let session = self.find_session(session_id).await?;
        let battery = self
            .store
            .find_battery(session.battery_id)
            .await?
            .ok_or_else(|| not_found_error("Battery", session.battery_id))?;

        let close = session.close(
            request.end_capacity,
            battery.total_capacity,
            request.closing_notes,
            Utc::now(),
        )?;
        let battery_write = battery.transition(&BatteryEvent::ChargingFinished {
            end_capacity: close.end_capacity,
        })?;

        let closed = self.store.close_charging_session(close, battery_write).await?;

        info!(
            "⚡ Sesión de carga {} finalizada: batería {} +{} en {}h",
            closed.id,
            battery.code,
            closed.capacity_gained.unwrap_or_default(),
            closed.hours_charging.unwrap_or_default()
        );

        self.with_battery(closed).await
    }

    pub async fn get_by_id(&self, session_id: i64) -> AppResult<ChargingSessionResponse> {
        let session = self.find_session(session_id).await?;
        self.with_battery(session).await
    }

    pub async fn list(&self) -> AppResult<Vec<ChargingSessionResponse>> {
        let sessions = self.store.list_charging_sessions().await?;
        let mut response = Vec::with_capacity(sessions.len());
        for session in sessions {
            response.push(self.with_battery(session).await?);
        }
        Ok(response)
    }

    async fn find_session(&self, session_id: i64) -> AppResult<ChargingSession> {
        self.store
            .find_charging_session(session_id)
            .await?
            .ok_or_else(|| not_found_error("Charging session", session_id))
    }

    async fn with_battery(&self, session: ChargingSession) -> AppResult<ChargingSessionResponse> {
        let battery = self.store.find_battery(session.battery_id).await?;
        Ok(ChargingSessionResponse { session, battery })
    }
}
