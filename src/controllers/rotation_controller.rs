//! Planificador de rotación: sugerencia, asignación y cancelación de planes

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::dto::rotation_dto::{AssignBatteryRequest, RotationPlanResponse, SuggestionResponse};
use crate::models::rotation_plan::DEFAULT_ASSIGNMENT_REASON;
use crate::models::{BatteryEvent, NewRotationPlan, PlanCancellation, RotationPlan, VehicleWrite};
use crate::repositories::FleetStore;
use crate::services::battery_ranking::{rank_candidates, rationale};
use crate::state::AppState;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::key_lock::{KeyedLocks, LockKey};

pub struct RotationController {
    store: Arc<dyn FleetStore>,
    locks: KeyedLocks,
}

impl RotationController {
    pub fn new(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
            locks: state.locks.clone(),
        }
    }

    /// Solo lectura: no toma candados ni reserva la batería sugerida
    pub async fn suggest(&self, vehicle_id: i64) -> AppResult<SuggestionResponse> {
        let vehicle = self
            .store
            .find_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;

        let available = self
            .store
            .available_batteries(vehicle.min_candidate_capacity())
            .await?;
        let candidates = rank_candidates(&vehicle, available);

        let Some(best) = candidates.first() else {
            warn!("Sin candidatas para el vehículo {}", vehicle.code);
            return Err(AppError::NoCandidate(format!(
                "No available battery has at least {} capacity for vehicle '{}'",
                vehicle.min_candidate_capacity(),
                vehicle.code
            )));
        };

        Ok(SuggestionResponse {
            vehicle_id: vehicle.id,
            suggested_battery_id: best.id,
            battery_code: best.code.clone(),
            suggested_capacity: best.current_capacity,
            required_capacity: vehicle.required_battery_capacity,
            rationale: rationale(best),
            suggested_at: Utc::now(),
            candidates,
        })
    }

    pub async fn assign(&self, request: AssignBatteryRequest) -> AppResult<RotationPlanResponse> {
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

        let battery_write = battery.transition(&BatteryEvent::Assigned)?;
        let reason = request
            .reason
            .filter(|reason| !reason.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ASSIGNMENT_REASON.to_string());

        let plan = self
            .store
            .create_rotation_plan(
                NewRotationPlan {
                    vehicle_id: vehicle.id,
                    battery_id: battery.id,
                    assigned_at: Utc::now(),
                    capacity_at_assignment: battery.current_capacity,
                    reason,
                },
                battery_write,
                VehicleWrite::Assign {
                    vehicle_id: vehicle.id,
                    battery_id: battery.id,
                },
            )
            .await?;

        info!(
            "🔄 Plan {} creado: batería {} asignada a vehículo {}",
            plan.id, battery.code, vehicle.code
        );

        self.with_relations(plan).await
    }

    /// Cancela un plan activo. No revierte el estado de batería ni vehículo.
    pub async fn cancel(&self, plan_id: i64) -> AppResult<RotationPlanResponse> {
        let located = self.find_plan(plan_id).await?;
        let _guard = self.locks.acquire(&[LockKey::Battery(located.battery_id)]).await;

        // Releer bajo el candado
        let plan = self.find_plan(plan_id).await?;
        let cancelled = match plan.cancel(Utc::now())? {
            PlanCancellation::AlreadyCancelled => plan,
            cancellation => {
                let cancelled = self.store.cancel_rotation_plan(plan_id, cancellation).await?;
                info!("🛑 Plan {} cancelado", cancelled.id);
                cancelled
            }
        };

        self.with_relations(cancelled).await
    }

    pub async fn get_by_id(&self, plan_id: i64) -> AppResult<RotationPlanResponse> {
        let plan = self.find_plan(plan_id).await?;
        self.with_relations(plan).await
    }

    pub async fn list(&self) -> AppResult<Vec<RotationPlanResponse>> {
        let plans = self.store.list_rotation_plans().await?;
        let mut response = Vec::with_capacity(plans.len());
        for plan in plans {
            response.push(self.with_relations(plan).await?);
        }
        Ok(response)
    }

    async fn find_plan(&self, plan_id: i64) -> AppResult<RotationPlan> {
        self.store
            .find_rotation_plan(plan_id)
            .await?
            .ok_or_else(|| not_found_error("Rotation plan", plan_id))
    }

    async fn with_relations(&self, plan: RotationPlan) -> AppResult<RotationPlanResponse> {
        let vehicle = self.store.find_vehicle(plan.vehicle_id).await?;
        let battery = self.store.find_battery(plan.battery_id).await?;
        Ok(RotationPlanResponse {
            plan,
            vehicle,
            battery,
        })
    }
}
