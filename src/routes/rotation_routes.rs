use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::rotation_controller::RotationController;
use crate::dto::rotation_dto::{AssignBatteryRequest, RotationPlanResponse, SuggestionResponse};
use crate::dto::{ApiResponse, ValidatedJson, ValidatedPath};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_rotation_router() -> Router<AppState> {
    Router::new()
        .route("/sugerir-bateria/:vehicle_id", get(suggest_battery))
        .route("/asignar", post(assign_battery))
        .route("/planes", get(list_plans))
        .route("/planes/:id", get(get_plan).delete(cancel_plan))
}

async fn suggest_battery(
    State(state): State<AppState>,
    ValidatedPath(vehicle_id): ValidatedPath<i64>,
) -> Result<Json<ApiResponse<SuggestionResponse>>, AppError> {
    let controller = RotationController::new(&state);
    let response = controller.suggest(vehicle_id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn assign_battery(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AssignBatteryRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RotationPlanResponse>>), AppError> {
    let controller = RotationController::new(&state);
    let response = controller.assign(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(response, "Batería asignada exitosamente")),
    ))
}

async fn list_plans(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RotationPlanResponse>>>, AppError> {
    let controller = RotationController::new(&state);
    let response = controller.list().await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn get_plan(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<Json<ApiResponse<RotationPlanResponse>>, AppError> {
    let controller = RotationController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn cancel_plan(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<Json<ApiResponse<RotationPlanResponse>>, AppError> {
    let controller = RotationController::new(&state);
    let response = controller.cancel(id).await?;
    Ok(Json(ApiResponse::success_with_message(response, "Plan cancelado")))
}
