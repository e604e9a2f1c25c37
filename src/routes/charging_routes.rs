use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::charging_controller::ChargingController;
use crate::dto::charging_dto::{ChargingSessionResponse, FinishChargingRequest, StartChargingRequest};
use crate::dto::{ApiResponse, ValidatedJson, ValidatedPath};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_charging_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_charging_sessions))
        .route("/iniciar", post(start_charging))
        .route("/:id", get(get_charging_session))
        .route("/:id/finalizar", post(finish_charging))
}

async fn start_charging(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<StartChargingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ChargingSessionResponse>>), AppError> {
    let controller = ChargingController::new(&state);
    let response = controller.start(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(response, "Sesión de carga iniciada")),
    ))
}

async fn finish_charging(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
    ValidatedJson(request): ValidatedJson<FinishChargingRequest>,
) -> Result<Json<ApiResponse<ChargingSessionResponse>>, AppError> {
    let controller = ChargingController::new(&state);
    let response = controller.finish(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(response, "Sesión de carga finalizada")))
}

async fn list_charging_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ChargingSessionResponse>>>, AppError> {
    let controller = ChargingController::new(&state);
    let response = controller.list().await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn get_charging_session(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<Json<ApiResponse<ChargingSessionResponse>>, AppError> {
    let controller = ChargingController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}
