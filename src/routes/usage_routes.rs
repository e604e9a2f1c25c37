use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::usage_controller::UsageController;
use crate::dto::usage_dto::{FinishUsageRequest, StartUsageRequest, UsageSessionResponse};
use crate::dto::{ApiResponse, ValidatedJson, ValidatedPath};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_usage_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_usage_sessions))
        .route("/iniciar", post(start_usage))
        .route("/:id", get(get_usage_session))
        .route("/:id/finalizar", post(finish_usage))
}

async fn start_usage(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<StartUsageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UsageSessionResponse>>), AppError> {
    let controller = UsageController::new(&state);
    let response = controller.start(request).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(response, "Registro de uso iniciado")),
    ))
}

async fn finish_usage(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
    ValidatedJson(request): ValidatedJson<FinishUsageRequest>,
) -> Result<Json<ApiResponse<UsageSessionResponse>>, AppError> {
    let controller = UsageController::new(&state);
    let response = controller.finish(id, request).await?;
    Ok(Json(ApiResponse::success_with_message(response, "Registro de uso finalizado")))
}

async fn list_usage_sessions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UsageSessionResponse>>>, AppError> {
    let controller = UsageController::new(&state);
    let response = controller.list().await?;
    Ok(Json(ApiResponse::success(response)))
}

async fn get_usage_session(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<i64>,
) -> Result<Json<ApiResponse<UsageSessionResponse>>, AppError> {
    let controller = UsageController::new(&state);
    let response = controller.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(response)))
}
