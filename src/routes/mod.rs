//! Rutas HTTP
//!
//! Cada recurso expone su router con `create_*_router()`; aquí se anidan
//! detrás del middleware de autenticación.

pub mod charging_routes;
pub mod rotation_routes;
pub mod usage_routes;

use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::auth::auth_middleware;
use crate::middleware::cors::{cors_middleware, cors_middleware_with_origins};
use crate::state::AppState;

/// Router completo de la aplicación
pub fn create_app_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/rotacion", rotation_routes::create_rotation_router())
        .nest("/registros-uso", usage_routes::create_usage_router())
        .nest("/sesiones-carga", charging_routes::create_charging_router())
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let cors = if state.config.cors_origins.is_empty() && state.config.is_development() {
        cors_middleware()
    } else {
        cors_middleware_with_origins(&state.config.cors_origins)
    };

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
