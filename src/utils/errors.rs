//! Sistema de manejo de errores
//!
//! Este módulo define los errores del núcleo de rotación y su conversión
//! a respuestas HTTP con código estable y detalle estructurado.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::models::battery::{Battery, BatteryState};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No candidate: {0}")]
    NoCandidate(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        details: Option<serde_json::Value>,
    },

    #[error("Already finalized: {0}")]
    AlreadyFinalized(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("JWT error: {0}")]
    Jwt(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl ErrorResponse {
    fn new(error: &str, message: String, details: Option<serde_json::Value>, code: &str) -> Self {
        Self {
            error: error.to_string(),
            message,
            details,
            code: code.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(e) => {
                error!("❌ Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Database Error",
                        "An error occurred while accessing the database".to_string(),
                        None,
                        "DB_ERROR",
                    ),
                )
            }

            AppError::Validation(e) => {
                warn!("Validation error: {}", e);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::new(
                        "Validation Error",
                        "The provided data is invalid".to_string(),
                        Some(json!(e)),
                        "VALIDATION_ERROR",
                    ),
                )
            }

            AppError::MalformedRequest(msg) => {
                warn!("Malformed request: {}", msg);
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    ErrorResponse::new(
                        "Validation Error",
                        msg,
                        None,
                        "VALIDATION_ERROR",
                    ),
                )
            }

            AppError::Unauthorized(msg) => {
                warn!("Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("Unauthorized", msg, None, "UNAUTHORIZED"),
                )
            }

            AppError::NotFound(msg) => {
                warn!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("Not Found", msg, None, "NOT_FOUND"),
                )
            }

            AppError::NoCandidate(msg) => {
                warn!("No candidate: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new("No Candidate", msg, None, "NO_CANDIDATE"),
                )
            }

            AppError::Conflict { message, details } => {
                warn!("Conflict: {}", message);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("Conflict", message, details, "CONFLICT"),
                )
            }

            AppError::AlreadyFinalized(msg) => {
                warn!("Already finalized: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new("Conflict", msg, None, "ALREADY_FINALIZED"),
                )
            }

            AppError::Internal(msg) => {
                error!("❌ Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(
                        "Internal Server Error",
                        "An unexpected error occurred".to_string(),
                        None,
                        "INTERNAL_ERROR",
                    ),
                )
            }

            AppError::Jwt(msg) => {
                warn!("JWT error: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse::new("JWT Error", msg, None, "JWT_ERROR"),
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: i64) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de conflicto sin detalle
pub fn conflict_error(message: impl Into<String>) -> AppError {
    AppError::Conflict {
        message: message.into(),
        details: None,
    }
}

/// Conflicto de estado de batería, reportando el estado real
pub fn battery_state_conflict(battery: &Battery, operation: &str) -> AppError {
    AppError::Conflict {
        message: format!(
            "Cannot {} battery '{}': current state is {}",
            operation, battery.code, battery.state
        ),
        details: Some(json!({
            "batteryId": battery.id,
            "currentState": battery.state,
        })),
    }
}

/// Conflicto detectado al escribir: el estado almacenado ya no es el esperado
pub fn stale_battery_state(battery_id: i64, expected: BatteryState) -> AppError {
    AppError::Conflict {
        message: format!(
            "Battery {} is no longer {}; it was modified concurrently",
            battery_id, expected
        ),
        details: Some(json!({
            "batteryId": battery_id,
            "expectedState": expected,
        })),
    }
}

/// Función helper para crear errores internos
pub fn internal_error(message: &str) -> AppError {
    AppError::Internal(message.to_string())
}
