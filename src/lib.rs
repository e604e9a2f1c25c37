//! Núcleo de rotación de baterías
//!
//! Máquinas de estado de baterías y vehículos, registros de uso,
//! sesiones de carga, sugerencia de baterías y planes de rotación,
//! servidos por HTTP.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;
