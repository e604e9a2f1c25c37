//! Middleware del sistema
//!
//! Autenticación Bearer y CORS.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
