//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! JWT y exclusión mutua por entidad.

pub mod errors;
pub mod jwt;
pub mod key_lock;
pub mod validation;
