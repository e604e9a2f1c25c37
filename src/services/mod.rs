//! Services module
//!
//! Lógica de negocio sin estado que no pertenece a un único modelo.

pub mod battery_ranking;
