//! Ranking de baterías candidatas para un vehículo
//!
//! Candidatas: baterías disponibles con al menos el 80% de la capacidad
//! requerida por el vehículo, ordenadas por capacidad actual descendente.
//! El orden entre capacidades iguales no es una política: queda el orden
//! en que el almacenamiento las entregó.

use crate::models::{Battery, Vehicle};

/// Filtra y ordena; no muta nada
pub fn rank_candidates(vehicle: &Vehicle, batteries: Vec<Battery>) -> Vec<Battery> {
    let min_capacity = vehicle.min_candidate_capacity();
    let mut candidates: Vec<Battery> = batteries
        .into_iter()
        .filter(|battery| battery.is_available() && battery.current_capacity >= min_capacity)
        .collect();

    // sort_by es estable
    candidates.sort_by(|a, b| b.current_capacity.cmp(&a.current_capacity));
    candidates
}

/// Texto explicativo que acompaña a la sugerencia
pub fn rationale(best: &Battery) -> String {
    format!(
        "Mejor batería disponible con la mayor capacidad actual ({})",
        best.current_capacity
    )
}
