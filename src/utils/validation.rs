//! Utilidades de validación
//!
//! Reglas por campo usadas por los DTOs (`validator`) y un conjunto de
//! restricciones declarativo para las reglas que dependen del estado
//! almacenado (capacidad final contra inicial, contra capacidad total).

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::utils::errors::{AppError, AppResult};

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Adaptador para `#[validate(custom = ...)]` sobre capacidades y horas
pub fn validate_non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)
}

/// Conjunto de restricciones evaluado antes de cualquier mutación.
///
/// Cada regla fallida se reporta bajo su campo, así el cliente recibe
/// todos los problemas de una vez en lugar del primero.
#[derive(Debug, Default)]
pub struct ConstraintSet {
    errors: ValidationErrors,
    failed: bool,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra un error en `field` si `holds` es falso
    pub fn require<V: Serialize>(
        mut self,
        field: &'static str,
        holds: bool,
        code: &'static str,
        message: impl Into<Cow<'static, str>>,
        value: &V,
    ) -> Self {
        if !holds {
            let mut error = ValidationError::new(code);
            error.message = Some(message.into());
            error.add_param("value".into(), value);
            self.errors.add(field, error);
            self.failed = true;
        }
        self
    }

    pub fn evaluate(self) -> AppResult<()> {
        if self.failed {
            Err(AppError::Validation(self.errors))
        } else {
            Ok(())
        }
    }
}

/// Capacidad de apertura de una sesión: dentro de `[0, total]`
pub fn opening_capacity_constraints(
    field: &'static str,
    capacity: Decimal,
    total_capacity: Decimal,
) -> ConstraintSet {
    ConstraintSet::new()
        .require(
            field,
            capacity >= Decimal::ZERO,
            "non_negative",
            "capacity must be zero or greater",
            &capacity,
        )
        .require(
            field,
            capacity <= total_capacity,
            "lte_total_capacity",
            format!("capacity must not exceed the battery total capacity ({})", total_capacity),
            &capacity,
        )
}
