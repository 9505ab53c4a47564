//! Utilidades de validación
//!
//! Expresiones regulares y validadores personalizados usados por los
//! derives de `validator` en los modelos.

use chrono::{DateTime, Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Matrícula normalizada: mayúsculas, dígitos, guiones o espacios (ej: ABC-123-FR)
    pub static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9 \-]{1,18}[A-Z0-9]$").unwrap();

    /// Referencia de pieza (ej: FLT-001-D, TYR-004-16)
    pub static ref REFERENCE_REGEX: Regex = Regex::new(r"^[A-Z0-9][A-Z0-9/._\-]{1,39}$").unwrap();
}

/// Validar que un string no esté vacío ni sea solo espacios
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Años aceptados en las fechas de mantenimiento
const SERVICE_YEARS: std::ops::RangeInclusive<i32> = 1900..=9999;

/// Validar que una fecha de intervención tenga un año razonable
pub fn validate_service_date(value: &DateTime<Utc>) -> Result<(), ValidationError> {
    if !SERVICE_YEARS.contains(&value.year()) {
        let mut error = ValidationError::new("date_out_of_range");
        error.add_param("value".into(), &value.to_rfc3339());
        return Err(error);
    }
    Ok(())
}

/// Normalizar un identificador (matrícula o referencia) antes de validarlo
pub fn normalize_identifier(value: &str) -> String {
    value.trim().to_uppercase()
}
