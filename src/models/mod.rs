//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean
//! al schema PostgreSQL (ver `migrations/`) y a la API JSON.

pub mod alert;
pub mod maintenance;
pub mod part;
pub mod stats;
pub mod vehicle;

pub use alert::*;
pub use maintenance::*;
pub use part::*;
pub use stats::*;
pub use vehicle::*;

use thiserror::Error;

/// Valor de texto que no corresponde a ninguna variante de un enum del dominio
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid {kind} value: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Implementa `Display`, `FromStr` y `TryFrom<String>` a partir de `as_str`/`parse_str`.
///
/// `TryFrom<String>` es lo que usa `#[sqlx(try_from = "String")]` al leer columnas TEXT.
macro_rules! impl_text_enum {
    ($ty:ty) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::models::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::parse_str(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = $crate::models::ParseEnumError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                <$ty>::parse_str(&value)
            }
        }
    };
}

pub(crate) use impl_text_enum;
