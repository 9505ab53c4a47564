//! Modelo de Alert
//!
//! Avisos asociados a un vehículo, con prioridad y marca de lectura.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{impl_text_enum, ParseEnumError};
use crate::utils::validation::validate_not_blank;

/// Prioridad de una alerta. El orden de las variantes es el orden de gravedad.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertPriority {
    #[default]
    Medium,
    High,
    Urgent,
}

impl AlertPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertPriority::Medium => "medium",
            AlertPriority::High => "high",
            AlertPriority::Urgent => "urgent",
        }
    }

    fn parse_str(value: &str) -> Result<Self, ParseEnumError> {
        match value {
            "medium" => Ok(AlertPriority::Medium),
            "high" => Ok(AlertPriority::High),
            "urgent" => Ok(AlertPriority::Urgent),
            other => Err(ParseEnumError::new("alert priority", other)),
        }
    }
}

impl_text_enum!(AlertPriority);

/// Alerta - mapea a la tabla alerts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: i64,
    pub vehicle_id: i64,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub priority: AlertPriority,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    /// Alerta sin leer con prioridad igual o superior a `priority`
    pub fn is_unread_at_least(&self, priority: AlertPriority) -> bool {
        !self.is_read && self.priority >= priority
    }
}

/// Request para crear una alerta
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertRequest {
    pub vehicle_id: i64,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub alert_type: String,

    #[validate(length(min = 1, max = 500), custom = "validate_not_blank")]
    pub message: String,

    #[serde(default)]
    pub priority: AlertPriority,
}

/// Filtros para el listado de alertas
#[derive(Debug, Default, Deserialize)]
pub struct AlertFilters {
    /// `true` para devolver solo las alertas sin leer
    pub unread: Option<bool>,
    pub priority: Option<AlertPriority>,
}

impl AlertFilters {
    pub fn matches(&self, alert: &Alert) -> bool {
        let unread_ok = match self.unread {
            Some(true) => !alert.is_read,
            Some(false) => alert.is_read,
            None => true,
        };
        unread_ok && self.priority.map_or(true, |p| alert.priority == p)
    }
}
