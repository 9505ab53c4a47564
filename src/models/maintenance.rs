//! Modelos de mantenimiento
//!
//! Registros de mantenimiento (`maintenance_records`) y el uso de piezas
//! asociado a cada intervención (`part_usage`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{Part, Vehicle};
use crate::utils::validation::{validate_not_blank, validate_service_date};

fn default_quantity() -> i32 {
    1
}

/// Intervención de mantenimiento sobre un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecord {
    pub id: i64,
    pub vehicle_id: i64,
    #[serde(rename = "type")]
    pub maintenance_type: String,
    pub description: String,
    /// Coste en céntimos
    pub cost: i64,
    /// Duración en minutos
    pub duration: i32,
    pub technician: String,
    pub completed_at: Option<DateTime<Utc>>,
    pub next_due: Option<DateTime<Utc>>,
}

/// Pieza consumida en una intervención
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartUsage {
    pub id: i64,
    pub maintenance_id: i64,
    pub part_id: i64,
    pub quantity: i32,
}

/// Uso de pieza junto con la pieza (None si la pieza fue eliminada)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PartUsageWithPart {
    #[serde(flatten)]
    pub usage: PartUsage,
    pub part: Option<Part>,
}

/// Intervención con su vehículo y las piezas usadas
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWithParts {
    #[serde(flatten)]
    pub record: MaintenanceRecord,
    pub vehicle: Option<Vehicle>,
    pub parts_used: Vec<PartUsageWithPart>,
}

/// Request para registrar una pieza usada
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePartUsageRequest {
    pub part_id: i64,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// Request para crear un registro de mantenimiento
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRequest {
    pub vehicle_id: i64,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub maintenance_type: String,

    #[validate(length(min = 1, max = 1000), custom = "validate_not_blank")]
    pub description: String,

    #[validate(range(min = 0))]
    pub cost: i64,

    #[validate(range(min = 0))]
    pub duration: i32,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub technician: String,

    /// Si no se indica, se usa el momento de creación
    #[validate(custom = "validate_service_date")]
    pub completed_at: Option<DateTime<Utc>>,

    #[validate(custom = "validate_service_date")]
    pub next_due: Option<DateTime<Utc>>,

    #[serde(default)]
    #[validate]
    pub parts_used: Vec<CreatePartUsageRequest>,
}

/// Request para actualizar un registro de mantenimiento (patch parcial)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceRequest {
    pub vehicle_id: Option<i64>,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub maintenance_type: Option<String>,

    #[validate(length(min = 1, max = 1000), custom = "validate_not_blank")]
    pub description: Option<String>,

    #[validate(range(min = 0))]
    pub cost: Option<i64>,

    #[validate(range(min = 0))]
    pub duration: Option<i32>,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub technician: Option<String>,

    #[validate(custom = "validate_service_date")]
    pub completed_at: Option<DateTime<Utc>>,

    #[validate(custom = "validate_service_date")]
    pub next_due: Option<DateTime<Utc>>,
}

impl UpdateMaintenanceRequest {
    pub fn apply_to(&self, record: &mut MaintenanceRecord) {
        if let Some(vehicle_id) = self.vehicle_id {
            record.vehicle_id = vehicle_id;
        }
        if let Some(maintenance_type) = &self.maintenance_type {
            record.maintenance_type = maintenance_type.clone();
        }
        if let Some(description) = &self.description {
            record.description = description.clone();
        }
        if let Some(cost) = self.cost {
            record.cost = cost;
        }
        if let Some(duration) = self.duration {
            record.duration = duration;
        }
        if let Some(technician) = &self.technician {
            record.technician = technician.clone();
        }
        if let Some(completed_at) = self.completed_at {
            record.completed_at = Some(completed_at);
        }
        if let Some(next_due) = self.next_due {
            record.next_due = Some(next_due);
        }
    }
}

/// Devuelve la intervención más reciente según `completed_at`.
///
/// Los registros sin fecha de finalización se consideran los más antiguos.
pub fn latest_maintenance<'a, I>(records: I) -> Option<&'a MaintenanceRecord>
where
    I: IntoIterator<Item = &'a MaintenanceRecord>,
{
    records
        .into_iter()
        .max_by(|a, b| a.completed_at.cmp(&b.completed_at).then(a.id.cmp(&b.id)))
}
