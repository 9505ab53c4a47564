//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus variantes para CRUD operations.
//! Mapea a la tabla `vehicles` con primary key `id` (BIGSERIAL).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{impl_text_enum, Alert, MaintenanceRecord, ParseEnumError};
use crate::utils::validation::{validate_not_blank, PLATE_REGEX};

/// Estado operativo del vehículo - se guarda como TEXT en la columna `status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    #[default]
    Operational,
    MaintenanceDue,
    InRepair,
}

impl VehicleStatus {
    pub const ALL: [VehicleStatus; 3] = [
        VehicleStatus::Operational,
        VehicleStatus::MaintenanceDue,
        VehicleStatus::InRepair,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleStatus::Operational => "operational",
            VehicleStatus::MaintenanceDue => "maintenance_due",
            VehicleStatus::InRepair => "in_repair",
        }
    }

    fn parse_str(value: &str) -> Result<Self, ParseEnumError> {
        match value {
            "operational" => Ok(VehicleStatus::Operational),
            "maintenance_due" => Ok(VehicleStatus::MaintenanceDue),
            "in_repair" => Ok(VehicleStatus::InRepair),
            other => Err(ParseEnumError::new("vehicle status", other)),
        }
    }

    /// Etiqueta en francés mostrada por la UI y el asistente
    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::Operational => "Opérationnel",
            VehicleStatus::MaintenanceDue => "Maintenance due",
            VehicleStatus::InRepair => "En réparation",
        }
    }
}

impl_text_enum!(VehicleStatus);

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub plate: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    /// Kilometraje en km
    pub mileage: i64,
    #[sqlx(try_from = "String")]
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
}

/// Request para crear un nuevo vehículo
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(regex = "PLATE_REGEX")]
    pub plate: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub make: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: String,

    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub vehicle_type: String,

    #[serde(default)]
    #[validate(range(min = 0))]
    pub mileage: i64,

    #[serde(default)]
    pub status: VehicleStatus,
}

/// Request para actualizar un vehículo existente (patch parcial)
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(regex = "PLATE_REGEX")]
    pub plate: Option<String>,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub make: Option<String>,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50), custom = "validate_not_blank")]
    pub vehicle_type: Option<String>,

    #[validate(range(min = 0))]
    pub mileage: Option<i64>,

    pub status: Option<VehicleStatus>,
}

impl UpdateVehicleRequest {
    /// Patch que solo cambia el estado (usado por la validación)
    pub fn status_only(status: VehicleStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Aplicar el patch sobre un vehículo en memoria
    pub fn apply_to(&self, vehicle: &mut Vehicle) {
        if let Some(plate) = &self.plate {
            vehicle.plate = plate.clone();
        }
        if let Some(make) = &self.make {
            vehicle.make = make.clone();
        }
        if let Some(model) = &self.model {
            vehicle.model = model.clone();
        }
        if let Some(year) = self.year {
            vehicle.year = year;
        }
        if let Some(vehicle_type) = &self.vehicle_type {
            vehicle.vehicle_type = vehicle_type.clone();
        }
        if let Some(mileage) = self.mileage {
            vehicle.mileage = mileage;
        }
        if let Some(status) = self.status {
            vehicle.status = status;
        }
    }
}

/// Vehículo con sus alertas y su último mantenimiento
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleWithAlerts {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub alerts: Vec<Alert>,
    pub last_maintenance: Option<MaintenanceRecord>,
}

/// Filtros para búsqueda de vehículos
#[derive(Debug, Default, Deserialize)]
pub struct VehicleFilters {
    pub status: Option<VehicleStatus>,
    /// Búsqueda libre sobre matrícula, marca y modelo
    pub search: Option<String>,
}

impl VehicleFilters {
    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let Some(status) = self.status {
            if vehicle.status != status {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                vehicle.plate.to_lowercase().contains(&term)
                    || vehicle.make.to_lowercase().contains(&term)
                    || vehicle.model.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}
