//! Validación del estado operativo de los vehículos
//!
//! Recalcula el estado de un vehículo a partir de sus alertas, su historial
//! de mantenimiento y su kilometraje. Reglas, en orden:
//!
//! 1. `in_repair` si hay al menos una alerta `urgent` sin leer.
//! 2. `maintenance_due` si hay una alerta `high` sin leer, si la próxima
//!    fecha del último mantenimiento ya pasó, si el último mantenimiento sin
//!    próxima fecha tiene más de `maintenance_interval_days`, o si el
//!    kilometraje supera `mileage_threshold_km`.
//! 3. `operational` en cualquier otro caso.
//!
//! El estado guardado nunca es una entrada de la regla, por eso validar dos
//! veces seguidas da el mismo resultado.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{latest_maintenance, Alert, AlertPriority, MaintenanceRecord, Vehicle, VehicleStatus};

pub const DEFAULT_MILEAGE_THRESHOLD_KM: i64 = 200_000;
/// Seis meses
pub const DEFAULT_MAINTENANCE_INTERVAL_DAYS: i64 = 182;

/// Umbrales configurables de la validación
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    pub mileage_threshold_km: i64,
    pub maintenance_interval_days: i64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            mileage_threshold_km: DEFAULT_MILEAGE_THRESHOLD_KM,
            maintenance_interval_days: DEFAULT_MAINTENANCE_INTERVAL_DAYS,
        }
    }
}

impl ValidationRules {
    /// `None` si el intervalo no cabe en un `Duration`
    pub fn maintenance_interval(&self) -> Option<Duration> {
        Duration::try_days(self.maintenance_interval_days)
    }

    /// Fecha en la que vence el intervalo contado desde `done`.
    ///
    /// `None` cuando la suma se sale del rango de fechas representable: la
    /// intervención no se considera vencida.
    pub fn interval_end(&self, done: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.maintenance_interval()
            .and_then(|interval| done.checked_add_signed(interval))
    }
}

/// Resultado de validar un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub status: VehicleStatus,
    pub reasons: Vec<String>,
    pub urgent_issues: Vec<String>,
    pub last_inspection: Option<DateTime<Utc>>,
    pub next_maintenance_due: Option<DateTime<Utc>>,
}

/// Resultado persistido de la validación de un vehículo
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleValidation {
    pub vehicle_id: i64,
    pub plate: String,
    pub previous_status: VehicleStatus,
    pub changed: bool,
    pub validation: ValidationResult,
}

/// Resumen de la validación de toda la flota
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleetValidationSummary {
    pub validated: usize,
    pub changed: usize,
    pub results: Vec<VehicleValidation>,
}

impl FleetValidationSummary {
    pub fn from_results(results: Vec<VehicleValidation>) -> Self {
        Self {
            validated: results.len(),
            changed: results.iter().filter(|r| r.changed).count(),
            results,
        }
    }
}

/// Evaluar el estado de un vehículo.
///
/// Solo se tienen en cuenta las alertas y los mantenimientos cuyo
/// `vehicle_id` coincide con el vehículo.
pub fn evaluate(
    vehicle: &Vehicle,
    alerts: &[Alert],
    maintenance: &[MaintenanceRecord],
    rules: &ValidationRules,
    now: DateTime<Utc>,
) -> ValidationResult {
    let alerts: Vec<&Alert> = alerts.iter().filter(|a| a.vehicle_id == vehicle.id).collect();
    let latest = latest_maintenance(maintenance.iter().filter(|m| m.vehicle_id == vehicle.id));

    let last_inspection = latest.and_then(|m| m.completed_at);
    let next_maintenance_due = latest.and_then(|m| {
        m.next_due
            .or_else(|| m.completed_at.and_then(|done| rules.interval_end(done)))
    });

    let urgent_issues: Vec<String> = alerts
        .iter()
        .filter(|a| a.is_unread_at_least(AlertPriority::Urgent))
        .map(|a| a.message.clone())
        .collect();

    if !urgent_issues.is_empty() {
        let reasons = urgent_issues
            .iter()
            .map(|msg| format!("Alerte urgente non traitée : {}", msg))
            .collect();
        return ValidationResult {
            status: VehicleStatus::InRepair,
            reasons,
            urgent_issues,
            last_inspection,
            next_maintenance_due,
        };
    }

    let mut reasons = Vec::new();

    for alert in alerts.iter().filter(|a| !a.is_read && a.priority == AlertPriority::High) {
        reasons.push(format!("Alerte de maintenance : {}", alert.message));
    }

    if let Some(record) = latest {
        match (record.next_due, record.completed_at) {
            (Some(next_due), _) if next_due < now => {
                reasons.push(format!(
                    "Maintenance en retard depuis le {}",
                    next_due.format("%d/%m/%Y")
                ));
            }
            (None, Some(done)) if rules.interval_end(done).map_or(false, |end| end < now) => {
                reasons.push(format!(
                    "Dernière maintenance il y a plus de {} jours ({})",
                    rules.maintenance_interval_days,
                    done.format("%d/%m/%Y")
                ));
            }
            _ => {}
        }
    }

    if vehicle.mileage > rules.mileage_threshold_km {
        reasons.push(format!(
            "Kilométrage élevé : {} km (seuil {} km)",
            vehicle.mileage, rules.mileage_threshold_km
        ));
    }

    let status = if reasons.is_empty() {
        reasons.push("Maintenance à jour, aucune alerte urgente".to_string());
        VehicleStatus::Operational
    } else {
        VehicleStatus::MaintenanceDue
    };

    ValidationResult {
        status,
        reasons,
        urgent_issues,
        last_inspection,
        next_maintenance_due,
    }
}
