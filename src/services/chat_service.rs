//! Asistente de chat
//!
//! Despacho de respuestas predefinidas a partir de una acción rápida o de
//! palabras clave en el mensaje libre. No hay análisis de lenguaje: cada
//! acción produce un texto con plantilla a partir de los datos actuales.

use chrono::{DateTime, Duration, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::stats_aggregator::aggregate;
use super::vehicle_validation::{evaluate, ValidationRules};
use crate::models::{Alert, AlertPriority, MaintenanceRecord, Part, StockStatus, Vehicle, VehicleStatus};

/// Horizonte para proponer mantenimientos próximos
const SCHEDULE_HORIZON_DAYS: i64 = 30;

lazy_static! {
    static ref ALERTS_KEYWORDS: Regex = Regex::new(r"(?i)\b(alertes?|alerts?|urgen\w*|panne)\b").unwrap();
    static ref PARTS_KEYWORDS: Regex =
        Regex::new(r"(?i)\b(pi[eè]ces?|stock|inventaire|parts?|inventory)\b").unwrap();
    static ref SCHEDULE_KEYWORDS: Regex =
        Regex::new(r"(?i)\b(planifi\w*|programm\w*|rendez-vous|planning|maintenance|schedule)\b").unwrap();
    static ref VEHICLE_KEYWORDS: Regex =
        Regex::new(r"(?i)\b(v[ée]hicules?|[ée]tat|statut|flotte|vehicles?|fleet|status)\b").unwrap();
}

/// Acciones rápidas del asistente
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ChatAction {
    VehicleStatus,
    MaintenanceAlerts,
    PartsInventory,
    ScheduleMaintenance,
}

impl ChatAction {
    /// Enrutar un mensaje libre por palabras clave
    pub fn from_message(message: &str) -> Option<Self> {
        if ALERTS_KEYWORDS.is_match(message) {
            Some(ChatAction::MaintenanceAlerts)
        } else if PARTS_KEYWORDS.is_match(message) {
            Some(ChatAction::PartsInventory)
        } else if SCHEDULE_KEYWORDS.is_match(message) {
            Some(ChatAction::ScheduleMaintenance)
        } else if VEHICLE_KEYWORDS.is_match(message) {
            Some(ChatAction::VehicleStatus)
        } else {
            None
        }
    }
}

/// Datos de la flota sobre los que se construyen las respuestas
#[derive(Debug, Clone, Default)]
pub struct FleetSnapshot {
    pub vehicles: Vec<Vehicle>,
    pub parts: Vec<Part>,
    pub alerts: Vec<Alert>,
    pub maintenance: Vec<MaintenanceRecord>,
}

impl FleetSnapshot {
    fn plate_of(&self, vehicle_id: i64) -> &str {
        self.vehicles
            .iter()
            .find(|v| v.id == vehicle_id)
            .map(|v| v.plate.as_str())
            .unwrap_or("véhicule supprimé")
    }
}

pub struct ChatService {
    rules: ValidationRules,
}

impl ChatService {
    pub fn new(rules: ValidationRules) -> Self {
        Self { rules }
    }

    /// Responder a una acción rápida
    pub fn respond(&self, action: ChatAction, snapshot: &FleetSnapshot, now: DateTime<Utc>) -> String {
        match action {
            ChatAction::VehicleStatus => vehicle_status_response(snapshot),
            ChatAction::MaintenanceAlerts => maintenance_alerts_response(snapshot),
            ChatAction::PartsInventory => parts_inventory_response(snapshot),
            ChatAction::ScheduleMaintenance => self.schedule_maintenance_response(snapshot, now),
        }
    }

    /// Responder a un mensaje libre; si no se reconoce, devolver la ayuda
    pub fn respond_to_message(&self, message: &str, snapshot: &FleetSnapshot, now: DateTime<Utc>) -> String {
        match ChatAction::from_message(message) {
            Some(action) => self.respond(action, snapshot, now),
            None => help_message(),
        }
    }

    fn schedule_maintenance_response(&self, snapshot: &FleetSnapshot, now: DateTime<Utc>) -> String {
        let horizon = now + Duration::days(SCHEDULE_HORIZON_DAYS);

        let mut candidates: Vec<(&Vehicle, Option<DateTime<Utc>>)> = snapshot
            .vehicles
            .iter()
            .filter_map(|vehicle| {
                let result = evaluate(vehicle, &snapshot.alerts, &snapshot.maintenance, &self.rules, now);
                let due_soon = result.next_maintenance_due.map_or(false, |due| due <= horizon);
                if result.status != VehicleStatus::Operational || due_soon {
                    Some((vehicle, result.next_maintenance_due))
                } else {
                    None
                }
            })
            .collect();

        if candidates.is_empty() {
            return format!(
                "Aucune maintenance à programmer dans les {} prochains jours. Tous les véhicules sont à jour.",
                SCHEDULE_HORIZON_DAYS
            );
        }

        // Sin fecha conocida al final
        candidates.sort_by_key(|(vehicle, due)| (due.is_none(), *due, vehicle.id));

        let mut lines = vec![format!("{} véhicule(s) à programmer :", candidates.len())];
        for (vehicle, due) in candidates {
            let when = match due {
                Some(due) if due < now => format!("en retard depuis le {}", due.format("%d/%m/%Y")),
                Some(due) => format!("échéance le {}", due.format("%d/%m/%Y")),
                None => "aucune échéance enregistrée".to_string(),
            };
            lines.push(format!(
                "• {} ({} {}) : {}, {}",
                vehicle.plate,
                vehicle.make,
                vehicle.model,
                vehicle.status.label(),
                when
            ));
        }
        lines.push("Pour programmer une intervention, créez un enregistrement de maintenance pour le véhicule concerné.".to_string());
        lines.join("\n")
    }
}

fn vehicle_status_response(snapshot: &FleetSnapshot) -> String {
    let stats = aggregate(&snapshot.vehicles, &snapshot.parts, &snapshot.alerts);

    if stats.total_vehicles == 0 {
        return "Aucun véhicule enregistré dans la flotte.".to_string();
    }

    let mut lines = vec![
        format!("État de la flotte : {} véhicule(s).", stats.total_vehicles),
        format!("• Opérationnels : {}", stats.operational),
        format!("• Maintenance due : {}", stats.maintenance_due),
        format!("• En réparation : {}", stats.in_repair),
    ];

    let attention: Vec<&Vehicle> = snapshot
        .vehicles
        .iter()
        .filter(|v| v.status != VehicleStatus::Operational)
        .collect();
    if !attention.is_empty() {
        lines.push("Véhicules nécessitant une attention :".to_string());
        for vehicle in attention {
            lines.push(format!(
                "• {} ({} {}) : {}",
                vehicle.plate,
                vehicle.make,
                vehicle.model,
                vehicle.status.label()
            ));
        }
    }

    lines.join("\n")
}

fn maintenance_alerts_response(snapshot: &FleetSnapshot) -> String {
    let mut unread: Vec<&Alert> = snapshot.alerts.iter().filter(|a| !a.is_read).collect();

    if unread.is_empty() {
        return "Aucune alerte non lue. Tous les véhicules sont à jour.".to_string();
    }

    unread.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));

    let urgent = unread.iter().filter(|a| a.priority == AlertPriority::Urgent).count();
    let mut lines = vec![format!(
        "{} alerte(s) non lue(s), dont {} urgente(s) :",
        unread.len(),
        urgent
    )];
    for alert in unread {
        lines.push(format!(
            "• [{}] {} : {}",
            alert.priority.as_str().to_uppercase(),
            snapshot.plate_of(alert.vehicle_id),
            alert.message
        ));
    }
    lines.join("\n")
}

fn parts_inventory_response(snapshot: &FleetSnapshot) -> String {
    let stats = aggregate(&snapshot.vehicles, &snapshot.parts, &snapshot.alerts);

    if stats.total_parts == 0 {
        return "Aucune pièce enregistrée dans l'inventaire.".to_string();
    }

    let mut lines = vec![
        format!("Inventaire : {} référence(s).", stats.total_parts),
        format!("• En stock : {}", stats.parts_in_stock),
        format!("• Stock faible : {}", stats.parts_low_stock),
        format!("• En rupture : {}", stats.parts_out_of_stock),
    ];

    let mut to_reorder: Vec<&Part> = snapshot
        .parts
        .iter()
        .filter(|p| p.stock_status() != StockStatus::InStock)
        .collect();
    to_reorder.sort_by_key(|p| (p.stock, p.id));

    if !to_reorder.is_empty() {
        lines.push("Pièces à réapprovisionner :".to_string());
        for part in to_reorder {
            lines.push(format!(
                "• {} ({}) : {} en stock, minimum {}",
                part.name, part.reference, part.stock, part.min_stock
            ));
        }
    }

    lines.join("\n")
}

/// Mensaje de ayuda cuando no se reconoce la pregunta
fn help_message() -> String {
    [
        "Je peux vous renseigner sur :",
        "• l'état des véhicules (vehicle-status)",
        "• les alertes de maintenance (maintenance-alerts)",
        "• le stock des pièces (parts-inventory)",
        "• la programmation des maintenances (schedule-maintenance)",
        "Utilisez une action rapide ou reformulez votre question.",
    ]
    .join("\n")
}
