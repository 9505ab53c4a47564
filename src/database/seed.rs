//! Datos de ejemplo
//!
//! Flota de demostración: tres vehículos, cuatro piezas, tres intervenciones
//! y tres alertas. Se cargan a través de `Storage`, así que sirven para
//! cualquier backend, y solo si el almacenamiento está vacío.

use chrono::{DateTime, TimeZone, Utc};

use crate::models::{
    AlertPriority, CreateAlertRequest, CreateMaintenanceRequest, CreatePartRequest, CreateVehicleRequest,
    VehicleStatus,
};
use crate::repositories::Storage;
use crate::utils::errors::{AppError, AppResult};

/// Resumen de lo cargado
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub vehicles: usize,
    pub parts: usize,
    pub maintenance: usize,
    pub alerts: usize,
}

fn date(year: i32, month: u32, day: u32) -> AppResult<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::Internal(format!("invalid seed date {}-{}-{}", year, month, day)))
}

fn vehicle(plate: &str, make: &str, model: &str, year: i32, mileage: i64, status: VehicleStatus) -> CreateVehicleRequest {
    CreateVehicleRequest {
        plate: plate.to_string(),
        make: make.to_string(),
        model: model.to_string(),
        year,
        vehicle_type: "utilitaire".to_string(),
        mileage,
        status,
    }
}

fn part(name: &str, reference: &str, category: &str, stock: i32, min_stock: i32, unit_price: i64) -> CreatePartRequest {
    CreatePartRequest {
        name: name.to_string(),
        reference: reference.to_string(),
        category: category.to_string(),
        stock,
        min_stock,
        unit_price,
    }
}

/// Cargar la flota de ejemplo si el almacenamiento está vacío.
///
/// Devuelve `None` cuando ya había datos.
pub async fn seed_sample_data(storage: &dyn Storage) -> AppResult<Option<SeedReport>> {
    if !storage.is_empty().await? {
        tracing::info!("🌱 El almacenamiento ya tiene datos, no se cargan ejemplos");
        return Ok(None);
    }

    let mut report = SeedReport::default();

    let vehicles = [
        vehicle("ABC-123-FR", "Renault", "Master", 2020, 125_430, VehicleStatus::Operational),
        vehicle("XYZ-789-FR", "Peugeot", "Partner", 2019, 89_750, VehicleStatus::MaintenanceDue),
        vehicle("DEF-456-FR", "Ford", "Transit", 2018, 156_890, VehicleStatus::InRepair),
    ];
    let mut vehicle_ids = Vec::with_capacity(vehicles.len());
    for request in &vehicles {
        vehicle_ids.push(storage.create_vehicle(request).await?.id);
        report.vehicles += 1;
    }

    let parts = [
        part("Filtre à huile", "FLT-001-D", "filtres", 25, 5, 1250),
        part("Plaquettes de frein", "BRK-002-F", "freinage", 3, 5, 4500),
        part("Batterie 12V", "BAT-003-70", "moteur", 0, 2, 8500),
        part("Pneu 215/75 R16", "TYR-004-16", "pneumatiques", 8, 4, 12000),
    ];
    for request in &parts {
        storage.create_part(request).await?;
        report.parts += 1;
    }

    let maintenance = [
        CreateMaintenanceRequest {
            vehicle_id: vehicle_ids[0],
            maintenance_type: "vidange".to_string(),
            description: "Vidange moteur + filtre".to_string(),
            cost: 6500,
            duration: 90,
            technician: "J. Dubois".to_string(),
            completed_at: Some(date(2024, 1, 8)?),
            next_due: Some(date(2024, 7, 8)?),
            parts_used: Vec::new(),
        },
        CreateMaintenanceRequest {
            vehicle_id: vehicle_ids[1],
            maintenance_type: "reparation".to_string(),
            description: "Remplacement plaquettes frein".to_string(),
            cost: 12000,
            duration: 165,
            technician: "M. Martin".to_string(),
            completed_at: Some(date(2024, 1, 5)?),
            next_due: None,
            parts_used: Vec::new(),
        },
        CreateMaintenanceRequest {
            vehicle_id: vehicle_ids[2],
            maintenance_type: "controle_technique".to_string(),
            description: "Contrôle technique périodique".to_string(),
            cost: 7800,
            duration: 60,
            technician: "Auto Control+".to_string(),
            completed_at: Some(date(2023, 12, 22)?),
            next_due: Some(date(2024, 12, 22)?),
            parts_used: Vec::new(),
        },
    ];
    for request in &maintenance {
        storage.create_maintenance_with_parts(request).await?;
        report.maintenance += 1;
    }

    let alerts = [
        (vehicle_ids[0], "maintenance_due", "Vidange prévue dans 7 jours", AlertPriority::Medium),
        (vehicle_ids[1], "overdue", "Contrôle technique expiré depuis 3 jours", AlertPriority::Urgent),
        (vehicle_ids[2], "inspection_needed", "Plaquettes de frein à vérifier", AlertPriority::High),
    ];
    for (vehicle_id, alert_type, message, priority) in alerts {
        storage
            .create_alert(&CreateAlertRequest {
                vehicle_id,
                alert_type: alert_type.to_string(),
                message: message.to_string(),
                priority,
            })
            .await?;
        report.alerts += 1;
    }

    tracing::info!(
        "🌱 Datos de ejemplo cargados: {} vehículos, {} piezas, {} mantenimientos, {} alertas",
        report.vehicles,
        report.parts,
        report.maintenance,
        report.alerts
    );
    Ok(Some(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::MemStorage;

    #[tokio::test]
    async fn test_seed_loads_sample_fleet_once() {
        let storage = MemStorage::new();

        let report = seed_sample_data(&storage).await.unwrap().unwrap();
        assert_eq!(
            report,
            SeedReport {
                vehicles: 3,
                parts: 4,
                maintenance: 3,
                alerts: 3
            }
        );

        // Segunda llamada: ya hay datos
        assert!(seed_sample_data(&storage).await.unwrap().is_none());
        assert_eq!(storage.list_vehicles().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_seed_links_children_to_created_vehicles() {
        let storage = MemStorage::new();
        seed_sample_data(&storage).await.unwrap();

        let vehicles = storage.list_vehicles().await.unwrap();
        for alert in storage.list_alerts().await.unwrap() {
            assert!(vehicles.iter().any(|v| v.id == alert.vehicle_id));
        }
        for record in storage.list_maintenance().await.unwrap() {
            assert!(vehicles.iter().any(|v| v.id == record.vehicle_id));
        }
    }
}
