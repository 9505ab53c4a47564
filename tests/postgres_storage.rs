//! Tests de `PgStorage` contra una base de datos real.
//!
//! Necesitan `DATABASE_URL`; se ejecutan con `cargo test -- --ignored`.
//! `#[sqlx::test]` crea una base aislada por test y aplica `migrations/`.

use fleet_manager::database::seed_sample_data;
use fleet_manager::models::{
    AlertPriority, CreateAlertRequest, CreateMaintenanceRequest, CreatePartRequest, CreatePartUsageRequest,
    CreateVehicleRequest, UpdateVehicleRequest, VehicleStatus,
};
use fleet_manager::repositories::{PgStorage, Storage};
use fleet_manager::services::aggregate;
use fleet_manager::utils::errors::{AppError, AppResult};
use sqlx::PgPool;

fn vehicle_request(plate: &str) -> CreateVehicleRequest {
    CreateVehicleRequest {
        plate: plate.to_string(),
        make: "Peugeot".to_string(),
        model: "Partner".to_string(),
        year: 2019,
        vehicle_type: "utilitaire".to_string(),
        mileage: 89_750,
        status: VehicleStatus::Operational,
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_vehicle_roundtrip_and_conflict(pool: PgPool) -> AppResult<()> {
    let storage = PgStorage::new(pool);

    let created = storage.create_vehicle(&vehicle_request("XYZ-789-FR")).await?;
    assert_eq!(created.status, VehicleStatus::Operational);

    let fetched = storage.get_vehicle(created.id).await?;
    assert_eq!(fetched.as_ref(), Some(&created));

    let err = storage.create_vehicle(&vehicle_request("XYZ-789-FR")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let updated = storage
        .update_vehicle(created.id, &UpdateVehicleRequest::status_only(VehicleStatus::InRepair))
        .await?
        .expect("vehicle exists");
    assert_eq!(updated.status, VehicleStatus::InRepair);
    assert_eq!(updated.plate, "XYZ-789-FR");

    assert!(storage.update_vehicle(9999, &UpdateVehicleRequest::default()).await?.is_none());
    Ok(())
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_delete_vehicle_keeps_children(pool: PgPool) -> AppResult<()> {
    let storage = PgStorage::new(pool);
    let vehicle = storage.create_vehicle(&vehicle_request("ABC-123-FR")).await?;

    let alert = storage
        .create_alert(&CreateAlertRequest {
            vehicle_id: vehicle.id,
            alert_type: "overdue".to_string(),
            message: "Contrôle technique expiré".to_string(),
            priority: AlertPriority::Urgent,
        })
        .await?;

    assert!(storage.delete_vehicle(vehicle.id).await?);
    assert!(!storage.delete_vehicle(vehicle.id).await?);
    assert!(storage.get_vehicle(vehicle.id).await?.is_none());

    let orphan = storage.get_alert(alert.id).await?.expect("alert survives");
    assert_eq!(orphan.vehicle_id, vehicle.id);

    assert!(storage.mark_alert_read(alert.id).await?);
    assert!(storage.mark_alert_read(alert.id).await?);
    Ok(())
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_part_usage_requires_parents(pool: PgPool) -> AppResult<()> {
    let storage = PgStorage::new(pool);
    let vehicle = storage.create_vehicle(&vehicle_request("DEF-456-FR")).await?;
    let part = storage
        .create_part(&CreatePartRequest {
            name: "Batterie 12V".to_string(),
            reference: "BAT-003-70".to_string(),
            category: "moteur".to_string(),
            stock: 0,
            min_stock: 2,
            unit_price: 8500,
        })
        .await?;

    let record = storage
        .create_maintenance_with_parts(&CreateMaintenanceRequest {
            vehicle_id: vehicle.id,
            maintenance_type: "reparation".to_string(),
            description: "Remplacement batterie".to_string(),
            cost: 9500,
            duration: 30,
            technician: "M. Martin".to_string(),
            completed_at: None,
            next_due: None,
            parts_used: Vec::new(),
        })
        .await?;
    assert!(record.completed_at.is_some());

    let usage = storage
        .create_part_usage(record.id, &CreatePartUsageRequest { part_id: part.id, quantity: 1 })
        .await?;
    assert_eq!(usage.maintenance_id, record.id);

    let err = storage
        .create_part_usage(record.id, &CreatePartUsageRequest { part_id: 9999, quantity: 1 })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let composed = storage.get_maintenance_with_parts(record.id).await?.expect("record exists");
    assert_eq!(composed.parts_used.len(), 1);
    assert_eq!(composed.vehicle.map(|v| v.id), Some(vehicle.id));
    Ok(())
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_seeded_stats(pool: PgPool) -> AppResult<()> {
    let storage = PgStorage::new(pool);
    seed_sample_data(&storage).await?;

    let stats = aggregate(
        &storage.list_vehicles().await?,
        &storage.list_parts().await?,
        &storage.list_alerts().await?,
    );
    assert_eq!(stats.total_vehicles, 3);
    assert_eq!(stats.parts_low_stock, 1);
    assert_eq!(stats.parts_out_of_stock, 1);
    assert_eq!(stats.unread_alerts, 3);
    Ok(())
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_maintenance_with_unknown_part_is_rolled_back(pool: PgPool) -> AppResult<()> {
    let storage = PgStorage::new(pool);
    let vehicle = storage.create_vehicle(&vehicle_request("GHI-321-FR")).await?;
    let part = storage
        .create_part(&CreatePartRequest {
            name: "Filtre à huile".to_string(),
            reference: "FLT-001-D".to_string(),
            category: "filtres".to_string(),
            stock: 25,
            min_stock: 5,
            unit_price: 1250,
        })
        .await?;

    let mut request = CreateMaintenanceRequest {
        vehicle_id: vehicle.id,
        maintenance_type: "vidange".to_string(),
        description: "Vidange moteur + filtre".to_string(),
        cost: 6500,
        duration: 90,
        technician: "J. Dubois".to_string(),
        completed_at: None,
        next_due: None,
        parts_used: vec![
            CreatePartUsageRequest { part_id: part.id, quantity: 1 },
            CreatePartUsageRequest { part_id: 9999, quantity: 2 },
        ],
    };

    let err = storage.create_maintenance_with_parts(&request).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(storage.list_maintenance().await?.is_empty());

    request.parts_used.truncate(1);
    let record = storage.create_maintenance_with_parts(&request).await?;
    let usages = storage.list_part_usage(record.id).await?;
    assert_eq!(usages.len(), 1);
    assert_eq!(usages[0].part_id, part.id);
    Ok(())
}
