//! Repositorios
//!
//! `Storage` es la interfaz de persistencia de todas las entidades. Hay dos
//! implementaciones: `MemStorage` (mapas en memoria, tests y modo demo) y
//! `PgStorage` (PostgreSQL con SQLx).
//!
//! Convenciones comunes:
//! - `update_*` sobre un id inexistente devuelve `Ok(None)`;
//! - `delete_*` devuelve si la fila existía;
//! - matrícula y referencia duplicadas → `AppError::Conflict`;
//! - padre inexistente al crear → `AppError::BadRequest`;
//! - borrar un vehículo no borra sus mantenimientos ni sus alertas.

pub mod memory_storage;
pub mod postgres_storage;

pub use memory_storage::MemStorage;
pub use postgres_storage::PgStorage;

use async_trait::async_trait;

use crate::models::{
    latest_maintenance, Alert, CreateAlertRequest, CreateMaintenanceRequest, CreatePartRequest,
    CreatePartUsageRequest, CreateVehicleRequest, MaintenanceRecord, MaintenanceWithParts, Part,
    PartUsage, PartUsageWithPart, UpdateMaintenanceRequest, UpdatePartRequest, UpdateVehicleRequest,
    Vehicle, VehicleWithAlerts,
};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Nombre del backend, para logs y health check
    fn backend_name(&self) -> &'static str;

    // Vehicles
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>>;
    async fn get_vehicle(&self, id: i64) -> AppResult<Option<Vehicle>>;
    async fn create_vehicle(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle>;
    async fn update_vehicle(&self, id: i64, changes: &UpdateVehicleRequest) -> AppResult<Option<Vehicle>>;
    async fn delete_vehicle(&self, id: i64) -> AppResult<bool>;

    // Parts
    async fn list_parts(&self) -> AppResult<Vec<Part>>;
    async fn get_part(&self, id: i64) -> AppResult<Option<Part>>;
    async fn create_part(&self, request: &CreatePartRequest) -> AppResult<Part>;
    async fn update_part(&self, id: i64, changes: &UpdatePartRequest) -> AppResult<Option<Part>>;
    async fn delete_part(&self, id: i64) -> AppResult<bool>;

    // Maintenance records
    async fn list_maintenance(&self) -> AppResult<Vec<MaintenanceRecord>>;
    async fn get_maintenance(&self, id: i64) -> AppResult<Option<MaintenanceRecord>>;
    async fn list_maintenance_by_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<MaintenanceRecord>>;
    /// Registro y `parts_used` en una sola escritura: si el vehículo o alguna
    /// pieza no existe no se guarda nada.
    async fn create_maintenance_with_parts(
        &self,
        request: &CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRecord>;
    async fn update_maintenance(
        &self,
        id: i64,
        changes: &UpdateMaintenanceRequest,
    ) -> AppResult<Option<MaintenanceRecord>>;
    async fn delete_maintenance(&self, id: i64) -> AppResult<bool>;

    // Part usage
    async fn list_part_usage(&self, maintenance_id: i64) -> AppResult<Vec<PartUsage>>;
    async fn create_part_usage(
        &self,
        maintenance_id: i64,
        request: &CreatePartUsageRequest,
    ) -> AppResult<PartUsage>;

    // Alerts
    async fn list_alerts(&self) -> AppResult<Vec<Alert>>;
    async fn get_alert(&self, id: i64) -> AppResult<Option<Alert>>;
    async fn list_alerts_by_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<Alert>>;
    async fn create_alert(&self, request: &CreateAlertRequest) -> AppResult<Alert>;
    /// Idempotente: marcar dos veces sigue devolviendo `true`
    async fn mark_alert_read(&self, id: i64) -> AppResult<bool>;
    async fn delete_alert(&self, id: i64) -> AppResult<bool>;

    /// Vehículo con sus alertas y su mantenimiento más reciente
    async fn get_vehicle_with_alerts(&self, id: i64) -> AppResult<Option<VehicleWithAlerts>> {
        let Some(vehicle) = self.get_vehicle(id).await? else {
            return Ok(None);
        };

        let alerts = self.list_alerts_by_vehicle(id).await?;
        let history = self.list_maintenance_by_vehicle(id).await?;
        let last_maintenance = latest_maintenance(&history).cloned();

        Ok(Some(VehicleWithAlerts {
            vehicle,
            alerts,
            last_maintenance,
        }))
    }

    /// Piezas usadas en una intervención; `part` es `None` si la pieza ya no existe
    async fn list_part_usage_with_parts(&self, maintenance_id: i64) -> AppResult<Vec<PartUsageWithPart>> {
        let usages = self.list_part_usage(maintenance_id).await?;
        let mut result = Vec::with_capacity(usages.len());
        for usage in usages {
            let part = self.get_part(usage.part_id).await?;
            result.push(PartUsageWithPart { usage, part });
        }
        Ok(result)
    }

    async fn get_maintenance_with_parts(&self, id: i64) -> AppResult<Option<MaintenanceWithParts>> {
        let Some(record) = self.get_maintenance(id).await? else {
            return Ok(None);
        };

        let vehicle = self.get_vehicle(record.vehicle_id).await?;
        let parts_used = self.list_part_usage_with_parts(record.id).await?;

        Ok(Some(MaintenanceWithParts {
            record,
            vehicle,
            parts_used,
        }))
    }

    /// Todas las intervenciones con vehículo (o `None` si quedó huérfana) y piezas usadas
    async fn list_maintenance_with_parts(&self) -> AppResult<Vec<MaintenanceWithParts>> {
        let records = self.list_maintenance().await?;
        let vehicles = self.list_vehicles().await?;

        let mut result = Vec::with_capacity(records.len());
        for record in records {
            let vehicle = vehicles.iter().find(|v| v.id == record.vehicle_id).cloned();
            let parts_used = self.list_part_usage_with_parts(record.id).await?;
            result.push(MaintenanceWithParts {
                record,
                vehicle,
                parts_used,
            });
        }
        Ok(result)
    }

    /// Sin vehículos ni piezas: candidato a cargar los datos de ejemplo
    async fn is_empty(&self) -> AppResult<bool> {
        Ok(self.list_vehicles().await?.is_empty() && self.list_parts().await?.is_empty())
    }
}
