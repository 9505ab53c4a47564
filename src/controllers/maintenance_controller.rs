//! Controlador de mantenimiento
//!
//! Registros de mantenimiento y piezas usadas en cada intervención.

use std::sync::Arc;

use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::{
    CreateMaintenanceRequest, CreatePartUsageRequest, MaintenanceRecord, MaintenanceWithParts, PartUsage,
    PartUsageWithPart, UpdateMaintenanceRequest,
};
use crate::repositories::Storage;
use crate::utils::errors::{not_found_error, AppResult};

pub struct MaintenanceController {
    storage: Arc<dyn Storage>,
}

impl MaintenanceController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self) -> AppResult<Vec<MaintenanceWithParts>> {
        self.storage.list_maintenance_with_parts().await
    }

    pub async fn get(&self, id: i64) -> AppResult<MaintenanceWithParts> {
        self.storage
            .get_maintenance_with_parts(id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance record", id))
    }

    /// Crear la intervención y registrar sus piezas en una sola escritura
    pub async fn create(&self, request: CreateMaintenanceRequest) -> AppResult<ApiResponse<MaintenanceWithParts>> {
        request.validate()?;

        let record = self.storage.create_maintenance_with_parts(&request).await?;

        tracing::info!(
            "🔧 Mantenimiento {} registrado para el vehículo {} ({} piezas)",
            record.id,
            record.vehicle_id,
            request.parts_used.len()
        );

        let created = self
            .storage
            .get_maintenance_with_parts(record.id)
            .await?
            .ok_or_else(|| not_found_error("Maintenance record", record.id))?;
        Ok(ApiResponse::success_with_message(created, "Intervention enregistrée"))
    }

    pub async fn update(
        &self,
        id: i64,
        request: UpdateMaintenanceRequest,
    ) -> AppResult<ApiResponse<MaintenanceRecord>> {
        request.validate()?;

        let record = self
            .storage
            .update_maintenance(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Maintenance record", id))?;

        Ok(ApiResponse::success_with_message(record, "Intervention mise à jour"))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<()>> {
        if !self.storage.delete_maintenance(id).await? {
            return Err(not_found_error("Maintenance record", id));
        }
        Ok(ApiResponse::message_only("Intervention supprimée"))
    }

    pub async fn list_parts(&self, id: i64) -> AppResult<Vec<PartUsageWithPart>> {
        if self.storage.get_maintenance(id).await?.is_none() {
            return Err(not_found_error("Maintenance record", id));
        }
        self.storage.list_part_usage_with_parts(id).await
    }

    pub async fn add_part(&self, id: i64, request: CreatePartUsageRequest) -> AppResult<ApiResponse<PartUsage>> {
        request.validate()?;

        if self.storage.get_maintenance(id).await?.is_none() {
            return Err(not_found_error("Maintenance record", id));
        }
        let usage = self.storage.create_part_usage(id, &request).await?;

        Ok(ApiResponse::success_with_message(usage, "Pièce ajoutée à l'intervention"))
    }
}
