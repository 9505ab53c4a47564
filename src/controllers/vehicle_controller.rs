//! Controlador de vehículos
//!
//! CRUD de vehículos y validación de estado (uno o toda la flota).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::{
    Alert, CreateVehicleRequest, MaintenanceRecord, UpdateVehicleRequest, Vehicle, VehicleFilters,
    VehicleWithAlerts,
};
use crate::repositories::Storage;
use crate::services::{evaluate, FleetValidationSummary, ValidationRules, VehicleValidation};
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::normalize_identifier;

pub struct VehicleController {
    storage: Arc<dyn Storage>,
    rules: ValidationRules,
}

impl VehicleController {
    pub fn new(storage: Arc<dyn Storage>, rules: ValidationRules) -> Self {
        Self { storage, rules }
    }

    pub async fn list(&self, filters: &VehicleFilters) -> AppResult<Vec<Vehicle>> {
        let vehicles = self.storage.list_vehicles().await?;
        Ok(vehicles.into_iter().filter(|v| filters.matches(v)).collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<VehicleWithAlerts> {
        self.storage
            .get_vehicle_with_alerts(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))
    }

    pub async fn create(&self, mut request: CreateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.plate = normalize_identifier(&request.plate);
        request.validate()?;

        let vehicle = self.storage.create_vehicle(&request).await?;
        tracing::info!("🚚 Vehículo creado: {} (id {})", vehicle.plate, vehicle.id);

        Ok(ApiResponse::success_with_message(vehicle, "Véhicule créé"))
    }

    pub async fn update(&self, id: i64, mut request: UpdateVehicleRequest) -> AppResult<ApiResponse<Vehicle>> {
        request.plate = request.plate.as_deref().map(normalize_identifier);
        request.validate()?;

        let vehicle = self
            .storage
            .update_vehicle(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))?;

        Ok(ApiResponse::success_with_message(vehicle, "Véhicule mis à jour"))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<()>> {
        if !self.storage.delete_vehicle(id).await? {
            return Err(not_found_error("Vehicle", id));
        }
        tracing::info!("🗑️ Vehículo {} eliminado", id);
        Ok(ApiResponse::message_only("Véhicule supprimé"))
    }

    /// Historial de mantenimiento; también responde para ids ya borrados
    pub async fn maintenance_history(&self, id: i64) -> AppResult<Vec<MaintenanceRecord>> {
        self.storage.list_maintenance_by_vehicle(id).await
    }

    pub async fn alerts(&self, id: i64) -> AppResult<Vec<Alert>> {
        self.storage.list_alerts_by_vehicle(id).await
    }

    /// Recalcular y guardar el estado de un vehículo
    pub async fn validate_one(&self, id: i64) -> AppResult<ApiResponse<VehicleValidation>> {
        let vehicle = self
            .storage
            .get_vehicle(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))?;
        let alerts = self.storage.list_alerts_by_vehicle(id).await?;
        let history = self.storage.list_maintenance_by_vehicle(id).await?;

        let outcome = self.apply_validation(vehicle, &alerts, &history, Utc::now()).await?;
        let message = format!("Validation terminée : {}", outcome.validation.status.label());
        Ok(ApiResponse::success_with_message(outcome, message))
    }

    /// Validar toda la flota, vehículo por vehículo
    pub async fn validate_all(&self) -> AppResult<ApiResponse<FleetValidationSummary>> {
        let vehicles = self.storage.list_vehicles().await?;
        let alerts = self.storage.list_alerts().await?;
        let maintenance = self.storage.list_maintenance().await?;
        let now = Utc::now();

        let mut results = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            results.push(self.apply_validation(vehicle, &alerts, &maintenance, now).await?);
        }

        let summary = FleetValidationSummary::from_results(results);
        tracing::info!(
            "✅ Flota validada: {} vehículos, {} cambios de estado",
            summary.validated,
            summary.changed
        );

        let message = format!(
            "{} véhicule(s) validé(s), {} statut(s) modifié(s)",
            summary.validated, summary.changed
        );
        Ok(ApiResponse::success_with_message(summary, message))
    }

    async fn apply_validation(
        &self,
        vehicle: Vehicle,
        alerts: &[Alert],
        maintenance: &[MaintenanceRecord],
        now: DateTime<Utc>,
    ) -> AppResult<VehicleValidation> {
        let validation = evaluate(&vehicle, alerts, maintenance, &self.rules, now);
        let changed = validation.status != vehicle.status;

        if changed {
            // El vehículo puede haberse borrado entre la lectura y la escritura
            let updated = self
                .storage
                .update_vehicle(vehicle.id, &UpdateVehicleRequest::status_only(validation.status))
                .await?;
            if updated.is_none() {
                return Err(not_found_error("Vehicle", vehicle.id));
            }
            tracing::info!(
                "🔄 {}: {} -> {}",
                vehicle.plate,
                vehicle.status,
                validation.status
            );
        }

        Ok(VehicleValidation {
            vehicle_id: vehicle.id,
            plate: vehicle.plate,
            previous_status: vehicle.status,
            changed,
            validation,
        })
    }
}
