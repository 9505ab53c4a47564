//! Controlador de alertas

use std::sync::Arc;

use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::{Alert, AlertFilters, CreateAlertRequest};
use crate::repositories::Storage;
use crate::utils::errors::{not_found_error, AppResult};

pub struct AlertController {
    storage: Arc<dyn Storage>,
}

impl AlertController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self, filters: &AlertFilters) -> AppResult<Vec<Alert>> {
        let alerts = self.storage.list_alerts().await?;
        Ok(alerts.into_iter().filter(|a| filters.matches(a)).collect())
    }

    pub async fn create(&self, request: CreateAlertRequest) -> AppResult<ApiResponse<Alert>> {
        request.validate()?;

        let alert = self.storage.create_alert(&request).await?;
        tracing::info!(
            "🚨 Alerta {} ({}) para el vehículo {}",
            alert.id,
            alert.priority,
            alert.vehicle_id
        );

        Ok(ApiResponse::success_with_message(alert, "Alerte créée"))
    }

    pub async fn mark_read(&self, id: i64) -> AppResult<ApiResponse<()>> {
        if !self.storage.mark_alert_read(id).await? {
            return Err(not_found_error("Alert", id));
        }
        Ok(ApiResponse::message_only("Alerte marquée comme lue"))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<()>> {
        if !self.storage.delete_alert(id).await? {
            return Err(not_found_error("Alert", id));
        }
        Ok(ApiResponse::message_only("Alerte supprimée"))
    }
}
