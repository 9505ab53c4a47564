//! Controlador de piezas

use std::sync::Arc;

use validator::Validate;

use crate::dto::ApiResponse;
use crate::models::{CreatePartRequest, Part, PartFilters, PartWithStatus, UpdatePartRequest};
use crate::repositories::Storage;
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::validation::normalize_identifier;

pub struct PartController {
    storage: Arc<dyn Storage>,
}

impl PartController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Piezas con su estado de stock, filtradas
    pub async fn list(&self, filters: &PartFilters) -> AppResult<Vec<PartWithStatus>> {
        let parts = self.storage.list_parts().await?;
        Ok(parts
            .into_iter()
            .map(PartWithStatus::from)
            .filter(|p| filters.matches(p))
            .collect())
    }

    pub async fn get(&self, id: i64) -> AppResult<PartWithStatus> {
        self.storage
            .get_part(id)
            .await?
            .map(PartWithStatus::from)
            .ok_or_else(|| not_found_error("Part", id))
    }

    pub async fn create(&self, mut request: CreatePartRequest) -> AppResult<ApiResponse<Part>> {
        request.reference = normalize_identifier(&request.reference);
        request.validate()?;

        let part = self.storage.create_part(&request).await?;
        tracing::info!("🔩 Pieza creada: {} ({})", part.name, part.reference);

        Ok(ApiResponse::success_with_message(part, "Pièce créée"))
    }

    pub async fn update(&self, id: i64, mut request: UpdatePartRequest) -> AppResult<ApiResponse<Part>> {
        request.reference = request.reference.as_deref().map(normalize_identifier);
        request.validate()?;

        let part = self
            .storage
            .update_part(id, &request)
            .await?
            .ok_or_else(|| not_found_error("Part", id))?;

        Ok(ApiResponse::success_with_message(part, "Pièce mise à jour"))
    }

    pub async fn delete(&self, id: i64) -> AppResult<ApiResponse<()>> {
        if !self.storage.delete_part(id).await? {
            return Err(not_found_error("Part", id));
        }
        Ok(ApiResponse::message_only("Pièce supprimée"))
    }
}
