//! Controladores de lectura agregada: estadísticas y asistente de chat

use std::sync::Arc;

use chrono::Utc;

use crate::dto::{ChatQuery, ChatResponse};
use crate::models::DashboardStats;
use crate::repositories::Storage;
use crate::services::{aggregate, ChatService, FleetSnapshot, ValidationRules};
use crate::utils::errors::{AppError, AppResult};

pub struct DashboardController {
    storage: Arc<dyn Storage>,
}

impl DashboardController {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn stats(&self) -> AppResult<DashboardStats> {
        let vehicles = self.storage.list_vehicles().await?;
        let parts = self.storage.list_parts().await?;
        let alerts = self.storage.list_alerts().await?;
        Ok(aggregate(&vehicles, &parts, &alerts))
    }
}

pub struct ChatController {
    storage: Arc<dyn Storage>,
    service: ChatService,
}

impl ChatController {
    pub fn new(storage: Arc<dyn Storage>, rules: ValidationRules) -> Self {
        Self {
            storage,
            service: ChatService::new(rules),
        }
    }

    /// La acción explícita tiene prioridad sobre el mensaje libre
    pub async fn query(&self, query: ChatQuery) -> AppResult<ChatResponse> {
        if query.action.is_none() && query.trimmed_message().is_none() {
            return Err(AppError::BadRequest(
                "A chat query needs a message or an action".to_string(),
            ));
        }

        let snapshot = FleetSnapshot {
            vehicles: self.storage.list_vehicles().await?,
            parts: self.storage.list_parts().await?,
            alerts: self.storage.list_alerts().await?,
            maintenance: self.storage.list_maintenance().await?,
        };
        let now = Utc::now();

        let response = match (query.action, query.trimmed_message()) {
            (Some(action), _) => {
                tracing::debug!("💬 Acción de chat: {:?}", action);
                self.service.respond(action, &snapshot, now)
            }
            (None, message) => {
                let message = message.unwrap_or_default();
                tracing::debug!("💬 Mensaje de chat: {}", message);
                self.service.respond_to_message(message, &snapshot, now)
            }
        };

        Ok(ChatResponse { response })
    }
}
