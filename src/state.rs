//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{MemStorage, Storage};
use crate::services::ValidationRules;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub config: EnvironmentConfig,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, config: EnvironmentConfig) -> Self {
        Self { storage, config }
    }

    /// Estado con almacenamiento en memoria vacío
    pub fn in_memory(config: EnvironmentConfig) -> Self {
        Self::new(Arc::new(MemStorage::new()), config)
    }

    pub fn rules(&self) -> ValidationRules {
        self.config.validation_rules()
    }
}
