use serde::{Deserialize, Serialize};

use crate::services::ChatAction;

// Request del asistente: mensaje libre o acción rápida
#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    pub message: Option<String>,
    pub action: Option<ChatAction>,
}

impl ChatQuery {
    /// Mensaje sin espacios sobrantes, `None` si está vacío
    pub fn trimmed_message(&self) -> Option<&str> {
        self.message.as_deref().map(str::trim).filter(|m| !m.is_empty())
    }
}

// Response del asistente
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}
