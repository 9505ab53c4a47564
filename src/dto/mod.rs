//! DTOs de la API
//!
//! Envoltorios de respuesta y cuerpos que no son entidades del dominio.

pub mod api_response;
pub mod chat_dto;

pub use api_response::{ApiResponse, HealthResponse};
pub use chat_dto::{ChatQuery, ChatResponse};
