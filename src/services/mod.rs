//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: clasificación
//! de estados, validación de vehículos, estadísticas y el asistente de chat.
//! Son funciones puras sobre los modelos; la persistencia queda en
//! `repositories` y la orquestación en `controllers`.

pub mod chat_service;
pub mod stats_aggregator;
pub mod status_classifier;
pub mod vehicle_validation;

pub use chat_service::{ChatAction, ChatService, FleetSnapshot};
pub use stats_aggregator::aggregate;
pub use status_classifier::stock_status;
pub use vehicle_validation::{evaluate, FleetValidationSummary, ValidationResult, ValidationRules, VehicleValidation};
