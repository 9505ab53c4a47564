//! Fleet Manager
//!
//! Backend de gestión de flota: vehículos, piezas de recambio, mantenimiento
//! y alertas, con validación de estado, estadísticas y un asistente de chat.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app;
pub use state::AppState;
