//! Controladores
//!
//! Orquestan repositorios y servicios para cada grupo de endpoints.

pub mod alert_controller;
pub mod dashboard_controller;
pub mod maintenance_controller;
pub mod part_controller;
pub mod vehicle_controller;

pub use alert_controller::AlertController;
pub use dashboard_controller::{ChatController, DashboardController};
pub use maintenance_controller::MaintenanceController;
pub use part_controller::PartController;
pub use vehicle_controller::VehicleController;
