//! Agregación de estadísticas del dashboard

use crate::models::{Alert, DashboardStats, Part, StockStatus, Vehicle, VehicleStatus};

/// Plegar vehículos, piezas y alertas en el resumen del dashboard.
///
/// Los contadores por estado usan el mismo clasificador que el resto de la API,
/// así que siempre suman el total correspondiente.
pub fn aggregate(vehicles: &[Vehicle], parts: &[Part], alerts: &[Alert]) -> DashboardStats {
    let mut stats = DashboardStats {
        total_vehicles: vehicles.len(),
        total_parts: parts.len(),
        ..Default::default()
    };

    for vehicle in vehicles {
        match vehicle.status {
            VehicleStatus::Operational => stats.operational += 1,
            VehicleStatus::MaintenanceDue => stats.maintenance_due += 1,
            VehicleStatus::InRepair => stats.in_repair += 1,
        }
    }

    for part in parts {
        match part.stock_status() {
            StockStatus::InStock => stats.parts_in_stock += 1,
            StockStatus::LowStock => stats.parts_low_stock += 1,
            StockStatus::OutOfStock => stats.parts_out_of_stock += 1,
        }
    }

    stats.unread_alerts = alerts.iter().filter(|a| !a.is_read).count();

    stats
}
