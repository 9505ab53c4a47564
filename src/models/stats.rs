//! Modelos de estadísticas
//!
//! Resumen que consume el dashboard. Se calcula en `services::stats_aggregator`.

use serde::{Deserialize, Serialize};

/// Resumen para dashboard
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    // Resumen de vehículos
    pub total_vehicles: usize,
    pub operational: usize,
    pub maintenance_due: usize,
    pub in_repair: usize,

    // Resumen de piezas
    pub total_parts: usize,
    pub parts_in_stock: usize,
    pub parts_low_stock: usize,
    pub parts_out_of_stock: usize,

    // Alertas
    pub unread_alerts: usize,
}
