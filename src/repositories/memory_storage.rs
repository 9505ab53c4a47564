//! Almacenamiento en memoria
//!
//! Un `BTreeMap` por tabla con su contador de ids, todo detrás de un único
//! `RwLock` para que cada operación sea atómica.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::Storage;
use crate::models::{
    Alert, CreateAlertRequest, CreateMaintenanceRequest, CreatePartRequest, CreatePartUsageRequest,
    CreateVehicleRequest, MaintenanceRecord, Part, PartUsage, UpdateMaintenanceRequest,
    UpdatePartRequest, UpdateVehicleRequest, Vehicle,
};
use crate::utils::errors::{conflict_error, missing_parent_error, AppResult};

/// Tabla en memoria con ids autoincrementales que empiezan en 1
#[derive(Debug)]
struct Table<T> {
    rows: BTreeMap<i64, T>,
    next_id: i64,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn all(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    fn filtered(&self, predicate: impl Fn(&T) -> bool) -> Vec<T> {
        self.rows.values().filter(|row| predicate(row)).cloned().collect()
    }
}

#[derive(Debug)]
struct Tables {
    vehicles: Table<Vehicle>,
    parts: Table<Part>,
    maintenance: Table<MaintenanceRecord>,
    part_usage: Table<PartUsage>,
    alerts: Table<Alert>,
}

pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                vehicles: Table::new(),
                parts: Table::new(),
                maintenance: Table::new(),
                part_usage: Table::new(),
                alerts: Table::new(),
            }),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn plate_taken(tables: &Tables, plate: &str, except: Option<i64>) -> bool {
    tables
        .vehicles
        .rows
        .values()
        .any(|v| v.plate == plate && Some(v.id) != except)
}

fn reference_taken(tables: &Tables, reference: &str, except: Option<i64>) -> bool {
    tables
        .parts
        .rows
        .values()
        .any(|p| p.reference == reference && Some(p.id) != except)
}

#[async_trait]
impl Storage for MemStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    // ---- Vehicles ----

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        Ok(self.tables.read().await.vehicles.all())
    }

    async fn get_vehicle(&self, id: i64) -> AppResult<Option<Vehicle>> {
        Ok(self.tables.read().await.vehicles.rows.get(&id).cloned())
    }

    async fn create_vehicle(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle> {
        let mut tables = self.tables.write().await;

        if plate_taken(&tables, &request.plate, None) {
            return Err(conflict_error("Vehicle", "plate", &request.plate));
        }

        let id = tables.vehicles.allocate_id();
        let vehicle = Vehicle {
            id,
            plate: request.plate.clone(),
            make: request.make.clone(),
            model: request.model.clone(),
            year: request.year,
            vehicle_type: request.vehicle_type.clone(),
            mileage: request.mileage,
            status: request.status,
            created_at: Utc::now(),
        };
        tables.vehicles.rows.insert(id, vehicle.clone());
        Ok(vehicle)
    }

    async fn update_vehicle(&self, id: i64, changes: &UpdateVehicleRequest) -> AppResult<Option<Vehicle>> {
        let mut tables = self.tables.write().await;

        if !tables.vehicles.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(plate) = &changes.plate {
            if plate_taken(&tables, plate, Some(id)) {
                return Err(conflict_error("Vehicle", "plate", plate));
            }
        }

        Ok(tables.vehicles.rows.get_mut(&id).map(|vehicle| {
            changes.apply_to(vehicle);
            vehicle.clone()
        }))
    }

    async fn delete_vehicle(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.vehicles.rows.remove(&id).is_some())
    }

    // ---- Parts ----

    async fn list_parts(&self) -> AppResult<Vec<Part>> {
        Ok(self.tables.read().await.parts.all())
    }

    async fn get_part(&self, id: i64) -> AppResult<Option<Part>> {
        Ok(self.tables.read().await.parts.rows.get(&id).cloned())
    }

    async fn create_part(&self, request: &CreatePartRequest) -> AppResult<Part> {
        let mut tables = self.tables.write().await;

        if reference_taken(&tables, &request.reference, None) {
            return Err(conflict_error("Part", "reference", &request.reference));
        }

        let id = tables.parts.allocate_id();
        let part = Part {
            id,
            name: request.name.clone(),
            reference: request.reference.clone(),
            category: request.category.clone(),
            stock: request.stock,
            min_stock: request.min_stock,
            unit_price: request.unit_price,
            created_at: Utc::now(),
        };
        tables.parts.rows.insert(id, part.clone());
        Ok(part)
    }

    async fn update_part(&self, id: i64, changes: &UpdatePartRequest) -> AppResult<Option<Part>> {
        let mut tables = self.tables.write().await;

        if !tables.parts.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(reference) = &changes.reference {
            if reference_taken(&tables, reference, Some(id)) {
                return Err(conflict_error("Part", "reference", reference));
            }
        }

        Ok(tables.parts.rows.get_mut(&id).map(|part| {
            changes.apply_to(part);
            part.clone()
        }))
    }

    async fn delete_part(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.parts.rows.remove(&id).is_some())
    }

    // ---- Maintenance ----

    async fn list_maintenance(&self) -> AppResult<Vec<MaintenanceRecord>> {
        Ok(self.tables.read().await.maintenance.all())
    }

    async fn get_maintenance(&self, id: i64) -> AppResult<Option<MaintenanceRecord>> {
        Ok(self.tables.read().await.maintenance.rows.get(&id).cloned())
    }

    async fn list_maintenance_by_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<MaintenanceRecord>> {
        Ok(self
            .tables
            .read()
            .await
            .maintenance
            .filtered(|m| m.vehicle_id == vehicle_id))
    }

    async fn create_maintenance_with_parts(
        &self,
        request: &CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRecord> {
        let mut tables = self.tables.write().await;

        if !tables.vehicles.rows.contains_key(&request.vehicle_id) {
            return Err(missing_parent_error("vehicle", request.vehicle_id));
        }
        if let Some(missing) = request
            .parts_used
            .iter()
            .find(|usage| !tables.parts.rows.contains_key(&usage.part_id))
        {
            return Err(missing_parent_error("part", missing.part_id));
        }

        let id = tables.maintenance.allocate_id();
        let record = MaintenanceRecord {
            id,
            vehicle_id: request.vehicle_id,
            maintenance_type: request.maintenance_type.clone(),
            description: request.description.clone(),
            cost: request.cost,
            duration: request.duration,
            technician: request.technician.clone(),
            completed_at: Some(request.completed_at.unwrap_or_else(Utc::now)),
            next_due: request.next_due,
        };
        tables.maintenance.rows.insert(id, record.clone());

        for usage in &request.parts_used {
            let usage_id = tables.part_usage.allocate_id();
            tables.part_usage.rows.insert(
                usage_id,
                PartUsage {
                    id: usage_id,
                    maintenance_id: id,
                    part_id: usage.part_id,
                    quantity: usage.quantity,
                },
            );
        }
        Ok(record)
    }

    async fn update_maintenance(
        &self,
        id: i64,
        changes: &UpdateMaintenanceRequest,
    ) -> AppResult<Option<MaintenanceRecord>> {
        let mut tables = self.tables.write().await;

        if !tables.maintenance.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(vehicle_id) = changes.vehicle_id {
            if !tables.vehicles.rows.contains_key(&vehicle_id) {
                return Err(missing_parent_error("vehicle", vehicle_id));
            }
        }

        Ok(tables.maintenance.rows.get_mut(&id).map(|record| {
            changes.apply_to(record);
            record.clone()
        }))
    }

    async fn delete_maintenance(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.maintenance.rows.remove(&id).is_some())
    }

    // ---- Part usage ----

    async fn list_part_usage(&self, maintenance_id: i64) -> AppResult<Vec<PartUsage>> {
        Ok(self
            .tables
            .read()
            .await
            .part_usage
            .filtered(|u| u.maintenance_id == maintenance_id))
    }

    async fn create_part_usage(
        &self,
        maintenance_id: i64,
        request: &CreatePartUsageRequest,
    ) -> AppResult<PartUsage> {
        let mut tables = self.tables.write().await;

        if !tables.maintenance.rows.contains_key(&maintenance_id) {
            return Err(missing_parent_error("maintenance record", maintenance_id));
        }
        if !tables.parts.rows.contains_key(&request.part_id) {
            return Err(missing_parent_error("part", request.part_id));
        }

        let id = tables.part_usage.allocate_id();
        let usage = PartUsage {
            id,
            maintenance_id,
            part_id: request.part_id,
            quantity: request.quantity,
        };
        tables.part_usage.rows.insert(id, usage.clone());
        Ok(usage)
    }

    // ---- Alerts ----

    async fn list_alerts(&self) -> AppResult<Vec<Alert>> {
        Ok(self.tables.read().await.alerts.all())
    }

    async fn get_alert(&self, id: i64) -> AppResult<Option<Alert>> {
        Ok(self.tables.read().await.alerts.rows.get(&id).cloned())
    }

    async fn list_alerts_by_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<Alert>> {
        Ok(self
            .tables
            .read()
            .await
            .alerts
            .filtered(|a| a.vehicle_id == vehicle_id))
    }

    async fn create_alert(&self, request: &CreateAlertRequest) -> AppResult<Alert> {
        let mut tables = self.tables.write().await;

        if !tables.vehicles.rows.contains_key(&request.vehicle_id) {
            return Err(missing_parent_error("vehicle", request.vehicle_id));
        }

        let id = tables.alerts.allocate_id();
        let alert = Alert {
            id,
            vehicle_id: request.vehicle_id,
            alert_type: request.alert_type.clone(),
            message: request.message.clone(),
            priority: request.priority,
            is_read: false,
            created_at: Utc::now(),
        };
        tables.alerts.rows.insert(id, alert.clone());
        Ok(alert)
    }

    async fn mark_alert_read(&self, id: i64) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        match tables.alerts.rows.get_mut(&id) {
            Some(alert) => {
                alert.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_alert(&self, id: i64) -> AppResult<bool> {
        Ok(self.tables.write().await.alerts.rows.remove(&id).is_some())
    }
}
