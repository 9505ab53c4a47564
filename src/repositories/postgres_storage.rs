//! Almacenamiento en PostgreSQL
//!
//! Consultas en runtime con `sqlx::query_as`. Los enums se guardan como TEXT.
//! No hay claves foráneas en el esquema: la existencia del padre se comprueba
//! aquí antes de insertar.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use super::Storage;
use crate::models::{
    Alert, CreateAlertRequest, CreateMaintenanceRequest, CreatePartRequest, CreatePartUsageRequest,
    CreateVehicleRequest, MaintenanceRecord, Part, PartUsage, UpdateMaintenanceRequest,
    UpdatePartRequest, UpdateVehicleRequest, Vehicle,
};
use crate::utils::errors::{map_unique_violation, missing_parent_error, AppResult};

#[derive(Debug, Clone, Copy)]
enum Table {
    Vehicles,
    Parts,
    MaintenanceRecords,
    Alerts,
}

impl Table {
    fn name(&self) -> &'static str {
        match self {
            Table::Vehicles => "vehicles",
            Table::Parts => "parts",
            Table::MaintenanceRecords => "maintenance_records",
            Table::Alerts => "alerts",
        }
    }
}

pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn row_exists(&self, table: Table, id: i64) -> AppResult<bool> {
        let query = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table.name());
        let result: (bool,) = sqlx::query_as(&query).bind(id).fetch_one(&self.pool).await?;
        Ok(result.0)
    }

    async fn delete_row(&self, table: Table, id: i64) -> AppResult<bool> {
        let query = format!("DELETE FROM {} WHERE id = $1", table.name());
        let result = sqlx::query(&query).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Storage for PgStorage {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    // ---- Vehicles ----

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(vehicles)
    }

    async fn get_vehicle(&self, id: i64) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(vehicle)
    }

    async fn create_vehicle(&self, request: &CreateVehicleRequest) -> AppResult<Vehicle> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (plate, make, model, year, vehicle_type, mileage, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&request.plate)
        .bind(&request.make)
        .bind(&request.model)
        .bind(request.year)
        .bind(&request.vehicle_type)
        .bind(request.mileage)
        .bind(request.status.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Vehicle", "plate", &request.plate))?;

        Ok(vehicle)
    }

    async fn update_vehicle(&self, id: i64, changes: &UpdateVehicleRequest) -> AppResult<Option<Vehicle>> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                plate = COALESCE($2, plate),
                make = COALESCE($3, make),
                model = COALESCE($4, model),
                year = COALESCE($5, year),
                vehicle_type = COALESCE($6, vehicle_type),
                mileage = COALESCE($7, mileage),
                status = COALESCE($8, status)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.plate)
        .bind(&changes.make)
        .bind(&changes.model)
        .bind(changes.year)
        .bind(&changes.vehicle_type)
        .bind(changes.mileage)
        .bind(changes.status.map(|s| s.as_str()))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            let plate = changes.plate.as_deref().unwrap_or_default();
            map_unique_violation(e, "Vehicle", "plate", plate)
        })?;

        Ok(vehicle)
    }

    async fn delete_vehicle(&self, id: i64) -> AppResult<bool> {
        self.delete_row(Table::Vehicles, id).await
    }

    // ---- Parts ----

    async fn list_parts(&self) -> AppResult<Vec<Part>> {
        let parts = sqlx::query_as::<_, Part>("SELECT * FROM parts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(parts)
    }

    async fn get_part(&self, id: i64) -> AppResult<Option<Part>> {
        let part = sqlx::query_as::<_, Part>("SELECT * FROM parts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(part)
    }

    async fn create_part(&self, request: &CreatePartRequest) -> AppResult<Part> {
        let part = sqlx::query_as::<_, Part>(
            r#"
            INSERT INTO parts (name, reference, category, stock, min_stock, unit_price, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&request.name)
        .bind(&request.reference)
        .bind(&request.category)
        .bind(request.stock)
        .bind(request.min_stock)
        .bind(request.unit_price)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "Part", "reference", &request.reference))?;

        Ok(part)
    }

    async fn update_part(&self, id: i64, changes: &UpdatePartRequest) -> AppResult<Option<Part>> {
        let part = sqlx::query_as::<_, Part>(
            r#"
            UPDATE parts SET
                name = COALESCE($2, name),
                reference = COALESCE($3, reference),
                category = COALESCE($4, category),
                stock = COALESCE($5, stock),
                min_stock = COALESCE($6, min_stock),
                unit_price = COALESCE($7, unit_price)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.reference)
        .bind(&changes.category)
        .bind(changes.stock)
        .bind(changes.min_stock)
        .bind(changes.unit_price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            let reference = changes.reference.as_deref().unwrap_or_default();
            map_unique_violation(e, "Part", "reference", reference)
        })?;

        Ok(part)
    }

    async fn delete_part(&self, id: i64) -> AppResult<bool> {
        self.delete_row(Table::Parts, id).await
    }

    // ---- Maintenance ----

    async fn list_maintenance(&self) -> AppResult<Vec<MaintenanceRecord>> {
        let records = sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(records)
    }

    async fn get_maintenance(&self, id: i64) -> AppResult<Option<MaintenanceRecord>> {
        let record = sqlx::query_as::<_, MaintenanceRecord>("SELECT * FROM maintenance_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn list_maintenance_by_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<MaintenanceRecord>> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT * FROM maintenance_records WHERE vehicle_id = $1 ORDER BY id",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn create_maintenance_with_parts(
        &self,
        request: &CreateMaintenanceRequest,
    ) -> AppResult<MaintenanceRecord> {
        let mut tx = self.pool.begin().await?;

        // FOR SHARE: un DELETE concurrente del padre espera al commit
        let vehicle: Option<(i64,)> = sqlx::query_as("SELECT id FROM vehicles WHERE id = $1 FOR SHARE")
            .bind(request.vehicle_id)
            .fetch_optional(&mut *tx)
            .await?;
        if vehicle.is_none() {
            return Err(missing_parent_error("vehicle", request.vehicle_id));
        }

        let part_ids: Vec<i64> = request.parts_used.iter().map(|usage| usage.part_id).collect();
        let found: Vec<(i64,)> = sqlx::query_as("SELECT id FROM parts WHERE id = ANY($1) FOR SHARE")
            .bind(&part_ids[..])
            .fetch_all(&mut *tx)
            .await?;
        if let Some(missing) = part_ids.iter().find(|id| !found.iter().any(|(found_id,)| found_id == *id)) {
            return Err(missing_parent_error("part", *missing));
        }

        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            INSERT INTO maintenance_records (
                vehicle_id, maintenance_type, description, cost, duration,
                technician, completed_at, next_due
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(request.vehicle_id)
        .bind(&request.maintenance_type)
        .bind(&request.description)
        .bind(request.cost)
        .bind(request.duration)
        .bind(&request.technician)
        .bind(request.completed_at.unwrap_or_else(Utc::now))
        .bind(request.next_due)
        .fetch_one(&mut *tx)
        .await?;

        for usage in &request.parts_used {
            sqlx::query("INSERT INTO part_usage (maintenance_id, part_id, quantity) VALUES ($1, $2, $3)")
                .bind(record.id)
                .bind(usage.part_id)
                .bind(usage.quantity)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(record)
    }

    async fn update_maintenance(
        &self,
        id: i64,
        changes: &UpdateMaintenanceRequest,
    ) -> AppResult<Option<MaintenanceRecord>> {
        if let Some(vehicle_id) = changes.vehicle_id {
            if !self.row_exists(Table::Vehicles, vehicle_id).await? {
                // Un id de registro inexistente sigue siendo `None`, no un 400
                if !self.row_exists(Table::MaintenanceRecords, id).await? {
                    return Ok(None);
                }
                return Err(missing_parent_error("vehicle", vehicle_id));
            }
        }

        let record = sqlx::query_as::<_, MaintenanceRecord>(
            r#"
            UPDATE maintenance_records SET
                vehicle_id = COALESCE($2, vehicle_id),
                maintenance_type = COALESCE($3, maintenance_type),
                description = COALESCE($4, description),
                cost = COALESCE($5, cost),
                duration = COALESCE($6, duration),
                technician = COALESCE($7, technician),
                completed_at = COALESCE($8, completed_at),
                next_due = COALESCE($9, next_due)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(changes.vehicle_id)
        .bind(&changes.maintenance_type)
        .bind(&changes.description)
        .bind(changes.cost)
        .bind(changes.duration)
        .bind(&changes.technician)
        .bind(changes.completed_at)
        .bind(changes.next_due)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn delete_maintenance(&self, id: i64) -> AppResult<bool> {
        self.delete_row(Table::MaintenanceRecords, id).await
    }

    // ---- Part usage ----

    async fn list_part_usage(&self, maintenance_id: i64) -> AppResult<Vec<PartUsage>> {
        let usages = sqlx::query_as::<_, PartUsage>(
            "SELECT * FROM part_usage WHERE maintenance_id = $1 ORDER BY id",
        )
        .bind(maintenance_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(usages)
    }

    async fn create_part_usage(
        &self,
        maintenance_id: i64,
        request: &CreatePartUsageRequest,
    ) -> AppResult<PartUsage> {
        if !self.row_exists(Table::MaintenanceRecords, maintenance_id).await? {
            return Err(missing_parent_error("maintenance record", maintenance_id));
        }
        if !self.row_exists(Table::Parts, request.part_id).await? {
            return Err(missing_parent_error("part", request.part_id));
        }

        let usage = sqlx::query_as::<_, PartUsage>(
            r#"
            INSERT INTO part_usage (maintenance_id, part_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(maintenance_id)
        .bind(request.part_id)
        .bind(request.quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(usage)
    }

    // ---- Alerts ----

    async fn list_alerts(&self) -> AppResult<Vec<Alert>> {
        let alerts = sqlx::query_as::<_, Alert>("SELECT * FROM alerts ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(alerts)
    }

    async fn get_alert(&self, id: i64) -> AppResult<Option<Alert>> {
        let alert = sqlx::query_as::<_, Alert>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(alert)
    }

    async fn list_alerts_by_vehicle(&self, vehicle_id: i64) -> AppResult<Vec<Alert>> {
        let alerts = sqlx::query_as::<_, Alert>("SELECT * FROM alerts WHERE vehicle_id = $1 ORDER BY id")
            .bind(vehicle_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(alerts)
    }

    async fn create_alert(&self, request: &CreateAlertRequest) -> AppResult<Alert> {
        if !self.row_exists(Table::Vehicles, request.vehicle_id).await? {
            return Err(missing_parent_error("vehicle", request.vehicle_id));
        }

        let alert = sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (vehicle_id, alert_type, message, priority, is_read, created_at)
            VALUES ($1, $2, $3, $4, FALSE, $5)
            RETURNING *
            "#,
        )
        .bind(request.vehicle_id)
        .bind(&request.alert_type)
        .bind(&request.message)
        .bind(request.priority.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(alert)
    }

    async fn mark_alert_read(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("UPDATE alerts SET is_read = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_alert(&self, id: i64) -> AppResult<bool> {
        self.delete_row(Table::Alerts, id).await
    }
}
