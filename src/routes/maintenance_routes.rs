use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::MaintenanceController;
use crate::dto::ApiResponse;
use crate::models::{
    CreateMaintenanceRequest, CreatePartUsageRequest, MaintenanceRecord, MaintenanceWithParts, PartUsage,
    PartUsageWithPart, UpdateMaintenanceRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::ApiJson;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_maintenance).post(create_maintenance))
        .route(
            "/:id",
            get(get_maintenance)
                .patch(update_maintenance)
                .put(update_maintenance)
                .delete(delete_maintenance),
        )
        .route("/:id/parts", get(list_maintenance_parts).post(add_maintenance_part))
}

async fn list_maintenance(
    State(state): State<AppState>,
) -> Result<Json<Vec<MaintenanceWithParts>>, AppError> {
    let records = MaintenanceController::new(state.storage.clone()).list().await?;
    Ok(Json(records))
}

async fn create_maintenance(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateMaintenanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<MaintenanceWithParts>>), AppError> {
    let response = MaintenanceController::new(state.storage.clone()).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MaintenanceWithParts>, AppError> {
    let record = MaintenanceController::new(state.storage.clone()).get(id).await?;
    Ok(Json(record))
}

async fn update_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let response = MaintenanceController::new(state.storage.clone()).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = MaintenanceController::new(state.storage.clone()).delete(id).await?;
    Ok(Json(response))
}

async fn list_maintenance_parts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<PartUsageWithPart>>, AppError> {
    let parts = MaintenanceController::new(state.storage.clone()).list_parts(id).await?;
    Ok(Json(parts))
}

async fn add_maintenance_part(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<CreatePartUsageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PartUsage>>), AppError> {
    let response = MaintenanceController::new(state.storage.clone()).add_part(id, request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
