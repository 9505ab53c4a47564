use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::controllers::VehicleController;
use crate::dto::ApiResponse;
use crate::models::{
    Alert, CreateVehicleRequest, MaintenanceRecord, UpdateVehicleRequest, Vehicle, VehicleFilters,
    VehicleWithAlerts,
};
use crate::services::{FleetValidationSummary, VehicleValidation};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::ApiJson;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/validate-all", post(validate_all_vehicles))
        .route(
            "/:id",
            get(get_vehicle)
                .patch(update_vehicle)
                .put(update_vehicle)
                .delete(delete_vehicle),
        )
        .route("/:id/maintenance", get(get_vehicle_maintenance))
        .route("/:id/alerts", get(get_vehicle_alerts))
        .route("/:id/validate", post(validate_vehicle))
}

fn controller(state: &AppState) -> VehicleController {
    VehicleController::new(state.storage.clone(), state.rules())
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(filters): Query<VehicleFilters>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = controller(&state).list(&filters).await?;
    Ok(Json(vehicles))
}

async fn create_vehicle(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Vehicle>>), AppError> {
    let response = controller(&state).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VehicleWithAlerts>, AppError> {
    let vehicle = controller(&state).get(id).await?;
    Ok(Json(vehicle))
}

async fn update_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateVehicleRequest>,
) -> Result<Json<ApiResponse<Vehicle>>, AppError> {
    let response = controller(&state).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = controller(&state).delete(id).await?;
    Ok(Json(response))
}

async fn get_vehicle_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<MaintenanceRecord>>, AppError> {
    let history = controller(&state).maintenance_history(id).await?;
    Ok(Json(history))
}

async fn get_vehicle_alerts(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Alert>>, AppError> {
    let alerts = controller(&state).alerts(id).await?;
    Ok(Json(alerts))
}

async fn validate_vehicle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<VehicleValidation>>, AppError> {
    let response = controller(&state).validate_one(id).await?;
    Ok(Json(response))
}

async fn validate_all_vehicles(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FleetValidationSummary>>, AppError> {
    let response = controller(&state).validate_all().await?;
    Ok(Json(response))
}
