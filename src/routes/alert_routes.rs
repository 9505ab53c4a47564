use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, patch},
    Json, Router,
};

use crate::controllers::AlertController;
use crate::dto::ApiResponse;
use crate::models::{Alert, AlertFilters, CreateAlertRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::ApiJson;

pub fn create_alert_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_alerts).post(create_alert))
        .route("/:id", delete(delete_alert))
        .route("/:id/read", patch(mark_alert_read))
}

async fn list_alerts(
    State(state): State<AppState>,
    Query(filters): Query<AlertFilters>,
) -> Result<Json<Vec<Alert>>, AppError> {
    let alerts = AlertController::new(state.storage.clone()).list(&filters).await?;
    Ok(Json(alerts))
}

async fn create_alert(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateAlertRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Alert>>), AppError> {
    let response = AlertController::new(state.storage.clone()).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn mark_alert_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = AlertController::new(state.storage.clone()).mark_read(id).await?;
    Ok(Json(response))
}

async fn delete_alert(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = AlertController::new(state.storage.clone()).delete(id).await?;
    Ok(Json(response))
}
