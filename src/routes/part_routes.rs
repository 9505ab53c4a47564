use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::controllers::PartController;
use crate::dto::ApiResponse;
use crate::models::{CreatePartRequest, Part, PartFilters, PartWithStatus, UpdatePartRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::ApiJson;

pub fn create_part_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_parts).post(create_part))
        .route(
            "/:id",
            get(get_part).patch(update_part).put(update_part).delete(delete_part),
        )
}

async fn list_parts(
    State(state): State<AppState>,
    Query(filters): Query<PartFilters>,
) -> Result<Json<Vec<PartWithStatus>>, AppError> {
    let parts = PartController::new(state.storage.clone()).list(&filters).await?;
    Ok(Json(parts))
}

async fn create_part(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePartRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Part>>), AppError> {
    let response = PartController::new(state.storage.clone()).create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_part(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PartWithStatus>, AppError> {
    let part = PartController::new(state.storage.clone()).get(id).await?;
    Ok(Json(part))
}

async fn update_part(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdatePartRequest>,
) -> Result<Json<ApiResponse<Part>>, AppError> {
    let response = PartController::new(state.storage.clone()).update(id, request).await?;
    Ok(Json(response))
}

async fn delete_part(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let response = PartController::new(state.storage.clone()).delete(id).await?;
    Ok(Json(response))
}
