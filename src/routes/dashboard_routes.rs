use axum::{extract::State, routing::{get, post}, Json, Router};

use crate::controllers::{ChatController, DashboardController};
use crate::dto::{ChatQuery, ChatResponse};
use crate::models::DashboardStats;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::ApiJson;

pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/stats", get(get_stats))
}

pub fn create_chat_router() -> Router<AppState> {
    Router::new().route("/query", post(chat_query))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, AppError> {
    let stats = DashboardController::new(state.storage.clone()).stats().await?;
    Ok(Json(stats))
}

async fn chat_query(
    State(state): State<AppState>,
    ApiJson(query): ApiJson<ChatQuery>,
) -> Result<Json<ChatResponse>, AppError> {
    let response = ChatController::new(state.storage.clone(), state.rules())
        .query(query)
        .await?;
    Ok(Json(response))
}
