//! Rutas HTTP
//!
//! Un router por recurso, montados bajo `/api` por `create_app`.

pub mod alert_routes;
pub mod dashboard_routes;
pub mod maintenance_routes;
pub mod part_routes;
pub mod vehicle_routes;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::dto::HealthResponse;
use crate::middleware::cors_layer;
use crate::state::AppState;

/// Router completo de la aplicación con sus capas
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);
    let timeout = TimeoutLayer::new(state.config.request_timeout());

    Router::new()
        .route("/health", get(health))
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/parts", part_routes::create_part_router())
        .nest("/api/maintenance", maintenance_routes::create_maintenance_router())
        .nest("/api/alerts", alert_routes::create_alert_router())
        .nest("/api/dashboard", dashboard_routes::create_dashboard_router())
        .nest("/api/chat", dashboard_routes::create_chat_router())
        .layer(TraceLayer::new_for_http())
        .layer(timeout)
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        storage: state.storage.backend_name().to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
