//! Dashboard API endpoint (admin)
//!
//! - GET /api/v1/admin/dashboard

use axum::{extract::State, routing::get, Json, Router};

use crate::api::middleware::{ApiError, AppState};
use crate::services::DashboardStats;

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/", get(get_stats))
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    Ok(Json(state.dashboard_service.stats().await?))
}
