//! Home page content API endpoints (admin)
//!
//! - GET /api/v1/admin/home-content - All sections
//! - GET/PUT /api/v1/admin/home-content/{section}

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{HomeContent, HomeContentInput};

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sections))
        .route("/{section}", get(get_section).put(save_section))
}

async fn list_sections(State(state): State<AppState>) -> Result<Json<Vec<HomeContent>>, ApiError> {
    Ok(Json(state.home_content_service.list().await?))
}

async fn get_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<HomeContent>, ApiError> {
    state
        .home_content_service
        .get_section(&section)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("Home section '{}' not found", section)))
}

async fn save_section(
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(input): Json<HomeContentInput>,
) -> Result<Json<HomeContent>, ApiError> {
    Ok(Json(state.home_content_service.save_section(&section, input).await?))
}
