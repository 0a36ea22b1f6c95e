//! Past project API endpoints
//!
//! - GET /api/v1/projects/{id} - One project, linked from the sitemap
//! - GET/POST /api/v1/admin/projects
//! - GET/PUT/DELETE /api/v1/admin/projects/{id}
//! - POST /api/v1/admin/projects/{id}/toggle-featured

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{PastProject, ProjectInput};

pub fn public_router() -> Router<AppState> {
    Router::new().route("/{id}", get(get_project))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects).post(create_project))
        .route("/{id}", get(get_project).put(update_project).delete(delete_project))
        .route("/{id}/toggle-featured", post(toggle_featured))
}

async fn list_projects(State(state): State<AppState>) -> Result<Json<Vec<PastProject>>, ApiError> {
    Ok(Json(state.project_service.list().await?))
}

async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PastProject>, ApiError> {
    Ok(Json(state.project_service.get(id).await?))
}

async fn create_project(
    State(state): State<AppState>,
    Json(input): Json<ProjectInput>,
) -> Result<impl IntoResponse, ApiError> {
    let project = state.project_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ProjectInput>,
) -> Result<Json<PastProject>, ApiError> {
    Ok(Json(state.project_service.update(id, input).await?))
}

async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.project_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_featured(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PastProject>, ApiError> {
    Ok(Json(state.project_service.toggle_featured(id).await?))
}
