//! Video carousel API endpoints (admin)
//!
//! - GET/POST /api/v1/admin/videos
//! - GET/PUT/DELETE /api/v1/admin/videos/{id}
//! - POST /api/v1/admin/videos/{id}/toggle-active

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{VideoCarouselEntry, VideoInput};

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_videos).post(create_video))
        .route("/{id}", get(get_video).put(update_video).delete(delete_video))
        .route("/{id}/toggle-active", post(toggle_active))
}

async fn list_videos(
    State(state): State<AppState>,
) -> Result<Json<Vec<VideoCarouselEntry>>, ApiError> {
    Ok(Json(state.video_service.list().await?))
}

async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VideoCarouselEntry>, ApiError> {
    Ok(Json(state.video_service.get(id).await?))
}

async fn create_video(
    State(state): State<AppState>,
    Json(input): Json<VideoInput>,
) -> Result<impl IntoResponse, ApiError> {
    let video = state.video_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(video)))
}

async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<VideoInput>,
) -> Result<Json<VideoCarouselEntry>, ApiError> {
    Ok(Json(state.video_service.update(id, input).await?))
}

async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.video_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<VideoCarouselEntry>, ApiError> {
    Ok(Json(state.video_service.toggle_active(id).await?))
}
