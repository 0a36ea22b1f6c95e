//! Review API endpoints (admin)
//!
//! - GET/POST /api/v1/admin/reviews
//! - GET/PUT/DELETE /api/v1/admin/reviews/{id}
//! - POST /api/v1/admin/reviews/{id}/toggle/{field} - `is_featured` or `is_approved`

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{Review, ReviewFlag, ReviewInput};
use crate::services::ContentError;

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reviews).post(create_review))
        .route("/{id}", get(get_review).put(update_review).delete(delete_review))
        .route("/{id}/toggle/{field}", post(toggle_flag))
}

async fn list_reviews(State(state): State<AppState>) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.review_service.list().await?))
}

async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Review>, ApiError> {
    Ok(Json(state.review_service.get(id).await?))
}

async fn create_review(
    State(state): State<AppState>,
    Json(input): Json<ReviewInput>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state.review_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

async fn update_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ReviewInput>,
) -> Result<Json<Review>, ApiError> {
    Ok(Json(state.review_service.update(id, input).await?))
}

async fn delete_review(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.review_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_flag(
    State(state): State<AppState>,
    Path((id, field)): Path<(i64, String)>,
) -> Result<Json<Review>, ApiError> {
    let flag = ReviewFlag::parse(&field).ok_or_else(|| {
        ContentError::invalid("field", "Field must be one of: is_featured, is_approved")
    })?;
    Ok(Json(state.review_service.toggle(id, flag).await?))
}
