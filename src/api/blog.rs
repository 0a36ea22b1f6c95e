//! Blog API endpoints
//!
//! Public:
//! - GET /api/v1/blog - Published posts, newest first
//! - GET /api/v1/blog/{slug} - One published post
//!
//! Admin:
//! - GET/POST /api/v1/admin/blog
//! - GET/PUT/DELETE /api/v1/admin/blog/{id}
//! - POST /api/v1/admin/blog/{id}/toggle-publish

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{BlogPost, BlogPostInput};

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_published))
        .route("/{slug}", get(get_published))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/{id}", get(get_post).put(update_post).delete(delete_post))
        .route("/{id}/toggle-publish", post(toggle_publish))
}

async fn list_published(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, ApiError> {
    Ok(Json(state.blog_service.list_published().await?))
}

async fn get_published(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    Ok(Json(state.blog_service.get_published(&slug).await?))
}

async fn list_posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, ApiError> {
    Ok(Json(state.blog_service.list().await?))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BlogPost>, ApiError> {
    Ok(Json(state.blog_service.get(id).await?))
}

async fn create_post(
    State(state): State<AppState>,
    Json(input): Json<BlogPostInput>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.blog_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<BlogPostInput>,
) -> Result<Json<BlogPost>, ApiError> {
    Ok(Json(state.blog_service.update(id, input).await?))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.blog_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_publish(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BlogPost>, ApiError> {
    Ok(Json(state.blog_service.toggle_publish(id).await?))
}
