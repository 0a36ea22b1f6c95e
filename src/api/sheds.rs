//! Shed catalog API endpoints
//!
//! Public:
//! - GET /api/v1/sheds - Active listings filtered by facet query parameters
//! - GET /api/v1/sheds/{id} - One active listing
//! - GET /api/v1/sheds/{id}/quote-draft - Quote form prefilled from a listing
//!
//! Admin:
//! - GET/POST /api/v1/admin/sheds
//! - GET/PUT/DELETE /api/v1/admin/sheds/{id}
//! - POST /api/v1/admin/sheds/{id}/toggle-active

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{HomeContent, QuoteRequestInput, ShedInput, ShedListing, SHEDS_HERO_SECTION};
use crate::services::catalog::facet_values;
use crate::services::{FacetValues, ShedFilter};

/// Catalog page payload
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub sheds: Vec<ShedListing>,
    /// Options for each facet, drawn from every active listing
    pub facets: FacetValues,
    pub filter: ShedFilter,
    pub hero: Option<HomeContent>,
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_catalog))
        .route("/{id}", get(get_active_shed))
        .route("/{id}/quote-draft", get(get_quote_draft))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sheds).post(create_shed))
        .route("/{id}", get(get_shed).put(update_shed).delete(delete_shed))
        .route("/{id}/toggle-active", post(toggle_active))
}

/// GET /api/v1/sheds
async fn list_catalog(
    State(state): State<AppState>,
    Query(filter): Query<ShedFilter>,
) -> Result<Json<CatalogResponse>, ApiError> {
    let (active, hero) = futures::try_join!(
        state.shed_service.list_active(),
        state.home_content_service.get_section(SHEDS_HERO_SECTION),
    )?;

    Ok(Json(CatalogResponse {
        facets: facet_values(&active),
        sheds: filter.apply(&active),
        filter,
        hero,
    }))
}

/// GET /api/v1/sheds/{id}
async fn get_active_shed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ShedListing>, ApiError> {
    Ok(Json(state.shed_service.get_active(id).await?))
}

/// GET /api/v1/sheds/{id}/quote-draft
async fn get_quote_draft(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuoteRequestInput>, ApiError> {
    Ok(Json(state.shed_service.quote_draft(id).await?))
}

async fn list_sheds(State(state): State<AppState>) -> Result<Json<Vec<ShedListing>>, ApiError> {
    Ok(Json(state.shed_service.list().await?))
}

async fn get_shed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ShedListing>, ApiError> {
    Ok(Json(state.shed_service.get(id).await?))
}

async fn create_shed(
    State(state): State<AppState>,
    Json(input): Json<ShedInput>,
) -> Result<impl IntoResponse, ApiError> {
    let shed = state.shed_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(shed)))
}

async fn update_shed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ShedInput>,
) -> Result<Json<ShedListing>, ApiError> {
    Ok(Json(state.shed_service.update(id, input).await?))
}

async fn delete_shed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.shed_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn toggle_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ShedListing>, ApiError> {
    Ok(Json(state.shed_service.toggle_active(id).await?))
}
