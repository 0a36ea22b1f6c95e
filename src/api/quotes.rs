//! Quote request API endpoints
//!
//! Public:
//! - POST /api/v1/quotes - Submit a quote request
//! - GET /api/v1/quotes/options - Choices for the quote form
//!
//! Admin:
//! - GET /api/v1/admin/quotes?status= - Requests plus per-status counts
//! - GET/DELETE /api/v1/admin/quotes/{id}
//! - PUT /api/v1/admin/quotes/{id}/status
//! - PUT /api/v1/admin/quotes/{id}/notes
//! - GET /api/v1/admin/quotes/export - CSV download

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::Attachment;
use crate::models::{QuoteRequest, QuoteRequestInput};
use crate::services::quote::{form_options, parse_status};
use crate::services::{QuoteCounts, QuoteFormOptions};

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct NotesBody {
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Serialize)]
pub struct QuoteListResponse {
    pub quotes: Vec<QuoteRequest>,
    pub counts: QuoteCounts,
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit_quote))
        .route("/options", get(get_options))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_quotes))
        .route("/export", get(export_quotes))
        .route("/{id}", get(get_quote).delete(delete_quote))
        .route("/{id}/status", put(update_status))
        .route("/{id}/notes", put(update_notes))
}

/// POST /api/v1/quotes
async fn submit_quote(
    State(state): State<AppState>,
    Json(input): Json<QuoteRequestInput>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = state.quote_service.submit(input).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

/// GET /api/v1/quotes/options
async fn get_options() -> Json<QuoteFormOptions> {
    Json(form_options())
}

async fn list_quotes(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<QuoteListResponse>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };
    let (quotes, counts) = futures::try_join!(
        state.quote_service.list(status),
        state.quote_service.counts(),
    )?;
    Ok(Json(QuoteListResponse { quotes, counts }))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuoteRequest>, ApiError> {
    Ok(Json(state.quote_service.get(id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<StatusBody>,
) -> Result<Json<QuoteRequest>, ApiError> {
    let status = parse_status(&body.status)?;
    Ok(Json(state.quote_service.update_status(id, status).await?))
}

async fn update_notes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NotesBody>,
) -> Result<Json<QuoteRequest>, ApiError> {
    Ok(Json(state.quote_service.update_notes(id, &body.notes).await?))
}

async fn delete_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.quote_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/quotes/export
async fn export_quotes(State(state): State<AppState>) -> Result<Attachment, ApiError> {
    let export = state.quote_service.export_csv().await?;
    Ok(Attachment::csv(export.file_name, export.body))
}
