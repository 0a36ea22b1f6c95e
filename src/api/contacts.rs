//! Contact submission API endpoints
//!
//! Public:
//! - POST /api/v1/contact
//!
//! Admin:
//! - GET /api/v1/admin/contacts?status= - Submissions plus per-status counts
//! - GET/DELETE /api/v1/admin/contacts/{id}
//! - PUT /api/v1/admin/contacts/{id}/status
//! - GET /api/v1/admin/contacts/export - CSV download

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::quotes::{StatusBody, StatusQuery};
use crate::api::responses::Attachment;
use crate::models::{ContactInput, ContactSubmission};
use crate::services::contact::parse_status;
use crate::services::ContactCounts;

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub contacts: Vec<ContactSubmission>,
    pub counts: ContactCounts,
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(submit_contact))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts))
        .route("/export", get(export_contacts))
        .route("/{id}", get(get_contact).delete(delete_contact))
        .route("/{id}/status", put(update_status))
}

/// POST /api/v1/contact
async fn submit_contact(
    State(state): State<AppState>,
    Json(input): Json<ContactInput>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = state.contact_service.submit(input).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ContactListResponse>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty() && *s != "all") {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };
    let (contacts, counts) = futures::try_join!(
        state.contact_service.list(status),
        state.contact_service.counts(),
    )?;
    Ok(Json(ContactListResponse { contacts, counts }))
}

async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContactSubmission>, ApiError> {
    Ok(Json(state.contact_service.get(id).await?))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<StatusBody>,
) -> Result<Json<ContactSubmission>, ApiError> {
    let status = parse_status(&body.status)?;
    Ok(Json(state.contact_service.update_status(id, status).await?))
}

async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.contact_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn export_contacts(State(state): State<AppState>) -> Result<Attachment, ApiError> {
    let export = state.contact_service.export_csv().await?;
    Ok(Attachment::csv(export.file_name, export.body))
}
