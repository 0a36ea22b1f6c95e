//! Sitemap endpoints
//!
//! - GET /sitemap.xml - Served at the site root for crawlers
//! - GET /api/v1/admin/sitemap - Download
//! - GET /api/v1/admin/sitemap/stats
//! - POST /api/v1/admin/sitemap/ping - Submit to search engines

use axum::{
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::Attachment;
use crate::services::{PingResult, SitemapStats};

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub sitemap_url: String,
    pub results: Vec<PingResult>,
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(download_sitemap))
        .route("/stats", get(get_stats))
        .route("/ping", post(ping_search_engines))
}

/// GET /sitemap.xml
pub async fn serve_sitemap(State(state): State<AppState>) -> Response {
    let xml = state.sitemap_service.generate().await;
    let mut response = xml.into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/xml; charset=utf-8"),
    );
    response
}

async fn download_sitemap(State(state): State<AppState>) -> Attachment {
    Attachment::xml("sitemap.xml", state.sitemap_service.generate().await)
}

async fn get_stats(State(state): State<AppState>) -> Result<Json<SitemapStats>, ApiError> {
    Ok(Json(state.sitemap_service.stats().await?))
}

async fn ping_search_engines(State(state): State<AppState>) -> Json<PingResponse> {
    let sitemap_url = state.sitemap_service.sitemap_url();
    let results = state.sitemap_service.ping(&sitemap_url).await;
    Json(PingResponse {
        sitemap_url,
        results,
    })
}
