//! Public site API endpoints
//!
//! - GET /api/v1/site/settings - Business info for the header and footer
//! - GET /api/v1/home - Everything the home page shows

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::{HomeContent, PastProject, Review, VideoCarouselEntry, HERO_SECTION};
use crate::services::settings::SiteInfo;

/// Home page payload
#[derive(Debug, Serialize)]
pub struct HomePageResponse {
    pub hero: Option<HomeContent>,
    pub videos: Vec<VideoCarouselEntry>,
    pub reviews: Vec<Review>,
    pub projects: Vec<PastProject>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/site/settings", get(get_site_settings))
        .route("/home", get(get_home))
}

/// GET /api/v1/site/settings
async fn get_site_settings(State(state): State<AppState>) -> Result<Json<SiteInfo>, ApiError> {
    Ok(Json(state.settings_service.site_info().await?))
}

/// GET /api/v1/home
async fn get_home(State(state): State<AppState>) -> Result<Json<HomePageResponse>, ApiError> {
    let (hero, videos, reviews, projects) = futures::try_join!(
        state.home_content_service.get_section(HERO_SECTION),
        state.video_service.list_active(),
        state.review_service.showcase(),
        state.project_service.recent(),
    )?;

    Ok(Json(HomePageResponse {
        hero,
        videos,
        reviews,
        projects,
    }))
}
