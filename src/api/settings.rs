//! Business settings API endpoints (admin)
//!
//! - GET /api/v1/admin/settings
//! - PUT /api/v1/admin/settings

use axum::{extract::State, routing::get, Json, Router};

use crate::api::middleware::{ApiError, AppState};
use crate::models::{BusinessSettings, BusinessSettingsInput};

pub fn admin_router() -> Router<AppState> {
    Router::new().route("/", get(get_settings).put(save_settings))
}

async fn get_settings(State(state): State<AppState>) -> Result<Json<BusinessSettings>, ApiError> {
    Ok(Json(state.settings_service.get().await?))
}

async fn save_settings(
    State(state): State<AppState>,
    Json(input): Json<BusinessSettingsInput>,
) -> Result<Json<BusinessSettings>, ApiError> {
    Ok(Json(state.settings_service.save(input).await?))
}
