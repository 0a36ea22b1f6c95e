//! Video carousel model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One slide of the home page video carousel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoCarouselEntry {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    /// Position in the carousel, ascending
    pub order_index: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Carousel entry form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub order_index: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
