//! Home page content model
//!
//! Editable page sections addressed by name (`hero`, `sheds_hero`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Section shown at the top of the home page
pub const HERO_SECTION: &str = "hero";
/// Section shown at the top of the shed catalog
pub const SHEDS_HERO_SECTION: &str = "sheds_hero";

/// Home content entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeContent {
    pub id: i64,
    pub section_name: String,
    pub title: String,
    pub subtitle: String,
    pub content: String,
    pub image_url: String,
    pub cta_text: String,
    pub cta_link: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Section form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomeContentInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub cta_text: String,
    #[serde(default)]
    pub cta_link: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
