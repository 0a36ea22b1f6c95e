//! Past project model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed job shown in the home page gallery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PastProject {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub project_type: String,
    pub images: Vec<String>,
    /// Free-form date as entered in the back office (usually `YYYY-MM-DD`)
    pub completion_date: Option<String>,
    pub location: String,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Project form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub project_type: String,
    pub images: Vec<String>,
    pub completion_date: Option<String>,
    pub location: String,
    pub is_featured: bool,
}
