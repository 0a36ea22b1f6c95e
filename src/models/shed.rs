//! Shed listing model
//!
//! Catalog entries for pre-designed sheds. Listings carry four facets
//! (material, color, size, style) used by the public catalog filter.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Feature lists shown on a listing's detail view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShedSpecifications {
    pub standard_features: Vec<String>,
    pub optional_upgrades: Vec<String>,
}

/// Shed listing entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShedListing {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub material_type: String,
    pub color: String,
    pub size: String,
    pub shed_style: String,
    /// Asking price; `None` means "call for price"
    pub price: Option<f64>,
    /// Storage paths inside the images bucket
    pub images: Vec<String>,
    pub specifications: ShedSpecifications,
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Listing form submission, used for both create and update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShedInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub material_type: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub shed_style: String,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub specifications: ShedSpecifications,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
}
