//! Blog post model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Blog post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: i64,
    pub title: String,
    /// URL-friendly slug, unique across posts
    pub slug: String,
    pub excerpt: String,
    /// Markdown source
    pub content: String,
    /// Rendered HTML content
    pub content_html: String,
    pub featured_image: String,
    pub author: String,
    pub is_published: bool,
    /// Set while published, cleared when unpublished
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Blog post form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogPostInput {
    pub title: String,
    /// Generated from the title when blank
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub featured_image: String,
    pub author: String,
    pub is_published: bool,
    /// Explicit publish date; defaults to now when publishing
    pub published_at: Option<DateTime<Utc>>,
}

/// Normalized column values written by the repository
#[derive(Debug, Clone)]
pub struct BlogPostFields {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub content_html: String,
    pub featured_image: String,
    pub author: String,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}
