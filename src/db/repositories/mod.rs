//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles the queries for a single table.

pub mod blog_post;
pub mod business_settings;
pub mod contact;
pub mod home_content;
pub mod project;
pub mod quote;
pub mod review;
pub mod session;
pub mod shed;
pub mod user;
pub mod video;

pub use blog_post::{BlogPostRepository, SqlxBlogPostRepository};
pub use business_settings::{
    BusinessSettingsFields, BusinessSettingsRepository, SqlxBusinessSettingsRepository,
};
pub use contact::{ContactRepository, SqlxContactRepository};
pub use home_content::{HomeContentRepository, SqlxHomeContentRepository};
pub use project::{ProjectRepository, SqlxProjectRepository};
pub use quote::{QuoteRepository, SqlxQuoteRepository};
pub use review::{ReviewRepository, SqlxReviewRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use shed::{ShedRepository, SqlxShedRepository};
pub use user::{SqlxUserRepository, UserRepository};
pub use video::{SqlxVideoRepository, VideoRepository};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

/// Serialize a value for a JSON text column
pub(crate) fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string(value).context("Failed to encode JSON column")
}

/// Read a JSON text column, falling back to the type's default when the
/// stored text is malformed
pub(crate) fn decode_json<T: DeserializeOwned + Default>(raw: String) -> T {
    serde_json::from_str(&raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_json_tolerates_garbage() {
        let images: Vec<String> = decode_json("not json".to_string());
        assert!(images.is_empty());

        let images: Vec<String> = decode_json(r#"["a.jpg","b.jpg"]"#.to_string());
        assert_eq!(images, vec!["a.jpg", "b.jpg"]);
    }
}
