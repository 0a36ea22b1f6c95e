//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories. They
//! validate form input, apply the business rules of each back office
//! manager, keep the public-read cache fresh and produce the generated
//! artifacts (CSV exports, sitemap).

pub mod blog;
pub mod catalog;
pub mod contact;
pub mod csv_export;
pub mod dashboard;
pub mod home_content;
pub mod hours;
pub mod markdown;
pub mod password;
pub mod project;
pub mod quote;
pub mod rate_limiter;
pub mod review;
pub mod settings;
pub mod shed;
pub mod sitemap;
pub mod slug;
pub mod storage;
pub mod user;
pub mod validation;
pub mod video;

use serde::Serialize;
use thiserror::Error;

pub use blog::BlogService;
pub use catalog::{Facet, FacetValues, ShedFilter};
pub use contact::{ContactCounts, ContactService};
pub use dashboard::{DashboardService, DashboardStats, RequestSnapshot, RequestStats};
pub use home_content::HomeContentService;
pub use hours::{format_business_hours, format_detailed_hours};
pub use markdown::MarkdownRenderer;
pub use password::{hash_password, verify_password};
pub use project::ProjectService;
pub use quote::{QuoteCounts, QuoteFormOptions, QuoteService};
pub use rate_limiter::LoginRateLimiter;
pub use review::ReviewService;
pub use settings::SettingsService;
pub use shed::ShedService;
pub use sitemap::{PingResult, SitemapService, SitemapStats};
pub use slug::slugify;
pub use storage::{StorageError, StorageService, StoredFile, UploadBatch, UploadFile};
pub use user::{LoginInput, UserService, UserServiceError};
pub use validation::Validator;
pub use video::VideoService;

/// A single rejected form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error type shared by the content services
#[derive(Debug, Error)]
pub enum ContentError {
    /// One or more form fields failed validation
    #[error("{}", validation_summary(.0))]
    Validation(Vec<FieldError>),

    /// The addressed record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The write collides with an existing record
    #[error("{0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ContentError {
    /// Shorthand for a validation failure on one field
    pub fn invalid(field: &str, message: &str) -> Self {
        ContentError::Validation(vec![FieldError::new(field, message)])
    }
}

fn validation_summary(errors: &[FieldError]) -> String {
    match errors.first() {
        Some(first) if errors.len() == 1 => first.message.clone(),
        Some(first) => format!("{} (and {} more)", first.message, errors.len() - 1),
        None => "Validation failed".to_string(),
    }
}
