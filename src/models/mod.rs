//! Data models
//!
//! This module contains the data structures used throughout the service:
//! - Database entities (sheds, projects, reviews, blog posts, leads, page content)
//! - Form inputs accepted by the API
//! - Authentication records (User, Session)

mod blog_post;
mod business_settings;
mod contact;
mod home_content;
mod project;
pub mod quote;
mod review;
mod session;
mod shed;
mod user;
mod video;

pub use blog_post::{BlogPost, BlogPostFields, BlogPostInput};
pub use business_settings::{
    default_hours, BusinessHours, BusinessSettings, BusinessSettingsInput, WEEK_DAYS,
};
pub use contact::{ContactInput, ContactStatus, ContactSubmission};
pub use home_content::{HomeContent, HomeContentInput, HERO_SECTION, SHEDS_HERO_SECTION};
pub use project::{PastProject, ProjectInput};
pub use quote::{QuoteRequest, QuoteRequestInput, QuoteStatus};
pub use review::{Review, ReviewFlag, ReviewInput};
pub use session::Session;
pub use shed::{ShedInput, ShedListing, ShedSpecifications};
pub use user::{CreateUserInput, User};
pub use video::{VideoCarouselEntry, VideoInput};
