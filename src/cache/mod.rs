//! Cache layer
//!
//! Public pages read the same handful of queries on every request (settings,
//! active sheds, home sections, published posts). Services keep those results
//! in an in-process moka cache and drop the affected keys whenever the back
//! office writes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use shedyard::cache::{create_cache, keys};
//! use shedyard::config::CacheConfig;
//!
//! let cache = create_cache(&CacheConfig::default());
//! cache.set(keys::SETTINGS, &settings).await?;
//! cache.delete_prefix(keys::BLOG_PREFIX).await;
//! ```

pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use crate::config::CacheConfig;

pub use memory::MemoryCache;

/// Cache keys shared by the services that fill and invalidate them
pub mod keys {
    pub const SETTINGS: &str = "settings";
    pub const ACTIVE_SHEDS: &str = "sheds:active";
    pub const FEATURED_PROJECTS: &str = "projects:featured";
    pub const SHOWCASE_REVIEWS: &str = "reviews:showcase";
    pub const ACTIVE_VIDEOS: &str = "videos:active";
    pub const HOME_PREFIX: &str = "home:";
    pub const BLOG_PREFIX: &str = "blog:";
    pub const PUBLISHED_POSTS: &str = "blog:published";

    /// Key for one home page section
    pub fn home_section(section: &str) -> String {
        format!("{}{}", HOME_PREFIX, section)
    }

    /// Key for one published post
    pub fn blog_post(slug: &str) -> String {
        format!("{}post:{}", BLOG_PREFIX, slug)
    }
}

/// Build the shared cache from configuration
pub fn create_cache(config: &CacheConfig) -> Arc<MemoryCache> {
    let ttl = Duration::from_secs(config.ttl_seconds.max(1));
    Arc::new(MemoryCache::with_capacity_and_ttl(config.max_entries, ttl))
}
