//! Home page section content

use std::sync::Arc;

use super::{ContentError, Validator};
use crate::cache::{keys, MemoryCache};
use crate::db::repositories::HomeContentRepository;
use crate::models::{HomeContent, HomeContentInput};

/// Home page section content service
pub struct HomeContentService {
    repo: Arc<dyn HomeContentRepository>,
    cache: Arc<MemoryCache>,
}

impl HomeContentService {
    pub fn new(repo: Arc<dyn HomeContentRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    pub async fn list(&self) -> Result<Vec<HomeContent>, ContentError> {
        Ok(self.repo.list().await?)
    }

    /// Section content for the public pages. Missing sections are `None`
    /// so the page can fall back to its built-in copy.
    pub async fn get_section(&self, section: &str) -> Result<Option<HomeContent>, ContentError> {
        let content = self
            .cache
            .get_or_load(&keys::home_section(section), || self.repo.get_by_section(section))
            .await?;
        Ok(content)
    }

    /// Insert or replace a section
    pub async fn save_section(
        &self,
        section: &str,
        input: HomeContentInput,
    ) -> Result<HomeContent, ContentError> {
        let section = section.trim();
        let mut v = Validator::new();
        v.required("section_name", section, "Section name is required")
            .required("title", &input.title, "Title is required");
        v.finish()?;

        let input = HomeContentInput {
            title: input.title.trim().to_string(),
            subtitle: input.subtitle.trim().to_string(),
            content: input.content.trim().to_string(),
            image_url: input.image_url.trim().to_string(),
            cta_text: input.cta_text.trim().to_string(),
            cta_link: input.cta_link.trim().to_string(),
            is_active: input.is_active,
        };
        let saved = self.repo.upsert(section, &input).await?;
        self.cache.delete_prefix(keys::HOME_PREFIX).await;
        tracing::info!("Saved home section '{}'", section);
        Ok(saved)
    }
}
