//! Video carousel service

use std::sync::Arc;

use super::{ContentError, Validator};
use crate::cache::{keys, MemoryCache};
use crate::db::repositories::VideoRepository;
use crate::models::{VideoCarouselEntry, VideoInput};

const NOT_FOUND: &str = "Video";

/// Video carousel service
pub struct VideoService {
    repo: Arc<dyn VideoRepository>,
    cache: Arc<MemoryCache>,
}

impl VideoService {
    pub fn new(repo: Arc<dyn VideoRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    /// All entries in carousel order
    pub async fn list(&self) -> Result<Vec<VideoCarouselEntry>, ContentError> {
        Ok(self.repo.list().await?)
    }

    pub async fn list_active(&self) -> Result<Vec<VideoCarouselEntry>, ContentError> {
        let videos = self
            .cache
            .get_or_load(keys::ACTIVE_VIDEOS, || self.repo.list_active())
            .await?;
        Ok(videos)
    }

    pub async fn get(&self, id: i64) -> Result<VideoCarouselEntry, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn create(&self, input: VideoInput) -> Result<VideoCarouselEntry, ContentError> {
        let input = validate(input)?;
        let video = self.repo.create(&input).await?;
        self.cache.delete(keys::ACTIVE_VIDEOS).await;
        Ok(video)
    }

    pub async fn update(&self, id: i64, input: VideoInput) -> Result<VideoCarouselEntry, ContentError> {
        let input = validate(input)?;
        let video = self
            .repo
            .update(id, &input)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.cache.delete(keys::ACTIVE_VIDEOS).await;
        Ok(video)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.repo.delete(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }
        self.cache.delete(keys::ACTIVE_VIDEOS).await;
        Ok(())
    }

    pub async fn toggle_active(&self, id: i64) -> Result<VideoCarouselEntry, ContentError> {
        let current = self.get(id).await?;
        let video = self
            .repo
            .set_active(id, !current.is_active)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.cache.delete(keys::ACTIVE_VIDEOS).await;
        Ok(video)
    }
}

fn validate(input: VideoInput) -> Result<VideoInput, ContentError> {
    let mut v = Validator::new();
    v.required("title", &input.title, "Title is required")
        .url("video_url", &input.video_url, "Please enter a valid video URL")
        .at_least("order_index", input.order_index, 0, "Order must be zero or greater");
    v.finish()?;

    Ok(VideoInput {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        video_url: input.video_url.trim().to_string(),
        thumbnail_url: input.thumbnail_url.trim().to_string(),
        order_index: input.order_index,
        is_active: input.is_active,
    })
}
