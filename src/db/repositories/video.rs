//! Video carousel repository

use crate::db::DbPool;
use crate::models::{VideoCarouselEntry, VideoInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Video carousel repository trait
#[async_trait]
pub trait VideoRepository: Send + Sync {
    /// All entries in carousel order
    async fn list(&self) -> Result<Vec<VideoCarouselEntry>>;

    /// Active entries in carousel order
    async fn list_active(&self) -> Result<Vec<VideoCarouselEntry>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<VideoCarouselEntry>>;

    async fn create(&self, input: &VideoInput) -> Result<VideoCarouselEntry>;

    async fn update(&self, id: i64, input: &VideoInput) -> Result<Option<VideoCarouselEntry>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<VideoCarouselEntry>>;
}

/// SQLx-based video repository
pub struct SqlxVideoRepository {
    pool: DbPool,
}

impl SqlxVideoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn VideoRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_VIDEOS: &str = r#"
    SELECT id, title, description, video_url, thumbnail_url, order_index, is_active,
           created_at, updated_at
    FROM video_carousel
"#;

#[async_trait]
impl VideoRepository for SqlxVideoRepository {
    async fn list(&self) -> Result<Vec<VideoCarouselEntry>> {
        let sql = format!("{} ORDER BY order_index ASC, id ASC", SELECT_VIDEOS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list videos")?;
        Ok(rows.iter().map(row_to_video).collect())
    }

    async fn list_active(&self) -> Result<Vec<VideoCarouselEntry>> {
        let sql = format!(
            "{} WHERE is_active = 1 ORDER BY order_index ASC, id ASC",
            SELECT_VIDEOS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list active videos")?;
        Ok(rows.iter().map(row_to_video).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<VideoCarouselEntry>> {
        let sql = format!("{} WHERE id = ?", SELECT_VIDEOS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get video")?;
        Ok(row.as_ref().map(row_to_video))
    }

    async fn create(&self, input: &VideoInput) -> Result<VideoCarouselEntry> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO video_carousel
                (title, description, video_url, thumbnail_url, order_index, is_active,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.video_url)
        .bind(&input.thumbnail_url)
        .bind(input.order_index)
        .bind(input.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create video")?;

        Ok(VideoCarouselEntry {
            id: result.last_insert_rowid(),
            title: input.title.clone(),
            description: input.description.clone(),
            video_url: input.video_url.clone(),
            thumbnail_url: input.thumbnail_url.clone(),
            order_index: input.order_index,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: i64, input: &VideoInput) -> Result<Option<VideoCarouselEntry>> {
        let result = sqlx::query(
            r#"
            UPDATE video_carousel
            SET title = ?, description = ?, video_url = ?, thumbnail_url = ?, order_index = ?,
                is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.video_url)
        .bind(&input.thumbnail_url)
        .bind(input.order_index)
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update video")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM video_carousel WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete video")?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<VideoCarouselEntry>> {
        let result =
            sqlx::query("UPDATE video_carousel SET is_active = ?, updated_at = ? WHERE id = ?")
                .bind(is_active)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .context("Failed to toggle video")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }
}

fn row_to_video(row: &sqlx::sqlite::SqliteRow) -> VideoCarouselEntry {
    VideoCarouselEntry {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        video_url: row.get("video_url"),
        thumbnail_url: row.get("thumbnail_url"),
        order_index: row.get("order_index"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
