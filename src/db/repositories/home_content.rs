//! Home content repository
//!
//! Page sections are addressed by their unique section name.

use crate::db::DbPool;
use crate::models::{HomeContent, HomeContentInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Home content repository trait
#[async_trait]
pub trait HomeContentRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<HomeContent>>;

    async fn get_by_section(&self, section: &str) -> Result<Option<HomeContent>>;

    /// Insert or overwrite the named section
    async fn upsert(&self, section: &str, input: &HomeContentInput) -> Result<HomeContent>;
}

/// SQLx-based home content repository
pub struct SqlxHomeContentRepository {
    pool: DbPool,
}

impl SqlxHomeContentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn HomeContentRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_SECTIONS: &str = r#"
    SELECT id, section_name, title, subtitle, content, image_url, cta_text, cta_link,
           is_active, created_at, updated_at
    FROM home_content
"#;

#[async_trait]
impl HomeContentRepository for SqlxHomeContentRepository {
    async fn list(&self) -> Result<Vec<HomeContent>> {
        let sql = format!("{} ORDER BY section_name", SELECT_SECTIONS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list home content")?;
        Ok(rows.iter().map(row_to_section).collect())
    }

    async fn get_by_section(&self, section: &str) -> Result<Option<HomeContent>> {
        let sql = format!("{} WHERE section_name = ?", SELECT_SECTIONS);
        let row = sqlx::query(&sql)
            .bind(section)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get home content section")?;
        Ok(row.as_ref().map(row_to_section))
    }

    async fn upsert(&self, section: &str, input: &HomeContentInput) -> Result<HomeContent> {
        let now = Utc::now();
        sqlx::query(
            r#"
            INSERT INTO home_content
                (section_name, title, subtitle, content, image_url, cta_text, cta_link,
                 is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(section_name) DO UPDATE SET
                title = excluded.title,
                subtitle = excluded.subtitle,
                content = excluded.content,
                image_url = excluded.image_url,
                cta_text = excluded.cta_text,
                cta_link = excluded.cta_link,
                is_active = excluded.is_active,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(section)
        .bind(&input.title)
        .bind(&input.subtitle)
        .bind(&input.content)
        .bind(&input.image_url)
        .bind(&input.cta_text)
        .bind(&input.cta_link)
        .bind(input.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to save home content section")?;

        self.get_by_section(section)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Section {} vanished after save", section))
    }
}

fn row_to_section(row: &sqlx::sqlite::SqliteRow) -> HomeContent {
    HomeContent {
        id: row.get("id"),
        section_name: row.get("section_name"),
        title: row.get("title"),
        subtitle: row.get("subtitle"),
        content: row.get("content"),
        image_url: row.get("image_url"),
        cta_text: row.get("cta_text"),
        cta_link: row.get("cta_link"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
