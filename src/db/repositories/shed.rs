//! Shed listing repository
//!
//! Database operations for the shed catalog.

use crate::db::DbPool;
use crate::models::{ShedInput, ShedListing};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

use super::{decode_json, encode_json};

/// Shed listing repository trait
#[async_trait]
pub trait ShedRepository: Send + Sync {
    /// All listings, newest first
    async fn list(&self) -> Result<Vec<ShedListing>>;

    /// Active listings, featured first then newest
    async fn list_active(&self) -> Result<Vec<ShedListing>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<ShedListing>>;

    async fn create(&self, input: &ShedInput) -> Result<ShedListing>;

    /// Overwrite a listing; `None` when it does not exist
    async fn update(&self, id: i64, input: &ShedInput) -> Result<Option<ShedListing>>;

    /// Delete a listing; `false` when it did not exist
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Set the active flag; `None` when the listing does not exist
    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<ShedListing>>;

    async fn count_active(&self) -> Result<i64>;
}

/// SQLx-based shed repository
pub struct SqlxShedRepository {
    pool: DbPool,
}

impl SqlxShedRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn ShedRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch_all(&self, clause: &str) -> Result<Vec<ShedListing>> {
        let sql = format!("{} {}", SELECT_SHEDS, clause);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list shed listings")?;
        Ok(rows.iter().map(row_to_shed).collect())
    }
}

const SELECT_SHEDS: &str = r#"
    SELECT id, title, description, material_type, color, size, shed_style, price,
           images, specifications, is_featured, is_active, created_at, updated_at
    FROM shed_listings
"#;

#[async_trait]
impl ShedRepository for SqlxShedRepository {
    async fn list(&self) -> Result<Vec<ShedListing>> {
        self.fetch_all("ORDER BY created_at DESC, id DESC").await
    }

    async fn list_active(&self) -> Result<Vec<ShedListing>> {
        self.fetch_all("WHERE is_active = 1 ORDER BY is_featured DESC, created_at DESC, id DESC")
            .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ShedListing>> {
        let sql = format!("{} WHERE id = ?", SELECT_SHEDS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get shed listing")?;
        Ok(row.as_ref().map(row_to_shed))
    }

    async fn create(&self, input: &ShedInput) -> Result<ShedListing> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO shed_listings
                (title, description, material_type, color, size, shed_style, price, images,
                 specifications, is_featured, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.material_type)
        .bind(&input.color)
        .bind(&input.size)
        .bind(&input.shed_style)
        .bind(input.price)
        .bind(encode_json(&input.images)?)
        .bind(encode_json(&input.specifications)?)
        .bind(input.is_featured)
        .bind(input.is_active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create shed listing")?;

        Ok(ShedListing {
            id: result.last_insert_rowid(),
            title: input.title.clone(),
            description: input.description.clone(),
            material_type: input.material_type.clone(),
            color: input.color.clone(),
            size: input.size.clone(),
            shed_style: input.shed_style.clone(),
            price: input.price,
            images: input.images.clone(),
            specifications: input.specifications.clone(),
            is_featured: input.is_featured,
            is_active: input.is_active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: i64, input: &ShedInput) -> Result<Option<ShedListing>> {
        let result = sqlx::query(
            r#"
            UPDATE shed_listings
            SET title = ?, description = ?, material_type = ?, color = ?, size = ?,
                shed_style = ?, price = ?, images = ?, specifications = ?, is_featured = ?,
                is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.material_type)
        .bind(&input.color)
        .bind(&input.size)
        .bind(&input.shed_style)
        .bind(input.price)
        .bind(encode_json(&input.images)?)
        .bind(encode_json(&input.specifications)?)
        .bind(input.is_featured)
        .bind(input.is_active)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update shed listing")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM shed_listings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete shed listing")?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<ShedListing>> {
        let result = sqlx::query("UPDATE shed_listings SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(is_active)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to toggle shed listing")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn count_active(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM shed_listings WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count shed listings")?;
        Ok(row.get("count"))
    }
}

fn row_to_shed(row: &sqlx::sqlite::SqliteRow) -> ShedListing {
    ShedListing {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        material_type: row.get("material_type"),
        color: row.get("color"),
        size: row.get("size"),
        shed_style: row.get("shed_style"),
        price: row.get("price"),
        images: decode_json(row.get("images")),
        specifications: decode_json(row.get("specifications")),
        is_featured: row.get("is_featured"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
