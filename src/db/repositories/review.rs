//! Review repository

use crate::db::DbPool;
use crate::models::{Review, ReviewFlag, ReviewInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Review repository trait
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// All reviews, newest first
    async fn list(&self) -> Result<Vec<Review>>;

    /// Approved and featured reviews, newest first, at most `limit`
    async fn list_showcase(&self, limit: i64) -> Result<Vec<Review>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<Review>>;

    async fn create(&self, input: &ReviewInput) -> Result<Review>;

    async fn update(&self, id: i64, input: &ReviewInput) -> Result<Option<Review>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    /// Set one of the boolean flags; `None` when the review does not exist
    async fn set_flag(&self, id: i64, flag: ReviewFlag, value: bool) -> Result<Option<Review>>;

    async fn count(&self) -> Result<i64>;
}

/// SQLx-based review repository
pub struct SqlxReviewRepository {
    pool: DbPool,
}

impl SqlxReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn ReviewRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_REVIEWS: &str = r#"
    SELECT id, customer_name, rating, review_text, project_type, is_featured, is_approved,
           created_at, updated_at
    FROM reviews
"#;

#[async_trait]
impl ReviewRepository for SqlxReviewRepository {
    async fn list(&self) -> Result<Vec<Review>> {
        let sql = format!("{} ORDER BY created_at DESC, id DESC", SELECT_REVIEWS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list reviews")?;
        Ok(rows.iter().map(row_to_review).collect())
    }

    async fn list_showcase(&self, limit: i64) -> Result<Vec<Review>> {
        let sql = format!(
            "{} WHERE is_approved = 1 AND is_featured = 1 ORDER BY created_at DESC, id DESC LIMIT ?",
            SELECT_REVIEWS
        );
        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list showcase reviews")?;
        Ok(rows.iter().map(row_to_review).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Review>> {
        let sql = format!("{} WHERE id = ?", SELECT_REVIEWS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get review")?;
        Ok(row.as_ref().map(row_to_review))
    }

    async fn create(&self, input: &ReviewInput) -> Result<Review> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO reviews
                (customer_name, rating, review_text, project_type, is_featured, is_approved,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.customer_name)
        .bind(input.rating)
        .bind(&input.review_text)
        .bind(&input.project_type)
        .bind(input.is_featured)
        .bind(input.is_approved)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create review")?;

        Ok(Review {
            id: result.last_insert_rowid(),
            customer_name: input.customer_name.clone(),
            rating: input.rating,
            review_text: input.review_text.clone(),
            project_type: input.project_type.clone(),
            is_featured: input.is_featured,
            is_approved: input.is_approved,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: i64, input: &ReviewInput) -> Result<Option<Review>> {
        let result = sqlx::query(
            r#"
            UPDATE reviews
            SET customer_name = ?, rating = ?, review_text = ?, project_type = ?,
                is_featured = ?, is_approved = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.customer_name)
        .bind(input.rating)
        .bind(&input.review_text)
        .bind(&input.project_type)
        .bind(input.is_featured)
        .bind(input.is_approved)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update review")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete review")?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_flag(&self, id: i64, flag: ReviewFlag, value: bool) -> Result<Option<Review>> {
        // Column names come from a closed enum, never from user input.
        let sql = format!(
            "UPDATE reviews SET {} = ?, updated_at = ? WHERE id = ?",
            flag.column()
        );
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to toggle review")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM reviews")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count reviews")?;
        Ok(row.get("count"))
    }
}

fn row_to_review(row: &sqlx::sqlite::SqliteRow) -> Review {
    Review {
        id: row.get("id"),
        customer_name: row.get("customer_name"),
        rating: row.get("rating"),
        review_text: row.get("review_text"),
        project_type: row.get("project_type"),
        is_featured: row.get("is_featured"),
        is_approved: row.get("is_approved"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
