//! Quote request repository

use crate::db::DbPool;
use crate::models::{QuoteRequest, QuoteRequestInput, QuoteStatus};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::sync::Arc;

use super::{decode_json, encode_json};

/// Quote request repository trait
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, input: &QuoteRequestInput) -> Result<QuoteRequest>;

    /// Requests newest first, optionally restricted to one status
    async fn list(&self, status: Option<QuoteStatus>) -> Result<Vec<QuoteRequest>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<QuoteRequest>>;

    async fn update_status(&self, id: i64, status: QuoteStatus) -> Result<Option<QuoteRequest>>;

    async fn update_notes(&self, id: i64, notes: &str) -> Result<Option<QuoteRequest>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<i64>;

    /// Creation times of every request
    async fn created_timestamps(&self) -> Result<Vec<DateTime<Utc>>>;
}

/// SQLx-based quote repository
pub struct SqlxQuoteRepository {
    pool: DbPool,
}

impl SqlxQuoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn QuoteRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_QUOTES: &str = r#"
    SELECT id, customer_name, email, phone, project_type, material_type, color, size,
           shed_style, description, budget_range, timeline, status, notes, custom_message,
           inspiration_images, created_at, updated_at
    FROM quote_requests
"#;

#[async_trait]
impl QuoteRepository for SqlxQuoteRepository {
    async fn create(&self, input: &QuoteRequestInput) -> Result<QuoteRequest> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO quote_requests
                (customer_name, email, phone, project_type, material_type, color, size,
                 shed_style, description, budget_range, timeline, status, custom_message,
                 inspiration_images, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.customer_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.project_type)
        .bind(&input.material_type)
        .bind(&input.color)
        .bind(&input.size)
        .bind(&input.shed_style)
        .bind(&input.description)
        .bind(&input.budget_range)
        .bind(&input.timeline)
        .bind(QuoteStatus::Pending.as_str())
        .bind(&input.custom_message)
        .bind(encode_json(&input.inspiration_images)?)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create quote request")?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Quote request {} vanished after insert", id))
    }

    async fn list(&self, status: Option<QuoteStatus>) -> Result<Vec<QuoteRequest>> {
        let rows = match status {
            Some(status) => {
                let sql = format!(
                    "{} WHERE status = ? ORDER BY created_at DESC, id DESC",
                    SELECT_QUOTES
                );
                sqlx::query(&sql)
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("{} ORDER BY created_at DESC, id DESC", SELECT_QUOTES);
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .context("Failed to list quote requests")?;

        Ok(rows.iter().map(row_to_quote).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<QuoteRequest>> {
        let sql = format!("{} WHERE id = ?", SELECT_QUOTES);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get quote request")?;
        Ok(row.as_ref().map(row_to_quote))
    }

    async fn update_status(&self, id: i64, status: QuoteStatus) -> Result<Option<QuoteRequest>> {
        let result =
            sqlx::query("UPDATE quote_requests SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .context("Failed to update quote status")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn update_notes(&self, id: i64, notes: &str) -> Result<Option<QuoteRequest>> {
        let result = sqlx::query("UPDATE quote_requests SET notes = ?, updated_at = ? WHERE id = ?")
            .bind(notes)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to update quote notes")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM quote_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete quote request")?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM quote_requests")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count quote requests")?;
        Ok(row.get("count"))
    }

    async fn created_timestamps(&self) -> Result<Vec<DateTime<Utc>>> {
        let rows = sqlx::query("SELECT created_at FROM quote_requests")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load quote timestamps")?;
        Ok(rows.iter().map(|row| row.get("created_at")).collect())
    }
}

fn row_to_quote(row: &sqlx::sqlite::SqliteRow) -> QuoteRequest {
    let status: String = row.get("status");
    QuoteRequest {
        id: row.get("id"),
        customer_name: row.get("customer_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        project_type: row.get("project_type"),
        material_type: row.get("material_type"),
        color: row.get("color"),
        size: row.get("size"),
        shed_style: row.get("shed_style"),
        description: row.get("description"),
        budget_range: row.get("budget_range"),
        timeline: row.get("timeline"),
        status: QuoteStatus::parse(&status).unwrap_or_default(),
        notes: row.get("notes"),
        custom_message: row.get("custom_message"),
        inspiration_images: decode_json(row.get("inspiration_images")),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxQuoteRepository {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        SqlxQuoteRepository::new(pool)
    }

    fn quote(name: &str) -> QuoteRequestInput {
        QuoteRequestInput {
            customer_name: name.to_string(),
            email: "jane@example.com".to_string(),
            project_type: "Custom Shed".to_string(),
            description: "10x12 gable shed".to_string(),
            inspiration_images: vec!["quotes/1-a.jpg".to_string()],
            ..QuoteRequestInput::default()
        }
    }

    #[tokio::test]
    async fn test_new_request_is_pending() {
        let repo = setup().await;
        let created = repo.create(&quote("Jane")).await.unwrap();

        assert_eq!(created.status, QuoteStatus::Pending);
        assert!(created.notes.is_empty());
        assert!(created.has_images());
    }

    #[tokio::test]
    async fn test_status_filter() {
        let repo = setup().await;
        let a = repo.create(&quote("A")).await.unwrap();
        repo.create(&quote("B")).await.unwrap();

        repo.update_status(a.id, QuoteStatus::Responded).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 2);
        let responded = repo.list(Some(QuoteStatus::Responded)).await.unwrap();
        assert_eq!(responded.len(), 1);
        assert_eq!(responded[0].customer_name, "A");
        assert_eq!(repo.list(Some(QuoteStatus::Pending)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_notes_and_delete() {
        let repo = setup().await;
        let created = repo.create(&quote("Notes")).await.unwrap();

        let updated = repo.update_notes(created.id, "Called back").await.unwrap().unwrap();
        assert_eq!(updated.notes, "Called back");
        assert!(repo.update_notes(999, "x").await.unwrap().is_none());

        assert_eq!(repo.created_timestamps().await.unwrap().len(), 1);
        assert!(repo.delete(created.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
