//! Contact submission repository

use crate::db::DbPool;
use crate::models::{ContactInput, ContactStatus, ContactSubmission};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::sync::Arc;

/// Contact submission repository trait
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create(&self, input: &ContactInput) -> Result<ContactSubmission>;

    /// Submissions newest first, optionally restricted to one status
    async fn list(&self, status: Option<ContactStatus>) -> Result<Vec<ContactSubmission>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<ContactSubmission>>;

    async fn update_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<Option<ContactSubmission>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<i64>;

    async fn created_timestamps(&self) -> Result<Vec<DateTime<Utc>>>;
}

/// SQLx-based contact repository
pub struct SqlxContactRepository {
    pool: DbPool,
}

impl SqlxContactRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_CONTACTS: &str = r#"
    SELECT id, name, email, phone, subject, message, status, created_at, updated_at
    FROM contact_submissions
"#;

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, input: &ContactInput) -> Result<ContactSubmission> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO contact_submissions
                (name, email, phone, subject, message, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.subject)
        .bind(&input.message)
        .bind(ContactStatus::Unread.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create contact submission")?;

        Ok(ContactSubmission {
            id: result.last_insert_rowid(),
            name: input.name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            subject: input.subject.clone(),
            message: input.message.clone(),
            status: ContactStatus::Unread,
            created_at: now,
            updated_at: now,
        })
    }

    async fn list(&self, status: Option<ContactStatus>) -> Result<Vec<ContactSubmission>> {
        let rows = match status {
            Some(status) => {
                let sql = format!(
                    "{} WHERE status = ? ORDER BY created_at DESC, id DESC",
                    SELECT_CONTACTS
                );
                sqlx::query(&sql)
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let sql = format!("{} ORDER BY created_at DESC, id DESC", SELECT_CONTACTS);
                sqlx::query(&sql).fetch_all(&self.pool).await
            }
        }
        .context("Failed to list contact submissions")?;

        Ok(rows.iter().map(row_to_contact).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ContactSubmission>> {
        let sql = format!("{} WHERE id = ?", SELECT_CONTACTS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get contact submission")?;
        Ok(row.as_ref().map(row_to_contact))
    }

    async fn update_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<Option<ContactSubmission>> {
        let result =
            sqlx::query("UPDATE contact_submissions SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .context("Failed to update contact status")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM contact_submissions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete contact submission")?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM contact_submissions")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count contact submissions")?;
        Ok(row.get("count"))
    }

    async fn created_timestamps(&self) -> Result<Vec<DateTime<Utc>>> {
        let rows = sqlx::query("SELECT created_at FROM contact_submissions")
            .fetch_all(&self.pool)
            .await
            .context("Failed to load contact timestamps")?;
        Ok(rows.iter().map(|row| row.get("created_at")).collect())
    }
}

fn row_to_contact(row: &sqlx::sqlite::SqliteRow) -> ContactSubmission {
    let status: String = row.get("status");
    ContactSubmission {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        phone: row.get("phone"),
        subject: row.get("subject"),
        message: row.get("message"),
        status: ContactStatus::parse(&status).unwrap_or_default(),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
