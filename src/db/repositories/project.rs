//! Past project repository

use crate::db::DbPool;
use crate::models::{PastProject, ProjectInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

use super::{decode_json, encode_json};

/// Past project repository trait
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// All projects, newest first
    async fn list(&self) -> Result<Vec<PastProject>>;

    /// Newest projects, at most `limit`
    async fn list_recent(&self, limit: i64) -> Result<Vec<PastProject>>;

    /// Featured projects, newest first
    async fn list_featured(&self) -> Result<Vec<PastProject>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<PastProject>>;

    async fn create(&self, input: &ProjectInput) -> Result<PastProject>;

    async fn update(&self, id: i64, input: &ProjectInput) -> Result<Option<PastProject>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn set_featured(&self, id: i64, is_featured: bool) -> Result<Option<PastProject>>;

    async fn count(&self) -> Result<i64>;

    async fn count_featured(&self) -> Result<i64>;
}

/// SQLx-based project repository
pub struct SqlxProjectRepository {
    pool: DbPool,
}

impl SqlxProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn ProjectRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_PROJECTS: &str = r#"
    SELECT id, title, description, project_type, images, completion_date, location,
           is_featured, created_at, updated_at
    FROM past_projects
"#;

#[async_trait]
impl ProjectRepository for SqlxProjectRepository {
    async fn list(&self) -> Result<Vec<PastProject>> {
        let sql = format!("{} ORDER BY created_at DESC, id DESC", SELECT_PROJECTS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list projects")?;
        Ok(rows.iter().map(row_to_project).collect())
    }

    async fn list_recent(&self, limit: i64) -> Result<Vec<PastProject>> {
        let sql = format!("{} ORDER BY created_at DESC, id DESC LIMIT ?", SELECT_PROJECTS);
        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list recent projects")?;
        Ok(rows.iter().map(row_to_project).collect())
    }

    async fn list_featured(&self) -> Result<Vec<PastProject>> {
        let sql = format!(
            "{} WHERE is_featured = 1 ORDER BY created_at DESC, id DESC",
            SELECT_PROJECTS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list featured projects")?;
        Ok(rows.iter().map(row_to_project).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<PastProject>> {
        let sql = format!("{} WHERE id = ?", SELECT_PROJECTS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get project")?;
        Ok(row.as_ref().map(row_to_project))
    }

    async fn create(&self, input: &ProjectInput) -> Result<PastProject> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO past_projects
                (title, description, project_type, images, completion_date, location,
                 is_featured, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.project_type)
        .bind(encode_json(&input.images)?)
        .bind(&input.completion_date)
        .bind(&input.location)
        .bind(input.is_featured)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create project")?;

        Ok(PastProject {
            id: result.last_insert_rowid(),
            title: input.title.clone(),
            description: input.description.clone(),
            project_type: input.project_type.clone(),
            images: input.images.clone(),
            completion_date: input.completion_date.clone(),
            location: input.location.clone(),
            is_featured: input.is_featured,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: i64, input: &ProjectInput) -> Result<Option<PastProject>> {
        let result = sqlx::query(
            r#"
            UPDATE past_projects
            SET title = ?, description = ?, project_type = ?, images = ?, completion_date = ?,
                location = ?, is_featured = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.project_type)
        .bind(encode_json(&input.images)?)
        .bind(&input.completion_date)
        .bind(&input.location)
        .bind(input.is_featured)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update project")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM past_projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete project")?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_featured(&self, id: i64, is_featured: bool) -> Result<Option<PastProject>> {
        let result =
            sqlx::query("UPDATE past_projects SET is_featured = ?, updated_at = ? WHERE id = ?")
                .bind(is_featured)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .context("Failed to toggle project")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM past_projects")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count projects")?;
        Ok(row.get("count"))
    }

    async fn count_featured(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM past_projects WHERE is_featured = 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count featured projects")?;
        Ok(row.get("count"))
    }
}

fn row_to_project(row: &sqlx::sqlite::SqliteRow) -> PastProject {
    PastProject {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        project_type: row.get("project_type"),
        images: decode_json(row.get("images")),
        completion_date: row.get("completion_date"),
        location: row.get("location"),
        is_featured: row.get("is_featured"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxProjectRepository {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        SqlxProjectRepository::new(pool)
    }

    fn project(title: &str, featured: bool) -> ProjectInput {
        ProjectInput {
            title: title.to_string(),
            project_type: "Custom Shed".to_string(),
            completion_date: Some("2024-05-01".to_string()),
            is_featured: featured,
            ..ProjectInput::default()
        }
    }

    #[tokio::test]
    async fn test_recent_is_limited_and_newest_first() {
        let repo = setup().await;
        for i in 0..10 {
            repo.create(&project(&format!("Job {}", i), false)).await.unwrap();
        }

        let recent = repo.list_recent(8).await.unwrap();
        assert_eq!(recent.len(), 8);
        assert_eq!(recent[0].title, "Job 9");
        assert_eq!(repo.count().await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_featured_filter_and_toggle() {
        let repo = setup().await;
        let a = repo.create(&project("Barn", true)).await.unwrap();
        let b = repo.create(&project("Garage", false)).await.unwrap();

        assert_eq!(repo.list_featured().await.unwrap().len(), 1);

        repo.set_featured(a.id, false).await.unwrap();
        repo.set_featured(b.id, true).await.unwrap();
        let featured = repo.list_featured().await.unwrap();
        assert_eq!(featured.len(), 1);
        assert_eq!(featured[0].id, b.id);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = setup().await;
        let created = repo.create(&project("Porch", false)).await.unwrap();

        let mut changed = project("Porch Addition", false);
        changed.location = "Springfield".to_string();
        let updated = repo.update(created.id, &changed).await.unwrap().unwrap();
        assert_eq!(updated.title, "Porch Addition");
        assert_eq!(updated.location, "Springfield");

        assert!(repo.delete(created.id).await.unwrap());
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
    }
}
