//! Blog post repository

use crate::db::DbPool;
use crate::models::{BlogPost, BlogPostFields};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Row;
use std::sync::Arc;

/// Blog post repository trait
#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    /// All posts, newest first
    async fn list(&self) -> Result<Vec<BlogPost>>;

    /// Published posts, most recently published first
    async fn list_published(&self) -> Result<Vec<BlogPost>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>>;

    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>>;

    /// Check whether a slug is taken by any post other than `exclude_id`
    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;

    async fn create(&self, fields: &BlogPostFields) -> Result<BlogPost>;

    async fn update(&self, id: i64, fields: &BlogPostFields) -> Result<Option<BlogPost>>;

    async fn delete(&self, id: i64) -> Result<bool>;

    async fn set_published(
        &self,
        id: i64,
        is_published: bool,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Option<BlogPost>>;

    async fn count_published(&self) -> Result<i64>;
}

/// SQLx-based blog post repository
pub struct SqlxBlogPostRepository {
    pool: DbPool,
}

impl SqlxBlogPostRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn BlogPostRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_POSTS: &str = r#"
    SELECT id, title, slug, excerpt, content, content_html, featured_image, author,
           is_published, published_at, created_at, updated_at
    FROM blog_posts
"#;

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepository {
    async fn list(&self) -> Result<Vec<BlogPost>> {
        let sql = format!("{} ORDER BY created_at DESC, id DESC", SELECT_POSTS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list blog posts")?;
        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn list_published(&self) -> Result<Vec<BlogPost>> {
        let sql = format!(
            "{} WHERE is_published = 1 ORDER BY published_at DESC, id DESC",
            SELECT_POSTS
        );
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list published blog posts")?;
        Ok(rows.iter().map(row_to_post).collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<BlogPost>> {
        let sql = format!("{} WHERE id = ?", SELECT_POSTS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get blog post")?;
        Ok(row.as_ref().map(row_to_post))
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<BlogPost>> {
        let sql = format!("{} WHERE slug = ?", SELECT_POSTS);
        let row = sqlx::query(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get blog post by slug")?;
        Ok(row.as_ref().map(row_to_post))
    }

    async fn slug_exists(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM blog_posts WHERE slug = ? AND id != ?")
            .bind(slug)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(&self.pool)
            .await
            .context("Failed to check blog post slug")?;
        let count: i64 = row.get("count");
        Ok(count > 0)
    }

    async fn create(&self, fields: &BlogPostFields) -> Result<BlogPost> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO blog_posts
                (title, slug, excerpt, content, content_html, featured_image, author,
                 is_published, published_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.slug)
        .bind(&fields.excerpt)
        .bind(&fields.content)
        .bind(&fields.content_html)
        .bind(&fields.featured_image)
        .bind(&fields.author)
        .bind(fields.is_published)
        .bind(fields.published_at)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create blog post")?;

        Ok(BlogPost {
            id: result.last_insert_rowid(),
            title: fields.title.clone(),
            slug: fields.slug.clone(),
            excerpt: fields.excerpt.clone(),
            content: fields.content.clone(),
            content_html: fields.content_html.clone(),
            featured_image: fields.featured_image.clone(),
            author: fields.author.clone(),
            is_published: fields.is_published,
            published_at: fields.published_at,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: i64, fields: &BlogPostFields) -> Result<Option<BlogPost>> {
        let result = sqlx::query(
            r#"
            UPDATE blog_posts
            SET title = ?, slug = ?, excerpt = ?, content = ?, content_html = ?,
                featured_image = ?, author = ?, is_published = ?, published_at = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.slug)
        .bind(&fields.excerpt)
        .bind(&fields.content)
        .bind(&fields.content_html)
        .bind(&fields.featured_image)
        .bind(&fields.author)
        .bind(fields.is_published)
        .bind(fields.published_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update blog post")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete blog post")?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_published(
        &self,
        id: i64,
        is_published: bool,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Option<BlogPost>> {
        let result = sqlx::query(
            "UPDATE blog_posts SET is_published = ?, published_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(is_published)
        .bind(published_at)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to toggle blog post")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    async fn count_published(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM blog_posts WHERE is_published = 1")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count published blog posts")?;
        Ok(row.get("count"))
    }
}

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> BlogPost {
    BlogPost {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        content_html: row.get("content_html"),
        featured_image: row.get("featured_image"),
        author: row.get("author"),
        is_published: row.get("is_published"),
        published_at: row.get("published_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::Duration;

    async fn setup() -> SqlxBlogPostRepository {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        SqlxBlogPostRepository::new(pool)
    }

    fn fields(title: &str, slug: &str, published_at: Option<DateTime<Utc>>) -> BlogPostFields {
        BlogPostFields {
            title: title.to_string(),
            slug: slug.to_string(),
            excerpt: String::new(),
            content: "Body".to_string(),
            content_html: "<p>Body</p>\n".to_string(),
            featured_image: String::new(),
            author: "Admin".to_string(),
            is_published: published_at.is_some(),
            published_at,
        }
    }

    #[tokio::test]
    async fn test_published_listing_orders_by_publish_date() {
        let repo = setup().await;
        let now = Utc::now();
        repo.create(&fields("Old", "old", Some(now - Duration::days(3)))).await.unwrap();
        repo.create(&fields("Draft", "draft", None)).await.unwrap();
        repo.create(&fields("New", "new", Some(now))).await.unwrap();

        let published = repo.list_published().await.unwrap();
        let titles: Vec<_> = published.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old"]);
        assert_eq!(repo.count_published().await.unwrap(), 2);
        assert_eq!(repo.list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_slug_lookup_and_uniqueness() {
        let repo = setup().await;
        let post = repo.create(&fields("Hello", "hello", None)).await.unwrap();

        assert_eq!(repo.get_by_slug("hello").await.unwrap().unwrap().id, post.id);
        assert!(repo.slug_exists("hello", None).await.unwrap());
        assert!(!repo.slug_exists("hello", Some(post.id)).await.unwrap());
        assert!(repo.create(&fields("Again", "hello", None)).await.is_err());
    }

    #[tokio::test]
    async fn test_set_published_clears_date() {
        let repo = setup().await;
        let post = repo.create(&fields("Live", "live", Some(Utc::now()))).await.unwrap();

        let hidden = repo.set_published(post.id, false, None).await.unwrap().unwrap();
        assert!(!hidden.is_published);
        assert!(hidden.published_at.is_none());
        assert!(repo.set_published(999, true, None).await.unwrap().is_none());
    }
}
