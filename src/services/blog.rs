//! Blog service
//!
//! Posts are written in Markdown and rendered once on save. Publishing
//! stamps `published_at`; unpublishing clears it.

use chrono::Utc;
use std::sync::Arc;

use super::{slugify, ContentError, MarkdownRenderer, Validator};
use crate::cache::{keys, MemoryCache};
use crate::db::repositories::BlogPostRepository;
use crate::models::{BlogPost, BlogPostFields, BlogPostInput};

const NOT_FOUND: &str = "Blog post";

/// Blog service
pub struct BlogService {
    repo: Arc<dyn BlogPostRepository>,
    cache: Arc<MemoryCache>,
    renderer: MarkdownRenderer,
}

impl BlogService {
    pub fn new(repo: Arc<dyn BlogPostRepository>, cache: Arc<MemoryCache>) -> Self {
        Self {
            repo,
            cache,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Every post, drafts included
    pub async fn list(&self) -> Result<Vec<BlogPost>, ContentError> {
        Ok(self.repo.list().await?)
    }

    /// Published posts, most recent first
    pub async fn list_published(&self) -> Result<Vec<BlogPost>, ContentError> {
        let posts = self
            .cache
            .get_or_load(keys::PUBLISHED_POSTS, || self.repo.list_published())
            .await?;
        Ok(posts)
    }

    pub async fn get(&self, id: i64) -> Result<BlogPost, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    /// A published post by slug; drafts are not found
    pub async fn get_published(&self, slug: &str) -> Result<BlogPost, ContentError> {
        let post: Option<BlogPost> = self
            .cache
            .get_or_load(&keys::blog_post(slug), || async {
                Ok(self.repo.get_by_slug(slug).await?.filter(|p| p.is_published))
            })
            .await?;
        post.ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn create(&self, input: BlogPostInput) -> Result<BlogPost, ContentError> {
        let fields = self.prepare(input)?;
        self.ensure_unique_slug(&fields.slug, None).await?;

        let post = self.repo.create(&fields).await?;
        self.invalidate().await;
        tracing::info!("Created blog post {} ({})", post.id, post.slug);
        Ok(post)
    }

    pub async fn update(&self, id: i64, input: BlogPostInput) -> Result<BlogPost, ContentError> {
        let fields = self.prepare(input)?;
        self.ensure_unique_slug(&fields.slug, Some(id)).await?;

        let post = self
            .repo
            .update(id, &fields)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.invalidate().await;
        Ok(post)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.repo.delete(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }
        self.invalidate().await;
        Ok(())
    }

    /// Publish a draft (stamped now) or take a post offline
    pub async fn toggle_publish(&self, id: i64) -> Result<BlogPost, ContentError> {
        let current = self.get(id).await?;
        let publish = !current.is_published;
        let published_at = publish.then(Utc::now);

        let post = self
            .repo
            .set_published(id, publish, published_at)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.invalidate().await;
        Ok(post)
    }

    fn prepare(&self, input: BlogPostInput) -> Result<BlogPostFields, ContentError> {
        let slug = if input.slug.trim().is_empty() {
            slugify(&input.title)
        } else {
            slugify(&input.slug)
        };

        let mut v = Validator::new();
        v.required("title", &input.title, "Title is required")
            .required("slug", &slug, "Slug is required")
            .min_chars("content", &input.content, 10, "Content is required")
            .required("author", &input.author, "Author is required");
        v.finish()?;

        let published_at = if input.is_published {
            Some(input.published_at.unwrap_or_else(Utc::now))
        } else {
            None
        };

        Ok(BlogPostFields {
            title: input.title.trim().to_string(),
            content_html: self.renderer.render(&input.content),
            slug,
            excerpt: input.excerpt.trim().to_string(),
            content: input.content,
            featured_image: input.featured_image.trim().to_string(),
            author: input.author.trim().to_string(),
            is_published: input.is_published,
            published_at,
        })
    }

    async fn ensure_unique_slug(&self, slug: &str, exclude: Option<i64>) -> Result<(), ContentError> {
        if self.repo.slug_exists(slug, exclude).await? {
            return Err(ContentError::Conflict(format!(
                "A blog post with slug '{}' already exists",
                slug
            )));
        }
        Ok(())
    }

    async fn invalidate(&self) {
        self.cache.delete_prefix(keys::BLOG_PREFIX).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxBlogPostRepository;
    use crate::db::{create_test_pool, migrations};
    use chrono::{Duration, TimeZone};

    async fn service() -> BlogService {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        BlogService::new(SqlxBlogPostRepository::boxed(pool), Arc::new(MemoryCache::new()))
    }

    fn input(title: &str, published: bool) -> BlogPostInput {
        BlogPostInput {
            title: title.to_string(),
            content: "## Why size matters\n\nMeasure twice.".to_string(),
            author: "Shedyard Team".to_string(),
            is_published: published,
            ..BlogPostInput::default()
        }
    }

    #[tokio::test]
    async fn test_slug_generated_from_title_and_content_rendered() {
        let service = service().await;
        let post = service.create(input("Picking the Right Shed Size!", false)).await.unwrap();
        assert_eq!(post.slug, "picking-the-right-shed-size");
        assert!(post.content_html.contains("<h2>Why size matters</h2>"));
        assert!(post.published_at.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_conflict() {
        let service = service().await;
        service.create(input("Winter Prep", true)).await.unwrap();
        let err = service.create(input("Winter Prep", true)).await.unwrap_err();
        assert!(matches!(err, ContentError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_own_slug() {
        let service = service().await;
        let post = service.create(input("Winter Prep", false)).await.unwrap();
        let mut changed = input("Winter Prep", false);
        changed.excerpt = "Get ready".to_string();
        let updated = service.update(post.id, changed).await.unwrap();
        assert_eq!(updated.excerpt, "Get ready");
    }

    #[tokio::test]
    async fn test_publish_date_rules() {
        let service = service().await;
        let explicit = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let mut dated = input("Dated", true);
        dated.published_at = Some(explicit);
        let post = service.create(dated).await.unwrap();
        assert_eq!(post.published_at, Some(explicit));

        let hidden = service.toggle_publish(post.id).await.unwrap();
        assert!(!hidden.is_published);
        assert!(hidden.published_at.is_none());

        let shown = service.toggle_publish(post.id).await.unwrap();
        let stamped = shown.published_at.unwrap();
        assert!(Utc::now() - stamped < Duration::minutes(1));
    }

    #[tokio::test]
    async fn test_public_reads_hide_drafts() {
        let service = service().await;
        let draft = service.create(input("Draft Post", false)).await.unwrap();
        service.create(input("Live Post", true)).await.unwrap();

        let published = service.list_published().await.unwrap();
        assert_eq!(published.len(), 1);
        assert!(matches!(
            service.get_published(&draft.slug).await,
            Err(ContentError::NotFound(_))
        ));

        service.toggle_publish(draft.id).await.unwrap();
        assert_eq!(service.list_published().await.unwrap().len(), 2);
        assert!(service.get_published("draft-post").await.is_ok());
    }

    #[tokio::test]
    async fn test_validation_messages() {
        let service = service().await;
        let err = service
            .create(BlogPostInput {
                content: "short".to_string(),
                ..BlogPostInput::default()
            })
            .await
            .unwrap_err();
        match err {
            ContentError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["title", "slug", "content", "author"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
