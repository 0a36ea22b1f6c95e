//! Customer review service

use std::sync::Arc;

use super::{ContentError, Validator};
use crate::cache::{keys, MemoryCache};
use crate::db::repositories::ReviewRepository;
use crate::models::{Review, ReviewFlag, ReviewInput};

const NOT_FOUND: &str = "Review";

/// Reviews shown on the home page
pub const SHOWCASE_SIZE: i64 = 6;

/// Customer review service
pub struct ReviewService {
    repo: Arc<dyn ReviewRepository>,
    cache: Arc<MemoryCache>,
}

impl ReviewService {
    pub fn new(repo: Arc<dyn ReviewRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    pub async fn list(&self) -> Result<Vec<Review>, ContentError> {
        Ok(self.repo.list().await?)
    }

    /// Approved, featured reviews for the home page
    pub async fn showcase(&self) -> Result<Vec<Review>, ContentError> {
        let reviews = self
            .cache
            .get_or_load(keys::SHOWCASE_REVIEWS, || self.repo.list_showcase(SHOWCASE_SIZE))
            .await?;
        Ok(reviews)
    }

    pub async fn get(&self, id: i64) -> Result<Review, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn create(&self, input: ReviewInput) -> Result<Review, ContentError> {
        let input = validate(input)?;
        let review = self.repo.create(&input).await?;
        self.invalidate().await;
        Ok(review)
    }

    pub async fn update(&self, id: i64, input: ReviewInput) -> Result<Review, ContentError> {
        let input = validate(input)?;
        let review = self
            .repo
            .update(id, &input)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.invalidate().await;
        Ok(review)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.repo.delete(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }
        self.invalidate().await;
        Ok(())
    }

    /// Flip `is_featured` or `is_approved`
    pub async fn toggle(&self, id: i64, flag: ReviewFlag) -> Result<Review, ContentError> {
        let current = self.get(id).await?;
        let value = match flag {
            ReviewFlag::Featured => !current.is_featured,
            ReviewFlag::Approved => !current.is_approved,
        };
        let review = self
            .repo
            .set_flag(id, flag, value)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.invalidate().await;
        Ok(review)
    }

    pub async fn count(&self) -> Result<i64, ContentError> {
        Ok(self.repo.count().await?)
    }

    async fn invalidate(&self) {
        self.cache.delete(keys::SHOWCASE_REVIEWS).await;
    }
}

fn validate(input: ReviewInput) -> Result<ReviewInput, ContentError> {
    let mut v = Validator::new();
    v.required("customer_name", &input.customer_name, "Customer name is required")
        .at_least("rating", input.rating, 1, "Rating is required")
        .at_most("rating", input.rating, 5, "Rating cannot exceed 5")
        .min_chars(
            "review_text",
            &input.review_text,
            10,
            "Review text must be at least 10 characters",
        );
    v.finish()?;

    Ok(ReviewInput {
        customer_name: input.customer_name.trim().to_string(),
        review_text: input.review_text.trim().to_string(),
        project_type: input.project_type.trim().to_string(),
        ..input
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxReviewRepository;
    use crate::db::{create_test_pool, migrations};

    async fn service() -> ReviewService {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        ReviewService::new(SqlxReviewRepository::boxed(pool), Arc::new(MemoryCache::new()))
    }

    fn input(rating: i64) -> ReviewInput {
        ReviewInput {
            customer_name: "Dana".to_string(),
            rating,
            review_text: "They built our shed in two days.".to_string(),
            ..ReviewInput::default()
        }
    }

    #[tokio::test]
    async fn test_rating_bounds() {
        let service = service().await;
        for bad in [0, 6, -3] {
            let err = service.create(input(bad)).await.unwrap_err();
            assert!(matches!(err, ContentError::Validation(ref f) if f[0].field == "rating"));
        }
        for good in 1..=5 {
            assert!(service.create(input(good)).await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_short_review_rejected() {
        let service = service().await;
        let err = service
            .create(ReviewInput {
                review_text: "Great!".to_string(),
                ..input(5)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(ref f) if f[0].field == "review_text"));
    }

    #[tokio::test]
    async fn test_showcase_follows_toggles() {
        let service = service().await;
        let review = service.create(input(5)).await.unwrap();
        assert!(service.showcase().await.unwrap().is_empty());

        service.toggle(review.id, ReviewFlag::Approved).await.unwrap();
        assert!(service.showcase().await.unwrap().is_empty());

        let both = service.toggle(review.id, ReviewFlag::Featured).await.unwrap();
        assert!(both.is_approved && both.is_featured);
        assert_eq!(service.showcase().await.unwrap().len(), 1);
    }
}
