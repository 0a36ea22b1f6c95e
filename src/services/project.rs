//! Past project service

use std::sync::Arc;

use super::shed::non_blank;
use super::{ContentError, Validator};
use crate::cache::{keys, MemoryCache};
use crate::db::repositories::ProjectRepository;
use crate::models::{PastProject, ProjectInput};

const NOT_FOUND: &str = "Project";

/// Number of projects shown in the home page gallery
pub const RECENT_PROJECTS: i64 = 8;

/// Past project service
pub struct ProjectService {
    repo: Arc<dyn ProjectRepository>,
    cache: Arc<MemoryCache>,
}

impl ProjectService {
    pub fn new(repo: Arc<dyn ProjectRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    pub async fn list(&self) -> Result<Vec<PastProject>, ContentError> {
        Ok(self.repo.list().await?)
    }

    /// Newest projects for the home page gallery
    pub async fn recent(&self) -> Result<Vec<PastProject>, ContentError> {
        Ok(self.repo.list_recent(RECENT_PROJECTS).await?)
    }

    pub async fn featured(&self) -> Result<Vec<PastProject>, ContentError> {
        let projects = self
            .cache
            .get_or_load(keys::FEATURED_PROJECTS, || self.repo.list_featured())
            .await?;
        Ok(projects)
    }

    pub async fn get(&self, id: i64) -> Result<PastProject, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn create(&self, input: ProjectInput) -> Result<PastProject, ContentError> {
        let input = validate(input)?;
        let project = self.repo.create(&input).await?;
        self.invalidate().await;
        tracing::info!("Created project {} ({})", project.id, project.title);
        Ok(project)
    }

    pub async fn update(&self, id: i64, input: ProjectInput) -> Result<PastProject, ContentError> {
        let input = validate(input)?;
        let project = self
            .repo
            .update(id, &input)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.invalidate().await;
        Ok(project)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.repo.delete(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }
        self.invalidate().await;
        Ok(())
    }

    pub async fn toggle_featured(&self, id: i64) -> Result<PastProject, ContentError> {
        let current = self.get(id).await?;
        let project = self
            .repo
            .set_featured(id, !current.is_featured)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.invalidate().await;
        Ok(project)
    }

    pub async fn count(&self) -> Result<i64, ContentError> {
        Ok(self.repo.count().await?)
    }

    async fn invalidate(&self) {
        self.cache.delete(keys::FEATURED_PROJECTS).await;
    }
}

fn validate(input: ProjectInput) -> Result<ProjectInput, ContentError> {
    let mut v = Validator::new();
    v.required("title", &input.title, "Title is required")
        .required("project_type", &input.project_type, "Project type is required");
    v.finish()?;

    let completion_date = input
        .completion_date
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(ProjectInput {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        project_type: input.project_type.trim().to_string(),
        images: non_blank(input.images),
        completion_date,
        location: input.location.trim().to_string(),
        is_featured: input.is_featured,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxProjectRepository;
    use crate::db::{create_test_pool, migrations};

    async fn service() -> ProjectService {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        ProjectService::new(SqlxProjectRepository::boxed(pool), Arc::new(MemoryCache::new()))
    }

    fn input(title: &str) -> ProjectInput {
        ProjectInput {
            title: title.to_string(),
            project_type: "Garage Addition".to_string(),
            completion_date: Some("   ".to_string()),
            ..ProjectInput::default()
        }
    }

    #[tokio::test]
    async fn test_blank_completion_date_is_dropped() {
        let service = service().await;
        let project = service.create(input("Two-car garage")).await.unwrap();
        assert!(project.completion_date.is_none());
    }

    #[tokio::test]
    async fn test_requires_title_and_type() {
        let service = service().await;
        let err = service.create(ProjectInput::default()).await.unwrap_err();
        assert!(matches!(err, ContentError::Validation(ref f) if f.len() == 2));
    }

    #[tokio::test]
    async fn test_home_gallery_shows_newest_eight() {
        let service = service().await;
        for i in 0..10 {
            service.create(input(&format!("Project {}", i))).await.unwrap();
        }
        let recent = service.recent().await.unwrap();
        assert_eq!(recent.len(), 8);
        assert_eq!(recent[0].title, "Project 9");
    }

    #[tokio::test]
    async fn test_toggle_featured_updates_cached_list() {
        let service = service().await;
        let project = service.create(input("Porch")).await.unwrap();
        assert!(service.featured().await.unwrap().is_empty());

        service.toggle_featured(project.id).await.unwrap();
        assert_eq!(service.featured().await.unwrap().len(), 1);
    }
}
