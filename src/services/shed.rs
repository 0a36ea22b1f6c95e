//! Shed catalog service

use std::sync::Arc;

use super::{ContentError, Validator};
use crate::cache::{keys, MemoryCache};
use crate::db::repositories::ShedRepository;
use crate::models::{QuoteRequestInput, ShedInput, ShedListing, ShedSpecifications};

const NOT_FOUND: &str = "Shed listing";

/// Shed catalog service
pub struct ShedService {
    repo: Arc<dyn ShedRepository>,
    cache: Arc<MemoryCache>,
}

impl ShedService {
    pub fn new(repo: Arc<dyn ShedRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    /// Every listing, for the back office
    pub async fn list(&self) -> Result<Vec<ShedListing>, ContentError> {
        Ok(self.repo.list().await?)
    }

    /// Active listings, featured first
    pub async fn list_active(&self) -> Result<Vec<ShedListing>, ContentError> {
        let sheds = self
            .cache
            .get_or_load(keys::ACTIVE_SHEDS, || self.repo.list_active())
            .await?;
        Ok(sheds)
    }

    pub async fn get(&self, id: i64) -> Result<ShedListing, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    /// A listing visible on the public site
    pub async fn get_active(&self, id: i64) -> Result<ShedListing, ContentError> {
        let shed = self.get(id).await?;
        if !shed.is_active {
            return Err(ContentError::NotFound(NOT_FOUND));
        }
        Ok(shed)
    }

    pub async fn create(&self, input: ShedInput) -> Result<ShedListing, ContentError> {
        let input = validate(input)?;
        let shed = self.repo.create(&input).await?;
        self.invalidate().await;
        tracing::info!("Created shed listing {} ({})", shed.id, shed.title);
        Ok(shed)
    }

    pub async fn update(&self, id: i64, input: ShedInput) -> Result<ShedListing, ContentError> {
        let input = validate(input)?;
        let shed = self
            .repo
            .update(id, &input)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.invalidate().await;
        Ok(shed)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.repo.delete(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }
        self.invalidate().await;
        tracing::info!("Deleted shed listing {}", id);
        Ok(())
    }

    /// Flip the active flag
    pub async fn toggle_active(&self, id: i64) -> Result<ShedListing, ContentError> {
        let current = self.get(id).await?;
        let shed = self
            .repo
            .set_active(id, !current.is_active)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))?;
        self.invalidate().await;
        Ok(shed)
    }

    /// Quote form prefilled from an active listing
    pub async fn quote_draft(&self, id: i64) -> Result<QuoteRequestInput, ContentError> {
        let shed = self.get_active(id).await?;
        Ok(quote_draft(&shed))
    }

    async fn invalidate(&self) {
        self.cache.delete(keys::ACTIVE_SHEDS).await;
    }
}

/// Quote request carrying the attributes of the chosen listing
pub fn quote_draft(shed: &ShedListing) -> QuoteRequestInput {
    QuoteRequestInput {
        project_type: "Custom Shed".to_string(),
        material_type: shed.material_type.clone(),
        color: shed.color.clone(),
        size: shed.size.clone(),
        shed_style: shed.shed_style.clone(),
        description: format!("I'm interested in the {}", shed.title),
        ..QuoteRequestInput::default()
    }
}

fn validate(input: ShedInput) -> Result<ShedInput, ContentError> {
    let mut v = Validator::new();
    v.required("title", &input.title, "Title is required")
        .required("material_type", &input.material_type, "Material type is required")
        .required("color", &input.color, "Color is required")
        .required("size", &input.size, "Size is required")
        .required("shed_style", &input.shed_style, "Shed style is required");
    if let Some(price) = input.price {
        if !price.is_finite() {
            v.reject("price", "Price must be a number");
        }
        v.at_least("price", price, 0.0, "Price must be positive");
    }
    v.finish()?;

    Ok(ShedInput {
        title: input.title.trim().to_string(),
        description: input.description.trim().to_string(),
        material_type: input.material_type.trim().to_string(),
        color: input.color.trim().to_string(),
        size: input.size.trim().to_string(),
        shed_style: input.shed_style.trim().to_string(),
        images: non_blank(input.images),
        specifications: ShedSpecifications {
            standard_features: non_blank(input.specifications.standard_features),
            optional_upgrades: non_blank(input.specifications.optional_upgrades),
        },
        ..input
    })
}

/// Trim entries and drop the empty ones
pub(crate) fn non_blank(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}
