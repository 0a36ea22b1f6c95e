//! Business settings service
//!
//! The settings row feeds the site header and footer. Reads are cached;
//! saving replaces the cached copy.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::hours::{format_business_hours, format_detailed_hours};
use super::{ContentError, Validator};
use crate::cache::{keys, MemoryCache};
use crate::db::repositories::{BusinessSettingsFields, BusinessSettingsRepository};
use crate::models::{default_hours, BusinessSettings, BusinessSettingsInput, WEEK_DAYS};

/// Settings plus the preformatted hours the header and footer display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(flatten)]
    pub settings: BusinessSettings,
    pub hours_summary: String,
    pub hours_detailed: Vec<String>,
}

/// Business settings service
pub struct SettingsService {
    repo: Arc<dyn BusinessSettingsRepository>,
    cache: Arc<MemoryCache>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn BusinessSettingsRepository>, cache: Arc<MemoryCache>) -> Self {
        Self { repo, cache }
    }

    /// Current settings, or built-in defaults when nothing was saved yet
    pub async fn get(&self) -> Result<BusinessSettings, ContentError> {
        let settings = self
            .cache
            .get_or_load(keys::SETTINGS, || async {
                Ok(self.repo.get().await?.unwrap_or_else(BusinessSettings::fallback))
            })
            .await?;
        Ok(settings)
    }

    pub async fn site_info(&self) -> Result<SiteInfo, ContentError> {
        let settings = self.get().await?;
        let hours = (!settings.hours.is_empty()).then_some(&settings.hours);
        let hours_summary = format_business_hours(hours);
        let hours_detailed = format_detailed_hours(hours);
        Ok(SiteInfo {
            settings,
            hours_summary,
            hours_detailed,
        })
    }

    /// Validate and store the settings, creating the row on first save
    pub async fn save(&self, input: BusinessSettingsInput) -> Result<BusinessSettings, ContentError> {
        let mut v = Validator::new();
        v.required("business_name", &input.business_name, "Business name is required")
            .optional_email("email", &input.email, "Please enter a valid email")
            .optional_url("facebook_url", &input.facebook_url, "Please enter a valid URL")
            .optional_url("instagram_url", &input.instagram_url, "Please enter a valid URL");
        v.finish()?;

        let fields = normalize(input);
        let saved = match self.repo.get().await? {
            Some(existing) => self.repo.update(existing.id, &fields).await?,
            None => self.repo.insert(&fields).await?,
        };

        self.cache.delete(keys::SETTINGS).await;
        tracing::info!("Business settings saved");
        Ok(saved)
    }
}

fn normalize(input: BusinessSettingsInput) -> BusinessSettingsFields {
    let mut hours = default_hours();
    if let Some(submitted) = input.hours {
        for (day, value) in submitted {
            let day = day.trim().to_lowercase();
            if WEEK_DAYS.contains(&day.as_str()) {
                hours.insert(day, value.trim().to_string());
            }
        }
    }

    BusinessSettingsFields {
        business_name: input.business_name.trim().to_string(),
        phone: input.phone.trim().to_string(),
        email: input.email.trim().to_string(),
        address: input.address.trim().to_string(),
        hours,
        facebook_url: input.facebook_url.trim().to_string(),
        instagram_url: input.instagram_url.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxBusinessSettingsRepository;
    use crate::db::{create_test_pool, migrations};
    use std::collections::BTreeMap;

    async fn service() -> SettingsService {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        SettingsService::new(
            SqlxBusinessSettingsRepository::boxed(pool),
            Arc::new(MemoryCache::new()),
        )
    }

    #[tokio::test]
    async fn test_get_returns_seeded_row() {
        let service = service().await;
        let settings = service.get().await.unwrap();
        assert!(settings.id > 0);
        assert_eq!(settings.hours["sunday"], "Closed");
    }

    #[tokio::test]
    async fn test_save_merges_hours_and_refreshes_cache() {
        let service = service().await;
        service.get().await.unwrap();

        let mut hours = BTreeMap::new();
        hours.insert("Saturday".to_string(), " Closed ".to_string());
        hours.insert("holiday".to_string(), "never".to_string());

        let saved = service
            .save(BusinessSettingsInput {
                business_name: "Acme Sheds".to_string(),
                email: "office@acme.test".to_string(),
                hours: Some(hours),
                ..BusinessSettingsInput::default()
            })
            .await
            .unwrap();

        assert_eq!(saved.hours.len(), 7);
        assert_eq!(saved.hours["saturday"], "Closed");
        assert_eq!(saved.hours["monday"], "7:00 AM - 6:00 PM");
        assert!(!saved.hours.contains_key("holiday"));

        let reread = service.get().await.unwrap();
        assert_eq!(reread.business_name, "Acme Sheds");
        assert_eq!(reread.id, saved.id);
    }

    #[tokio::test]
    async fn test_save_validation() {
        let service = service().await;
        let err = service
            .save(BusinessSettingsInput {
                email: "not-an-email".to_string(),
                facebook_url: "facebook".to_string(),
                ..BusinessSettingsInput::default()
            })
            .await
            .unwrap_err();

        match err {
            ContentError::Validation(fields) => {
                let names: Vec<_> = fields.iter().map(|f| f.field.as_str()).collect();
                assert_eq!(names, vec!["business_name", "email", "facebook_url"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_site_info_formats_hours() {
        let service = service().await;
        let info = service.site_info().await.unwrap();
        assert_eq!(
            info.hours_summary,
            "Mon-Fri: 7:00 AM - 6:00 PM | Sat: 8:00 AM - 4:00 PM"
        );
        assert_eq!(info.hours_detailed.len(), 7);
    }
}
