//! Quote request service
//!
//! Public quote submissions plus the back office lead inbox.

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use super::csv_export::{export_file_name, quotes_csv, CsvExport};
use super::shed::non_blank;
use super::{ContentError, Validator};
use crate::db::repositories::QuoteRepository;
use crate::models::quote::{BUDGET_RANGES, MATERIAL_TYPES, PROJECT_TYPES, TIMELINES};
use crate::models::{QuoteRequest, QuoteRequestInput, QuoteStatus};

const NOT_FOUND: &str = "Quote request";

/// Per-status totals for the filter tabs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuoteCounts {
    pub all: usize,
    pub pending: usize,
    pub responded: usize,
}

/// Choices offered by the quote form
#[derive(Debug, Clone, Serialize)]
pub struct QuoteFormOptions {
    pub project_types: Vec<&'static str>,
    pub material_types: Vec<&'static str>,
    pub budget_ranges: Vec<&'static str>,
    pub timelines: Vec<&'static str>,
}

pub fn form_options() -> QuoteFormOptions {
    QuoteFormOptions {
        project_types: PROJECT_TYPES.to_vec(),
        material_types: MATERIAL_TYPES.to_vec(),
        budget_ranges: BUDGET_RANGES.to_vec(),
        timelines: TIMELINES.to_vec(),
    }
}

/// Quote request service
pub struct QuoteService {
    repo: Arc<dyn QuoteRepository>,
}

impl QuoteService {
    pub fn new(repo: Arc<dyn QuoteRepository>) -> Self {
        Self { repo }
    }

    /// Accept a quote request from the public form. New requests are
    /// always pending.
    pub async fn submit(&self, input: QuoteRequestInput) -> Result<QuoteRequest, ContentError> {
        let mut v = Validator::new();
        v.min_chars("customer_name", &input.customer_name, 2, "Name must be at least 2 characters")
            .email("email", &input.email, "Please enter a valid email address")
            .required("project_type", &input.project_type, "Please select a project type")
            .min_chars(
                "description",
                &input.description,
                10,
                "Please provide more details about your project",
            );
        v.finish()?;

        let input = QuoteRequestInput {
            customer_name: input.customer_name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            project_type: input.project_type.trim().to_string(),
            material_type: input.material_type.trim().to_string(),
            color: input.color.trim().to_string(),
            size: input.size.trim().to_string(),
            shed_style: input.shed_style.trim().to_string(),
            description: input.description.trim().to_string(),
            budget_range: input.budget_range.trim().to_string(),
            timeline: input.timeline.trim().to_string(),
            custom_message: input.custom_message.trim().to_string(),
            inspiration_images: non_blank(input.inspiration_images),
        };

        let quote = self.repo.create(&input).await?;
        tracing::info!(
            "New quote request {} ({}, {} images)",
            quote.id,
            quote.project_type,
            quote.inspiration_images.len()
        );
        Ok(quote)
    }

    pub async fn list(&self, status: Option<QuoteStatus>) -> Result<Vec<QuoteRequest>, ContentError> {
        Ok(self.repo.list(status).await?)
    }

    pub async fn counts(&self) -> Result<QuoteCounts, ContentError> {
        let all = self.repo.list(None).await?;
        Ok(QuoteCounts {
            all: all.len(),
            pending: all.iter().filter(|q| q.status == QuoteStatus::Pending).count(),
            responded: all.iter().filter(|q| q.status == QuoteStatus::Responded).count(),
        })
    }

    pub async fn get(&self, id: i64) -> Result<QuoteRequest, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn update_status(&self, id: i64, status: QuoteStatus) -> Result<QuoteRequest, ContentError> {
        self.repo
            .update_status(id, status)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn update_notes(&self, id: i64, notes: &str) -> Result<QuoteRequest, ContentError> {
        self.repo
            .update_notes(id, notes.trim())
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.repo.delete(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }
        Ok(())
    }

    /// CSV of every request, newest first
    pub async fn export_csv(&self) -> Result<CsvExport, ContentError> {
        let quotes = self.repo.list(None).await?;
        Ok(CsvExport {
            file_name: export_file_name("quote-requests", Utc::now().date_naive()),
            body: quotes_csv(&quotes),
        })
    }
}

/// Parse a status string from a request, as a field error when unknown
pub fn parse_status(raw: &str) -> Result<QuoteStatus, ContentError> {
    QuoteStatus::parse(raw)
        .ok_or_else(|| ContentError::invalid("status", "Status must be one of: pending, responded"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxQuoteRepository;
    use crate::db::{create_test_pool, migrations};

    async fn service() -> QuoteService {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        QuoteService::new(SqlxQuoteRepository::boxed(pool))
    }

    fn input() -> QuoteRequestInput {
        QuoteRequestInput {
            customer_name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            project_type: "Custom Shed".to_string(),
            description: "A 10x12 shed with a loft".to_string(),
            inspiration_images: vec!["quotes/1-a.png".to_string(), "".to_string()],
            ..QuoteRequestInput::default()
        }
    }

    #[tokio::test]
    async fn test_submit_is_pending_and_keeps_images() {
        let service = service().await;
        let quote = service.submit(input()).await.unwrap();
        assert_eq!(quote.status, QuoteStatus::Pending);
        assert_eq!(quote.inspiration_images, vec!["quotes/1-a.png"]);
    }

    #[tokio::test]
    async fn test_submit_validation() {
        let service = service().await;
        let err = service
            .submit(QuoteRequestInput {
                customer_name: "J".to_string(),
                email: "jo@".to_string(),
                description: "short".to_string(),
                ..QuoteRequestInput::default()
            })
            .await
            .unwrap_err();
        match err {
            ContentError::Validation(fields) => {
                let messages: Vec<_> = fields.iter().map(|f| f.message.as_str()).collect();
                assert_eq!(
                    messages,
                    vec![
                        "Name must be at least 2 characters",
                        "Please enter a valid email address",
                        "Please select a project type",
                        "Please provide more details about your project",
                    ]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_status_workflow_and_counts() {
        let service = service().await;
        let a = service.submit(input()).await.unwrap();
        service.submit(input()).await.unwrap();

        service.update_status(a.id, QuoteStatus::Responded).await.unwrap();
        let counts = service.counts().await.unwrap();
        assert_eq!(
            counts,
            QuoteCounts {
                all: 2,
                pending: 1,
                responded: 1
            }
        );

        let noted = service.update_notes(a.id, "  Sent estimate ").await.unwrap();
        assert_eq!(noted.notes, "Sent estimate");
        assert!(matches!(
            service.update_status(99, QuoteStatus::Pending).await,
            Err(ContentError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_export_csv() {
        let service = service().await;
        service.submit(input()).await.unwrap();
        let export = service.export_csv().await.unwrap();
        assert!(export.file_name.starts_with("quote-requests-"));
        assert!(export.file_name.ends_with(".csv"));
        assert_eq!(export.body.lines().count(), 2);
        assert!(export.body.lines().nth(1).unwrap().ends_with("\"pending\",\"\",\"Yes\""));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("responded").unwrap(), QuoteStatus::Responded);
        assert!(matches!(parse_status("closed"), Err(ContentError::Validation(_))));
    }
}
