//! Contact submission service

use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use super::csv_export::{contacts_csv, export_file_name, CsvExport};
use super::{ContentError, Validator};
use crate::db::repositories::ContactRepository;
use crate::models::{ContactInput, ContactStatus, ContactSubmission};

const NOT_FOUND: &str = "Contact submission";

/// Per-status totals for the filter tabs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactCounts {
    pub all: usize,
    pub unread: usize,
    pub read: usize,
}

/// Contact submission service
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
}

impl ContactService {
    pub fn new(repo: Arc<dyn ContactRepository>) -> Self {
        Self { repo }
    }

    /// Accept a message from the public contact form
    pub async fn submit(&self, input: ContactInput) -> Result<ContactSubmission, ContentError> {
        let mut v = Validator::new();
        v.required("name", &input.name, "Name is required")
            .email("email", &input.email, "Please enter a valid email address")
            .min_chars("message", &input.message, 10, "Message must be at least 10 characters");
        v.finish()?;

        let input = ContactInput {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_string(),
            phone: input.phone.trim().to_string(),
            subject: input.subject.trim().to_string(),
            message: input.message.trim().to_string(),
        };
        let contact = self.repo.create(&input).await?;
        tracing::info!("New contact submission {}", contact.id);
        Ok(contact)
    }

    pub async fn list(
        &self,
        status: Option<ContactStatus>,
    ) -> Result<Vec<ContactSubmission>, ContentError> {
        Ok(self.repo.list(status).await?)
    }

    pub async fn counts(&self) -> Result<ContactCounts, ContentError> {
        let all = self.repo.list(None).await?;
        Ok(ContactCounts {
            all: all.len(),
            unread: all.iter().filter(|c| c.status == ContactStatus::Unread).count(),
            read: all.iter().filter(|c| c.status == ContactStatus::Read).count(),
        })
    }

    pub async fn get(&self, id: i64) -> Result<ContactSubmission, ContentError> {
        self.repo
            .get_by_id(id)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: ContactStatus,
    ) -> Result<ContactSubmission, ContentError> {
        self.repo
            .update_status(id, status)
            .await?
            .ok_or(ContentError::NotFound(NOT_FOUND))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ContentError> {
        if !self.repo.delete(id).await? {
            return Err(ContentError::NotFound(NOT_FOUND));
        }
        Ok(())
    }

    pub async fn export_csv(&self) -> Result<CsvExport, ContentError> {
        let contacts = self.repo.list(None).await?;
        Ok(CsvExport {
            file_name: export_file_name("contact-submissions", Utc::now().date_naive()),
            body: contacts_csv(&contacts),
        })
    }
}

pub fn parse_status(raw: &str) -> Result<ContactStatus, ContentError> {
    ContactStatus::parse(raw)
        .ok_or_else(|| ContentError::invalid("status", "Status must be one of: unread, read"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxContactRepository;
    use crate::db::{create_test_pool, migrations};

    async fn service() -> ContactService {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        ContactService::new(SqlxContactRepository::boxed(pool))
    }

    fn input() -> ContactInput {
        ContactInput {
            name: "Lee".to_string(),
            email: "lee@example.com".to_string(),
            message: "Can you move an existing shed?".to_string(),
            ..ContactInput::default()
        }
    }

    #[tokio::test]
    async fn test_submit_and_mark_read() {
        let service = service().await;
        let contact = service.submit(input()).await.unwrap();
        assert_eq!(contact.status, ContactStatus::Unread);

        service.update_status(contact.id, ContactStatus::Read).await.unwrap();
        let counts = service.counts().await.unwrap();
        assert_eq!(counts, ContactCounts { all: 1, unread: 0, read: 1 });
        assert_eq!(service.list(Some(ContactStatus::Read)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let service = service().await;
        let err = service
            .submit(ContactInput {
                email: "lee.example.com".to_string(),
                ..input()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(ref f) if f[0].field == "email"));
    }

    #[tokio::test]
    async fn test_export_and_delete() {
        let service = service().await;
        let contact = service.submit(input()).await.unwrap();
        let export = service.export_csv().await.unwrap();
        assert!(export.file_name.starts_with("contact-submissions-"));
        assert!(export.body.lines().nth(1).unwrap().ends_with("\"unread\""));

        service.delete(contact.id).await.unwrap();
        assert!(matches!(service.delete(contact.id).await, Err(ContentError::NotFound(_))));
    }
}
