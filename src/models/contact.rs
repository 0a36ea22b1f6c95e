//! Contact submission model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read state of a contact submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Unread,
    Read,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 2] = [ContactStatus::Unread, ContactStatus::Read];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::Unread => "unread",
            ContactStatus::Read => "read",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unread" => Some(ContactStatus::Unread),
            "read" => Some(ContactStatus::Read),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contact submission entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public contact form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub message: String,
}
