//! Quote request model
//!
//! Leads submitted through the public quote form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Follow-up state of a quote request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    /// Not yet answered
    #[default]
    Pending,
    /// The business has replied
    Responded,
}

impl QuoteStatus {
    /// All statuses, in filter tab order
    pub const ALL: [QuoteStatus; 2] = [QuoteStatus::Pending, QuoteStatus::Responded];

    /// Convert status to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Responded => "responded",
        }
    }

    /// Parse status from database string representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(QuoteStatus::Pending),
            "responded" => Some(QuoteStatus::Responded),
            _ => None,
        }
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote request entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub id: i64,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub project_type: String,
    pub material_type: String,
    pub color: String,
    pub size: String,
    pub shed_style: String,
    pub description: String,
    pub budget_range: String,
    pub timeline: String,
    pub status: QuoteStatus,
    /// Internal notes from the back office
    pub notes: String,
    pub custom_message: String,
    /// Storage paths of images attached by the customer
    pub inspiration_images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuoteRequest {
    pub fn has_images(&self) -> bool {
        !self.inspiration_images.is_empty()
    }
}

/// Public quote form submission. Also returned, prefilled, as a draft for
/// a selected shed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteRequestInput {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub project_type: String,
    pub material_type: String,
    pub color: String,
    pub size: String,
    pub shed_style: String,
    pub description: String,
    pub budget_range: String,
    pub timeline: String,
    pub custom_message: String,
    pub inspiration_images: Vec<String>,
}

/// Choices offered by the quote form selects
pub const PROJECT_TYPES: [&str; 5] = [
    "Custom Shed",
    "Garage Addition",
    "Home Addition",
    "Exterior Renovation",
    "Other",
];

pub const MATERIAL_TYPES: [&str; 3] = ["Wood", "Metal", "Vinyl"];

pub const BUDGET_RANGES: [&str; 6] = [
    "Under $2,000",
    "$2,000 - $5,000",
    "$5,000 - $10,000",
    "$10,000 - $20,000",
    "$20,000 - $50,000",
    "Over $50,000",
];

pub const TIMELINES: [&str; 6] = [
    "ASAP",
    "Within 1 month",
    "2-3 months",
    "3-6 months",
    "More than 6 months",
    "Flexible",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_status_roundtrip() {
        for status in QuoteStatus::ALL {
            assert_eq!(QuoteStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(QuoteStatus::parse(" Responded "), Some(QuoteStatus::Responded));
        assert_eq!(QuoteStatus::parse("archived"), None);
    }

    #[test]
    fn test_quote_status_serde_lowercase() {
        let json = serde_json::to_string(&QuoteStatus::Responded).unwrap();
        assert_eq!(json, "\"responded\"");
    }
}
