//! Customer review model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Customer review entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub customer_name: String,
    /// Star rating, 1 to 5
    pub rating: i64,
    pub review_text: String,
    pub project_type: String,
    pub is_featured: bool,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewInput {
    pub customer_name: String,
    pub rating: i64,
    pub review_text: String,
    pub project_type: String,
    pub is_featured: bool,
    pub is_approved: bool,
}

/// Boolean review flags that can be toggled from the back office
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewFlag {
    Featured,
    Approved,
}

impl ReviewFlag {
    /// Column holding the flag
    pub fn column(&self) -> &'static str {
        match self {
            ReviewFlag::Featured => "is_featured",
            ReviewFlag::Approved => "is_approved",
        }
    }

    /// Parse the flag from a path segment (`featured`, `is_featured`, ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim_start_matches("is_") {
            "featured" => Some(ReviewFlag::Featured),
            "approved" => Some(ReviewFlag::Approved),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_flag_parse() {
        assert_eq!(ReviewFlag::parse("featured"), Some(ReviewFlag::Featured));
        assert_eq!(ReviewFlag::parse("is_approved"), Some(ReviewFlag::Approved));
        assert_eq!(ReviewFlag::parse("rating"), None);
        assert_eq!(ReviewFlag::Approved.column(), "is_approved");
    }
}
