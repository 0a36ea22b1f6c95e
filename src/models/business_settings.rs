//! Business settings model
//!
//! A single row holding the contact details and opening hours shown in the
//! site header and footer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opening hours keyed by lowercase weekday name (`monday` .. `sunday`)
pub type BusinessHours = BTreeMap<String, String>;

/// Weekday keys in display order
pub const WEEK_DAYS: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Hours used for a freshly created settings row
pub fn default_hours() -> BusinessHours {
    WEEK_DAYS
        .iter()
        .map(|day| {
            let hours = match *day {
                "saturday" => "8:00 AM - 4:00 PM",
                "sunday" => "Closed",
                _ => "7:00 AM - 6:00 PM",
            };
            (day.to_string(), hours.to_string())
        })
        .collect()
}

/// Business settings entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessSettings {
    pub id: i64,
    pub business_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: BusinessHours,
    pub facebook_url: String,
    pub instagram_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BusinessSettings {
    /// Settings served before the back office has saved anything
    pub fn fallback() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            business_name: "Shedyard Builders".to_string(),
            phone: String::new(),
            email: String::new(),
            address: String::new(),
            hours: default_hours(),
            facebook_url: String::new(),
            instagram_url: String::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Settings form submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessSettingsInput {
    pub business_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Missing days keep their default hours
    pub hours: Option<BusinessHours>,
    pub facebook_url: String,
    pub instagram_url: String,
}
