//! User model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Back office account. Every account has full admin access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Login name
    pub username: String,
    /// Email address (also accepted at login)
    pub email: String,
    /// Argon2 PHC hash, never serialized
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
