//! User service
//!
//! Back office accounts and login sessions:
//! - Bootstrapping the admin account from configuration
//! - Login/logout with session tokens
//! - Session validation and expiry cleanup

use anyhow::Context;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crate::config::AdminConfig;
use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{CreateUserInput, Session, User};
use crate::services::password::{hash_password, verify_password};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Login form
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub username_or_email: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(username_or_email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username_or_email: username_or_email.into(),
            password: password.into(),
        }
    }
}

/// User service for accounts and authentication
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_days: i64,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_days: session_days.max(1),
        }
    }

    /// Create the configured admin account when no account exists yet.
    ///
    /// Returns the created user, or `None` when accounts already exist or
    /// no bootstrap password is configured.
    pub async fn bootstrap_admin(&self, admin: &AdminConfig) -> Result<Option<User>, UserServiceError> {
        let count = self.user_repo.count().await.context("Failed to count users")?;
        if count > 0 {
            return Ok(None);
        }

        let Some(password) = admin.password.as_deref().filter(|p| !p.is_empty()) else {
            tracing::warn!("No admin account exists and admin.password is not set; the back office is unreachable");
            return Ok(None);
        };
        if admin.username.trim().is_empty() {
            return Err(UserServiceError::ValidationError(
                "Admin username cannot be empty".to_string(),
            ));
        }

        let password_hash = hash_password(password).context("Failed to hash password")?;
        let user = self
            .user_repo
            .create(&CreateUserInput {
                username: admin.username.trim().to_string(),
                email: admin.email.trim().to_string(),
                password_hash,
            })
            .await
            .context("Failed to create admin user")?;

        tracing::info!("Created admin account '{}'", user.username);
        Ok(Some(user))
    }

    /// Check credentials and open a new session
    pub async fn login(&self, input: LoginInput) -> Result<Session, UserServiceError> {
        let user = self
            .find_user_by_username_or_email(&input.username_or_email)
            .await?
            .ok_or_else(|| UserServiceError::AuthenticationError(INVALID_CREDENTIALS.to_string()))?;

        let password_valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;
        if !password_valid {
            return Err(UserServiceError::AuthenticationError(
                INVALID_CREDENTIALS.to_string(),
            ));
        }

        let session = Session::open(user.id, self.session_days, Utc::now());
        let session = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        tracing::info!("User '{}' logged in", user.username);
        Ok(session)
    }

    /// Invalidate a session. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// User behind a session token, or `None` when the token is unknown or
    /// expired. Expired sessions are deleted on sight.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let Some(session) = self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        else {
            return Ok(None);
        };

        if session.is_expired() {
            if let Err(e) = self.session_repo.delete(token).await {
                tracing::warn!("Failed to delete expired session: {}", e);
            }
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get user")?;
        Ok(user)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        let user = self
            .user_repo
            .get_by_id(id)
            .await
            .context("Failed to get user by ID")?;
        Ok(user)
    }

    /// Delete all expired sessions, returning how many were removed
    pub async fn cleanup_expired_sessions(&self) -> Result<u64, UserServiceError> {
        let count = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to delete expired sessions")?;
        Ok(count)
    }

    async fn find_user_by_username_or_email(
        &self,
        username_or_email: &str,
    ) -> Result<Option<User>, UserServiceError> {
        let needle = username_or_email.trim();
        if needle.is_empty() {
            return Ok(None);
        }
        if let Some(user) = self
            .user_repo
            .get_by_username(needle)
            .await
            .context("Failed to get user by username")?
        {
            return Ok(Some(user));
        }
        let user = self
            .user_repo
            .get_by_email(needle)
            .await
            .context("Failed to get user by email")?;
        Ok(user)
    }
}
