//! Login rate limiting
//!
//! Failed logins are tracked per username (case-insensitive). Five failures
//! inside fifteen minutes lock the name until the oldest one ages out.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

const MAX_FAILED_ATTEMPTS: usize = 5;
const WINDOW_MINUTES: i64 = 15;

/// Login rate limiter
#[derive(Default)]
pub struct LoginRateLimiter {
    attempts: RwLock<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl LoginRateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    fn cutoff() -> DateTime<Utc> {
        Utc::now() - Duration::minutes(WINDOW_MINUTES)
    }

    pub async fn is_limited(&self, username: &str) -> bool {
        let cutoff = Self::cutoff();
        let attempts = self.attempts.read().await;
        attempts
            .get(&username.to_lowercase())
            .map(|times| times.iter().filter(|t| **t > cutoff).count() >= MAX_FAILED_ATTEMPTS)
            .unwrap_or(false)
    }

    pub async fn record_failure(&self, username: &str) {
        let cutoff = Self::cutoff();
        let mut attempts = self.attempts.write().await;
        let times = attempts.entry(username.to_lowercase()).or_default();
        times.retain(|t| *t > cutoff);
        times.push(Utc::now());
    }

    /// Forget failures after a successful login
    pub async fn clear(&self, username: &str) {
        self.attempts.write().await.remove(&username.to_lowercase());
    }

    /// Drop aged-out entries; run periodically
    pub async fn cleanup(&self) {
        let cutoff = Self::cutoff();
        let mut attempts = self.attempts.write().await;
        attempts.retain(|_, times| {
            times.retain(|t| *t > cutoff);
            !times.is_empty()
        });
    }

    #[cfg(test)]
    async fn tracked_names(&self) -> usize {
        self.attempts.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_locks_after_five_failures() {
        let limiter = LoginRateLimiter::new();
        for _ in 0..4 {
            limiter.record_failure("admin").await;
            assert!(!limiter.is_limited("admin").await);
        }
        limiter.record_failure("admin").await;
        assert!(limiter.is_limited("admin").await);
        assert!(!limiter.is_limited("someone-else").await);

        limiter.clear("admin").await;
        assert!(!limiter.is_limited("admin").await);
    }

    #[tokio::test]
    async fn test_usernames_are_case_insensitive() {
        let limiter = LoginRateLimiter::new();
        for name in ["Admin", "ADMIN", "admin", "aDmin", "admiN"] {
            limiter.record_failure(name).await;
        }
        assert!(limiter.is_limited("admin").await);
    }

    #[tokio::test]
    async fn test_cleanup_keeps_recent_entries() {
        let limiter = LoginRateLimiter::new();
        limiter.record_failure("admin").await;
        limiter.cleanup().await;
        assert_eq!(limiter.tracked_names().await, 1);
    }
}
