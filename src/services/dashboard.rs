//! Back office dashboard statistics

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use super::ContentError;
use crate::db::repositories::{ContactRepository, ProjectRepository, QuoteRepository, ReviewRepository};

const RECENT_DAYS: i64 = 7;

/// Dashboard counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_quotes: i64,
    pub total_contacts: i64,
    pub total_projects: i64,
    pub total_reviews: i64,
    pub recent_quotes: usize,
    pub recent_contacts: usize,
    pub requests: RequestSnapshot,
}

/// Point-in-time copy of the request counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestSnapshot {
    pub total_requests: u64,
    pub average_latency_ms: f64,
    pub uptime_seconds: u64,
}

/// Request counters updated by the HTTP layer
pub struct RequestStats {
    total_requests: AtomicU64,
    total_latency_micros: AtomicU64,
    started_at: Instant,
}

impl RequestStats {
    pub fn new() -> Self {
        Self {
            total_requests: AtomicU64::new(0),
            total_latency_micros: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn record(&self, latency: std::time::Duration) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.total_latency_micros
            .fetch_add(latency.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RequestSnapshot {
        let total = self.total_requests.load(Ordering::Relaxed);
        let latency = self.total_latency_micros.load(Ordering::Relaxed);
        RequestSnapshot {
            total_requests: total,
            average_latency_ms: if total == 0 {
                0.0
            } else {
                latency as f64 / total as f64 / 1000.0
            },
            uptime_seconds: self.started_at.elapsed().as_secs(),
        }
    }
}

impl Default for RequestStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Count timestamps strictly after `now - 7 days`
pub fn count_recent(timestamps: &[DateTime<Utc>], now: DateTime<Utc>) -> usize {
    let cutoff = now - Duration::days(RECENT_DAYS);
    timestamps.iter().filter(|t| **t > cutoff).count()
}

/// Dashboard service
pub struct DashboardService {
    quotes: Arc<dyn QuoteRepository>,
    contacts: Arc<dyn ContactRepository>,
    projects: Arc<dyn ProjectRepository>,
    reviews: Arc<dyn ReviewRepository>,
    requests: Arc<RequestStats>,
}

impl DashboardService {
    pub fn new(
        quotes: Arc<dyn QuoteRepository>,
        contacts: Arc<dyn ContactRepository>,
        projects: Arc<dyn ProjectRepository>,
        reviews: Arc<dyn ReviewRepository>,
        requests: Arc<RequestStats>,
    ) -> Self {
        Self {
            quotes,
            contacts,
            projects,
            reviews,
            requests,
        }
    }

    pub async fn stats(&self) -> Result<DashboardStats, ContentError> {
        let (total_quotes, total_contacts, total_projects, total_reviews, quote_times, contact_times) =
            futures::try_join!(
                self.quotes.count(),
                self.contacts.count(),
                self.projects.count(),
                self.reviews.count(),
                self.quotes.created_timestamps(),
                self.contacts.created_timestamps(),
            )?;

        let now = Utc::now();
        Ok(DashboardStats {
            total_quotes,
            total_contacts,
            total_projects,
            total_reviews,
            recent_quotes: count_recent(&quote_times, now),
            recent_contacts: count_recent(&contact_times, now),
            requests: self.requests.snapshot(),
        })
    }
}
