//! API middleware
//!
//! Contains:
//! - Shared application state
//! - The JSON error type every handler returns
//! - Session authentication for the back office routes
//! - Request statistics for the dashboard

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::db::repositories::{
    SqlxBlogPostRepository, SqlxBusinessSettingsRepository, SqlxContactRepository,
    SqlxHomeContentRepository, SqlxProjectRepository, SqlxQuoteRepository, SqlxReviewRepository,
    SqlxSessionRepository, SqlxShedRepository, SqlxUserRepository, SqlxVideoRepository,
};
use crate::db::DbPool;
use crate::models::User;
use crate::services::{
    BlogService, ContactService, ContentError, DashboardService, HomeContentService,
    LoginRateLimiter, ProjectService, QuoteService, RequestStats, ReviewService,
    SettingsService, ShedService, SitemapService, StorageError, StorageService, UserService,
    UserServiceError, VideoService,
};

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub cache: Arc<MemoryCache>,
    pub user_service: Arc<UserService>,
    pub settings_service: Arc<SettingsService>,
    pub shed_service: Arc<ShedService>,
    pub project_service: Arc<ProjectService>,
    pub review_service: Arc<ReviewService>,
    pub blog_service: Arc<BlogService>,
    pub quote_service: Arc<QuoteService>,
    pub contact_service: Arc<ContactService>,
    pub home_content_service: Arc<HomeContentService>,
    pub video_service: Arc<VideoService>,
    pub sitemap_service: Arc<SitemapService>,
    pub storage_service: Arc<StorageService>,
    pub dashboard_service: Arc<DashboardService>,
    pub rate_limiter: Arc<LoginRateLimiter>,
    pub request_stats: Arc<RequestStats>,
    pub session_days: i64,
    /// Mark the session cookie `Secure`; set when `server.base_url` is https
    pub secure_cookies: bool,
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    /// Wire repositories and services over one pool and cache
    pub fn new(pool: DbPool, cache: Arc<MemoryCache>, config: &Config) -> Self {
        let quotes = SqlxQuoteRepository::boxed(pool.clone());
        let contacts = SqlxContactRepository::boxed(pool.clone());
        let projects = SqlxProjectRepository::boxed(pool.clone());
        let reviews = SqlxReviewRepository::boxed(pool.clone());
        let posts = SqlxBlogPostRepository::boxed(pool.clone());
        let sheds = SqlxShedRepository::boxed(pool.clone());
        let request_stats = Arc::new(RequestStats::new());

        Self {
            user_service: Arc::new(UserService::new(
                SqlxUserRepository::boxed(pool.clone()),
                SqlxSessionRepository::boxed(pool.clone()),
                config.admin.session_days,
            )),
            settings_service: Arc::new(SettingsService::new(
                SqlxBusinessSettingsRepository::boxed(pool.clone()),
                cache.clone(),
            )),
            shed_service: Arc::new(ShedService::new(sheds.clone(), cache.clone())),
            project_service: Arc::new(ProjectService::new(projects.clone(), cache.clone())),
            review_service: Arc::new(ReviewService::new(reviews.clone(), cache.clone())),
            blog_service: Arc::new(BlogService::new(posts.clone(), cache.clone())),
            quote_service: Arc::new(QuoteService::new(quotes.clone())),
            contact_service: Arc::new(ContactService::new(contacts.clone())),
            home_content_service: Arc::new(HomeContentService::new(
                SqlxHomeContentRepository::boxed(pool.clone()),
                cache.clone(),
            )),
            video_service: Arc::new(VideoService::new(
                SqlxVideoRepository::boxed(pool.clone()),
                cache.clone(),
            )),
            sitemap_service: Arc::new(SitemapService::new(
                posts,
                projects.clone(),
                sheds,
                config.server.base_url.clone(),
                config.sitemap.clone(),
            )),
            storage_service: Arc::new(StorageService::new(config.storage.clone())),
            dashboard_service: Arc::new(DashboardService::new(
                quotes,
                contacts,
                projects,
                reviews,
                request_stats.clone(),
            )),
            rate_limiter: Arc::new(LoginRateLimiter::new()),
            request_stats,
            session_days: config.admin.session_days,
            secure_cookies: config.server.base_url.starts_with("https://"),
            static_dir: config.server.static_dir.clone(),
            pool,
            cache,
        }
    }
}

/// Authenticated user extracted from request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn too_many_requests(message: impl Into<String>, retry_after: u64) -> Self {
        Self::with_details(
            "TOO_MANY_REQUESTS",
            message,
            serde_json::json!({ "retry_after": retry_after }),
        )
    }

    /// Log the cause and answer with a generic message
    pub fn internal(cause: impl std::fmt::Display) -> Self {
        tracing::error!("Internal error: {}", cause);
        Self::new("INTERNAL_ERROR", "Internal server error")
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "CONFLICT" => StatusCode::CONFLICT,
            "TOO_MANY_REQUESTS" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Validation(ref fields) => Self::with_details(
                "VALIDATION_ERROR",
                err.to_string(),
                serde_json::json!({ "fields": fields }),
            ),
            ContentError::NotFound(_) => Self::not_found(err.to_string()),
            ContentError::Conflict(message) => Self::conflict(message),
            ContentError::Internal(e) => Self::internal(format!("{:#}", e)),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Io(e) => Self::internal(format!("Upload failed: {}", e)),
            other => Self::validation_error(other.to_string()),
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::AuthenticationError(message) => Self::unauthorized(message),
            UserServiceError::ValidationError(message) => Self::validation_error(message),
            UserServiceError::InternalError(e) => Self::internal(format!("{:#}", e)),
        }
    }
}

/// Session token from `Authorization: Bearer` or the `session` cookie
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
    {
        return Some(token.to_string());
    }

    headers
        .get(header::COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .find_map(|c| c.trim().strip_prefix("session="))
                .filter(|t| !t.is_empty())
                .map(str::to_string)
        })
}

/// Authentication middleware
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let user = state
        .user_service
        .validate_session(&token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

/// Request statistics middleware
pub async fn request_stats_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    state.request_stats.record(start.elapsed());
    response
}
