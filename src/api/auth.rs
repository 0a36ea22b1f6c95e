//! Authentication API endpoints
//!
//! - POST /api/v1/auth/login - Open a back office session
//! - POST /api/v1/auth/logout - Close the current session
//! - GET /api/v1/auth/me - Current user

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::api::middleware::{extract_session_token, ApiError, AppState, AuthenticatedUser};
use crate::models::User;
use crate::services::user::{LoginInput, UserServiceError};

/// Seconds a locked-out username has to wait
const LOCKOUT_SECONDS: u64 = 15 * 60;

/// Response for successful authentication
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub expires_at: String,
}

/// Response for user info
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

/// Routes that need no session
pub fn public_router() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Routes behind `require_auth`
pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(get_current_user))
}

/// `Set-Cookie` value for the session token. `Secure` is added when the
/// site is served over https.
fn session_cookie(token: &str, max_age: i64, secure: bool) -> String {
    let mut cookie = format!(
        "session={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        token, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginInput>,
) -> Result<impl IntoResponse, ApiError> {
    let username = body.username_or_email.trim().to_string();

    if state.rate_limiter.is_limited(&username).await {
        tracing::warn!("Login for '{}' blocked by rate limit", username);
        return Err(ApiError::too_many_requests(
            "Too many failed login attempts. Please try again in 15 minutes.",
            LOCKOUT_SECONDS,
        ));
    }

    let session = match state.user_service.login(body).await {
        Ok(session) => session,
        Err(e @ UserServiceError::AuthenticationError(_)) => {
            state.rate_limiter.record_failure(&username).await;
            tracing::info!("Failed login for '{}'", username);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };
    state.rate_limiter.clear(&username).await;

    let user = state
        .user_service
        .get_by_id(session.user_id)
        .await?
        .ok_or_else(|| ApiError::internal("Session created for a missing user"))?;

    let cookie = session_cookie(
        &session.id,
        state.session_days * 24 * 60 * 60,
        state.secure_cookies,
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(ApiError::internal)?,
    );

    Ok((
        headers,
        Json(AuthResponse {
            user: user.into(),
            token: session.id,
            expires_at: session.expires_at.to_rfc3339(),
        }),
    ))
}

/// POST /api/v1/auth/logout
async fn logout(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_session_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;
    state.user_service.logout(&token).await?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&session_cookie("", 0, state.secure_cookies))
            .map_err(ApiError::internal)?,
    );
    Ok((StatusCode::NO_CONTENT, response_headers))
}

/// GET /api/v1/auth/me
async fn get_current_user(user: AuthenticatedUser) -> Json<UserResponse> {
    Json(user.0.into())
}
