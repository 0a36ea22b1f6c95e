//! API layer - HTTP handlers and routing
//!
//! JSON API under `/api/v1`:
//! - Public site data (settings, home page, catalog, blog)
//! - Public forms (quote requests, contact, inspiration uploads)
//! - Session login
//! - Back office managers under `/api/v1/admin`, behind `require_auth`
//!
//! Outside the API: `/sitemap.xml`, uploaded files under `/storage` and the
//! single-page front end as the fallback.

pub mod auth;
pub mod blog;
pub mod contacts;
pub mod dashboard;
pub mod home_content;
pub mod middleware;
pub mod projects;
pub mod quotes;
pub mod responses;
pub mod reviews;
pub mod settings;
pub mod sheds;
pub mod site;
pub mod sitemap;
pub mod static_files;
pub mod upload;
pub mod videos;


use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir,
    set_header::{SetResponseHeader, SetResponseHeaderLayer},
    trace::TraceLayer,
};

use crate::config::{Config, StorageConfig};

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Files accepted in one multipart request
const MAX_FILES_PER_REQUEST: u64 = 10;

/// Build the `/api/v1` router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    let admin_routes = Router::new()
        .nest("/dashboard", dashboard::admin_router())
        .nest("/quotes", quotes::admin_router())
        .nest("/contacts", contacts::admin_router())
        .nest("/projects", projects::admin_router())
        .nest("/sheds", sheds::admin_router())
        .nest("/reviews", reviews::admin_router())
        .nest("/blog", blog::admin_router())
        .nest("/home-content", home_content::admin_router())
        .nest("/videos", videos::admin_router())
        .nest("/settings", settings::admin_router())
        .nest("/sitemap", sitemap::admin_router())
        .merge(upload::admin_router());

    let protected_routes = Router::new()
        .nest("/admin", admin_routes)
        .merge(auth::protected_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ));

    Router::new()
        .merge(site::router())
        .merge(auth::public_router())
        .nest("/sheds", sheds::public_router())
        .nest("/blog", blog::public_router())
        .nest("/projects", projects::public_router())
        .nest("/quotes", quotes::public_router())
        .nest("/contact", contacts::public_router())
        .nest("/uploads", upload::public_router())
        .merge(protected_routes)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE]);

    match origin.parse::<HeaderValue>() {
        // Credentials cannot be combined with a wildcard origin.
        Ok(value) if value == "*" => base.allow_origin(tower_http::cors::Any),
        Ok(value) => base.allow_origin(value).allow_credentials(true),
        Err(e) => {
            tracing::warn!("Ignoring invalid CORS origin {:?}: {}", origin, e);
            base
        }
    }
}

type StorageFiles = SetResponseHeader<SetResponseHeader<ServeDir, HeaderValue>, HeaderValue>;

/// Read-only file server for uploaded files. Responses are never sniffed
/// and never run as documents.
fn storage_service(config: &Config) -> StorageFiles {
    ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; sandbox"),
        ))
        .service(ServeDir::new(&config.storage.path))
}

fn upload_body_limit(storage: &StorageConfig) -> usize {
    storage
        .max_file_size
        .saturating_mul(MAX_FILES_PER_REQUEST)
        .try_into()
        .unwrap_or(usize::MAX)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, config: &Config) -> Router {
    Router::new()
        .nest("/api/v1", build_api_router(state.clone()))
        .route("/sitemap.xml", get(sitemap::serve_sitemap))
        .nest_service("/storage", storage_service(config))
        .fallback(static_files::serve_static)
        .layer(
            ServiceBuilder::new()
                .layer(axum_middleware::from_fn_with_state(
                    state.clone(),
                    middleware::request_stats_middleware,
                ))
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&config.server.cors_origin))
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(upload_body_limit(&config.storage))),
        )
        .with_state(state)
}
