//! Configuration management
//!
//! This module handles loading and parsing configuration for the Shedyard service.
//! Configuration can be loaded from:
//! - config.yml file
//! - Environment variables (override file settings)
//!
//! Missing optional values are filled with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Object storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Back office account configuration
    #[serde(default)]
    pub admin: AdminConfig,
    /// Sitemap submission configuration
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS allowed origin (for cookie-based auth)
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Public site URL, used for absolute links in the sitemap
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Directory holding the built front-end, served for non-API paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
            base_url: default_base_url(),
            static_dir: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path or URL (`:memory:` for an in-memory database)
    #[serde(default = "default_database_url")]
    pub url: String,
    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "data/shedyard.db".to_string()
}

fn default_max_connections() -> u32 {
    20
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Default TTL in seconds
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    /// Maximum number of cached entries
    #[serde(default = "default_max_entries")]
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            max_entries: default_max_entries(),
        }
    }
}

fn default_ttl() -> u64 {
    3600
}

fn default_max_entries() -> u64 {
    10_000
}

/// Object storage configuration.
///
/// Each bucket is a directory under `path`; uploads are only accepted for
/// buckets listed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding one sub-directory per bucket
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
    /// Known bucket names
    #[serde(default = "default_buckets")]
    pub buckets: Vec<String>,
    /// Maximum file size in bytes (default: 10MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
    /// Allowed image MIME types
    #[serde(default = "default_allowed_types")]
    pub allowed_types: Vec<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            buckets: default_buckets(),
            max_file_size: default_max_file_size(),
            allowed_types: default_allowed_types(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("storage")
}

fn default_buckets() -> Vec<String> {
    vec!["images".to_string()]
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024 // 10MB
}

fn default_allowed_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/png".to_string(),
        "image/gif".to_string(),
        "image/webp".to_string(),
    ]
}

impl StorageConfig {
    /// Check if a MIME type is allowed
    pub fn is_type_allowed(&self, mime_type: &str) -> bool {
        self.allowed_types.iter().any(|t| t == mime_type)
    }
}

/// Back office account configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Username of the account created on first start
    #[serde(default = "default_admin_username")]
    pub username: String,
    /// Email of the account created on first start
    #[serde(default = "default_admin_email")]
    pub email: String,
    /// Password of the account created on first start; no account is
    /// created while this is unset
    #[serde(default)]
    pub password: Option<String>,
    /// Session lifetime in days
    #[serde(default = "default_session_days")]
    pub session_days: i64,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_admin_username(),
            email: default_admin_email(),
            password: None,
            session_days: default_session_days(),
        }
    }
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_email() -> String {
    "admin@localhost".to_string()
}

fn default_session_days() -> i64 {
    7
}

/// A search engine that accepts sitemap submissions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PingEndpoint {
    /// Display name reported back to the admin
    pub engine: String,
    /// Endpoint prefix; the encoded sitemap URL is appended to it
    pub url: String,
}

/// Sitemap submission configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    /// Whether pings are sent at all
    #[serde(default = "default_ping_enabled")]
    pub ping_enabled: bool,
    /// Search engines to notify
    #[serde(default = "default_ping_endpoints")]
    pub ping_endpoints: Vec<PingEndpoint>,
    /// Per-request timeout in seconds
    #[serde(default = "default_ping_timeout")]
    pub ping_timeout_seconds: u64,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            ping_enabled: default_ping_enabled(),
            ping_endpoints: default_ping_endpoints(),
            ping_timeout_seconds: default_ping_timeout(),
        }
    }
}

fn default_ping_enabled() -> bool {
    true
}

fn default_ping_endpoints() -> Vec<PingEndpoint> {
    vec![
        PingEndpoint {
            engine: "Google".to_string(),
            url: "https://www.google.com/ping?sitemap=".to_string(),
        },
        PingEndpoint {
            engine: "Bing".to_string(),
            url: "https://www.bing.com/ping?sitemap=".to_string(),
        },
    ]
}

fn default_ping_timeout() -> u64 {
    10
}

/// Error type for configuration parsing
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },
}

impl Config {
    /// Load configuration from file
    ///
    /// If the file doesn't exist or is empty, returns default configuration.
    /// If the file exists but is invalid YAML, returns an error with details.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: format_yaml_error(&e),
        })
    }

    /// Load configuration from file with environment variable overrides
    ///
    /// Environment variables follow the pattern:
    /// - SHEDYARD_SERVER_HOST
    /// - SHEDYARD_SERVER_PORT
    /// - SHEDYARD_SERVER_CORS_ORIGIN
    /// - SHEDYARD_SERVER_BASE_URL
    /// - SHEDYARD_DATABASE_URL
    /// - SHEDYARD_CACHE_TTL_SECONDS
    /// - SHEDYARD_STORAGE_PATH
    /// - SHEDYARD_ADMIN_USERNAME
    /// - SHEDYARD_ADMIN_PASSWORD
    /// - SHEDYARD_SITEMAP_PING_ENABLED
    pub fn load_with_env(path: &std::path::Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides to the configuration.
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SHEDYARD_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("SHEDYARD_SERVER_PORT") {
            if let Ok(port) = port.parse::<u16>() {
                self.server.port = port;
            }
        }
        if let Ok(cors_origin) = std::env::var("SHEDYARD_SERVER_CORS_ORIGIN") {
            self.server.cors_origin = cors_origin;
        }
        if let Ok(base_url) = std::env::var("SHEDYARD_SERVER_BASE_URL") {
            self.server.base_url = base_url;
        }

        if let Ok(url) = std::env::var("SHEDYARD_DATABASE_URL") {
            self.database.url = url;
        }

        if let Ok(ttl) = std::env::var("SHEDYARD_CACHE_TTL_SECONDS") {
            if let Ok(ttl) = ttl.parse::<u64>() {
                self.cache.ttl_seconds = ttl;
            }
        }

        if let Ok(path) = std::env::var("SHEDYARD_STORAGE_PATH") {
            self.storage.path = PathBuf::from(path);
        }

        if let Ok(username) = std::env::var("SHEDYARD_ADMIN_USERNAME") {
            self.admin.username = username;
        }
        if let Ok(password) = std::env::var("SHEDYARD_ADMIN_PASSWORD") {
            if !password.is_empty() {
                self.admin.password = Some(password);
            }
        }

        if let Ok(enabled) = std::env::var("SHEDYARD_SITEMAP_PING_ENABLED") {
            if let Ok(enabled) = enabled.parse::<bool>() {
                self.sitemap.ping_enabled = enabled;
            }
        }
    }
}

/// Format YAML parsing error with location and context
fn format_yaml_error(e: &serde_yaml::Error) -> String {
    match e.location() {
        Some(location) => format!(
            "at line {}, column {}: {}",
            location.line(),
            location.column(),
            e
        ),
        None => e.to_string(),
    }
}

// Shared by every test that touches process environment variables.
#[cfg(test)]
static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
const ENV_KEYS: &[&str] = &[
    "SHEDYARD_SERVER_HOST",
    "SHEDYARD_SERVER_PORT",
    "SHEDYARD_SERVER_CORS_ORIGIN",
    "SHEDYARD_SERVER_BASE_URL",
    "SHEDYARD_DATABASE_URL",
    "SHEDYARD_CACHE_TTL_SECONDS",
    "SHEDYARD_STORAGE_PATH",
    "SHEDYARD_ADMIN_USERNAME",
    "SHEDYARD_ADMIN_PASSWORD",
    "SHEDYARD_SITEMAP_PING_ENABLED",
];

#[cfg(test)]
fn clear_env() {
    for key in ENV_KEYS {
        std::env::remove_var(key);
    }
}
