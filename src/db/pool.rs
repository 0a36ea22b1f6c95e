//! Database connection pool
//!
//! Creates the SQLite pool shared by every repository.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;

/// Pool type handed to repositories and migrations
pub type DbPool = SqlitePool;

fn is_memory_url(url: &str) -> bool {
    url == ":memory:" || url.starts_with("sqlite::memory:")
}

/// Turn a configured path or URL into a connection URL that creates the
/// database file when missing.
fn connection_url(url: &str) -> String {
    if url == ":memory:" {
        "sqlite::memory:".to_string()
    } else if url.starts_with("sqlite:") {
        if url.contains('?') {
            url.to_string()
        } else {
            format!("{}?mode=rwc", url)
        }
    } else {
        format!("sqlite:{}?mode=rwc", url)
    }
}

/// Create the SQLite pool described by `config`.
///
/// The parent directory of a file database is created first. Every
/// in-memory connection is its own database, so `:memory:` pools are capped
/// at a single connection.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool> {
    let url = config.url.as_str();

    if !is_memory_url(url) {
        let path = url.trim_start_matches("sqlite:");
        let path = path.split('?').next().unwrap_or(path);
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
            }
        }
    }

    let options = if is_memory_url(url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
    };

    let pool = options
        .connect(&connection_url(url))
        .await
        .with_context(|| format!("Failed to connect to SQLite database: {}", url))?;

    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .context("Failed to enable foreign keys")?;

    Ok(pool)
}

/// Create a SQLite in-memory database pool for testing
pub async fn create_test_pool() -> Result<DbPool> {
    let config = DatabaseConfig {
        url: ":memory:".to_string(),
        ..DatabaseConfig::default()
    };
    create_pool(&config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_url() {
        assert_eq!(connection_url(":memory:"), "sqlite::memory:");
        assert_eq!(connection_url("data/site.db"), "sqlite:data/site.db?mode=rwc");
        assert_eq!(connection_url("sqlite:site.db"), "sqlite:site.db?mode=rwc");
        assert_eq!(connection_url("sqlite:site.db?mode=ro"), "sqlite:site.db?mode=ro");
    }

    #[tokio::test]
    async fn test_create_test_pool() {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        let (one,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
    }

    #[tokio::test]
    async fn test_memory_pool_keeps_state_across_queries() {
        let pool = create_test_pool().await.unwrap();

        sqlx::query("CREATE TABLE scratch (id INTEGER PRIMARY KEY)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO scratch (id) VALUES (1)")
            .execute(&pool)
            .await
            .unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM scratch")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_sqlite_nested_directory_creation() {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("nested").join("dir").join("site.db");

        let config = DatabaseConfig {
            url: db_path.to_string_lossy().to_string(),
            ..DatabaseConfig::default()
        };

        let pool = create_pool(&config).await.expect("Failed to create pool");
        let (one,): (i64,) = sqlx::query_as("SELECT 1").fetch_one(&pool).await.unwrap();
        assert_eq!(one, 1);
        assert!(db_path.exists());
    }
}
