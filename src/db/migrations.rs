//! Database migrations module
//!
//! Code-based migrations embedded in the binary as SQL strings. Each
//! migration runs once; applied versions are tracked in `_migrations`.
//!
//! # Usage
//!
//! ```ignore
//! use shedyard::db::{create_pool, migrations};
//!
//! let pool = create_pool(&config).await?;
//! migrations::run_migrations(&pool).await?;
//! ```

use anyhow::{Context, Result};
use sqlx::Row;

use super::DbPool;

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration version number (must be unique and sequential)
    pub version: i32,
    /// Human-readable migration name
    pub name: &'static str,
    /// SQL statements, separated by `;`
    pub up: &'static str,
}

/// All migrations, in application order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "create_users_and_sessions",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username VARCHAR(50) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS sessions (
                id VARCHAR(64) PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                expires_at TIMESTAMP NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
        "#,
    },
    Migration {
        version: 2,
        name: "create_business_settings",
        up: r#"
            CREATE TABLE IF NOT EXISTS business_settings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                business_name VARCHAR(255) NOT NULL,
                phone VARCHAR(50) NOT NULL DEFAULT '',
                email VARCHAR(255) NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT '',
                hours TEXT NOT NULL DEFAULT '{}',
                facebook_url TEXT NOT NULL DEFAULT '',
                instagram_url TEXT NOT NULL DEFAULT '',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    Migration {
        version: 3,
        name: "create_catalog_tables",
        up: r#"
            CREATE TABLE IF NOT EXISTS shed_listings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                material_type VARCHAR(100) NOT NULL,
                color VARCHAR(100) NOT NULL,
                size VARCHAR(100) NOT NULL,
                shed_style VARCHAR(100) NOT NULL,
                price REAL,
                images TEXT NOT NULL DEFAULT '[]',
                specifications TEXT NOT NULL DEFAULT '{}',
                is_featured BOOLEAN NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_shed_listings_active ON shed_listings(is_active);
            CREATE TABLE IF NOT EXISTS past_projects (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                project_type VARCHAR(100) NOT NULL,
                images TEXT NOT NULL DEFAULT '[]',
                completion_date VARCHAR(32),
                location VARCHAR(255) NOT NULL DEFAULT '',
                is_featured BOOLEAN NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS reviews (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_name VARCHAR(255) NOT NULL,
                rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                review_text TEXT NOT NULL,
                project_type VARCHAR(100) NOT NULL DEFAULT '',
                is_featured BOOLEAN NOT NULL DEFAULT 0,
                is_approved BOOLEAN NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    Migration {
        version: 4,
        name: "create_blog_posts",
        up: r#"
            CREATE TABLE IF NOT EXISTS blog_posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                slug VARCHAR(255) NOT NULL UNIQUE,
                excerpt TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL,
                content_html TEXT NOT NULL DEFAULT '',
                featured_image TEXT NOT NULL DEFAULT '',
                author VARCHAR(255) NOT NULL,
                is_published BOOLEAN NOT NULL DEFAULT 0,
                published_at TIMESTAMP,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_blog_posts_published ON blog_posts(is_published, published_at);
        "#,
    },
    Migration {
        version: 5,
        name: "create_leads",
        up: r#"
            CREATE TABLE IF NOT EXISTS quote_requests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                phone VARCHAR(50) NOT NULL DEFAULT '',
                project_type VARCHAR(100) NOT NULL,
                material_type VARCHAR(100) NOT NULL DEFAULT '',
                color VARCHAR(100) NOT NULL DEFAULT '',
                size VARCHAR(100) NOT NULL DEFAULT '',
                shed_style VARCHAR(100) NOT NULL DEFAULT '',
                description TEXT NOT NULL,
                budget_range VARCHAR(100) NOT NULL DEFAULT '',
                timeline VARCHAR(100) NOT NULL DEFAULT '',
                status VARCHAR(20) NOT NULL DEFAULT 'pending',
                notes TEXT NOT NULL DEFAULT '',
                custom_message TEXT NOT NULL DEFAULT '',
                inspiration_images TEXT NOT NULL DEFAULT '[]',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_quote_requests_status ON quote_requests(status);
            CREATE TABLE IF NOT EXISTS contact_submissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                phone VARCHAR(50) NOT NULL DEFAULT '',
                subject VARCHAR(255) NOT NULL DEFAULT '',
                message TEXT NOT NULL,
                status VARCHAR(20) NOT NULL DEFAULT 'unread',
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_contact_submissions_status ON contact_submissions(status);
        "#,
    },
    Migration {
        version: 6,
        name: "create_home_page_tables",
        up: r#"
            CREATE TABLE IF NOT EXISTS home_content (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                section_name VARCHAR(100) NOT NULL UNIQUE,
                title VARCHAR(255) NOT NULL,
                subtitle TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL DEFAULT '',
                image_url TEXT NOT NULL DEFAULT '',
                cta_text VARCHAR(255) NOT NULL DEFAULT '',
                cta_link TEXT NOT NULL DEFAULT '',
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
            CREATE TABLE IF NOT EXISTS video_carousel (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                video_url TEXT NOT NULL,
                thumbnail_url TEXT NOT NULL DEFAULT '',
                order_index INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );
        "#,
    },
    Migration {
        version: 7,
        name: "seed_defaults",
        up: r#"
            INSERT OR IGNORE INTO home_content (section_name, title, subtitle, cta_text, cta_link)
            VALUES ('hero', 'Quality Sheds Built to Last', 'Custom sheds, garages and additions built by local craftsmen', 'Get a Free Quote', '/#quote');
            INSERT OR IGNORE INTO home_content (section_name, title, subtitle, cta_text, cta_link)
            VALUES ('sheds_hero', 'Browse Our Sheds', 'Pick a design or tell us what you need', 'Request a Custom Shed', '/sheds#quote');
            INSERT INTO business_settings (business_name, hours)
            SELECT 'Shedyard Builders', '{"monday":"7:00 AM - 6:00 PM","tuesday":"7:00 AM - 6:00 PM","wednesday":"7:00 AM - 6:00 PM","thursday":"7:00 AM - 6:00 PM","friday":"7:00 AM - 6:00 PM","saturday":"8:00 AM - 4:00 PM","sunday":"Closed"}'
            WHERE NOT EXISTS (SELECT 1 FROM business_settings);
        "#,
    },
];

/// Run all pending migrations.
///
/// Returns the number of migrations applied.
pub async fn run_migrations(pool: &DbPool) -> Result<usize> {
    create_migrations_table(pool).await?;

    let applied = applied_versions(pool).await?;
    let mut count = 0;

    for migration in MIGRATIONS {
        if applied.contains(&migration.version) {
            continue;
        }
        tracing::info!("Applying migration {}: {}", migration.version, migration.name);
        apply_migration(pool, migration)
            .await
            .with_context(|| format!("Failed to apply migration: {}", migration.name))?;
        count += 1;
    }

    if count > 0 {
        tracing::info!("Applied {} migration(s)", count);
    } else {
        tracing::debug!("No pending migrations");
    }

    Ok(count)
}

async fn create_migrations_table(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version INTEGER PRIMARY KEY,
            name VARCHAR(255) NOT NULL UNIQUE,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create migrations table")?;
    Ok(())
}

async fn applied_versions(pool: &DbPool) -> Result<Vec<i32>> {
    let rows = sqlx::query("SELECT version FROM _migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .context("Failed to read applied migrations")?;

    Ok(rows.iter().map(|row| row.get::<i32, _>("version")).collect())
}

/// Apply a single migration inside a transaction so a failing statement
/// leaves no partial schema behind.
async fn apply_migration(pool: &DbPool, migration: &Migration) -> Result<()> {
    let mut tx = pool.begin().await?;

    for statement in split_sql_statements(migration.up) {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Failed to execute: {}", truncate_sql(statement)))?;
    }

    sqlx::query("INSERT INTO _migrations (version, name) VALUES (?, ?)")
        .bind(migration.version)
        .bind(migration.name)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Truncate SQL for error messages
fn truncate_sql(sql: &str) -> String {
    match sql.char_indices().nth(100) {
        Some((idx, _)) => format!("{}...", &sql[..idx]),
        None => sql.to_string(),
    }
}

/// Split SQL into individual statements, dropping comment-only fragments.
/// Statements must not contain `;` inside string literals.
fn split_sql_statements(sql: &str) -> Vec<&str> {
    sql.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty() && !is_comment_only(s))
        .collect()
}

fn is_comment_only(s: &str) -> bool {
    s.lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with("--"))
}
