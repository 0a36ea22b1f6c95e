//! Business settings repository
//!
//! The table holds at most one meaningful row; reads return the oldest one.

use crate::db::DbPool;
use crate::models::{BusinessHours, BusinessSettings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

use super::{decode_json, encode_json};

/// Column values written on save
#[derive(Debug, Clone)]
pub struct BusinessSettingsFields {
    pub business_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub hours: BusinessHours,
    pub facebook_url: String,
    pub instagram_url: String,
}

/// Business settings repository trait
#[async_trait]
pub trait BusinessSettingsRepository: Send + Sync {
    /// Get the settings row, if one exists
    async fn get(&self) -> Result<Option<BusinessSettings>>;

    /// Insert the settings row
    async fn insert(&self, fields: &BusinessSettingsFields) -> Result<BusinessSettings>;

    /// Overwrite the settings row with the given id
    async fn update(&self, id: i64, fields: &BusinessSettingsFields) -> Result<BusinessSettings>;
}

/// SQLx-based business settings repository
pub struct SqlxBusinessSettingsRepository {
    pool: DbPool,
}

impl SqlxBusinessSettingsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DbPool) -> Arc<dyn BusinessSettingsRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_SETTINGS: &str = r#"
    SELECT id, business_name, phone, email, address, hours, facebook_url, instagram_url,
           created_at, updated_at
    FROM business_settings
"#;

#[async_trait]
impl BusinessSettingsRepository for SqlxBusinessSettingsRepository {
    async fn get(&self) -> Result<Option<BusinessSettings>> {
        let sql = format!("{} ORDER BY id LIMIT 1", SELECT_SETTINGS);
        let row = sqlx::query(&sql)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get business settings")?;

        Ok(row.as_ref().map(row_to_settings))
    }

    async fn insert(&self, fields: &BusinessSettingsFields) -> Result<BusinessSettings> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO business_settings
                (business_name, phone, email, address, hours, facebook_url, instagram_url,
                 created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&fields.business_name)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.address)
        .bind(encode_json(&fields.hours)?)
        .bind(&fields.facebook_url)
        .bind(&fields.instagram_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to insert business settings")?;

        Ok(BusinessSettings {
            id: result.last_insert_rowid(),
            business_name: fields.business_name.clone(),
            phone: fields.phone.clone(),
            email: fields.email.clone(),
            address: fields.address.clone(),
            hours: fields.hours.clone(),
            facebook_url: fields.facebook_url.clone(),
            instagram_url: fields.instagram_url.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, id: i64, fields: &BusinessSettingsFields) -> Result<BusinessSettings> {
        sqlx::query(
            r#"
            UPDATE business_settings
            SET business_name = ?, phone = ?, email = ?, address = ?, hours = ?,
                facebook_url = ?, instagram_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&fields.business_name)
        .bind(&fields.phone)
        .bind(&fields.email)
        .bind(&fields.address)
        .bind(encode_json(&fields.hours)?)
        .bind(&fields.facebook_url)
        .bind(&fields.instagram_url)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update business settings")?;

        let sql = format!("{} WHERE id = ?", SELECT_SETTINGS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .context("Failed to reload business settings")?;

        Ok(row_to_settings(&row))
    }
}

fn row_to_settings(row: &sqlx::sqlite::SqliteRow) -> BusinessSettings {
    BusinessSettings {
        id: row.get("id"),
        business_name: row.get("business_name"),
        phone: row.get("phone"),
        email: row.get("email"),
        address: row.get("address"),
        hours: decode_json(row.get("hours")),
        facebook_url: row.get("facebook_url"),
        instagram_url: row.get("instagram_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::models::default_hours;

    async fn setup(seeded: bool) -> SqlxBusinessSettingsRepository {
        let pool = create_test_pool().await.unwrap();
        migrations::run_migrations(&pool).await.unwrap();
        if !seeded {
            sqlx::query("DELETE FROM business_settings")
                .execute(&pool)
                .await
                .unwrap();
        }
        SqlxBusinessSettingsRepository::new(pool)
    }

    fn fields(name: &str) -> BusinessSettingsFields {
        BusinessSettingsFields {
            business_name: name.to_string(),
            phone: "555-0100".to_string(),
            email: "info@example.com".to_string(),
            address: "1 Barn Rd".to_string(),
            hours: default_hours(),
            facebook_url: String::new(),
            instagram_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_seeded_row_has_default_hours() {
        let repo = setup(true).await;
        let settings = repo.get().await.unwrap().unwrap();
        assert_eq!(settings.hours, default_hours());
    }

    #[tokio::test]
    async fn test_insert_then_update() {
        let repo = setup(false).await;
        assert!(repo.get().await.unwrap().is_none());

        let inserted = repo.insert(&fields("Acme Sheds")).await.unwrap();
        let updated = repo.update(inserted.id, &fields("Acme Barns")).await.unwrap();
        assert_eq!(updated.id, inserted.id);
        assert_eq!(updated.business_name, "Acme Barns");

        let loaded = repo.get().await.unwrap().unwrap();
        assert_eq!(loaded.business_name, "Acme Barns");
        assert_eq!(loaded.phone, "555-0100");
    }
}
