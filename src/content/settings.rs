/// Flat key/value settings store
///
/// Values are nullable strings. A key is created on first write and updated in
/// place afterwards; the normal flow never deletes settings.

use crate::error::ContentResult;
use sqlx::{sqlite::SqlitePool, Row, SqliteConnection};
use std::collections::BTreeMap;

/// Settings the admin settings form edits
pub const ADMIN_SETTING_KEYS: [&str; 11] = [
    "site_name",
    "theme_primary",
    "hero_title",
    "hero_subtitle",
    "hero_button_text",
    "hero_button_url",
    "email",
    "whatsapp",
    "x_url",
    "instagram_url",
    "tiktok_url",
];

/// Fallback accent color when `theme_primary` is unset
pub const DEFAULT_THEME_PRIMARY: &str = "#0ea5e9";

/// Default used when a setting is read without an explicit fallback
pub fn setting_default(key: &str) -> &'static str {
    match key {
        "theme_primary" => DEFAULT_THEME_PRIMARY,
        _ => "",
    }
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    pool: SqlitePool,
}

impl SettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Stored value for `key`, or `default` when the key is absent or null
    pub async fn get(&self, key: &str, default: &str) -> ContentResult<String> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let value: Option<String> = row.and_then(|row| row.get("value"));
        Ok(value.unwrap_or_else(|| default.to_string()))
    }

    /// Values for `keys`, empty string when absent
    pub async fn get_many(&self, keys: &[&str]) -> ContentResult<BTreeMap<String, String>> {
        let stored = self.all().await?;
        Ok(keys
            .iter()
            .map(|key| {
                let value = stored.get(*key).cloned().flatten().unwrap_or_default();
                (key.to_string(), value)
            })
            .collect())
    }

    /// Full settings mapping, including null values
    pub async fn all(&self) -> ContentResult<BTreeMap<String, Option<String>>> {
        let mut conn = self.pool.acquire().await?;
        all_settings(&mut conn).await
    }

    /// Create or overwrite a single setting
    pub async fn set(&self, key: &str, value: Option<&str>) -> ContentResult<()> {
        let mut tx = self.pool.begin().await?;
        upsert_setting(&mut *tx, key, value).await?;
        tx.commit().await?;

        tracing::info!("⚙️ Setting updated: {}", key);
        Ok(())
    }

    /// Create or overwrite several settings in one transaction
    pub async fn set_many<I, K, V>(&self, pairs: I) -> ContentResult<usize>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut tx = self.pool.begin().await?;
        let mut written = 0;
        for (key, value) in pairs {
            upsert_setting(&mut *tx, key.as_ref(), value.as_ref().map(AsRef::as_ref)).await?;
            written += 1;
        }
        tx.commit().await?;

        tracing::info!("⚙️ {} settings updated", written);
        Ok(written)
    }
}

/// UPSERT one setting on an open connection or transaction
pub(crate) async fn upsert_setting(
    conn: &mut SqliteConnection,
    key: &str,
    value: Option<&str>,
) -> ContentResult<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(conn)
    .await?;

    Ok(())
}

pub(crate) async fn all_settings(
    conn: &mut SqliteConnection,
) -> ContentResult<BTreeMap<String, Option<String>>> {
    let rows = sqlx::query("SELECT key, value FROM settings ORDER BY key")
        .fetch_all(conn)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| (row.get("key"), row.get("value")))
        .collect())
}
