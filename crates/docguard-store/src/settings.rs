//! Notification settings repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use docguard_core::{Error, NotificationSettings, Result, SettingsRepository};

/// PostgreSQL implementation of SettingsRepository.
pub struct PgSettingsRepository {
    pool: Pool<Postgres>,
}

impl PgSettingsRepository {
    /// Create a new PgSettingsRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn get(&self, user_id: Uuid) -> Result<NotificationSettings> {
        let row = sqlx::query(
            "SELECT push_enabled, remind_7day, remind_1day \
             FROM notification_settings WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row
            .map(|r| NotificationSettings {
                push_enabled: r.get("push_enabled"),
                remind_7day: r.get("remind_7day"),
                remind_1day: r.get("remind_1day"),
            })
            .unwrap_or_default())
    }

    async fn upsert(&self, user_id: Uuid, settings: NotificationSettings) -> Result<()> {
        sqlx::query(
            "INSERT INTO notification_settings (user_id, push_enabled, remind_7day, remind_1day)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (user_id) DO UPDATE SET
                 push_enabled = EXCLUDED.push_enabled,
                 remind_7day = EXCLUDED.remind_7day,
                 remind_1day = EXCLUDED.remind_1day",
        )
        .bind(user_id)
        .bind(settings.push_enabled)
        .bind(settings.remind_7day)
        .bind(settings.remind_1day)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(())
    }
}
