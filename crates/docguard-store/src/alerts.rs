//! Guardian alert repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use docguard_core::{new_v7, AlertKind, AlertRepository, Error, GuardianAlert, Result};

/// PostgreSQL implementation of AlertRepository.
pub struct PgAlertRepository {
    pool: Pool<Postgres>,
}

impl PgAlertRepository {
    /// Create a new PgAlertRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_alert(r: &PgRow) -> GuardianAlert {
        let kind: String = r.get("kind");
        GuardianAlert {
            id: r.get("id"),
            user_id: r.get("user_id"),
            document_id: r.get("document_id"),
            kind: AlertKind::from_str_loose(&kind).unwrap_or(AlertKind::Overdue),
            trigger_at: r.get("trigger_at_utc"),
            dismissed: r.get("dismissed"),
            sent: r.get("sent"),
            created_at: r.get("created_at_utc"),
        }
    }
}

const ALERT_COLUMNS: &str =
    "id, user_id, document_id, kind, trigger_at_utc, dismissed, sent, created_at_utc";

#[async_trait]
impl AlertRepository for PgAlertRepository {
    async fn insert(
        &self,
        user_id: Uuid,
        document_id: Uuid,
        kind: AlertKind,
        trigger_at: DateTime<Utc>,
    ) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO guardian_alert (id, user_id, document_id, kind, trigger_at_utc, \
             dismissed, sent, created_at_utc)
             VALUES ($1, $2, $3, $4, $5, false, false, $6)",
        )
        .bind(id)
        .bind(user_id)
        .bind(document_id)
        .bind(kind.as_str())
        .bind(trigger_at)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<GuardianAlert>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM guardian_alert WHERE id = $1",
            ALERT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::row_to_alert))
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<GuardianAlert>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM guardian_alert WHERE user_id = $1 ORDER BY created_at_utc DESC",
            ALERT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::row_to_alert).collect())
    }

    async fn active_for_document(&self, document_id: Uuid) -> Result<Vec<GuardianAlert>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM guardian_alert WHERE document_id = $1 AND dismissed = false \
             ORDER BY created_at_utc",
            ALERT_COLUMNS
        ))
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::row_to_alert).collect())
    }

    async fn dismiss(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("UPDATE guardian_alert SET dismissed = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("alert {}", id)));
        }
        Ok(())
    }

    async fn dismiss_all_for_document(&self, document_id: Uuid) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE guardian_alert SET dismissed = true \
             WHERE document_id = $1 AND dismissed = false",
        )
        .bind(document_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(result.rows_affected())
    }

    async fn mark_sent(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE guardian_alert SET sent = true WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
