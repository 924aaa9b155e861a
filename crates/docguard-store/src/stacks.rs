//! Life stack repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use docguard_core::{new_v7, CreateStackRequest, Error, LifeStack, Result, StackRepository};

/// PostgreSQL implementation of StackRepository.
pub struct PgStackRepository {
    pool: Pool<Postgres>,
}

impl PgStackRepository {
    /// Create a new PgStackRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_stack(r: &PgRow) -> LifeStack {
        let keywords: serde_json::Value = r.get("keywords");
        LifeStack {
            id: r.get("id"),
            user_id: r.get("user_id"),
            name: r.get("name"),
            icon: r.get("icon"),
            color: r.get("color"),
            keywords: serde_json::from_value(keywords).unwrap_or_default(),
            position: r.get("position"),
            document_count: r.get("document_count"),
            created_at: r.get("created_at_utc"),
        }
    }
}

const STACK_SELECT: &str = r#"
    SELECT s.id, s.user_id, s.name, s.icon, s.color, s.keywords, s.position, s.created_at_utc,
           COALESCE((SELECT COUNT(*) FROM document WHERE stack_id = s.id), 0) as document_count
    FROM life_stack s
"#;

#[async_trait]
impl StackRepository for PgStackRepository {
    async fn create(&self, req: CreateStackRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();
        let keywords = serde_json::to_value(&req.keywords)?;

        sqlx::query(
            "INSERT INTO life_stack (id, user_id, name, icon, color, keywords, position, created_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(id)
        .bind(req.user_id)
        .bind(&req.name)
        .bind(&req.icon)
        .bind(&req.color)
        .bind(keywords)
        .bind(req.position)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<LifeStack>> {
        let row = sqlx::query(&format!("{} WHERE s.id = $1", STACK_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::row_to_stack))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<LifeStack>> {
        // Position order is load-bearing: the stack router assigns the
        // first match in this order.
        let rows = sqlx::query(&format!(
            "{} WHERE s.user_id = $1 ORDER BY s.position, s.created_at_utc",
            STACK_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::row_to_stack).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("UPDATE document SET stack_id = NULL WHERE stack_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        sqlx::query("DELETE FROM life_stack WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
