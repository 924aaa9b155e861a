//! Folder repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use docguard_core::{new_v7, Error, Folder, FolderRepository, Result};

/// PostgreSQL implementation of FolderRepository.
pub struct PgFolderRepository {
    pool: Pool<Postgres>,
}

impl PgFolderRepository {
    /// Create a new PgFolderRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_folder(r: &PgRow) -> Folder {
        Folder {
            id: r.get("id"),
            user_id: r.get("user_id"),
            name: r.get("name"),
            document_count: r.get("document_count"),
            created_at: r.get("created_at_utc"),
        }
    }
}

const FOLDER_SELECT: &str = r#"
    SELECT f.id, f.user_id, f.name, f.created_at_utc,
           COALESCE((SELECT COUNT(*) FROM document WHERE folder_id = f.id), 0) as document_count
    FROM folder f
"#;

#[async_trait]
impl FolderRepository for PgFolderRepository {
    async fn create(&self, user_id: Uuid, name: &str) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO folder (id, user_id, name, created_at_utc) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(user_id)
        .bind(name)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Folder>> {
        let row = sqlx::query(&format!("{} WHERE f.id = $1", FOLDER_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::row_to_folder))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Folder>> {
        let rows = sqlx::query(&format!(
            "{} WHERE f.user_id = $1 ORDER BY f.name",
            FOLDER_SELECT
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::row_to_folder).collect())
    }

    async fn find_by_name_ci(&self, user_id: Uuid, name: &str) -> Result<Option<Folder>> {
        let row = sqlx::query(&format!(
            "{} WHERE f.user_id = $1 AND LOWER(f.name) = LOWER($2)",
            FOLDER_SELECT
        ))
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::row_to_folder))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Null out references first; documents are never deleted with a folder.
        sqlx::query("UPDATE document SET folder_id = NULL WHERE folder_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        sqlx::query("DELETE FROM folder WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
