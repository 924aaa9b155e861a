//! Document repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use docguard_core::{
    new_v7, CreateDocumentRequest, DocumentCategory, DocumentRecord, DocumentRepository,
    DocumentSource, DocumentStatus, Error, Result,
};

/// PostgreSQL implementation of DocumentRepository.
pub struct PgDocumentRepository {
    pool: Pool<Postgres>,
}

impl PgDocumentRepository {
    /// Create a new PgDocumentRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn row_to_document(r: &PgRow) -> DocumentRecord {
        let summary: serde_json::Value = r.get("summary");
        let category: String = r.get("category");
        let status: String = r.get("status");
        let source: String = r.get("source");

        DocumentRecord {
            id: r.get("id"),
            user_id: r.get("user_id"),
            title: r.get("title"),
            category: DocumentCategory::from_str_loose(&category),
            amount: r.get("amount"),
            due_date: r.get("due_date"),
            summary: serde_json::from_value(summary).unwrap_or_default(),
            status: DocumentStatus::from_str_loose(&status).unwrap_or(DocumentStatus::New),
            is_scam: r.get("is_scam"),
            risk_score: r.get("risk_score"),
            source: DocumentSource::from_str_loose(&source).unwrap_or(DocumentSource::Manual),
            folder_id: r.get("folder_id"),
            stack_id: r.get("stack_id"),
            created_at: r.get("created_at_utc"),
        }
    }
}

const DOCUMENT_COLUMNS: &str = "id, user_id, title, category, amount, due_date, summary, \
                                status, is_scam, risk_score, source, folder_id, stack_id, \
                                created_at_utc";

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, req: CreateDocumentRequest) -> Result<Uuid> {
        let id = new_v7();
        let now = Utc::now();
        let summary = serde_json::to_value(&req.summary)?;

        sqlx::query(
            "INSERT INTO document (id, user_id, title, category, amount, due_date, summary, \
             status, is_scam, risk_score, source, folder_id, stack_id, created_at_utc)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(id)
        .bind(req.user_id)
        .bind(&req.title)
        .bind(req.category.as_str().to_lowercase())
        .bind(req.amount)
        .bind(req.due_date)
        .bind(summary)
        .bind(DocumentStatus::New.as_str())
        .bind(req.is_scam)
        .bind(req.risk_score)
        .bind(req.source.as_str())
        .bind(req.folder_id)
        .bind(req.stack_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM document WHERE id = $1",
            DOCUMENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::row_to_document))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM document WHERE user_id = $1 ORDER BY created_at_utc DESC",
            DOCUMENT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(Self::row_to_document).collect())
    }

    async fn update_status(&self, id: Uuid, status: DocumentStatus) -> Result<()> {
        let result = sqlx::query("UPDATE document SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::DocumentNotFound(id));
        }
        Ok(())
    }

    async fn set_folder(&self, id: Uuid, folder_id: Option<Uuid>) -> Result<()> {
        sqlx::query("UPDATE document SET folder_id = $1 WHERE id = $2")
            .bind(folder_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn set_stack(&self, id: Uuid, stack_id: Option<Uuid>) -> Result<()> {
        sqlx::query("UPDATE document SET stack_id = $1 WHERE id = $2")
            .bind(stack_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM document WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
