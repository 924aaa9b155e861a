//! Core traits for docguard abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable storage backends (PostgreSQL or the local
//! in-memory fallback) and external-service boundaries (completion, OCR).

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// DOCUMENT REPOSITORY
// =============================================================================

/// Repository for document CRUD operations. All queries are scoped to the
/// owning user; no cross-user reads exist.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a new document record.
    async fn insert(&self, req: CreateDocumentRequest) -> Result<Uuid>;

    /// Fetch a document by ID.
    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>>;

    /// List a user's documents, newest first.
    async fn list(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>>;

    /// Update document status. Callers are responsible for checking the
    /// monotonic transition rule before invoking.
    async fn update_status(&self, id: Uuid, status: DocumentStatus) -> Result<()>;

    /// Set or clear the folder reference.
    async fn set_folder(&self, id: Uuid, folder_id: Option<Uuid>) -> Result<()>;

    /// Set or clear the stack reference.
    async fn set_stack(&self, id: Uuid, stack_id: Option<Uuid>) -> Result<()>;

    /// Permanently delete a document.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// FOLDER REPOSITORY
// =============================================================================

/// Repository for folder operations.
#[async_trait]
pub trait FolderRepository: Send + Sync {
    /// Create a new folder for a user.
    async fn create(&self, user_id: Uuid, name: &str) -> Result<Uuid>;

    /// Get a folder by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Folder>>;

    /// List a user's folders by name.
    async fn list(&self, user_id: Uuid) -> Result<Vec<Folder>>;

    /// Find a user's folder by case-insensitive name match.
    async fn find_by_name_ci(&self, user_id: Uuid, name: &str) -> Result<Option<Folder>>;

    /// Delete a folder. Documents referencing it have their folder reference
    /// nulled out; they are never deleted with it.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// STACK REPOSITORY
// =============================================================================

/// Repository for life stack operations.
#[async_trait]
pub trait StackRepository: Send + Sync {
    /// Create a new stack.
    async fn create(&self, req: CreateStackRequest) -> Result<Uuid>;

    /// Get a stack by ID.
    async fn get(&self, id: Uuid) -> Result<Option<LifeStack>>;

    /// List a user's stacks in routing order (ascending position, then
    /// creation time). This order is semantically load-bearing: the stack
    /// router assigns the first match.
    async fn list(&self, user_id: Uuid) -> Result<Vec<LifeStack>>;

    /// Delete a stack. Documents referencing it have their stack reference
    /// nulled out.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// ALERT REPOSITORY
// =============================================================================

/// Repository for guardian alert operations.
#[async_trait]
pub trait AlertRepository: Send + Sync {
    /// Insert a new alert.
    async fn insert(
        &self,
        user_id: Uuid,
        document_id: Uuid,
        kind: AlertKind,
        trigger_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<Uuid>;

    /// Get an alert by ID.
    async fn get(&self, id: Uuid) -> Result<Option<GuardianAlert>>;

    /// List a user's alerts, newest first.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<GuardianAlert>>;

    /// List non-dismissed alerts for a document.
    async fn active_for_document(&self, document_id: Uuid) -> Result<Vec<GuardianAlert>>;

    /// Dismiss a single alert.
    async fn dismiss(&self, id: Uuid) -> Result<()>;

    /// Dismiss every non-dismissed alert for a document. Returns the number
    /// of alerts dismissed.
    async fn dismiss_all_for_document(&self, document_id: Uuid) -> Result<u64>;

    /// Mark an alert as sent to the push channel.
    async fn mark_sent(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// SETTINGS REPOSITORY
// =============================================================================

/// Repository for per-user notification settings.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Get a user's settings, falling back to defaults when none are stored.
    async fn get(&self, user_id: Uuid) -> Result<NotificationSettings>;

    /// Insert or replace a user's settings.
    async fn upsert(&self, user_id: Uuid, settings: NotificationSettings) -> Result<()>;
}

// =============================================================================
// COMPLETION BACKEND
// =============================================================================

/// Options for a single completion call.
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Model override; None uses the backend's configured default.
    pub model: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            model: None,
            temperature: crate::defaults::COMPLETION_TEMPERATURE,
            max_tokens: crate::defaults::COMPLETION_MAX_TOKENS,
        }
    }
}

/// Backend for text completion (LLM). Always invoked through the completion
/// throttle; the returned text may embed a JSON object wrapped in prose or
/// code fences; locating it is the analysis validator's job.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Generate a completion given a system prompt and user message.
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        opts: &CompletionOptions,
    ) -> Result<String>;

    /// Get the default model name being used.
    fn model_name(&self) -> &str;
}

// =============================================================================
// TEXT EXTRACTION BACKEND
// =============================================================================

/// Backend for text extraction (OCR) from a captured image.
///
/// Failure surfaces as [`crate::Error::Extraction`]; callers fall back to a
/// secondary extraction path or a mock extraction.
#[async_trait]
pub trait TextExtractionBackend: Send + Sync {
    /// Extract text from the image at the given path.
    async fn extract_text(&self, image_path: &str) -> Result<TextExtraction>;
}
