//! # docguard-store
//!
//! Storage backends for docguard.
//!
//! This crate provides:
//! - Connection pool management for PostgreSQL
//! - PostgreSQL repository implementations for all core entities
//! - An in-memory [`LocalStore`] fallback, interchangeable with the
//!   PostgreSQL backend behind the same traits (demo/offline mode, tests)
//! - A TTL count cache with namespace-prefix invalidation
//!
//! The backend is chosen once, at session start, by constructing [`Storage`]
//! from one or the other; there is no global mode flag.
//!
//! ## Example
//!
//! ```rust,ignore
//! use docguard_store::Storage;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let storage = match std::env::var("DATABASE_URL") {
//!         Ok(url) => Storage::connect(&url).await?,
//!         Err(_) => Storage::local(),
//!     };
//!
//!     let folders = storage.folders.list(user_id).await?;
//!     Ok(())
//! }
//! ```

pub mod alerts;
pub mod cache;
pub mod documents;
pub mod folders;
pub mod local;
pub mod pool;
pub mod settings;
pub mod stacks;

use std::sync::Arc;

// Re-export core types
pub use docguard_core::*;

pub use alerts::PgAlertRepository;
pub use cache::{CountCache, NS_FOLDER, NS_STACK};
pub use documents::PgDocumentRepository;
pub use folders::PgFolderRepository;
pub use local::LocalStore;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use settings::PgSettingsRepository;
pub use stacks::PgStackRepository;

/// Combined storage context with all repositories.
///
/// One field per repository, each a trait object so the PostgreSQL and
/// local backends are interchangeable. The choice is made exactly once,
/// when the `Storage` is constructed.
#[derive(Clone)]
pub struct Storage {
    /// Document repository.
    pub documents: Arc<dyn DocumentRepository>,
    /// Folder repository.
    pub folders: Arc<dyn FolderRepository>,
    /// Life stack repository.
    pub stacks: Arc<dyn StackRepository>,
    /// Guardian alert repository.
    pub alerts: Arc<dyn AlertRepository>,
    /// Notification settings repository.
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    /// Create a PostgreSQL-backed storage context from a connection pool.
    pub fn new_pg(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            documents: Arc::new(PgDocumentRepository::new(pool.clone())),
            folders: Arc::new(PgFolderRepository::new(pool.clone())),
            stacks: Arc::new(PgStackRepository::new(pool.clone())),
            alerts: Arc::new(PgAlertRepository::new(pool.clone())),
            settings: Arc::new(PgSettingsRepository::new(pool)),
        }
    }

    /// Connect to PostgreSQL and build a storage context.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new_pg(pool))
    }

    /// Create an in-memory storage context (demo/offline mode, tests).
    pub fn local() -> Self {
        Self::from_local(LocalStore::new())
    }

    /// Wrap an existing [`LocalStore`] (lets tests keep a handle on it).
    pub fn from_local(store: LocalStore) -> Self {
        let store = Arc::new(store);
        Self {
            documents: store.clone(),
            folders: store.clone(),
            stacks: store.clone(),
            alerts: store.clone(),
            settings: store,
        }
    }
}

/// Run pending migrations.
#[cfg(feature = "migrations")]
pub async fn migrate(pool: &sqlx::Pool<sqlx::Postgres>) -> Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
    Ok(())
}
