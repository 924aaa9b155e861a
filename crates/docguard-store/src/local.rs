//! In-memory fallback store.
//!
//! Used when the session is unauthenticated against the persistent store
//! (demo/offline mode) and by unit tests. Implements exactly the same
//! repository traits as the PostgreSQL backend, so the two are
//! interchangeable behind [`crate::Storage`]. Data lives only as long as
//! the process.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use docguard_core::{
    new_v7, AlertKind, AlertRepository, CreateDocumentRequest, CreateStackRequest, DocumentRecord,
    DocumentRepository, DocumentStatus, Error, Folder, FolderRepository, GuardianAlert, LifeStack,
    NotificationSettings, Result, SettingsRepository, StackRepository,
};

#[derive(Default)]
struct LocalState {
    documents: HashMap<Uuid, DocumentRecord>,
    folders: HashMap<Uuid, Folder>,
    stacks: HashMap<Uuid, LifeStack>,
    alerts: HashMap<Uuid, GuardianAlert>,
    settings: HashMap<Uuid, NotificationSettings>,
}

/// In-memory store implementing every repository trait.
#[derive(Clone, Default)]
pub struct LocalStore {
    state: Arc<RwLock<LocalState>>,
}

impl LocalStore {
    /// Create an empty local store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for LocalStore {
    async fn insert(&self, req: CreateDocumentRequest) -> Result<Uuid> {
        let id = new_v7();
        let record = DocumentRecord {
            id,
            user_id: req.user_id,
            title: req.title,
            category: req.category,
            amount: req.amount,
            due_date: req.due_date,
            summary: req.summary,
            status: DocumentStatus::New,
            is_scam: req.is_scam,
            risk_score: req.risk_score,
            source: req.source,
            folder_id: req.folder_id,
            stack_id: req.stack_id,
            created_at: Utc::now(),
        };
        self.state.write().await.documents.insert(id, record);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<DocumentRecord>> {
        Ok(self.state.read().await.documents.get(&id).cloned())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>> {
        let state = self.state.read().await;
        let mut docs: Vec<DocumentRecord> = state
            .documents
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(docs)
    }

    async fn update_status(&self, id: Uuid, status: DocumentStatus) -> Result<()> {
        let mut state = self.state.write().await;
        let doc = state
            .documents
            .get_mut(&id)
            .ok_or(Error::DocumentNotFound(id))?;
        doc.status = status;
        Ok(())
    }

    async fn set_folder(&self, id: Uuid, folder_id: Option<Uuid>) -> Result<()> {
        let mut state = self.state.write().await;
        let doc = state
            .documents
            .get_mut(&id)
            .ok_or(Error::DocumentNotFound(id))?;
        doc.folder_id = folder_id;
        Ok(())
    }

    async fn set_stack(&self, id: Uuid, stack_id: Option<Uuid>) -> Result<()> {
        let mut state = self.state.write().await;
        let doc = state
            .documents
            .get_mut(&id)
            .ok_or(Error::DocumentNotFound(id))?;
        doc.stack_id = stack_id;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.state.write().await.documents.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl FolderRepository for LocalStore {
    async fn create(&self, user_id: Uuid, name: &str) -> Result<Uuid> {
        let id = new_v7();
        let folder = Folder {
            id,
            user_id,
            name: name.to_string(),
            document_count: 0,
            created_at: Utc::now(),
        };
        self.state.write().await.folders.insert(id, folder);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Folder>> {
        let state = self.state.read().await;
        Ok(state.folders.get(&id).cloned().map(|mut f| {
            f.document_count = count_folder_documents(&state, f.id);
            f
        }))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<Folder>> {
        let state = self.state.read().await;
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .map(|mut f| {
                f.document_count = count_folder_documents(&state, f.id);
                f
            })
            .collect();
        folders.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(folders)
    }

    async fn find_by_name_ci(&self, user_id: Uuid, name: &str) -> Result<Option<Folder>> {
        let state = self.state.read().await;
        let needle = name.to_lowercase();
        Ok(state
            .folders
            .values()
            .find(|f| f.user_id == user_id && f.name.to_lowercase() == needle)
            .cloned()
            .map(|mut f| {
                f.document_count = count_folder_documents(&state, f.id);
                f
            }))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        for doc in state.documents.values_mut() {
            if doc.folder_id == Some(id) {
                doc.folder_id = None;
            }
        }
        state.folders.remove(&id);
        Ok(())
    }
}

fn count_folder_documents(state: &LocalState, folder_id: Uuid) -> i64 {
    state
        .documents
        .values()
        .filter(|d| d.folder_id == Some(folder_id))
        .count() as i64
}

fn count_stack_documents(state: &LocalState, stack_id: Uuid) -> i64 {
    state
        .documents
        .values()
        .filter(|d| d.stack_id == Some(stack_id))
        .count() as i64
}

#[async_trait]
impl StackRepository for LocalStore {
    async fn create(&self, req: CreateStackRequest) -> Result<Uuid> {
        let id = new_v7();
        let stack = LifeStack {
            id,
            user_id: req.user_id,
            name: req.name,
            icon: req.icon,
            color: req.color,
            keywords: req.keywords,
            position: req.position,
            document_count: 0,
            created_at: Utc::now(),
        };
        self.state.write().await.stacks.insert(id, stack);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<LifeStack>> {
        let state = self.state.read().await;
        Ok(state.stacks.get(&id).cloned().map(|mut s| {
            s.document_count = count_stack_documents(&state, s.id);
            s
        }))
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<LifeStack>> {
        let state = self.state.read().await;
        let mut stacks: Vec<LifeStack> = state
            .stacks
            .values()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .map(|mut s| {
                s.document_count = count_stack_documents(&state, s.id);
                s
            })
            .collect();
        stacks.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(stacks)
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        for doc in state.documents.values_mut() {
            if doc.stack_id == Some(id) {
                doc.stack_id = None;
            }
        }
        state.stacks.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl AlertRepository for LocalStore {
    async fn insert(
        &self,
        user_id: Uuid,
        document_id: Uuid,
        kind: AlertKind,
        trigger_at: DateTime<Utc>,
    ) -> Result<Uuid> {
        let id = new_v7();
        let alert = GuardianAlert {
            id,
            user_id,
            document_id,
            kind,
            trigger_at,
            dismissed: false,
            sent: false,
            created_at: Utc::now(),
        };
        self.state.write().await.alerts.insert(id, alert);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<GuardianAlert>> {
        Ok(self.state.read().await.alerts.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<GuardianAlert>> {
        let state = self.state.read().await;
        let mut alerts: Vec<GuardianAlert> = state
            .alerts
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(alerts)
    }

    async fn active_for_document(&self, document_id: Uuid) -> Result<Vec<GuardianAlert>> {
        let state = self.state.read().await;
        let mut alerts: Vec<GuardianAlert> = state
            .alerts
            .values()
            .filter(|a| a.document_id == document_id && !a.dismissed)
            .cloned()
            .collect();
        alerts.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(alerts)
    }

    async fn dismiss(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let alert = state
            .alerts
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("alert {}", id)))?;
        alert.dismissed = true;
        Ok(())
    }

    async fn dismiss_all_for_document(&self, document_id: Uuid) -> Result<u64> {
        let mut state = self.state.write().await;
        let mut dismissed = 0u64;
        for alert in state.alerts.values_mut() {
            if alert.document_id == document_id && !alert.dismissed {
                alert.dismissed = true;
                dismissed += 1;
            }
        }
        Ok(dismissed)
    }

    async fn mark_sent(&self, id: Uuid) -> Result<()> {
        let mut state = self.state.write().await;
        let alert = state
            .alerts
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("alert {}", id)))?;
        alert.sent = true;
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for LocalStore {
    async fn get(&self, user_id: Uuid) -> Result<NotificationSettings> {
        Ok(self
            .state
            .read()
            .await
            .settings
            .get(&user_id)
            .copied()
            .unwrap_or_default())
    }

    async fn upsert(&self, user_id: Uuid, settings: NotificationSettings) -> Result<()> {
        self.state.write().await.settings.insert(user_id, settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docguard_core::{DocumentCategory, DocumentSource};

    fn doc_request(user_id: Uuid) -> CreateDocumentRequest {
        CreateDocumentRequest {
            user_id,
            title: "Electric Bill".to_string(),
            category: DocumentCategory::Finance,
            amount: Some(120.50),
            due_date: None,
            summary: vec!["Monthly electricity charge".to_string()],
            is_scam: false,
            risk_score: 0,
            source: DocumentSource::Scan,
            folder_id: None,
            stack_id: None,
        }
    }

    #[tokio::test]
    async fn document_insert_and_get() {
        let store = LocalStore::new();
        let user = Uuid::new_v4();

        let id = DocumentRepository::insert(&store, doc_request(user)).await.unwrap();
        let doc = DocumentRepository::get(&store, id).await.unwrap().unwrap();

        assert_eq!(doc.title, "Electric Bill");
        assert_eq!(doc.status, DocumentStatus::New);
        assert_eq!(doc.user_id, user);
    }

    #[tokio::test]
    async fn document_list_is_user_scoped() {
        let store = LocalStore::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        DocumentRepository::insert(&store, doc_request(alice)).await.unwrap();
        DocumentRepository::insert(&store, doc_request(bob)).await.unwrap();

        let docs = DocumentRepository::list(&store, alice).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].user_id, alice);
    }

    #[tokio::test]
    async fn folder_find_by_name_is_case_insensitive() {
        let store = LocalStore::new();
        let user = Uuid::new_v4();

        let id = FolderRepository::create(&store, user, "Utility Bills").await.unwrap();
        let found = store.find_by_name_ci(user, "utility bills").await.unwrap();
        assert_eq!(found.map(|f| f.id), Some(id));

        let missing = store.find_by_name_ci(user, "Taxes").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn folder_delete_nulls_document_references() {
        let store = LocalStore::new();
        let user = Uuid::new_v4();

        let folder_id = FolderRepository::create(&store, user, "Bills").await.unwrap();
        let mut req = doc_request(user);
        req.folder_id = Some(folder_id);
        let doc_id = DocumentRepository::insert(&store, req).await.unwrap();

        FolderRepository::delete(&store, folder_id).await.unwrap();

        let doc = DocumentRepository::get(&store, doc_id).await.unwrap().unwrap();
        assert!(doc.folder_id.is_none());
        assert!(FolderRepository::get(&store, folder_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn folder_document_count_is_derived() {
        let store = LocalStore::new();
        let user = Uuid::new_v4();

        let folder_id = FolderRepository::create(&store, user, "Bills").await.unwrap();
        for _ in 0..3 {
            let mut req = doc_request(user);
            req.folder_id = Some(folder_id);
            DocumentRepository::insert(&store, req).await.unwrap();
        }

        let folder = FolderRepository::get(&store, folder_id).await.unwrap().unwrap();
        assert_eq!(folder.document_count, 3);
    }

    #[tokio::test]
    async fn stack_list_orders_by_position() {
        let store = LocalStore::new();
        let user = Uuid::new_v4();

        for (name, position) in [("Second", 2), ("First", 1), ("Third", 3)] {
            StackRepository::create(
                &store,
                CreateStackRequest {
                    user_id: user,
                    name: name.to_string(),
                    icon: "box".to_string(),
                    color: "#888888".to_string(),
                    keywords: vec![],
                    position,
                },
            )
            .await
            .unwrap();
        }

        let stacks = StackRepository::list(&store, user).await.unwrap();
        let names: Vec<&str> = stacks.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn stack_delete_nulls_document_references() {
        let store = LocalStore::new();
        let user = Uuid::new_v4();

        let stack_id = StackRepository::create(
            &store,
            CreateStackRequest {
                user_id: user,
                name: "Car".to_string(),
                icon: "car".to_string(),
                color: "#ff0000".to_string(),
                keywords: vec!["insurance".to_string()],
                position: 0,
            },
        )
        .await
        .unwrap();

        let mut req = doc_request(user);
        req.stack_id = Some(stack_id);
        let doc_id = DocumentRepository::insert(&store, req).await.unwrap();

        StackRepository::delete(&store, stack_id).await.unwrap();

        let doc = DocumentRepository::get(&store, doc_id).await.unwrap().unwrap();
        assert!(doc.stack_id.is_none());
    }

    #[tokio::test]
    async fn alert_dismiss_all_targets_one_document() {
        let store = LocalStore::new();
        let user = Uuid::new_v4();
        let doc_a = Uuid::new_v4();
        let doc_b = Uuid::new_v4();

        AlertRepository::insert(&store, user, doc_a, AlertKind::Deadline7Day, Utc::now())
            .await
            .unwrap();
        AlertRepository::insert(&store, user, doc_b, AlertKind::Deadline1Day, Utc::now())
            .await
            .unwrap();

        let dismissed = store.dismiss_all_for_document(doc_a).await.unwrap();
        assert_eq!(dismissed, 1);

        assert!(store.active_for_document(doc_a).await.unwrap().is_empty());
        assert_eq!(store.active_for_document(doc_b).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn settings_default_when_absent() {
        let store = LocalStore::new();
        let user = Uuid::new_v4();

        let settings = SettingsRepository::get(&store, user).await.unwrap();
        assert_eq!(settings, NotificationSettings::default());

        let custom = NotificationSettings {
            push_enabled: true,
            remind_7day: false,
            remind_1day: true,
        };
        store.upsert(user, custom).await.unwrap();
        assert_eq!(SettingsRepository::get(&store, user).await.unwrap(), custom);
    }
}
