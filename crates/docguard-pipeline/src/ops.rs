//! Named domain operations with enumerated cascades.
//!
//! Status changes and deletions have secondary effects (dismissing alerts,
//! nulling references). Each operation here owns its full side-effect set,
//! so call sites never have to remember to chain the secondary update.

use tracing::info;
use uuid::Uuid;

use docguard_core::{DocumentRecord, DocumentStatus, Error, Result};
use docguard_store::Storage;

/// Fetch a document and verify ownership. A document belonging to another
/// user is reported as not found, never as forbidden.
async fn owned_document(storage: &Storage, user_id: Uuid, id: Uuid) -> Result<DocumentRecord> {
    match storage.documents.get(id).await? {
        Some(doc) if doc.user_id == user_id => Ok(doc),
        _ => Err(Error::DocumentNotFound(id)),
    }
}

/// Mark a document paid.
///
/// Cascade: every non-dismissed alert for the document is dismissed.
/// Alerts for other documents are untouched.
pub async fn mark_paid(storage: &Storage, user_id: Uuid, document_id: Uuid) -> Result<()> {
    let doc = owned_document(storage, user_id, document_id).await?;

    if !doc.status.can_transition_to(DocumentStatus::Paid) {
        return Err(Error::InvalidInput(format!(
            "cannot mark a {} document as paid",
            doc.status
        )));
    }

    storage
        .documents
        .update_status(document_id, DocumentStatus::Paid)
        .await?;
    let dismissed = storage.alerts.dismiss_all_for_document(document_id).await?;

    info!(document_id = %document_id, dismissed, "document marked paid");
    Ok(())
}

/// Archive a document. Same cascade as mark-paid.
pub async fn archive_document(storage: &Storage, user_id: Uuid, document_id: Uuid) -> Result<()> {
    let doc = owned_document(storage, user_id, document_id).await?;

    if !doc.status.can_transition_to(DocumentStatus::Archived) {
        return Err(Error::InvalidInput(format!(
            "cannot archive a {} document",
            doc.status
        )));
    }

    storage
        .documents
        .update_status(document_id, DocumentStatus::Archived)
        .await?;
    storage.alerts.dismiss_all_for_document(document_id).await?;

    info!(document_id = %document_id, "document archived");
    Ok(())
}

/// Delete a document.
///
/// Cascade: every non-dismissed alert for the document is dismissed before
/// the row is removed.
pub async fn delete_document(storage: &Storage, user_id: Uuid, document_id: Uuid) -> Result<()> {
    owned_document(storage, user_id, document_id).await?;

    storage.alerts.dismiss_all_for_document(document_id).await?;
    storage.documents.delete(document_id).await?;

    info!(document_id = %document_id, "document deleted");
    Ok(())
}

/// Delete a folder.
///
/// Cascade: documents referencing the folder have the reference nulled out
/// (handled inside the repository); the documents themselves survive.
pub async fn delete_folder(storage: &Storage, user_id: Uuid, folder_id: Uuid) -> Result<()> {
    match storage.folders.get(folder_id).await? {
        Some(folder) if folder.user_id == user_id => {}
        _ => return Err(Error::NotFound(format!("folder {}", folder_id))),
    }

    storage.folders.delete(folder_id).await?;
    info!(folder_id = %folder_id, "folder deleted");
    Ok(())
}

/// Delete a stack. Same reference-nulling cascade as folders.
pub async fn delete_stack(storage: &Storage, user_id: Uuid, stack_id: Uuid) -> Result<()> {
    match storage.stacks.get(stack_id).await? {
        Some(stack) if stack.user_id == user_id => {}
        _ => return Err(Error::NotFound(format!("stack {}", stack_id))),
    }

    storage.stacks.delete(stack_id).await?;
    info!(stack_id = %stack_id, "stack deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use docguard_core::{AlertKind, CreateDocumentRequest, DocumentCategory, DocumentSource};

    async fn insert_doc(storage: &Storage, user: Uuid) -> Uuid {
        storage
            .documents
            .insert(CreateDocumentRequest {
                user_id: user,
                title: "Electric Bill".to_string(),
                category: DocumentCategory::Finance,
                amount: None,
                due_date: None,
                summary: vec!["bill".to_string()],
                is_scam: false,
                risk_score: 0,
                source: DocumentSource::Scan,
                folder_id: None,
                stack_id: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn mark_paid_dismisses_only_this_documents_alerts() {
        let storage = Storage::local();
        let user = Uuid::new_v4();

        let doc_a = insert_doc(&storage, user).await;
        let doc_b = insert_doc(&storage, user).await;
        storage
            .alerts
            .insert(user, doc_a, AlertKind::Deadline7Day, Utc::now())
            .await
            .unwrap();
        storage
            .alerts
            .insert(user, doc_b, AlertKind::Deadline1Day, Utc::now())
            .await
            .unwrap();

        mark_paid(&storage, user, doc_a).await.unwrap();

        let doc = storage.documents.get(doc_a).await.unwrap().unwrap();
        assert_eq!(doc.status, DocumentStatus::Paid);
        assert!(storage.alerts.active_for_document(doc_a).await.unwrap().is_empty());
        // The other document's alert is untouched.
        assert_eq!(storage.alerts.active_for_document(doc_b).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn mark_paid_twice_is_rejected() {
        let storage = Storage::local();
        let user = Uuid::new_v4();
        let doc = insert_doc(&storage, user).await;

        mark_paid(&storage, user, doc).await.unwrap();
        let err = mark_paid(&storage, user, doc).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn mark_paid_rejects_foreign_documents() {
        let storage = Storage::local();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let doc = insert_doc(&storage, owner).await;

        let err = mark_paid(&storage, stranger, doc).await.unwrap_err();
        assert!(matches!(err, Error::DocumentNotFound(_)));
    }

    #[tokio::test]
    async fn delete_document_dismisses_alerts() {
        let storage = Storage::local();
        let user = Uuid::new_v4();
        let doc = insert_doc(&storage, user).await;
        storage
            .alerts
            .insert(user, doc, AlertKind::Overdue, Utc::now())
            .await
            .unwrap();

        delete_document(&storage, user, doc).await.unwrap();

        assert!(storage.documents.get(doc).await.unwrap().is_none());
        assert!(storage.alerts.active_for_document(doc).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_folder_checks_ownership() {
        let storage = Storage::local();
        let owner = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let folder_id = storage.folders.create(owner, "Bills").await.unwrap();
        let err = delete_folder(&storage, stranger, folder_id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        delete_folder(&storage, owner, folder_id).await.unwrap();
        assert!(storage.folders.get(folder_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn archive_document_transitions_and_dismisses() {
        let storage = Storage::local();
        let user = Uuid::new_v4();
        let doc = insert_doc(&storage, user).await;
        storage
            .alerts
            .insert(user, doc, AlertKind::Deadline7Day, Utc::now())
            .await
            .unwrap();

        archive_document(&storage, user, doc).await.unwrap();

        let record = storage.documents.get(doc).await.unwrap().unwrap();
        assert_eq!(record.status, DocumentStatus::Archived);
        assert!(storage.alerts.active_for_document(doc).await.unwrap().is_empty());
    }
}
