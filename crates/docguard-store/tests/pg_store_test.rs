//! PostgreSQL repository integration tests.
//!
//! These tests require a live database. Set `DATABASE_URL` to enable them;
//! without it every test skips.
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/docguard_test \
//! cargo test --package docguard-store --test pg_store_test
//! ```

use docguard_core::{
    CreateDocumentRequest, DocumentCategory, DocumentSource, DocumentStatus, FolderRepository,
};
use docguard_store::Storage;
use uuid::Uuid;

fn database_url() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var("DATABASE_URL").ok()
}

async fn connect_or_skip(test_name: &str) -> Option<Storage> {
    match database_url() {
        Some(url) => Some(
            Storage::connect(&url)
                .await
                .expect("failed to connect to test database"),
        ),
        None => {
            println!("skipping {} - DATABASE_URL not set", test_name);
            None
        }
    }
}

fn doc_request(user_id: Uuid) -> CreateDocumentRequest {
    CreateDocumentRequest {
        user_id,
        title: "Electric Bill".to_string(),
        category: DocumentCategory::Finance,
        amount: Some(120.50),
        due_date: chrono::NaiveDate::from_ymd_opt(2026, 9, 1),
        summary: vec!["Monthly electricity charge".to_string()],
        is_scam: false,
        risk_score: 0,
        source: DocumentSource::Scan,
        folder_id: None,
        stack_id: None,
    }
}

#[tokio::test]
async fn document_roundtrip() {
    let Some(storage) = connect_or_skip("document_roundtrip").await else {
        return;
    };
    let user = Uuid::new_v4();

    let id = storage.documents.insert(doc_request(user)).await.unwrap();
    let doc = storage.documents.get(id).await.unwrap().unwrap();

    assert_eq!(doc.title, "Electric Bill");
    assert_eq!(doc.category, DocumentCategory::Finance);
    assert_eq!(doc.status, DocumentStatus::New);
    assert_eq!(doc.amount, Some(120.50));
    assert_eq!(doc.summary, vec!["Monthly electricity charge".to_string()]);

    storage.documents.delete(id).await.unwrap();
    assert!(storage.documents.get(id).await.unwrap().is_none());
}

#[tokio::test]
async fn folder_delete_nulls_references() {
    let Some(storage) = connect_or_skip("folder_delete_nulls_references").await else {
        return;
    };
    let user = Uuid::new_v4();

    let folder_id = storage.folders.create(user, "Utility Bills").await.unwrap();
    let mut req = doc_request(user);
    req.folder_id = Some(folder_id);
    let doc_id = storage.documents.insert(req).await.unwrap();

    FolderRepository::delete(storage.folders.as_ref(), folder_id)
        .await
        .unwrap();

    let doc = storage.documents.get(doc_id).await.unwrap().unwrap();
    assert!(doc.folder_id.is_none());

    storage.documents.delete(doc_id).await.unwrap();
}

#[tokio::test]
async fn folder_name_lookup_is_case_insensitive() {
    let Some(storage) = connect_or_skip("folder_name_lookup_is_case_insensitive").await else {
        return;
    };
    let user = Uuid::new_v4();

    let id = storage.folders.create(user, "Medical Records").await.unwrap();
    let found = storage
        .folders
        .find_by_name_ci(user, "medical records")
        .await
        .unwrap();
    assert_eq!(found.map(|f| f.id), Some(id));

    FolderRepository::delete(storage.folders.as_ref(), id)
        .await
        .unwrap();
}
