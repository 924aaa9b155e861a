//! Folder and stack routing.
//!
//! Folder routing is two-tier: an ordered document-type keyword table is
//! checked against the lowercased title first (type inference from an OCR
//! title is more specific than the coarse category), with a category table
//! as the always-available fallback. Both tables are ordered lists, not
//! maps, since declaration order resolves overlapping keywords.
//!
//! Stack routing is first-match-wins over the user's stacks in position
//! order. No scoring, no multi-match resolution: overlapping keywords
//! across stacks are resolved purely by list order, which can under-route
//! ambiguous documents. Known limitation, kept for predictability.

use tracing::{debug, info};
use uuid::Uuid;

use docguard_core::{DocumentCategory, LifeStack, Result};
use docguard_store::Storage;

/// Ordered (title keyword → folder name) table. First match wins, so more
/// specific multiword keywords come before the generic single words they
/// contain.
pub const FOLDER_KEYWORD_TABLE: &[(&str, &str)] = &[
    ("electric bill", "Utility Bills"),
    ("electricity", "Utility Bills"),
    ("gas bill", "Utility Bills"),
    ("water bill", "Utility Bills"),
    ("internet bill", "Utility Bills"),
    ("phone bill", "Utility Bills"),
    ("utility", "Utility Bills"),
    ("driving licence", "Driving Licence"),
    ("driving license", "Driving Licence"),
    ("driver's license", "Driving Licence"),
    ("credit card", "Credit Cards"),
    ("bank statement", "Bank Statements"),
    ("insurance", "Insurance"),
    ("passport", "Identity Documents"),
    ("national id", "Identity Documents"),
    ("tuition", "Education Fees"),
    ("prescription", "Prescriptions"),
    ("rent", "Housing"),
    ("mortgage", "Housing"),
    ("tax return", "Tax Documents"),
    ("tax statement", "Tax Documents"),
    ("subscription", "Subscriptions"),
    ("receipt", "Receipts & Orders"),
    ("invoice", "Invoices"),
];

/// Category → fallback folder name.
pub fn category_folder(category: DocumentCategory) -> &'static str {
    match category {
        DocumentCategory::Finance => "Finance Documents",
        DocumentCategory::Education => "Education",
        DocumentCategory::Shopping => "Receipts & Orders",
        DocumentCategory::Health => "Medical Records",
        DocumentCategory::Career => "Career Documents",
        DocumentCategory::Other => "Other Documents",
    }
}

/// Resolve the target folder name for a document title and category.
pub fn resolve_folder_name(title: &str, category: DocumentCategory) -> &'static str {
    let title_lower = title.to_lowercase();
    for (keyword, folder) in FOLDER_KEYWORD_TABLE {
        if title_lower.contains(keyword) {
            debug!(keyword, folder, "folder resolved by title keyword");
            return folder;
        }
    }
    category_folder(category)
}

/// Resolve a folder name and ensure the folder exists for the user,
/// creating it on first use. Name matching against existing folders is
/// case-insensitive.
pub async fn assign_folder(
    storage: &Storage,
    user_id: Uuid,
    title: &str,
    category: DocumentCategory,
) -> Result<(Uuid, String)> {
    let name = resolve_folder_name(title, category);

    if let Some(existing) = storage.folders.find_by_name_ci(user_id, name).await? {
        return Ok((existing.id, existing.name));
    }

    let id = storage.folders.create(user_id, name).await?;
    info!(folder = name, "created folder on first use");
    Ok((id, name.to_string()))
}

/// Route a document to the first stack (in caller order) with any keyword
/// that is a case-insensitive substring of `"{title} {category}"`.
pub fn route_stack(title: &str, category: DocumentCategory, stacks: &[LifeStack]) -> Option<Uuid> {
    let haystack = format!("{} {}", title, category).to_lowercase();

    for stack in stacks {
        let matched = stack
            .keywords
            .iter()
            .any(|keyword| !keyword.is_empty() && haystack.contains(&keyword.to_lowercase()));
        if matched {
            debug!(stack = %stack.name, "document routed to stack");
            return Some(stack.id);
        }
    }

    None
}
