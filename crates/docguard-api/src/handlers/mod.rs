//! Handler modules for docguard-api.

pub mod alerts;
pub mod documents;
pub mod emails;
pub mod folders;
pub mod scan;
pub mod settings;
pub mod stacks;

use serde::Deserialize;
use uuid::Uuid;

/// Query parameter carrying the acting user.
///
/// Session identity is resolved by the OAuth boundary in front of this
/// server; handlers only need the resolved user id.
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Uuid,
}
