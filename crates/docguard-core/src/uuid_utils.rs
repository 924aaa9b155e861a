//! UUID v7 utilities for time-ordered identifiers.
//!
//! Entities created by the pipeline (documents, folders, stacks, alerts)
//! use UUIDv7 so that identifiers sort chronologically, which keeps
//! "newest first" listings cheap and makes log correlation easier.

use uuid::Uuid;

/// Generate a new UUIDv7 identifier.
///
/// UUIDv7 embeds a Unix timestamp (milliseconds) in the first 48 bits,
/// providing natural time-ordering.
#[inline]
pub fn new_v7() -> Uuid {
    Uuid::now_v7()
}
