//! Blob path construction.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Strip path separators and control characters from a file name.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_control() || matches!(c, '/' | '\\') {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Blob path for the live content of a file.
pub fn content_path(owner_id: Uuid, name: &str, at: DateTime<Utc>) -> String {
    format!("{}/{}_{}", owner_id, at.timestamp_millis(), sanitize_name(name))
}

/// Blob path for an immutable version artifact.
pub fn version_path(owner_id: Uuid, name: &str, at: DateTime<Utc>) -> String {
    format!(
        "versions/{}/{}_{}",
        owner_id,
        at.timestamp_millis(),
        sanitize_name(name)
    )
}
