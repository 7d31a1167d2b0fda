use chrono::{DateTime, Utc};
use serde::Serialize;

/// One stored article as it comes out of the datastore, before validation.
pub type RawEntry = serde_json::Map<String, serde_json::Value>;

/// Author used when a stored entry has none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A single news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub author: String,
    pub title: String,
    pub body: String,
    /// Always UTC. A stored value with no offset was read as UTC, so the
    /// serialized `Z` reflects that assumption rather than the source.
    pub publish_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub url: String,
}

impl TryFrom<&RawEntry> for Article {
    type Error = crate::error::AppError;

    fn try_from(raw: &RawEntry) -> Result<Self, Self::Error> {
        crate::mapper::map_entry(raw)
    }
}
