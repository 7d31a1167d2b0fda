use crate::config::StoreConfig;
use crate::error::{AppError, Result};
use crate::models::RawEntry;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Read side of the key-value datastore holding raw article entries.
///
/// Implementations block until the read completes. A key that has never
/// been written yields an empty list.
pub trait EntryStore: Send + Sync {
    fn get_entry(&self, key: &str) -> Result<Vec<RawEntry>>;
}

impl<S: EntryStore + ?Sized> EntryStore for Arc<S> {
    fn get_entry(&self, key: &str) -> Result<Vec<RawEntry>> {
        (**self).get_entry(key)
    }
}

/// Build the store selected by configuration.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn EntryStore>> {
    match config {
        StoreConfig::File { path } => Ok(Arc::new(JsonFileStore::new(path.clone()))),
        #[cfg(feature = "dynamo")]
        StoreConfig::Dynamo { table_name } => {
            let aws_config =
                aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
            let client = aws_sdk_dynamodb::Client::new(&aws_config);
            let store = crate::dynamo::DynamoEntryStore::new(client, table_name.clone())?;
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "dynamo"))]
        StoreConfig::Dynamo { .. } => Err(AppError::ConfigError(
            "dynamo backend requires the `dynamo` feature".into(),
        )),
    }
}

/// Split a stored list value into raw entries.
pub(crate) fn entries_from_value(key: &str, value: Value) -> Result<Vec<RawEntry>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(map) => Ok(map),
                other => Err(AppError::FormatError(format!(
                    "entry {key:?}[{i}] is not an object: {other}"
                ))),
            })
            .collect(),
        other => Err(AppError::DatastoreUnavailable(format!(
            "entry {key:?} is not a list: {other}"
        ))),
    }
}

/// In-memory store, mainly a stand-in for the real datastore in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<RawEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(mut self, key: impl Into<String>, entries: Vec<RawEntry>) -> Self {
        self.insert(key, entries);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, entries: Vec<RawEntry>) {
        self.entries.insert(key.into(), entries);
    }
}

impl EntryStore for MemoryStore {
    fn get_entry(&self, key: &str) -> Result<Vec<RawEntry>> {
        Ok(self.entries.get(key).cloned().unwrap_or_default())
    }
}

/// Store backed by a JSON document of the form `{ "<key>": [ {..}, .. ] }`.
///
/// The file is re-read on every call.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl EntryStore for JsonFileStore {
    fn get_entry(&self, key: &str) -> Result<Vec<RawEntry>> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            AppError::DatastoreUnavailable(format!("{}: {e}", self.path.display()))
        })?;
        let document: Value = serde_json::from_str(&contents).map_err(|e| {
            AppError::DatastoreUnavailable(format!("{}: {e}", self.path.display()))
        })?;

        let Value::Object(mut document) = document else {
            return Err(AppError::DatastoreUnavailable(format!(
                "{}: top level is not an object",
                self.path.display()
            )));
        };

        let value = document.remove(key).unwrap_or(Value::Null);
        let entries = entries_from_value(key, value)?;
        debug!(path = %self.path.display(), key, count = entries.len(), "Read entries from file");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(title: &str) -> RawEntry {
        let mut map = RawEntry::new();
        map.insert("title".into(), json!(title));
        map
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "newsfeed-store-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn memory_store_returns_entries_in_order() {
        let store = MemoryStore::new().with_entries("all_articles", vec![raw("a"), raw("b")]);
        let entries = store.get_entry("all_articles").unwrap();
        assert_eq!(entries, vec![raw("a"), raw("b")]);
    }

    #[test]
    fn memory_store_unknown_key_is_empty() {
        let store = MemoryStore::new();
        assert!(store.get_entry("all_articles").unwrap().is_empty());
    }

    #[test]
    fn arc_store_delegates() {
        let store: Arc<dyn EntryStore> =
            Arc::new(MemoryStore::new().with_entries("k", vec![raw("x")]));
        assert_eq!(store.get_entry("k").unwrap().len(), 1);
    }

    #[test]
    fn file_store_reads_key() {
        let path = temp_file(
            "reads",
            r#"{"all_articles": [{"title": "a"}, {"title": "b"}], "other": []}"#,
        );
        let store = JsonFileStore::new(&path);
        let entries = store.get_entry("all_articles").unwrap();
        assert_eq!(entries, vec![raw("a"), raw("b")]);
        assert!(store.get_entry("missing").unwrap().is_empty());
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn file_store_missing_file_is_unavailable() {
        let store = JsonFileStore::new("/nonexistent/newsfeed/articles.json");
        assert!(matches!(
            store.get_entry("all_articles"),
            Err(AppError::DatastoreUnavailable(_))
        ));
    }

    #[test]
    fn file_store_invalid_json_is_unavailable() {
        let path = temp_file("invalid", "{not json");
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.get_entry("all_articles"),
            Err(AppError::DatastoreUnavailable(_))
        ));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn non_list_value_is_unavailable() {
        assert!(matches!(
            entries_from_value("k", json!("oops")),
            Err(AppError::DatastoreUnavailable(_))
        ));
    }

    #[test]
    fn non_object_element_is_format_error() {
        assert!(matches!(
            entries_from_value("k", json!([{"title": "a"}, 3])),
            Err(AppError::FormatError(_))
        ));
    }

    #[tokio::test]
    async fn open_store_builds_file_store() {
        let path = temp_file("open", r#"{"all_articles": [{"title": "a"}]}"#);
        let store = open_store(&StoreConfig::File { path: path.clone() })
            .await
            .unwrap();
        assert_eq!(store.get_entry("all_articles").unwrap().len(), 1);
        std::fs::remove_file(path).unwrap();
    }
}
