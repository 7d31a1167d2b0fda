use crate::error::{AppError, Result};
use crate::models::RawEntry;
use crate::store::{entries_from_value, EntryStore};
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use std::collections::HashMap;
use tokio::runtime::Handle;
use tracing::debug;

const PAYLOAD_ATTR: &str = "payload";

/// DynamoDB-backed entry store.
///
/// Each key is one item `{ pk: S(key), payload: S(<json list>) }`. Reads block
/// on the runtime the store was created in, so `get_entry` must run on a
/// blocking-pool thread (`tokio::task::spawn_blocking`), never on a worker.
#[derive(Clone)]
pub struct DynamoEntryStore {
    client: Client,
    table_name: String,
    handle: Handle,
}

impl DynamoEntryStore {
    pub fn new(client: Client, table_name: String) -> Result<Self> {
        let handle = Handle::try_current().map_err(|e| AppError::ConfigError(e.to_string()))?;
        Ok(Self {
            client,
            table_name,
            handle,
        })
    }

    async fn fetch(&self, key: &str) -> Result<Vec<RawEntry>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(key.into()))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        let Some(item) = output.item else {
            debug!(table = %self.table_name, key, "Entry not found");
            return Ok(Vec::new());
        };

        let entries = item_to_entries(key, &item)?;
        debug!(table = %self.table_name, key, count = entries.len(), "Read entries from DynamoDB");
        Ok(entries)
    }
}

impl EntryStore for DynamoEntryStore {
    fn get_entry(&self, key: &str) -> Result<Vec<RawEntry>> {
        self.handle.block_on(self.fetch(key))
    }
}

fn item_to_entries(key: &str, item: &HashMap<String, AttributeValue>) -> Result<Vec<RawEntry>> {
    let payload = item
        .get(PAYLOAD_ATTR)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| {
            AppError::DatastoreUnavailable(format!("entry {key:?} has no string payload"))
        })?;
    let value = serde_json::from_str(payload)
        .map_err(|e| AppError::DatastoreUnavailable(format!("entry {key:?}: {e}")))?;
    entries_from_value(key, value)
}
