use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::debug;
use wayfarer_common::{new_download_id, WeakOutbox};

use super::PartitionKind;

/// An in-flight download.
#[derive(Debug, Clone)]
pub struct DownloadRecord {
    /// 32 hex characters, used on every download notification.
    pub id: String,
    pub file_name: String,
    pub save_path: PathBuf,
    pub total_bytes: u64,
    pub received_bytes: u64,
    pub started_at: DateTime<Utc>,
    /// Window that receives this download's notifications.
    pub(crate) outbox: WeakOutbox,
}

/// In-flight downloads, keyed by id and by the runtime's item handle.
///
/// A record is removed when its download finishes, so every later event
/// for the same item finds nothing.
#[derive(Debug, Default)]
pub struct DownloadTracker {
    records: HashMap<String, DownloadRecord>,
    items: HashMap<(PartitionKind, u64), String>,
}

impl DownloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(
        &mut self,
        partition: PartitionKind,
        item: u64,
        file_name: &str,
        total_bytes: u64,
        save_path: PathBuf,
        outbox: WeakOutbox,
    ) -> &DownloadRecord {
        let id = new_download_id();
        if let Some(previous) = self.items.insert((partition, item), id.clone()) {
            self.records.remove(&previous);
            debug!(id = %previous, item, "download restarted, previous record dropped");
        }
        self.records.entry(id.clone()).or_insert(DownloadRecord {
            id,
            file_name: file_name.to_string(),
            save_path,
            total_bytes,
            received_bytes: 0,
            started_at: Utc::now(),
            outbox,
        })
    }

    pub fn get(&self, partition: PartitionKind, item: u64) -> Option<&DownloadRecord> {
        self.items
            .get(&(partition, item))
            .and_then(|id| self.records.get(id))
    }

    /// Record progress. Returns the updated record, or `None` if the item
    /// is unknown or already finished.
    pub fn progress(
        &mut self,
        partition: PartitionKind,
        item: u64,
        received_bytes: u64,
    ) -> Option<&DownloadRecord> {
        let id = self.items.get(&(partition, item))?;
        let record = self.records.get_mut(id)?;
        record.received_bytes = received_bytes;
        Some(record)
    }

    /// Remove and return the record of a finished item.
    pub fn finish(&mut self, partition: PartitionKind, item: u64) -> Option<DownloadRecord> {
        let id = self.items.remove(&(partition, item))?;
        self.records.remove(&id)
    }

    pub fn active(&self) -> Vec<&DownloadRecord> {
        let mut records: Vec<&DownloadRecord> = self.records.values().collect();
        records.sort_by_key(|r| r.started_at);
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
