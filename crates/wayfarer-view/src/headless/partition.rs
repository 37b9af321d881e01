use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use wayfarer_config::StorageCategory;

use super::window::lock;
use crate::error::ViewError;
use crate::session::{ExtensionInfo, Partition, PartitionKind};

#[derive(Default)]
struct PartitionState {
    cache_entries: usize,
    cache_clears: usize,
    storage: HashMap<StorageCategory, Vec<String>>,
    extensions: Vec<ExtensionInfo>,
    permission_decisions: Vec<(u64, bool)>,
    request_decisions: Vec<(u64, bool)>,
    save_paths: HashMap<u64, PathBuf>,
    fail_clears: bool,
}

/// A partition whose storage is a map of category to keys.
///
/// Extensions are directories with a `manifest.json` carrying a `name`.
pub struct HeadlessPartition {
    kind: PartitionKind,
    state: Mutex<PartitionState>,
}

impl HeadlessPartition {
    pub fn new(kind: PartitionKind) -> Self {
        Self {
            kind,
            state: Mutex::new(PartitionState::default()),
        }
    }

    /// Put a key into a storage category, as a visited page would.
    pub fn store(&self, category: StorageCategory, key: &str) {
        lock(&self.state)
            .storage
            .entry(category)
            .or_default()
            .push(key.to_string());
    }

    pub fn stored(&self, category: StorageCategory) -> usize {
        lock(&self.state)
            .storage
            .get(&category)
            .map_or(0, Vec::len)
    }

    pub fn cache_resource(&self) {
        lock(&self.state).cache_entries += 1;
    }

    pub fn cache_entries(&self) -> usize {
        lock(&self.state).cache_entries
    }

    pub fn cache_clears(&self) -> usize {
        lock(&self.state).cache_clears
    }

    /// Make every clear call fail.
    pub fn fail_clears(&self) {
        lock(&self.state).fail_clears = true;
    }

    pub fn extensions(&self) -> Vec<ExtensionInfo> {
        lock(&self.state).extensions.clone()
    }

    pub fn permission_decisions(&self) -> Vec<(u64, bool)> {
        lock(&self.state).permission_decisions.clone()
    }

    pub fn request_decisions(&self) -> Vec<(u64, bool)> {
        lock(&self.state).request_decisions.clone()
    }

    pub fn save_path(&self, item: u64) -> Option<PathBuf> {
        lock(&self.state).save_paths.get(&item).cloned()
    }
}

impl Partition for HeadlessPartition {
    fn kind(&self) -> PartitionKind {
        self.kind
    }

    fn clear_cache(&self) -> Result<(), ViewError> {
        let mut state = lock(&self.state);
        if state.fail_clears {
            return Err(ViewError::Partition("cache is locked".into()));
        }
        state.cache_entries = 0;
        state.cache_clears += 1;
        Ok(())
    }

    fn clear_storage_data(&self, categories: &[StorageCategory]) -> Result<(), ViewError> {
        let mut state = lock(&self.state);
        if state.fail_clears {
            return Err(ViewError::Partition("storage is locked".into()));
        }
        for category in categories {
            state.storage.remove(category);
        }
        Ok(())
    }

    fn load_extension(&self, path: &Path) -> Result<ExtensionInfo, ViewError> {
        let fail = |reason: String| ViewError::Extension {
            path: path.to_path_buf(),
            reason,
        };
        let manifest = std::fs::read_to_string(path.join("manifest.json"))
            .map_err(|e| fail(format!("cannot read manifest.json: {e}")))?;
        let manifest: serde_json::Value = serde_json::from_str(&manifest)
            .map_err(|e| fail(format!("invalid manifest.json: {e}")))?;
        let name = manifest
            .get("name")
            .and_then(|n| n.as_str())
            .ok_or_else(|| fail("manifest.json has no name".into()))?;

        let mut state = lock(&self.state);
        let info = ExtensionInfo {
            id: format!("{}-{}", self.kind.partition_name(), state.extensions.len() + 1),
            name: name.to_string(),
            path: path.to_path_buf(),
        };
        state.extensions.push(info.clone());
        Ok(info)
    }

    fn resolve_permission(&self, request_id: u64, granted: bool) {
        lock(&self.state)
            .permission_decisions
            .push((request_id, granted));
    }

    fn set_download_save_path(&self, item: u64, path: &Path) {
        lock(&self.state).save_paths.insert(item, path.to_path_buf());
    }

    fn resolve_request(&self, request_id: u64, cancel: bool) {
        lock(&self.state).request_decisions.push((request_id, cancel));
    }
}
