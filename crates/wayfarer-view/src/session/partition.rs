//! The embedding runtime's isolated storage partition.

use std::path::{Path, PathBuf};

use serde::Serialize;
use wayfarer_config::StorageCategory;

use super::PartitionKind;
use crate::error::ViewError;
use crate::surface::SurfaceId;

/// A browser extension installed into a partition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionInfo {
    pub id: String,
    pub name: String,
    pub path: PathBuf,
}

/// Runtime download item progress, as reported while it runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadProgress {
    Progressing { received_bytes: u64, paused: bool },
    Interrupted,
}

/// How a download item ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed,
    Cancelled,
    Interrupted,
}

impl DownloadOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Interrupted => "interrupted",
        }
    }
}

/// Events a partition raises on behalf of the surfaces that use it.
#[derive(Debug, Clone, PartialEq)]
pub enum PartitionEvent {
    /// A page asked for a permission. Answer with
    /// [`Partition::resolve_permission`].
    PermissionRequested {
        request_id: u64,
        surface: SurfaceId,
        permission: String,
        url: String,
    },
    /// A download is about to start. `item` identifies it in later events.
    WillDownload {
        item: u64,
        surface: SurfaceId,
        file_name: String,
        total_bytes: u64,
    },
    DownloadUpdated {
        item: u64,
        progress: DownloadProgress,
    },
    DownloadDone {
        item: u64,
        outcome: DownloadOutcome,
    },
    /// A network request is about to be sent. Answer with
    /// [`Partition::resolve_request`].
    BeforeRequest { request_id: u64, url: String },
}

/// A storage partition provided by the embedding runtime.
pub trait Partition: Send + Sync {
    fn kind(&self) -> PartitionKind;

    fn clear_cache(&self) -> Result<(), ViewError>;
    fn clear_storage_data(&self, categories: &[StorageCategory]) -> Result<(), ViewError>;

    fn load_extension(&self, path: &Path) -> Result<ExtensionInfo, ViewError>;

    fn resolve_permission(&self, request_id: u64, granted: bool);
    fn set_download_save_path(&self, item: u64, path: &Path);
    fn resolve_request(&self, request_id: u64, cancel: bool);
}
