//! Storage partitions shared by all windows.
//!
//! Tabs live in one of two partitions: a persistent one and an in-memory
//! incognito one. [`SessionPartitionManager`] owns both, loads extensions
//! into them, clears their data, and handles the permission, download, and
//! request-filter events they raise.

mod downloads;
mod extensions;
mod filter;
mod partition;
mod permissions;

pub use downloads::{DownloadRecord, DownloadTracker};
pub use extensions::{extension_dirs, ExtensionLoadReport};
pub use filter::ContentFilter;
pub use partition::{
    DownloadOutcome, DownloadProgress, ExtensionInfo, Partition, PartitionEvent,
};
pub use permissions::{Permission, PermissionPrompt, PermissionReply, PermissionRequest};

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wayfarer_common::{Notification, WeakOutbox};
use wayfarer_config::{SessionConfig, StorageCategory};

use crate::surface::SurfaceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartitionKind {
    Normal,
    Incognito,
}

impl PartitionKind {
    pub const ALL: [PartitionKind; 2] = [Self::Normal, Self::Incognito];

    /// Runtime partition name. The `persist:` prefix makes it disk-backed.
    pub fn partition_name(self) -> &'static str {
        match self {
            Self::Normal => "persist:view",
            Self::Incognito => "view_incognito",
        }
    }

    pub fn is_persistent(self) -> bool {
        matches!(self, Self::Normal)
    }
}

/// What the session needs from the window that owns a surface.
#[derive(Clone)]
pub struct WindowLink {
    pub outbox: WeakOutbox,
    pub prompt: Arc<dyn PermissionPrompt>,
}

/// Finds the window hosting a surface.
pub trait WindowLocator {
    fn locate(&self, surface: SurfaceId) -> Option<WindowLink>;
}

struct PartitionSlot {
    partition: Arc<dyn Partition>,
    extensions: Vec<ExtensionInfo>,
    filter: ContentFilter,
}

impl PartitionSlot {
    fn new(partition: Arc<dyn Partition>, blocked_hosts: &[String]) -> Self {
        Self {
            partition,
            extensions: Vec::new(),
            filter: ContentFilter::new(blocked_hosts),
        }
    }
}

pub struct SessionPartitionManager {
    normal: PartitionSlot,
    incognito: PartitionSlot,
    storage_categories: Vec<StorageCategory>,
    downloads_dir: PathBuf,
    builtin_extension: Option<PathBuf>,
    downloads: DownloadTracker,
}

impl SessionPartitionManager {
    /// Take ownership of both partitions. Incognito data left over from a
    /// previous run is wiped here.
    pub fn new(
        config: &SessionConfig,
        normal: Arc<dyn Partition>,
        incognito: Arc<dyn Partition>,
    ) -> Self {
        let manager = Self {
            normal: PartitionSlot::new(normal, &config.blocked_hosts),
            incognito: PartitionSlot::new(incognito, &config.blocked_hosts),
            storage_categories: config.storage_categories.clone(),
            downloads_dir: config.resolved_downloads_dir(),
            builtin_extension: config.builtin_extension.clone(),
            downloads: DownloadTracker::new(),
        };
        manager.clear_cache(PartitionKind::Incognito);
        manager
    }

    fn slot(&self, kind: PartitionKind) -> &PartitionSlot {
        match kind {
            PartitionKind::Normal => &self.normal,
            PartitionKind::Incognito => &self.incognito,
        }
    }

    fn slot_mut(&mut self, kind: PartitionKind) -> &mut PartitionSlot {
        match kind {
            PartitionKind::Normal => &mut self.normal,
            PartitionKind::Incognito => &mut self.incognito,
        }
    }

    pub fn partition(&self, kind: PartitionKind) -> &Arc<dyn Partition> {
        &self.slot(kind).partition
    }

    pub fn extensions(&self, kind: PartitionKind) -> &[ExtensionInfo] {
        &self.slot(kind).extensions
    }

    pub fn filter(&self, kind: PartitionKind) -> &ContentFilter {
        &self.slot(kind).filter
    }

    pub fn filter_mut(&mut self, kind: PartitionKind) -> &mut ContentFilter {
        &mut self.slot_mut(kind).filter
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    pub fn active_downloads(&self) -> Vec<&DownloadRecord> {
        self.downloads.active()
    }

    // -- extensions ----------------------------------------------------------

    /// Load every subdirectory of `dir` into both partitions, then the
    /// built-in extension into the normal partition. Failures are logged
    /// and skipped.
    pub fn load_extensions(&mut self, dir: Option<&Path>) -> ExtensionLoadReport {
        let mut report = ExtensionLoadReport::default();

        if let Some(dir) = dir {
            match extension_dirs(dir) {
                Ok(paths) => {
                    for path in paths {
                        for kind in PartitionKind::ALL {
                            self.load_extension_into(kind, &path, &mut report);
                        }
                    }
                }
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "extensions directory unreadable")
                }
            }
        }

        if let Some(builtin) = self.builtin_extension.clone() {
            if builtin.is_dir() {
                self.load_extension_into(PartitionKind::Normal, &builtin, &mut report);
            } else {
                debug!(path = %builtin.display(), "built-in extension not installed");
            }
        }

        info!(
            loaded = report.loaded.len(),
            failed = report.failed.len(),
            "extensions loaded"
        );
        report
    }

    fn load_extension_into(
        &mut self,
        kind: PartitionKind,
        path: &Path,
        report: &mut ExtensionLoadReport,
    ) {
        let slot = self.slot_mut(kind);
        match slot.partition.load_extension(path) {
            Ok(info) => {
                debug!(partition = ?kind, name = %info.name, "extension loaded");
                slot.extensions.push(info.clone());
                report.loaded.push((kind, info));
            }
            Err(e) => {
                warn!(partition = ?kind, path = %path.display(), error = %e, "extension failed to load");
                if !report.failed.iter().any(|(p, _)| p == path) {
                    report.failed.push((path.to_path_buf(), e.to_string()));
                }
            }
        }
    }

    // -- clearing ------------------------------------------------------------

    /// Clear the cache and every configured storage category of one
    /// partition. Failures are logged.
    pub fn clear_cache(&self, kind: PartitionKind) {
        let partition = &self.slot(kind).partition;
        if let Err(e) = partition.clear_cache() {
            warn!(partition = ?kind, error = %e, "failed to clear cache");
        }
        if let Err(e) = partition.clear_storage_data(&self.storage_categories) {
            warn!(partition = ?kind, error = %e, "failed to clear storage data");
        }
        debug!(partition = ?kind, categories = self.storage_categories.len(), "partition cleared");
    }

    pub fn clear_browsing_data(&self) {
        for kind in PartitionKind::ALL {
            self.clear_cache(kind);
        }
        info!("browsing data cleared");
    }

    // -- partition events ----------------------------------------------------

    pub fn handle_event(
        &mut self,
        kind: PartitionKind,
        event: PartitionEvent,
        windows: &dyn WindowLocator,
    ) {
        match event {
            PartitionEvent::PermissionRequested {
                request_id,
                surface,
                permission,
                url,
            } => self.on_permission_request(kind, request_id, surface, &permission, &url, windows),
            PartitionEvent::WillDownload {
                item,
                surface,
                file_name,
                total_bytes,
            } => self.on_will_download(kind, item, surface, &file_name, total_bytes, windows),
            PartitionEvent::DownloadUpdated { item, progress } => {
                self.on_download_updated(kind, item, progress)
            }
            PartitionEvent::DownloadDone { item, outcome } => {
                self.on_download_done(kind, item, outcome)
            }
            PartitionEvent::BeforeRequest { request_id, url } => {
                let slot = self.slot(kind);
                let cancel = slot.filter.is_blocked(&url);
                if cancel {
                    debug!(partition = ?kind, url = %url, "request blocked");
                }
                slot.partition.resolve_request(request_id, cancel);
            }
        }
    }

    fn on_permission_request(
        &self,
        kind: PartitionKind,
        request_id: u64,
        surface: SurfaceId,
        permission: &str,
        url: &str,
        windows: &dyn WindowLocator,
    ) {
        let permission = Permission::parse(permission);
        let reply = PermissionReply::new(request_id, self.slot(kind).partition.clone());

        if permission.is_auto_granted() {
            reply.grant();
            return;
        }

        let request = PermissionRequest::new(request_id, surface, permission, url);
        match windows.locate(surface) {
            Some(link) => {
                if let Err(e) = link.prompt.request(request, reply) {
                    warn!(request_id, surface = %surface, error = %e, "permission prompt failed, denying");
                }
            }
            None => {
                warn!(request_id, surface = %surface, "no window for permission request, denying");
                reply.deny();
            }
        }
    }

    fn on_will_download(
        &mut self,
        kind: PartitionKind,
        item: u64,
        surface: SurfaceId,
        file_name: &str,
        total_bytes: u64,
        windows: &dyn WindowLocator,
    ) {
        let file_name = Path::new(file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("download")
            .to_string();
        let save_path = self.downloads_dir.join(&file_name);
        self.slot(kind)
            .partition
            .set_download_save_path(item, &save_path);

        let outbox = match windows.locate(surface) {
            Some(link) => link.outbox,
            None => {
                debug!(surface = %surface, "download from a surface with no window");
                WeakOutbox::default()
            }
        };

        let record = self
            .downloads
            .start(kind, item, &file_name, total_bytes, save_path, outbox);
        info!(id = %record.id, file = %record.file_name, total_bytes, "download started");
        record.outbox.push(Notification::DownloadStarted {
            id: record.id.clone(),
            file_name: record.file_name.clone(),
            received_bytes: 0,
            total_bytes: record.total_bytes,
            save_path: record.save_path.display().to_string(),
        });
    }

    fn on_download_updated(&mut self, kind: PartitionKind, item: u64, progress: DownloadProgress) {
        match progress {
            DownloadProgress::Progressing {
                received_bytes,
                paused: false,
            } => match self.downloads.progress(kind, item, received_bytes) {
                Some(record) => {
                    record.outbox.push(Notification::DownloadProgress {
                        id: record.id.clone(),
                        received_bytes,
                    });
                }
                None => debug!(item, "progress for unknown download ignored"),
            },
            DownloadProgress::Progressing { paused: true, .. } => {
                if let Some(record) = self.downloads.get(kind, item) {
                    info!(id = %record.id, "download paused");
                }
            }
            DownloadProgress::Interrupted => {
                if let Some(record) = self.downloads.get(kind, item) {
                    info!(id = %record.id, "download interrupted, can be resumed");
                }
            }
        }
    }

    fn on_download_done(&mut self, kind: PartitionKind, item: u64, outcome: DownloadOutcome) {
        let Some(record) = self.downloads.finish(kind, item) else {
            debug!(item, "completion for unknown download ignored");
            return;
        };
        match outcome {
            DownloadOutcome::Completed => {
                info!(id = %record.id, path = %record.save_path.display(), "download completed");
                record
                    .outbox
                    .push(Notification::DownloadCompleted { id: record.id });
            }
            other => {
                warn!(id = %record.id, state = other.as_str(), "download failed");
                record.outbox.push(Notification::DownloadFailed {
                    id: record.id,
                    state: other.as_str().to_string(),
                });
            }
        }
    }
}
