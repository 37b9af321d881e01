use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::partition::ExtensionInfo;
use super::PartitionKind;

/// Outcome of loading an extensions directory.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExtensionLoadReport {
    pub loaded: Vec<(PartitionKind, ExtensionInfo)>,
    pub failed: Vec<(PathBuf, String)>,
}

impl ExtensionLoadReport {
    pub fn loaded_into(&self, kind: PartitionKind) -> usize {
        self.loaded.iter().filter(|(k, _)| *k == kind).count()
    }
}

/// Immediate subdirectories of `dir`, sorted by name. Files are skipped.
pub fn extension_dirs(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}
