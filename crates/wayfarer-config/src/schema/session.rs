//! Session partition configuration: extensions, downloads, storage.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A storage category the runtime can wipe for a partition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StorageCategory {
    AppCache,
    Cookies,
    Filesystem,
    IndexDb,
    LocalStorage,
    ShaderCache,
    WebSql,
    ServiceWorkers,
    CacheStorage,
}

impl StorageCategory {
    pub const ALL: [StorageCategory; 9] = [
        Self::AppCache,
        Self::Cookies,
        Self::Filesystem,
        Self::IndexDb,
        Self::LocalStorage,
        Self::ShaderCache,
        Self::WebSql,
        Self::ServiceWorkers,
        Self::CacheStorage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::AppCache => "appcache",
            Self::Cookies => "cookies",
            Self::Filesystem => "filesystem",
            Self::IndexDb => "indexdb",
            Self::LocalStorage => "localstorage",
            Self::ShaderCache => "shadercache",
            Self::WebSql => "websql",
            Self::ServiceWorkers => "serviceworkers",
            Self::CacheStorage => "cachestorage",
        }
    }
}

impl fmt::Display for StorageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Partition-level settings shared by the normal and incognito sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Directory scanned for unpacked extensions, one per subdirectory.
    /// `None` resolves to `<data_dir>/wayfarer/extensions`.
    pub extensions_dir: Option<PathBuf>,
    /// Extension bundled with the browser, loaded into the normal partition.
    pub builtin_extension: Option<PathBuf>,
    /// Where downloads are saved. `None` resolves to the OS download folder.
    pub downloads_dir: Option<PathBuf>,
    /// Categories wiped by a cache clear.
    pub storage_categories: Vec<StorageCategory>,
    /// Hosts whose requests are cancelled, subdomains included.
    pub blocked_hosts: Vec<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            extensions_dir: None,
            builtin_extension: Some(PathBuf::from("extensions/wayfarer-darkreader")),
            downloads_dir: None,
            storage_categories: StorageCategory::ALL.to_vec(),
            blocked_hosts: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn resolved_extensions_dir(&self) -> Option<PathBuf> {
        self.extensions_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("wayfarer").join("extensions")))
    }

    pub fn resolved_downloads_dir(&self) -> PathBuf {
        self.downloads_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_categories_cover_every_storage_kind() {
        let config = SessionConfig::default();
        assert_eq!(config.storage_categories.len(), 9);
        assert!(config.storage_categories.contains(&StorageCategory::Cookies));
        assert!(config
            .storage_categories
            .contains(&StorageCategory::ServiceWorkers));
    }

    #[test]
    fn storage_category_names() {
        assert_eq!(StorageCategory::IndexDb.as_str(), "indexdb");
        assert_eq!(StorageCategory::LocalStorage.to_string(), "localstorage");
        let json = serde_json::to_string(&StorageCategory::CacheStorage).unwrap();
        assert_eq!(json, "\"cachestorage\"");
    }

    #[test]
    fn session_config_partial_toml() {
        let config: SessionConfig = toml::from_str(
            r#"
downloads_dir = "/tmp/dl"
storage_categories = ["cookies", "localstorage"]
blocked_hosts = ["ads.example.com"]
"#,
        )
        .unwrap();
        assert_eq!(config.resolved_downloads_dir(), PathBuf::from("/tmp/dl"));
        assert_eq!(
            config.storage_categories,
            vec![StorageCategory::Cookies, StorageCategory::LocalStorage]
        );
        assert_eq!(config.blocked_hosts, vec!["ads.example.com".to_string()]);
        assert!(config.builtin_extension.is_some());
    }

    #[test]
    fn explicit_extensions_dir_wins() {
        let config = SessionConfig {
            extensions_dir: Some(PathBuf::from("/opt/ext")),
            ..Default::default()
        };
        assert_eq!(
            config.resolved_extensions_dir(),
            Some(PathBuf::from("/opt/ext"))
        );
    }
}
