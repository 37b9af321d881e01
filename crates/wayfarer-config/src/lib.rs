//! Wayfarer configuration system.
//!
//! TOML-based configuration with validation. All sections use defaults so
//! partial configs work out of the box.
//!
//! ```rust,no_run
//! let config = wayfarer_config::load_config().expect("failed to load config");
//! println!("{}", wayfarer_config::config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    CertificatePolicy, DialogConfig, DialogsConfig, LogLevel, SessionConfig, StorageCategory,
    ViewConfig, WayfarerConfig, CONFIG_SCHEMA_VERSION,
};

use std::path::Path;

use wayfarer_common::ConfigError;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<WayfarerConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<WayfarerConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &WayfarerConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_to_json_contains_all_sections() {
        let json = config_to_json(&WayfarerConfig::default());
        assert!(json.contains("\"view\""));
        assert!(json.contains("\"security\""));
        assert!(json.contains("\"session\""));
        assert!(json.contains("\"dialogs\""));
        assert!(json.contains("\"logging\""));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[view]\ntitle_poll_interval_ms = 0\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
