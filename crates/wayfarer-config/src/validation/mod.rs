//! Configuration validation.
//!
//! Collects every problem into a single `ConfigError` so the user sees all
//! of them at once.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::WayfarerConfig;
use wayfarer_common::ConfigError;

use helpers::{validate_range, validate_range_u64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &WayfarerConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_range(&mut errors, "view.toolbar_height", config.view.toolbar_height, 0, 400);
    validate_range_u64(
        &mut errors,
        "view.title_poll_interval_ms",
        config.view.title_poll_interval_ms,
        16,
        5000,
    );

    if config.session.storage_categories.is_empty() {
        errors.push("session.storage_categories must not be empty".into());
    }
    for host in &config.session.blocked_hosts {
        if host.trim().is_empty() || host.contains('/') {
            errors.push(format!("session.blocked_hosts entry {host:?} is not a host name"));
        }
    }

    for (name, dialog) in [
        ("menu", &config.dialogs.menu),
        ("find", &config.dialogs.find),
        ("permission", &config.dialogs.permission),
    ] {
        if dialog.width <= 0.0 || dialog.height <= 0.0 {
            errors.push(format!("dialogs.{name} must have a positive size"));
        }
        validate_range_u64(
            &mut errors,
            &format!("dialogs.{name}.hide_delay_ms"),
            dialog.hide_delay_ms,
            0,
            10_000,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
