use super::*;
use crate::schema::WayfarerConfig;

#[test]
fn default_config_is_valid() {
    assert!(validate(&WayfarerConfig::default()).is_ok());
}

#[test]
fn toolbar_height_out_of_range() {
    let mut config = WayfarerConfig::default();
    config.view.toolbar_height = 401;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("view.toolbar_height"));
}

#[test]
fn poll_interval_too_small() {
    let mut config = WayfarerConfig::default();
    config.view.title_poll_interval_ms = 1;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("title_poll_interval_ms"));
}

#[test]
fn empty_storage_categories_rejected() {
    let mut config = WayfarerConfig::default();
    config.session.storage_categories.clear();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("storage_categories"));
}

#[test]
fn blocked_host_with_path_rejected() {
    let mut config = WayfarerConfig::default();
    config.session.blocked_hosts = vec!["ads.example.com/banner".into()];
    assert!(validate(&config).is_err());
}

#[test]
fn all_errors_are_collected() {
    let mut config = WayfarerConfig::default();
    config.view.toolbar_height = 1000;
    config.dialogs.find.width = 0.0;
    config.dialogs.menu.hide_delay_ms = 60_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("toolbar_height"));
    assert!(err.contains("dialogs.find"));
    assert!(err.contains("dialogs.menu.hide_delay_ms"));
}
