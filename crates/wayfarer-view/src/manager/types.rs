use std::time::Duration;

use wayfarer_config::{CertificatePolicy, WayfarerConfig};

/// Per-window settings for tab views, taken from the config.
#[derive(Debug, Clone)]
pub struct ViewSettings {
    /// Space above tab content reserved for the toolbar.
    pub toolbar_height: f64,
    pub title_poll_interval: Duration,
    pub preload_script: Option<String>,
    /// Loaded when a tab is created without a URL.
    pub home_url: String,
    pub user_agent: Option<String>,
    pub certificate_policy: CertificatePolicy,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self::from_config(&WayfarerConfig::default())
    }
}

impl ViewSettings {
    pub fn from_config(config: &WayfarerConfig) -> Self {
        let view = &config.view;
        Self {
            toolbar_height: f64::from(view.toolbar_height),
            title_poll_interval: Duration::from_millis(view.title_poll_interval_ms),
            preload_script: Some(view.preload_script.clone()).filter(|s| !s.is_empty()),
            home_url: view.home_url.clone(),
            user_agent: Some(view.user_agent.clone()).filter(|s| !s.is_empty()),
            certificate_policy: config.security.certificate_policy,
        }
    }
}

/// Parameters for creating one tab view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    /// Initial URL. `None` loads the home URL.
    pub url: Option<String>,
    pub incognito: bool,
}

impl ViewOptions {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            incognito: false,
        }
    }

    pub fn incognito(mut self) -> Self {
        self.incognito = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config() {
        let mut config = WayfarerConfig::default();
        config.view.toolbar_height = 40;
        config.view.user_agent = "Wayfarer/Test".into();
        config.security.certificate_policy = CertificatePolicy::Accept;

        let settings = ViewSettings::from_config(&config);
        assert!((settings.toolbar_height - 40.0).abs() < f64::EPSILON);
        assert_eq!(settings.title_poll_interval, Duration::from_millis(200));
        assert_eq!(settings.user_agent.as_deref(), Some("Wayfarer/Test"));
        assert_eq!(settings.certificate_policy, CertificatePolicy::Accept);
    }

    #[test]
    fn empty_strings_become_none() {
        let mut config = WayfarerConfig::default();
        config.view.preload_script.clear();
        let settings = ViewSettings::from_config(&config);
        assert!(settings.preload_script.is_none());
        assert!(settings.user_agent.is_none());
    }

    #[test]
    fn view_options_builders() {
        let opts = ViewOptions::with_url("https://example.com").incognito();
        assert_eq!(opts.url.as_deref(), Some("https://example.com"));
        assert!(opts.incognito);
        assert_eq!(ViewOptions::default().url, None);
    }
}
