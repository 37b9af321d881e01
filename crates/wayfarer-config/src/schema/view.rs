//! Tab view configuration.

use serde::{Deserialize, Serialize};

/// Settings for tab content surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Pixels reserved at the top of the window for the toolbar and tab
    /// strip. Tab content is laid out below it (valid range: 0-400).
    pub toolbar_height: u32,
    /// Fallback title polling period in milliseconds (valid range: 16-5000).
    pub title_poll_interval_ms: u64,
    /// Path of the bridge script preloaded into every tab.
    pub preload_script: String,
    /// Page loaded into new tabs opened without a URL.
    pub home_url: String,
    /// Custom user agent. Empty keeps the runtime default.
    pub user_agent: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            toolbar_height: 72,
            title_poll_interval_ms: 200,
            preload_script: "build/view-preload.bundle.js".into(),
            home_url: "wayfarer://newtab".into(),
            user_agent: String::new(),
        }
    }
}
