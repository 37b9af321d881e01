//! Overlay dialog configuration.

use serde::{Deserialize, Serialize};

/// Geometry and timing for one overlay dialog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DialogConfig {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Delay before a hidden dialog is parked off-screen, letting its close
    /// animation finish. 0 parks immediately.
    pub hide_delay_ms: u64,
    /// Open devtools for the dialog content (development builds).
    pub devtools: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 320.0,
            height: 400.0,
            hide_delay_ms: 0,
            devtools: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogsConfig {
    /// Base URL dialog pages are served from; `<base_url>/<name>.html`.
    pub base_url: String,
    pub menu: DialogConfig,
    pub find: DialogConfig,
    pub permission: DialogConfig,
}

impl Default for DialogsConfig {
    fn default() -> Self {
        Self {
            base_url: "wayfarer://dialogs".into(),
            menu: DialogConfig {
                width: 330.0,
                height: 470.0,
                hide_delay_ms: 200,
                ..Default::default()
            },
            find: DialogConfig {
                width: 416.0,
                height: 70.0,
                ..Default::default()
            },
            permission: DialogConfig {
                width: 366.0,
                height: 165.0,
                hide_delay_ms: 200,
                ..Default::default()
            },
        }
    }
}
