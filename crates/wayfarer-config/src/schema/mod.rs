//! Configuration schema types for Wayfarer.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod dialogs;
mod logging;
mod security;
mod session;
mod view;

pub use dialogs::*;
pub use logging::*;
pub use security::*;
pub use session::*;
pub use view::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for Wayfarer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WayfarerConfig {
    pub view: ViewConfig,
    pub security: SecurityConfig,
    pub session: SessionConfig,
    pub dialogs: DialogsConfig,
    pub logging: LoggingConfig,
}
