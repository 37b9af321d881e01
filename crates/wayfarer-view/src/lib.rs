//! Browser view lifecycle core for Wayfarer.
//!
//! Manages the content surfaces behind a tabbed browser window:
//! - One [`ViewHandle`] per tab, grouped per window in a [`ViewRegistry`]
//! - Overlay dialogs that park off-screen instead of being destroyed
//! - Storage partitions, extensions, downloads, and permission prompts
//! - A typed relay for driving a tab from the UI process
//!
//! The embedding runtime is reached only through the [`HostWindow`],
//! [`Surface`], and [`Partition`] traits. [`headless`] implements them in
//! memory.

pub mod dialog;
pub mod error;
pub mod events;
pub mod favicon;
pub mod headless;
pub mod ipc;
pub mod manager;
pub mod relay;
pub mod session;
pub mod surface;
pub mod timer;
pub mod window;

pub use dialog::{DialogKind, DialogOptions, DialogSurface};
pub use error::ViewError;
pub use events::{EventQueue, SurfaceEvent, ViewEvent, WindowDisposition};
pub use favicon::{FaviconFetcher, HttpFaviconFetcher};
pub use ipc::{encode_notification, parse_command, Command};
pub use manager::{ViewHandle, ViewOptions, ViewRegistry, ViewSettings};
pub use relay::{RelayCall, RelayRequest};
pub use session::{
    Partition, PartitionEvent, PartitionKind, PermissionPrompt, PermissionReply,
    PermissionRequest, SessionPartitionManager, WindowLink, WindowLocator,
};
pub use surface::{Surface, SurfaceId, SurfaceOptions};
pub use window::HostWindow;
