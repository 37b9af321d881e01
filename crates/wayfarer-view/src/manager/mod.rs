//! Tab view lifecycle.
//!
//! [`ViewRegistry`] owns one [`ViewHandle`] per tab of a window, attaches the
//! selected one, and turns queued surface events into notifications.

mod handle;
mod handlers;
mod lifecycle;
mod registry;
mod types;

pub use handle::ViewHandle;
pub use handlers::{new_window_action, EventContext, NewWindowAction, ViewRequest};
pub use registry::ViewRegistry;
pub use types::{ViewOptions, ViewSettings};
