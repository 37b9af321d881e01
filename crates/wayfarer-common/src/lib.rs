pub mod errors;
pub mod events;
pub mod id;
pub mod types;

pub use errors::{ConfigError, ShellError};
pub use events::{Notification, Outbox, WeakOutbox};
pub use id::{new_download_id, TabId, WindowId};
pub use types::{Color, Rect, RectPatch};

pub type Result<T> = std::result::Result<T, ShellError>;
