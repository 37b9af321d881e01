use std::path::PathBuf;

/// Errors raised by the view core and by runtime backends.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("surface creation failed: {0}")]
    SurfaceCreation(String),

    #[error("surface {0} is destroyed")]
    SurfaceDestroyed(u64),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("favicon error: {0}")]
    Favicon(String),

    #[error("image decode error: {0}")]
    Decode(String),

    #[error("partition error: {0}")]
    Partition(String),

    #[error("extension {path} failed to load: {reason}")]
    Extension { path: PathBuf, reason: String },

    #[error("permission prompt failed: {0}")]
    Prompt(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ViewError> for wayfarer_common::ShellError {
    fn from(e: ViewError) -> Self {
        wayfarer_common::ShellError::View(e.to_string())
    }
}
