//! Wire protocol between the UI process and the view core.
//!
//! Messages flow in both directions as one JSON object per line:
//! - **UI -> core**: a [`Command`], `{"type": "select-view", "data": {...}}`.
//! - **core -> UI**: a [`Notification`] plus its channel name,
//!   `{"channel": "view-loading-3", "type": "loading-state-changed", "data": {...}}`.

use serde::{Deserialize, Serialize};
use wayfarer_common::{Notification, RectPatch, ShellError, TabId};

use crate::dialog::DialogKind;
use crate::relay::RelayRequest;

/// Inbound frames larger than this are rejected unparsed.
pub const MAX_COMMAND_BYTES: usize = 64 * 1024;

/// A request from the UI process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum Command {
    CreateView {
        tab_id: TabId,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        incognito: bool,
    },
    SelectView {
        tab_id: TabId,
    },
    RemoveView {
        tab_id: TabId,
    },
    /// Detach every tab (e.g. while the UI shows a full-window page).
    HideViews,
    /// Re-attach the selected tab.
    ShowView,
    ClearViews,
    RelayCall(RelayRequest),
    ClearBrowsingData,
    ShowDialog {
        dialog: DialogKind,
        #[serde(default)]
        bounds: RectPatch,
    },
    /// Sent by the UI or by the dialog's own page.
    HideDialog {
        dialog: DialogKind,
    },
    ToggleDialog {
        dialog: DialogKind,
    },
    RearrangeDialog {
        dialog: DialogKind,
        bounds: RectPatch,
    },
    PermissionResponse {
        request_id: u64,
        granted: bool,
    },
    /// The window's content area changed size.
    Resize {
        width: f64,
        height: f64,
    },
}

impl Command {
    /// Wire name of the command, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CreateView { .. } => "create-view",
            Self::SelectView { .. } => "select-view",
            Self::RemoveView { .. } => "remove-view",
            Self::HideViews => "hide-views",
            Self::ShowView => "show-view",
            Self::ClearViews => "clear-views",
            Self::RelayCall(_) => "relay-call",
            Self::ClearBrowsingData => "clear-browsing-data",
            Self::ShowDialog { .. } => "show-dialog",
            Self::HideDialog { .. } => "hide-dialog",
            Self::ToggleDialog { .. } => "toggle-dialog",
            Self::RearrangeDialog { .. } => "rearrange-dialog",
            Self::PermissionResponse { .. } => "permission-response",
            Self::Resize { .. } => "resize",
        }
    }
}

/// Parse one inbound frame.
pub fn parse_command(raw: &str) -> Result<Command, ShellError> {
    if raw.len() > MAX_COMMAND_BYTES {
        return Err(ShellError::Ipc(format!(
            "command of {} bytes exceeds {MAX_COMMAND_BYTES}",
            raw.len()
        )));
    }
    serde_json::from_str(raw).map_err(|e| ShellError::Ipc(format!("invalid command: {e}")))
}

/// Serialize a notification as one outbound frame.
pub fn encode_notification(notification: &Notification) -> Result<String, ShellError> {
    let mut value = serde_json::to_value(notification)
        .map_err(|e| ShellError::Ipc(format!("failed to encode notification: {e}")))?;
    if let Some(object) = value.as_object_mut() {
        object.insert("channel".into(), notification.channel().into());
    }
    Ok(value.to_string())
}
