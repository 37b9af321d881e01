//! Outbound notifications from the view core to the UI layer.
//!
//! Every notification has a channel name. Tab-scoped notifications carry the
//! tab id in the channel so the UI can subscribe to a single tab. Payload
//! fields are camelCase on the wire.

use std::sync::{Arc, Mutex, Weak};

use serde::{Deserialize, Serialize};

use crate::id::TabId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum Notification {
    ViewCreated {
        tab_id: TabId,
    },
    /// The core opened a tab on its own (new-window policy).
    TabOpened {
        tab_id: TabId,
        url: String,
        active: bool,
    },
    /// Back/forward availability of the selected tab.
    NavigationState {
        can_go_back: bool,
        can_go_forward: bool,
    },
    TitleUpdated {
        tab_id: TabId,
        title: String,
    },
    FaviconUpdated {
        tab_id: TabId,
        favicon: String,
    },
    /// Dominant colour extracted from the favicon.
    TabColorUpdated {
        tab_id: TabId,
        color: String,
    },
    /// `<meta name="theme-color">` changed. `None` when the page removed it.
    ThemeColorUpdated {
        tab_id: TabId,
        color: Option<String>,
    },
    LoadingStateChanged {
        tab_id: TabId,
        loading: bool,
    },
    LoadCommitted {
        tab_id: TabId,
        url: String,
        main_frame: bool,
    },
    UrlUpdated {
        tab_id: TabId,
        url: String,
    },
    FoundInPage {
        tab_id: TabId,
        active_match: u32,
        matches: u32,
    },
    RelayResult {
        call_id: String,
        result: serde_json::Value,
    },
    DownloadStarted {
        id: String,
        file_name: String,
        received_bytes: u64,
        total_bytes: u64,
        save_path: String,
    },
    DownloadProgress {
        id: String,
        received_bytes: u64,
    },
    DownloadCompleted {
        id: String,
    },
    DownloadFailed {
        id: String,
        state: String,
    },
    PermissionRequested {
        request_id: u64,
        permission: String,
        origin: String,
    },
}

impl Notification {
    /// The channel name the UI subscribes to.
    pub fn channel(&self) -> String {
        match self {
            Self::ViewCreated { tab_id } => format!("view-created-{tab_id}"),
            Self::TabOpened { .. } => "tab-opened".into(),
            Self::NavigationState { .. } => "update-navigation-state".into(),
            Self::TitleUpdated { tab_id, .. } => format!("view-title-updated-{tab_id}"),
            Self::FaviconUpdated { tab_id, .. } => format!("update-tab-favicon-{tab_id}"),
            Self::TabColorUpdated { tab_id, .. } => format!("update-tab-color-{tab_id}"),
            Self::ThemeColorUpdated { tab_id, .. } => {
                format!("theme-color-updated-{tab_id}")
            }
            Self::LoadingStateChanged { tab_id, .. } => format!("view-loading-{tab_id}"),
            Self::LoadCommitted { tab_id, .. } => format!("load-commit-{tab_id}"),
            Self::UrlUpdated { tab_id, .. } => format!("view-url-updated-{tab_id}"),
            Self::FoundInPage { .. } => "found-in-page".into(),
            Self::RelayResult { call_id, .. } => format!("relay-result-{call_id}"),
            Self::DownloadStarted { .. } => "download-started".into(),
            Self::DownloadProgress { .. } => "download-progress".into(),
            Self::DownloadCompleted { .. } => "download-completed".into(),
            Self::DownloadFailed { .. } => "download-failed".into(),
            Self::PermissionRequested { .. } => "permission-requested".into(),
        }
    }

    /// The tab this notification is about, if it is tab-scoped.
    pub fn tab_id(&self) -> Option<TabId> {
        match self {
            Self::ViewCreated { tab_id }
            | Self::TabOpened { tab_id, .. }
            | Self::TitleUpdated { tab_id, .. }
            | Self::FaviconUpdated { tab_id, .. }
            | Self::TabColorUpdated { tab_id, .. }
            | Self::ThemeColorUpdated { tab_id, .. }
            | Self::LoadingStateChanged { tab_id, .. }
            | Self::LoadCommitted { tab_id, .. }
            | Self::UrlUpdated { tab_id, .. }
            | Self::FoundInPage { tab_id, .. } => Some(*tab_id),
            _ => None,
        }
    }
}

/// Per-window notification sink. Producers push, the shell drains.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notification: Notification) {
        if let Ok(mut queue) = self.inner.lock() {
            queue.push(notification);
        }
    }

    /// Drain all pending notifications in push order.
    pub fn drain(&self) -> Vec<Notification> {
        match self.inner.lock() {
            Ok(mut queue) => std::mem::take(&mut *queue),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A non-owning reference, for objects that must not keep the window alive.
    pub fn downgrade(&self) -> WeakOutbox {
        WeakOutbox {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WeakOutbox {
    inner: Weak<Mutex<Vec<Notification>>>,
}

impl WeakOutbox {
    /// Push if the window is still alive. Returns whether it was delivered.
    pub fn push(&self, notification: Notification) -> bool {
        match self.inner.upgrade() {
            Some(inner) => {
                Outbox { inner }.push(notification);
                true
            }
            None => {
                tracing::debug!(channel = %notification.channel(), "notification dropped: window gone");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_scoped_by_tab() {
        let n = Notification::TitleUpdated {
            tab_id: TabId(4),
            title: "Docs".into(),
        };
        assert_eq!(n.channel(), "view-title-updated-4");
        assert_eq!(n.tab_id(), Some(TabId(4)));

        let n = Notification::ViewCreated { tab_id: TabId(11) };
        assert_eq!(n.channel(), "view-created-11");
    }

    #[test]
    fn window_scoped_channels_have_no_tab() {
        let n = Notification::NavigationState {
            can_go_back: true,
            can_go_forward: false,
        };
        assert_eq!(n.channel(), "update-navigation-state");
        assert_eq!(n.tab_id(), None);

        let n = Notification::DownloadCompleted { id: "abc".into() };
        assert_eq!(n.channel(), "download-completed");
    }

    #[test]
    fn relay_result_channel_uses_call_id() {
        let n = Notification::RelayResult {
            call_id: "c-17".into(),
            result: serde_json::json!(true),
        };
        assert_eq!(n.channel(), "relay-result-c-17");
    }

    #[test]
    fn serializes_with_type_tag() {
        let n = Notification::LoadingStateChanged {
            tab_id: TabId(2),
            loading: true,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["type"], "loading-state-changed");
        assert_eq!(json["data"]["tabId"], 2);
        assert_eq!(json["data"]["loading"], true);
    }

    #[test]
    fn payload_fields_are_camel_case() {
        let n = Notification::DownloadStarted {
            id: "abc".into(),
            file_name: "notes.txt".into(),
            received_bytes: 0,
            total_bytes: 10,
            save_path: "/tmp/notes.txt".into(),
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["data"]["fileName"], "notes.txt");
        assert_eq!(json["data"]["totalBytes"], 10);
        assert_eq!(json["data"]["savePath"], "/tmp/notes.txt");
        assert!(json["data"].get("file_name").is_none());

        let n = Notification::NavigationState {
            can_go_back: true,
            can_go_forward: false,
        };
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["data"]["canGoBack"], true);
        assert_eq!(json["data"]["canGoForward"], false);
    }

    #[test]
    fn outbox_drains_in_push_order() {
        let outbox = Outbox::new();
        outbox.push(Notification::ViewCreated { tab_id: TabId(1) });
        outbox.push(Notification::ViewCreated { tab_id: TabId(2) });
        assert_eq!(outbox.len(), 2);

        let drained = outbox.drain();
        assert_eq!(drained[0].tab_id(), Some(TabId(1)));
        assert_eq!(drained[1].tab_id(), Some(TabId(2)));
        assert!(outbox.is_empty());
    }

    #[test]
    fn weak_outbox_stops_delivering_after_drop() {
        let outbox = Outbox::new();
        let weak = outbox.downgrade();
        assert!(weak.push(Notification::DownloadCompleted { id: "a".into() }));
        assert_eq!(outbox.drain().len(), 1);

        drop(outbox);
        assert!(!weak.push(Notification::DownloadCompleted { id: "b".into() }));
    }
}
