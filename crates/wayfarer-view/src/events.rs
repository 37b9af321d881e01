//! Surface event types and the per-window pending event queue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use wayfarer_common::TabId;

/// Where the page asked a new window to be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowDisposition {
    NewWindow,
    ForegroundTab,
    BackgroundTab,
    /// Anything else the runtime reports (save-to-disk, other, ...).
    Other,
}

/// Events emitted by a surface, in the order the runtime reports them.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    DidStartLoading,
    DidStopLoading,
    DidStartNavigation {
        url: String,
        in_place: bool,
        main_frame: bool,
    },
    /// The main frame committed a navigation to `url`.
    DidNavigate {
        url: String,
    },
    TitleUpdated {
        title: String,
    },
    /// Favicon candidates in the page's order of preference.
    FaviconUpdated {
        candidates: Vec<String>,
    },
    ThemeColorChanged {
        color: Option<String>,
    },
    FoundInPage {
        active_match: u32,
        matches: u32,
    },
    NewWindow {
        request_id: u64,
        url: String,
        frame_name: String,
        disposition: WindowDisposition,
    },
    CertificateError {
        request_id: u64,
        url: String,
        error: String,
    },
}

/// An entry in the registry's pending queue.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Surface(SurfaceEvent),
    /// Completion of a remote favicon fetch started for `source`.
    FaviconFetched {
        source: String,
        result: Result<String, String>,
    },
}

impl From<SurfaceEvent> for ViewEvent {
    fn from(e: SurfaceEvent) -> Self {
        Self::Surface(e)
    }
}

/// FIFO of events waiting for the window's event-processing context.
///
/// Surface listeners and background fetches only push here; all handle
/// mutation happens when the registry drains it.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    inner: Arc<Mutex<VecDeque<(TabId, ViewEvent)>>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, tab_id: TabId, event: impl Into<ViewEvent>) {
        if let Ok(mut queue) = self.inner.lock() {
            queue.push_back((tab_id, event.into()));
        }
    }

    pub fn drain(&self) -> Vec<(TabId, ViewEvent)> {
        match self.inner.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
