use tracing::debug;
use wayfarer_common::{Notification, Rect, TabId, WeakOutbox};

use crate::error::ViewError;
use crate::surface::{ListenerId, Surface, SurfaceId};

/// Wrapper around one tab's content surface.
///
/// Caches what the UI shows for the tab (title, url, favicon) and owns the
/// listener subscriptions wired at creation. Once destroyed, every method
/// that would touch the surface is a no-op.
pub struct ViewHandle {
    pub(super) surface: Box<dyn Surface>,
    pub(super) surface_id: SurfaceId,
    pub(super) tab_id: TabId,
    pub(super) title: String,
    pub(super) url: String,
    pub(super) home_url: String,
    pub(super) favicon: String,
    pub(super) incognito: bool,
    pub(super) destroyed: bool,
    pub(super) subscriptions: Vec<ListenerId>,
    /// Event delivery only; never keeps the window alive.
    pub(super) window: WeakOutbox,
}

impl ViewHandle {
    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The URL the tab was created with.
    pub fn home_url(&self) -> &str {
        &self.home_url
    }

    /// Cached favicon as a data URI, or empty.
    pub fn favicon(&self) -> &str {
        &self.favicon
    }

    pub fn is_incognito(&self) -> bool {
        self.incognito
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed || self.surface.is_destroyed()
    }

    /// Host component of the current URL, or empty.
    pub fn hostname(&self) -> String {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_owned))
            .unwrap_or_default()
    }

    /// The title the surface reports right now, bypassing the cache.
    pub fn live_title(&self) -> Option<String> {
        if self.is_destroyed() {
            return None;
        }
        Some(self.surface.title())
    }

    /// Push back/forward availability to the window, but only for the
    /// selected tab so background tabs never overwrite the toolbar state.
    pub fn update_navigation_state(&self, selected: Option<TabId>) {
        if self.is_destroyed() || selected != Some(self.tab_id) {
            return;
        }
        self.notify(Notification::NavigationState {
            can_go_back: self.surface.can_go_back(),
            can_go_forward: self.surface.can_go_forward(),
        });
    }

    pub fn load_url(&mut self, url: &str) -> Result<(), ViewError> {
        if self.is_destroyed() {
            return Err(ViewError::SurfaceDestroyed(self.surface_id.0));
        }
        self.url = url.to_string();
        self.surface.load_url(url)
    }

    pub fn set_bounds(&mut self, bounds: Rect) -> Result<(), ViewError> {
        if self.is_destroyed() {
            return Err(ViewError::SurfaceDestroyed(self.surface_id.0));
        }
        self.surface.set_bounds(bounds)
    }

    pub fn set_auto_resize(&mut self, width: bool, height: bool) {
        if !self.is_destroyed() {
            self.surface.set_auto_resize(width, height);
        }
    }

    /// Dispose listener subscriptions, then release the surface. Idempotent.
    /// The caller must have detached the surface first.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        if self.surface.is_destroyed() {
            self.subscriptions.clear();
        } else {
            for listener in self.subscriptions.drain(..) {
                self.surface.unsubscribe(listener);
            }
            self.surface.destroy();
        }
        self.destroyed = true;
        debug!(tab_id = %self.tab_id, surface = %self.surface_id, "view destroyed");
    }

    pub(super) fn notify(&self, notification: Notification) {
        self.window.push(notification);
    }

    pub(super) fn surface_mut(&mut self) -> Option<&mut dyn Surface> {
        if self.is_destroyed() {
            None
        } else {
            Some(self.surface.as_mut())
        }
    }
}
