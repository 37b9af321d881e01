use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};
use wayfarer_common::{Notification, Outbox, Rect, TabId, WindowId};

use crate::events::EventQueue;
use crate::favicon::FaviconFetcher;
use crate::relay::RelayRequest;
use crate::surface::SurfaceId;
use crate::timer::Interval;
use crate::window::HostWindow;

use super::handle::ViewHandle;
use super::handlers::{EventContext, ViewRequest};
use super::types::{ViewOptions, ViewSettings};

/// The tabs of one browser window.
///
/// Owns every [`ViewHandle`] of the window, tracks which one is selected
/// (attached), and is the only place surface events are turned into
/// notifications. Dropping the registry destroys all of its views.
pub struct ViewRegistry {
    window: Arc<dyn HostWindow>,
    views: HashMap<TabId, ViewHandle>,
    selected: Option<TabId>,
    /// Highest tab id seen, so self-opened tabs never collide with UI ids.
    highest_id: u32,
    outbox: Outbox,
    queue: EventQueue,
    favicons: Arc<dyn FaviconFetcher>,
    settings: ViewSettings,
    title_poll: Interval,
}

impl ViewRegistry {
    pub fn new(
        window: Arc<dyn HostWindow>,
        outbox: Outbox,
        settings: ViewSettings,
        favicons: Arc<dyn FaviconFetcher>,
    ) -> Self {
        let title_poll = Interval::new(settings.title_poll_interval);
        Self {
            window,
            views: HashMap::new(),
            selected: None,
            highest_id: 0,
            outbox,
            queue: EventQueue::new(),
            favicons,
            settings,
            title_poll,
        }
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    // -- lifecycle -----------------------------------------------------------

    /// Create a view for `tab_id`. An existing view with the same id is
    /// removed first. Returns whether the view was created.
    pub fn create(&mut self, tab_id: TabId, options: ViewOptions) -> bool {
        if self.views.contains_key(&tab_id) {
            debug!(tab_id = %tab_id, "replacing existing view");
            self.remove(tab_id);
        }
        self.highest_id = self.highest_id.max(tab_id.get());

        let handle = ViewHandle::create(
            self.window.as_ref(),
            tab_id,
            &options,
            &self.settings,
            &self.queue,
            self.outbox.downgrade(),
        );
        match handle {
            Ok(handle) => {
                self.views.insert(tab_id, handle);
                self.outbox.push(Notification::ViewCreated { tab_id });
                info!(tab_id = %tab_id, incognito = options.incognito, "view created");
                true
            }
            Err(e) => {
                warn!(tab_id = %tab_id, error = %e, "failed to create view");
                false
            }
        }
    }

    /// Open `url` in a tab the core allocates itself.
    pub fn open(&mut self, url: &str, select: bool) -> Option<TabId> {
        let tab_id = TabId(self.highest_id + 1);
        if !self.create(tab_id, ViewOptions::with_url(url)) {
            return None;
        }
        self.outbox.push(Notification::TabOpened {
            tab_id,
            url: url.to_string(),
            active: select,
        });
        if select {
            self.select(tab_id);
        }
        Some(tab_id)
    }

    /// Make `tab_id` the visible tab. A missing or dead tab detaches
    /// everything and clears the selection. Returns whether a view is shown.
    pub fn select(&mut self, tab_id: TabId) -> bool {
        let bounds = self.tab_bounds();
        let live = self.views.get(&tab_id).map(|v| !v.is_destroyed());

        if live != Some(true) {
            if live == Some(false) {
                debug!(tab_id = %tab_id, "dropping dead view on select");
                self.drop_entry(tab_id);
            } else {
                debug!(tab_id = %tab_id, "select for unknown tab");
            }
            self.window.set_attached(None);
            self.selected = None;
            return false;
        }

        let Some(handle) = self.views.get_mut(&tab_id) else {
            return false;
        };
        if let Err(e) = handle.set_bounds(bounds) {
            warn!(tab_id = %tab_id, error = %e, "failed to size view");
        }
        self.window.set_attached(Some(handle.surface_id()));
        handle.set_auto_resize(true, true);
        self.selected = Some(tab_id);
        handle.update_navigation_state(self.selected);
        true
    }

    /// Destroy and forget `tab_id`. The surface is detached before it is
    /// destroyed. Returns whether an entry existed.
    pub fn remove(&mut self, tab_id: TabId) -> bool {
        let Some(mut handle) = self.views.remove(&tab_id) else {
            debug!(tab_id = %tab_id, "remove for unknown tab");
            return false;
        };
        if self.selected == Some(tab_id) {
            self.selected = None;
        }
        if handle.is_destroyed() {
            handle.destroy();
            debug!(tab_id = %tab_id, "dropped dead view");
            return true;
        }
        if self.window.attached() == Some(handle.surface_id()) {
            self.window.set_attached(None);
        }
        handle.destroy();
        true
    }

    /// Detach every tab surface, keeping the selection.
    pub fn hide_view(&mut self) {
        self.window.set_attached(None);
    }

    /// Re-attach the selected tab after [`ViewRegistry::hide_view`].
    pub fn show_view(&mut self) -> bool {
        match self.selected {
            Some(tab_id) => self.select(tab_id),
            None => false,
        }
    }

    /// Detach and remove every view.
    pub fn clear(&mut self) {
        self.window.set_attached(None);
        for tab_id in self.tab_ids() {
            self.remove(tab_id);
        }
        self.selected = None;
    }

    /// Re-fit the selected view to the window's current content area.
    pub fn resize(&mut self) {
        let bounds = self.tab_bounds();
        let Some(tab_id) = self.selected else {
            return;
        };
        if let Some(handle) = self.views.get_mut(&tab_id) {
            if let Err(e) = handle.set_bounds(bounds) {
                debug!(tab_id = %tab_id, error = %e, "resize skipped");
            }
        }
    }

    fn tab_bounds(&self) -> Rect {
        let content = self.window.content_bounds();
        let top = self.settings.toolbar_height;
        Rect::new(0.0, top, content.width, (content.height - top).max(0.0))
    }

    fn drop_entry(&mut self, tab_id: TabId) {
        if let Some(mut handle) = self.views.remove(&tab_id) {
            handle.destroy();
        }
    }

    // -- queries -------------------------------------------------------------

    pub fn selected_id(&self) -> Option<TabId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&ViewHandle> {
        self.selected.and_then(|id| self.views.get(&id))
    }

    pub fn get(&self, tab_id: TabId) -> Option<&ViewHandle> {
        self.views.get(&tab_id)
    }

    pub fn contains(&self, tab_id: TabId) -> bool {
        self.views.contains_key(&tab_id)
    }

    /// All tab ids, ascending.
    pub fn tab_ids(&self) -> Vec<TabId> {
        let mut ids: Vec<TabId> = self.views.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn tab_for_surface(&self, surface: SurfaceId) -> Option<TabId> {
        self.views
            .values()
            .find(|v| v.surface_id() == surface)
            .map(|v| v.tab_id())
    }

    // -- event processing ----------------------------------------------------

    /// Process queued surface events in arrival order, including any that
    /// handling them produces. Returns the number processed.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        loop {
            let batch = self.queue.drain();
            if batch.is_empty() {
                return processed;
            }
            for (tab_id, event) in batch {
                processed += 1;
                let request = match self.views.get_mut(&tab_id) {
                    Some(handle) => {
                        let ctx = EventContext {
                            selected: self.selected,
                            certificate_policy: self.settings.certificate_policy,
                            favicons: self.favicons.as_ref(),
                            queue: &self.queue,
                        };
                        handle.handle_event(event, &ctx)
                    }
                    None => {
                        debug!(tab_id = %tab_id, "event for removed view ignored");
                        None
                    }
                };
                if let Some(ViewRequest::OpenTab { url, select }) = request {
                    self.open(&url, select);
                }
            }
        }
    }

    pub fn start_title_poll(&mut self, now: Instant) {
        self.title_poll.start(now);
    }

    pub fn stop_title_poll(&mut self) {
        self.title_poll.cancel();
    }

    /// Compare every live surface's title with the cached one and announce
    /// changes. Runs only when the poll interval is due; returns the number
    /// of titles updated.
    pub fn poll_titles(&mut self, now: Instant) -> usize {
        if !self.title_poll.fire(now) {
            return 0;
        }
        let mut changed = 0;
        for handle in self.views.values_mut() {
            let Some(title) = handle.live_title() else {
                continue;
            };
            if title != handle.title {
                handle.title = title.clone();
                handle.notify(Notification::TitleUpdated {
                    tab_id: handle.tab_id,
                    title,
                });
                changed += 1;
            }
        }
        changed
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.title_poll.deadline()
    }

    /// Run a relay call on a tab. The result is also published on the
    /// call's reply channel when it carries a call id.
    pub fn relay(&mut self, request: RelayRequest) -> Value {
        let RelayRequest {
            tab_id,
            call,
            call_id,
        } = request;

        let result = match self.views.get_mut(&tab_id).and_then(|h| h.surface_mut()) {
            Some(surface) => match call.invoke(surface) {
                Ok(value) => value,
                Err(e) => {
                    warn!(tab_id = %tab_id, method = call.name(), error = %e, "relay call failed");
                    Value::Null
                }
            },
            None => {
                debug!(tab_id = %tab_id, method = call.name(), "relay call for missing tab");
                Value::Null
            }
        };

        if let Some(call_id) = call_id {
            self.outbox.push(Notification::RelayResult {
                call_id,
                result: result.clone(),
            });
        }
        result
    }
}

impl Drop for ViewRegistry {
    fn drop(&mut self) {
        if !self.views.is_empty() {
            debug!(window = %self.window.id(), count = self.views.len(), "clearing views on drop");
        }
        self.clear();
    }
}
