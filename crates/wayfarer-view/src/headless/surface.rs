use std::sync::{Arc, Mutex, Weak};

use wayfarer_common::Rect;

use super::window::{lock, WindowOp, WindowState};
use crate::error::ViewError;
use crate::events::SurfaceEvent;
use crate::surface::{ListenerId, Surface, SurfaceId, SurfaceListener, SurfaceOptions};

pub(super) struct SurfaceState {
    pub(super) options: SurfaceOptions,
    pub(super) url: String,
    pub(super) title: String,
    history: Vec<String>,
    index: usize,
    pub(super) bounds: Rect,
    pub(super) auto_resize: (bool, bool),
    zoom: f64,
    pub(super) destroyed: bool,
    pub(super) listeners: Vec<(ListenerId, SurfaceListener)>,
    next_listener: u64,
    pub(super) focus_count: usize,
    pub(super) devtools_open: bool,
    find_query: Option<String>,
    pub(super) certificate_decisions: Vec<(u64, bool)>,
    pub(super) new_window_decisions: Vec<(u64, bool)>,
    pub(super) late_unsubscribes: usize,
}

impl SurfaceState {
    pub(super) fn new(options: SurfaceOptions) -> Self {
        Self {
            options,
            url: String::new(),
            title: String::new(),
            history: Vec::new(),
            index: 0,
            bounds: Rect::default(),
            auto_resize: (false, false),
            zoom: 1.0,
            destroyed: false,
            listeners: Vec::new(),
            next_listener: 1,
            focus_count: 0,
            devtools_open: false,
            find_query: None,
            certificate_decisions: Vec::new(),
            new_window_decisions: Vec::new(),
            late_unsubscribes: 0,
        }
    }

    /// Call every listener with `event`. The state lock is released first
    /// so listeners may call back into the surface.
    pub(super) fn emit(state: &Arc<Mutex<SurfaceState>>, event: SurfaceEvent) {
        let listeners: Vec<SurfaceListener> = {
            let state = lock(state);
            if state.destroyed {
                return;
            }
            state.listeners.iter().map(|(_, l)| l.clone()).collect()
        };
        for listener in listeners {
            listener(event.clone());
        }
    }
}

/// A surface that keeps its page state in memory.
///
/// `load_url` and history moves report the same event sequence a real page
/// load would: start loading, start navigation, navigated, stop loading.
pub struct HeadlessSurface {
    id: SurfaceId,
    state: Arc<Mutex<SurfaceState>>,
    window: Weak<Mutex<WindowState>>,
}

impl HeadlessSurface {
    pub(super) fn new(
        id: SurfaceId,
        state: Arc<Mutex<SurfaceState>>,
        window: Weak<Mutex<WindowState>>,
    ) -> Self {
        Self { id, state, window }
    }

    fn live(&self) -> Result<std::sync::MutexGuard<'_, SurfaceState>, ViewError> {
        let state = lock(&self.state);
        if state.destroyed {
            return Err(ViewError::SurfaceDestroyed(self.id.0));
        }
        Ok(state)
    }

    fn emit(&self, event: SurfaceEvent) {
        SurfaceState::emit(&self.state, event);
    }

    fn emit_navigation(&self, url: String) {
        self.emit(SurfaceEvent::DidStartLoading);
        self.emit(SurfaceEvent::DidStartNavigation {
            url: url.clone(),
            in_place: false,
            main_frame: true,
        });
        self.emit(SurfaceEvent::DidNavigate { url });
        self.emit(SurfaceEvent::DidStopLoading);
    }

    fn go_to(&mut self, index: usize) -> Result<(), ViewError> {
        let url = {
            let mut state = self.live()?;
            let Some(url) = state.history.get(index).cloned() else {
                return Ok(());
            };
            state.index = index;
            state.url = url.clone();
            url
        };
        self.emit_navigation(url);
        Ok(())
    }
}

impl Surface for HeadlessSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn load_url(&mut self, url: &str) -> Result<(), ViewError> {
        {
            let mut state = self.live()?;
            if !state.history.is_empty() {
                let keep = state.index + 1;
                state.history.truncate(keep);
            }
            state.history.push(url.to_string());
            state.index = state.history.len() - 1;
            state.url = url.to_string();
        }
        self.emit_navigation(url.to_string());
        Ok(())
    }

    fn url(&self) -> String {
        lock(&self.state).url.clone()
    }

    fn title(&self) -> String {
        lock(&self.state).title.clone()
    }

    fn can_go_back(&self) -> bool {
        lock(&self.state).index > 0
    }

    fn can_go_forward(&self) -> bool {
        let state = lock(&self.state);
        state.index + 1 < state.history.len()
    }

    fn go_back(&mut self) -> Result<(), ViewError> {
        let index = self.live()?.index;
        match index.checked_sub(1) {
            Some(previous) => self.go_to(previous),
            None => Ok(()),
        }
    }

    fn go_forward(&mut self) -> Result<(), ViewError> {
        let index = self.live()?.index;
        self.go_to(index + 1)
    }

    fn reload(&mut self) -> Result<(), ViewError> {
        drop(self.live()?);
        self.emit(SurfaceEvent::DidStartLoading);
        self.emit(SurfaceEvent::DidStopLoading);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), ViewError> {
        self.live().map(|_| ())
    }

    fn zoom_factor(&self) -> f64 {
        lock(&self.state).zoom
    }

    fn set_zoom_factor(&mut self, factor: f64) -> Result<(), ViewError> {
        self.live()?.zoom = factor;
        Ok(())
    }

    /// Matches are counted in the page title.
    fn find_in_page(&mut self, text: &str, _forward: bool) -> Result<(), ViewError> {
        let matches = {
            let mut state = self.live()?;
            state.find_query = Some(text.to_string());
            if text.is_empty() {
                0
            } else {
                state
                    .title
                    .to_lowercase()
                    .matches(&text.to_lowercase())
                    .count() as u32
            }
        };
        self.emit(SurfaceEvent::FoundInPage {
            active_match: u32::from(matches > 0),
            matches,
        });
        Ok(())
    }

    fn stop_find_in_page(&mut self) -> Result<(), ViewError> {
        self.live()?.find_query = None;
        Ok(())
    }

    fn open_devtools(&mut self) {
        lock(&self.state).devtools_open = true;
    }

    fn bounds(&self) -> Rect {
        lock(&self.state).bounds
    }

    fn set_bounds(&mut self, bounds: Rect) -> Result<(), ViewError> {
        self.live()?.bounds = bounds;
        Ok(())
    }

    fn set_auto_resize(&mut self, width: bool, height: bool) {
        lock(&self.state).auto_resize = (width, height);
    }

    fn focus(&mut self) -> Result<(), ViewError> {
        self.live()?.focus_count += 1;
        Ok(())
    }

    fn subscribe(&mut self, listener: SurfaceListener) -> ListenerId {
        let mut state = lock(&self.state);
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.push((id, listener));
        id
    }

    fn unsubscribe(&mut self, listener: ListenerId) {
        let mut state = lock(&self.state);
        if state.destroyed {
            state.late_unsubscribes += 1;
        }
        state.listeners.retain(|(id, _)| *id != listener);
    }

    fn resolve_certificate(&mut self, request_id: u64, allow: bool) {
        lock(&self.state)
            .certificate_decisions
            .push((request_id, allow));
    }

    fn resolve_new_window(&mut self, request_id: u64, allow: bool) {
        lock(&self.state)
            .new_window_decisions
            .push((request_id, allow));
    }

    fn destroy(&mut self) {
        {
            let mut state = lock(&self.state);
            state.destroyed = true;
            state.listeners.clear();
        }
        if let Some(window) = self.window.upgrade() {
            let mut window = lock(&window);
            let attached = window.attached == Some(self.id);
            window.journal.push(WindowOp::Destroyed {
                surface: self.id,
                attached,
            });
        }
    }

    fn is_destroyed(&self) -> bool {
        lock(&self.state).destroyed
    }
}
