use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use wayfarer_common::{Rect, WindowId};

use super::surface::{HeadlessSurface, SurfaceState};
use crate::error::ViewError;
use crate::events::SurfaceEvent;
use crate::surface::{Surface, SurfaceId, SurfaceOptions};
use crate::window::HostWindow;

/// One recorded window operation.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowOp {
    Created(SurfaceId),
    Attached(Option<SurfaceId>),
    OverlayAdded(SurfaceId),
    OverlayRemoved(SurfaceId),
    /// `attached` is whether the surface was still attached when destroyed.
    Destroyed { surface: SurfaceId, attached: bool },
}

pub(super) struct WindowState {
    content: Rect,
    pub(super) attached: Option<SurfaceId>,
    overlays: Vec<SurfaceId>,
    surfaces: HashMap<SurfaceId, Arc<Mutex<SurfaceState>>>,
    pub(super) journal: Vec<WindowOp>,
    next_surface: u64,
    fail_next_create: bool,
}

pub(super) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// A window with no native counterpart.
#[derive(Clone)]
pub struct HeadlessWindow {
    id: WindowId,
    state: Arc<Mutex<WindowState>>,
}

impl HeadlessWindow {
    pub fn new(id: WindowId, width: f64, height: f64) -> Self {
        Self {
            id,
            state: Arc::new(Mutex::new(WindowState {
                content: Rect::new(0.0, 0.0, width, height),
                attached: None,
                overlays: Vec::new(),
                surfaces: HashMap::new(),
                journal: Vec::new(),
                next_surface: 1,
                fail_next_create: false,
            })),
        }
    }

    fn surface(&self, surface: SurfaceId) -> Option<Arc<Mutex<SurfaceState>>> {
        lock(&self.state).surfaces.get(&surface).cloned()
    }

    fn with_surface<R>(&self, surface: SurfaceId, f: impl FnOnce(&SurfaceState) -> R) -> Option<R> {
        let state = self.surface(surface)?;
        let guard = lock(&state);
        Some(f(&guard))
    }

    pub fn set_content_bounds(&self, content: Rect) {
        lock(&self.state).content = content;
    }

    /// Make the next `create_surface` call fail.
    pub fn fail_next_create(&self) {
        lock(&self.state).fail_next_create = true;
    }

    /// Deliver `event` to the surface's listeners as the runtime would.
    pub fn emit(&self, surface: SurfaceId, event: SurfaceEvent) {
        if let Some(state) = self.surface(surface) {
            SurfaceState::emit(&state, event);
        }
    }

    /// Change a page's title without raising an event.
    pub fn set_title(&self, surface: SurfaceId, title: &str) {
        if let Some(state) = self.surface(surface) {
            lock(&state).title = title.to_string();
        }
    }

    /// Destroy a surface from the runtime side, behind the core's back.
    pub fn kill(&self, surface: SurfaceId) {
        if let Some(state) = self.surface(surface) {
            let mut state = lock(&state);
            state.destroyed = true;
            state.listeners.clear();
        }
    }

    pub fn surfaces(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<SurfaceId> = lock(&self.state).surfaces.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn surface_url(&self, surface: SurfaceId) -> Option<String> {
        self.with_surface(surface, |s| s.url.clone())
    }

    pub fn surface_bounds(&self, surface: SurfaceId) -> Option<Rect> {
        self.with_surface(surface, |s| s.bounds)
    }

    pub fn surface_options(&self, surface: SurfaceId) -> Option<SurfaceOptions> {
        self.with_surface(surface, |s| s.options.clone())
    }

    pub fn auto_resize(&self, surface: SurfaceId) -> Option<(bool, bool)> {
        self.with_surface(surface, |s| s.auto_resize)
    }

    pub fn is_destroyed(&self, surface: SurfaceId) -> bool {
        self.with_surface(surface, |s| s.destroyed).unwrap_or(false)
    }

    pub fn listener_count(&self, surface: SurfaceId) -> usize {
        self.with_surface(surface, |s| s.listeners.len()).unwrap_or(0)
    }

    /// Unsubscribe calls made after the surface was destroyed.
    pub fn late_unsubscribes(&self, surface: SurfaceId) -> usize {
        self.with_surface(surface, |s| s.late_unsubscribes)
            .unwrap_or(0)
    }

    pub fn focus_count(&self, surface: SurfaceId) -> usize {
        self.with_surface(surface, |s| s.focus_count).unwrap_or(0)
    }

    pub fn devtools_opened(&self, surface: SurfaceId) -> bool {
        self.with_surface(surface, |s| s.devtools_open).unwrap_or(false)
    }

    pub fn certificate_decisions(&self, surface: SurfaceId) -> Vec<(u64, bool)> {
        self.with_surface(surface, |s| s.certificate_decisions.clone())
            .unwrap_or_default()
    }

    pub fn new_window_decisions(&self, surface: SurfaceId) -> Vec<(u64, bool)> {
        self.with_surface(surface, |s| s.new_window_decisions.clone())
            .unwrap_or_default()
    }

    /// How many times the core called `destroy` on the surface.
    pub fn destroy_count(&self, surface: SurfaceId) -> usize {
        lock(&self.state)
            .journal
            .iter()
            .filter(|op| matches!(op, WindowOp::Destroyed { surface: s, .. } if *s == surface))
            .count()
    }

    /// Overlays from back to front.
    pub fn overlays(&self) -> Vec<SurfaceId> {
        lock(&self.state).overlays.clone()
    }

    pub fn journal(&self) -> Vec<WindowOp> {
        lock(&self.state).journal.clone()
    }

    pub fn clear_journal(&self) {
        lock(&self.state).journal.clear();
    }
}

impl HostWindow for HeadlessWindow {
    fn id(&self) -> WindowId {
        self.id
    }

    fn content_bounds(&self) -> Rect {
        lock(&self.state).content
    }

    fn create_surface(&self, options: &SurfaceOptions) -> Result<Box<dyn Surface>, ViewError> {
        let mut window = lock(&self.state);
        if std::mem::take(&mut window.fail_next_create) {
            return Err(ViewError::SurfaceCreation("headless create failure".into()));
        }
        let id = SurfaceId(window.next_surface);
        window.next_surface += 1;

        let state = Arc::new(Mutex::new(SurfaceState::new(options.clone())));
        window.surfaces.insert(id, state.clone());
        window.journal.push(WindowOp::Created(id));

        Ok(Box::new(HeadlessSurface::new(
            id,
            state,
            Arc::downgrade(&self.state),
        )))
    }

    fn set_attached(&self, surface: Option<SurfaceId>) {
        let mut window = lock(&self.state);
        window.attached = surface;
        window.journal.push(WindowOp::Attached(surface));
    }

    fn attached(&self) -> Option<SurfaceId> {
        lock(&self.state).attached
    }

    fn add_overlay(&self, surface: SurfaceId) {
        let mut window = lock(&self.state);
        window.overlays.retain(|s| *s != surface);
        window.overlays.push(surface);
        window.journal.push(WindowOp::OverlayAdded(surface));
    }

    fn remove_overlay(&self, surface: SurfaceId) {
        let mut window = lock(&self.state);
        window.overlays.retain(|s| *s != surface);
        window.journal.push(WindowOp::OverlayRemoved(surface));
    }
}
