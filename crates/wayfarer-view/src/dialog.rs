//! Overlay dialogs (menu, find bar, permission prompt).
//!
//! A dialog is created once per window and lives until the window closes.
//! Hiding does not detach it: it is moved to a 1-pixel strip above the
//! window so the next show is instant.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wayfarer_common::{Rect, RectPatch};
use wayfarer_config::DialogsConfig;

use crate::error::ViewError;
use crate::surface::{Surface, SurfaceId, SurfaceOptions};
use crate::timer::Timeout;
use crate::window::HostWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DialogKind {
    Menu,
    Find,
    Permission,
}

impl DialogKind {
    pub const ALL: [DialogKind; 3] = [Self::Menu, Self::Find, Self::Permission];

    pub fn name(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Find => "find",
            Self::Permission => "permission",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogOptions {
    pub kind: DialogKind,
    /// Initial bounds used by the first `show`.
    pub bounds: Rect,
    /// Delay before a hidden dialog is parked. `None` parks immediately.
    pub hide_delay: Option<Duration>,
    pub devtools: bool,
    pub url: String,
}

impl DialogOptions {
    pub fn from_config(kind: DialogKind, config: &DialogsConfig) -> Self {
        let dialog = match kind {
            DialogKind::Menu => &config.menu,
            DialogKind::Find => &config.find,
            DialogKind::Permission => &config.permission,
        };
        Self {
            kind,
            bounds: Rect::new(dialog.x, dialog.y, dialog.width, dialog.height),
            hide_delay: (dialog.hide_delay_ms > 0)
                .then(|| Duration::from_millis(dialog.hide_delay_ms)),
            devtools: dialog.devtools,
            url: format!(
                "{}/{}.html",
                config.base_url.trim_end_matches('/'),
                kind.name()
            ),
        }
    }
}

/// Where a hidden dialog of the given height sits: one pixel wide, all but
/// one row above the top edge.
pub fn parked_bounds(height: f64) -> Rect {
    Rect::new(0.0, -height + 1.0, 1.0, height)
}

pub struct DialogSurface {
    kind: DialogKind,
    surface: Box<dyn Surface>,
    window: Arc<dyn HostWindow>,
    visible: bool,
    bounds: Rect,
    hide_delay: Option<Duration>,
    park_timer: Timeout,
    destroyed: bool,
}

impl DialogSurface {
    /// Create the dialog's overlay, park it, and load its page.
    pub fn new(window: Arc<dyn HostWindow>, options: DialogOptions) -> Result<Self, ViewError> {
        let surface = window.create_surface(&SurfaceOptions::overlay(options.devtools))?;
        window.add_overlay(surface.id());

        let mut dialog = Self {
            kind: options.kind,
            surface,
            window,
            visible: false,
            bounds: options.bounds,
            hide_delay: options.hide_delay,
            park_timer: Timeout::new(),
            destroyed: false,
        };
        dialog.park();
        dialog.surface.load_url(&options.url)?;
        if options.devtools {
            dialog.surface.open_devtools();
        }
        debug!(dialog = dialog.name(), surface = %dialog.surface.id(), "dialog created");
        Ok(dialog)
    }

    pub fn kind(&self) -> DialogKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface.id()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Bounds used while visible. Unchanged by parking.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.park_timer.deadline()
    }

    pub fn show(&mut self, patch: RectPatch) {
        if self.destroyed {
            return;
        }
        self.park_timer.cancel();
        self.bounds = self.bounds.merged(patch);
        self.apply_bounds(self.bounds);
        self.raise();
        self.visible = true;
        if let Err(e) = self.surface.focus() {
            debug!(dialog = self.name(), error = %e, "dialog focus failed");
        }
    }

    pub fn hide(&mut self, now: Instant) {
        if self.destroyed {
            return;
        }
        self.raise();
        self.park_timer.cancel();
        match self.hide_delay {
            Some(delay) => self.park_timer.arm(now, delay),
            None => self.park(),
        }
        self.visible = false;
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.visible {
            self.hide(now);
        } else {
            self.show(RectPatch::default());
        }
    }

    /// Update the stored bounds. A hidden dialog stays parked and picks
    /// them up on the next show.
    pub fn rearrange(&mut self, patch: RectPatch) {
        if self.destroyed {
            return;
        }
        self.bounds = self.bounds.merged(patch);
        if self.visible {
            self.apply_bounds(self.bounds);
        }
    }

    /// Park the dialog if its hide delay has elapsed. Returns whether it did.
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.park_timer.fire(now) {
            self.park();
            return true;
        }
        false
    }

    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.park_timer.cancel();
        self.window.remove_overlay(self.surface.id());
        self.surface.destroy();
        self.destroyed = true;
        debug!(dialog = self.name(), "dialog destroyed");
    }

    fn park(&mut self) {
        self.apply_bounds(parked_bounds(self.bounds.height));
    }

    /// Re-add the overlay so it stacks above everything else.
    fn raise(&self) {
        let id = self.surface.id();
        self.window.remove_overlay(id);
        self.window.add_overlay(id);
    }

    fn apply_bounds(&mut self, bounds: Rect) {
        if let Err(e) = self.surface.set_bounds(bounds) {
            warn!(dialog = self.name(), error = %e, "failed to move dialog");
        }
    }
}

impl Drop for DialogSurface {
    fn drop(&mut self) {
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessWindow, WindowOp};
    use wayfarer_common::WindowId;

    const MS: Duration = Duration::from_millis(1);

    fn setup(hide_delay_ms: u64) -> (HeadlessWindow, DialogSurface) {
        let window = HeadlessWindow::new(WindowId(1), 1200.0, 800.0);
        let mut config = DialogsConfig::default();
        config.menu.hide_delay_ms = hide_delay_ms;
        config.menu.x = 860.0;
        config.menu.y = 60.0;
        let options = DialogOptions::from_config(DialogKind::Menu, &config);
        let dialog = DialogSurface::new(Arc::new(window.clone()), options).unwrap();
        (window, dialog)
    }

    #[test]
    fn options_from_config() {
        let config = DialogsConfig::default();
        let options = DialogOptions::from_config(DialogKind::Find, &config);
        assert_eq!(options.url, "wayfarer://dialogs/find.html");
        assert_eq!(options.bounds.width, 416.0);
        assert_eq!(options.hide_delay, None);

        let options = DialogOptions::from_config(DialogKind::Permission, &config);
        assert_eq!(options.hide_delay, Some(200 * MS));
    }

    #[test]
    fn new_dialog_is_parked_overlay() {
        let (window, dialog) = setup(200);
        let id = dialog.surface_id();

        assert!(!dialog.is_visible());
        assert_eq!(window.overlays(), vec![id]);
        assert_eq!(window.surface_bounds(id), Some(parked_bounds(470.0)));
        assert_eq!(
            window.surface_url(id).as_deref(),
            Some("wayfarer://dialogs/menu.html")
        );
        let options = window.surface_options(id).unwrap();
        assert_eq!(options.partition, None);
    }

    #[test]
    fn parked_rect_is_one_pixel_strip() {
        let rect = parked_bounds(165.0);
        assert_eq!(rect, Rect::new(0.0, -164.0, 1.0, 165.0));
    }

    #[test]
    fn show_merges_patch_and_raises() {
        let (window, mut dialog) = setup(0);
        let id = dialog.surface_id();
        window.clear_journal();

        dialog.show(RectPatch {
            x: Some(100.0),
            ..Default::default()
        });

        assert!(dialog.is_visible());
        assert_eq!(dialog.bounds(), Rect::new(100.0, 60.0, 330.0, 470.0));
        assert_eq!(window.surface_bounds(id), Some(dialog.bounds()));
        assert_eq!(
            window.journal(),
            vec![WindowOp::OverlayRemoved(id), WindowOp::OverlayAdded(id)]
        );
        assert_eq!(window.focus_count(id), 1);
    }

    #[test]
    fn zero_coordinates_in_patch_are_applied() {
        let (_window, mut dialog) = setup(0);
        dialog.show(RectPatch {
            x: Some(0.0),
            y: Some(0.0),
            ..Default::default()
        });
        assert_eq!(dialog.bounds().x, 0.0);
        assert_eq!(dialog.bounds().y, 0.0);
    }

    #[test]
    fn hide_without_delay_parks_immediately() {
        let (window, mut dialog) = setup(0);
        let id = dialog.surface_id();
        let now = Instant::now();

        dialog.show(RectPatch::default());
        dialog.hide(now);

        assert!(!dialog.is_visible());
        assert_eq!(window.surface_bounds(id), Some(parked_bounds(470.0)));
        assert_eq!(dialog.next_deadline(), None);
    }

    #[test]
    fn hide_with_delay_parks_on_tick() {
        let (window, mut dialog) = setup(200);
        let id = dialog.surface_id();
        let t0 = Instant::now();

        dialog.show(RectPatch::default());
        dialog.hide(t0);
        assert!(!dialog.is_visible());
        assert_eq!(window.surface_bounds(id), Some(dialog.bounds()));

        assert!(!dialog.tick(t0 + 199 * MS));
        assert!(dialog.tick(t0 + 200 * MS));
        assert_eq!(window.surface_bounds(id), Some(parked_bounds(470.0)));
        assert!(!dialog.tick(t0 + 400 * MS));
    }

    #[test]
    fn show_within_hide_delay_keeps_last_bounds() {
        let (window, mut dialog) = setup(200);
        let id = dialog.surface_id();
        let t0 = Instant::now();

        dialog.show(RectPatch {
            x: Some(500.0),
            y: Some(90.0),
            ..Default::default()
        });
        let shown = dialog.bounds();
        dialog.hide(t0);
        dialog.show(RectPatch::default());

        assert!(!dialog.tick(t0 + 300 * MS));
        assert!(dialog.is_visible());
        assert_eq!(window.surface_bounds(id), Some(shown));
    }

    #[test]
    fn toggle_flips_visibility() {
        let (_window, mut dialog) = setup(0);
        let now = Instant::now();
        dialog.toggle(now);
        assert!(dialog.is_visible());
        dialog.toggle(now);
        assert!(!dialog.is_visible());
    }

    #[test]
    fn hidden_rearrange_is_stored_until_shown() {
        let (window, mut dialog) = setup(0);
        let id = dialog.surface_id();

        dialog.rearrange(RectPatch {
            x: Some(42.0),
            width: Some(10.0),
            ..Default::default()
        });
        assert_eq!(dialog.bounds().x, 42.0);
        assert_eq!(dialog.bounds().width, 10.0);
        assert_eq!(window.surface_bounds(id), Some(parked_bounds(470.0)));

        dialog.show(RectPatch::default());
        let shown = window.surface_bounds(id).unwrap();
        assert_eq!((shown.x, shown.width), (42.0, 10.0));
    }

    #[test]
    fn visible_rearrange_applies_immediately() {
        let (window, mut dialog) = setup(0);
        let id = dialog.surface_id();

        dialog.show(RectPatch::default());
        dialog.rearrange(RectPatch {
            y: Some(120.0),
            ..Default::default()
        });
        assert_eq!(window.surface_bounds(id).unwrap().y, 120.0);
    }

    #[test]
    fn destroy_removes_overlay_once() {
        let (window, mut dialog) = setup(0);
        let id = dialog.surface_id();
        dialog.destroy();
        dialog.destroy();
        drop(dialog);

        assert!(window.overlays().is_empty());
        assert!(window.is_destroyed(id));
        assert_eq!(window.destroy_count(id), 1);
    }

    #[test]
    fn dialog_names_on_the_wire() {
        let kind: DialogKind = serde_json::from_str("\"permission\"").unwrap();
        assert_eq!(kind, DialogKind::Permission);
        assert_eq!(DialogKind::Menu.name(), "menu");
    }
}
