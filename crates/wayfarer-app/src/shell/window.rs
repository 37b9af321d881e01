use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};
use wayfarer_common::{Outbox, Rect, WindowId};
use wayfarer_config::WayfarerConfig;
use wayfarer_view::headless::HeadlessWindow;
use wayfarer_view::{
    DialogKind, DialogOptions, DialogSurface, FaviconFetcher, HostWindow, SurfaceId, ViewError,
    ViewRegistry, ViewSettings, WindowLink, WindowLocator,
};

use super::prompt::DialogPrompt;

/// One browser window: its tabs, its dialogs, and its permission prompt.
pub struct BrowserWindow {
    pub(super) host: HeadlessWindow,
    pub(super) registry: ViewRegistry,
    pub(super) dialogs: BTreeMap<DialogKind, DialogSurface>,
    pub(super) prompt: Arc<DialogPrompt>,
}

impl BrowserWindow {
    pub fn new(
        id: WindowId,
        config: &WayfarerConfig,
        favicons: Arc<dyn FaviconFetcher>,
        width: f64,
        height: f64,
    ) -> Result<Self, ViewError> {
        let host = HeadlessWindow::new(id, width, height);
        let shared: Arc<dyn HostWindow> = Arc::new(host.clone());
        let outbox = Outbox::new();

        let mut dialogs = BTreeMap::new();
        for kind in DialogKind::ALL {
            let options = DialogOptions::from_config(kind, &config.dialogs);
            dialogs.insert(kind, DialogSurface::new(shared.clone(), options)?);
        }

        let prompt = Arc::new(DialogPrompt::new(outbox.downgrade()));
        let registry = ViewRegistry::new(
            shared,
            outbox,
            ViewSettings::from_config(config),
            favicons,
        );

        info!(window = %id, width, height, dialogs = dialogs.len(), "window ready");
        Ok(Self {
            host,
            registry,
            dialogs,
            prompt,
        })
    }

    pub fn id(&self) -> WindowId {
        self.host.id()
    }

    pub(super) fn dialog_mut(&mut self, kind: DialogKind) -> Option<&mut DialogSurface> {
        self.dialogs.get_mut(&kind)
    }

    pub(super) fn resize(&mut self, width: f64, height: f64) {
        self.host.set_content_bounds(Rect::new(0.0, 0.0, width, height));
        self.registry.resize();
        debug!(window = %self.id(), width, height, "window resized");
    }

    pub(super) fn close(&mut self) {
        self.prompt.deny_all();
        self.registry.clear();
        for dialog in self.dialogs.values_mut() {
            dialog.destroy();
        }
        info!(window = %self.id(), "window closed");
    }
}

impl WindowLocator for BrowserWindow {
    fn locate(&self, surface: SurfaceId) -> Option<WindowLink> {
        let owns_surface = self.registry.tab_for_surface(surface).is_some()
            || self.dialogs.values().any(|d| d.surface_id() == surface);
        owns_surface.then(|| WindowLink {
            outbox: self.registry.outbox().downgrade(),
            prompt: self.prompt.clone(),
        })
    }
}
