use std::sync::Arc;

use tracing::debug;
use wayfarer_common::{TabId, WeakOutbox};

use crate::error::ViewError;
use crate::events::{EventQueue, SurfaceEvent};
use crate::session::PartitionKind;
use crate::surface::{SurfaceListener, SurfaceOptions};
use crate::window::HostWindow;

use super::handle::ViewHandle;
use super::types::{ViewOptions, ViewSettings};

impl ViewHandle {
    /// Create a surface for `tab_id` in the requested partition, wire its
    /// events into `queue`, and start loading the initial URL.
    pub fn create(
        window: &dyn HostWindow,
        tab_id: TabId,
        options: &ViewOptions,
        settings: &ViewSettings,
        queue: &EventQueue,
        outbox: WeakOutbox,
    ) -> Result<ViewHandle, ViewError> {
        let partition = if options.incognito {
            PartitionKind::Incognito
        } else {
            PartitionKind::Normal
        };

        let mut surface_options = SurfaceOptions::tab(partition, settings.preload_script.clone());
        surface_options.user_agent = settings.user_agent.clone();

        let mut surface = window.create_surface(&surface_options)?;
        let surface_id = surface.id();

        let sink = queue.clone();
        let listener: SurfaceListener = Arc::new(move |event: SurfaceEvent| sink.push(tab_id, event));
        let subscription = surface.subscribe(listener);

        let url = options
            .url
            .clone()
            .unwrap_or_else(|| settings.home_url.clone());

        let mut handle = ViewHandle {
            surface,
            surface_id,
            tab_id,
            title: String::new(),
            url: url.clone(),
            home_url: url.clone(),
            favicon: String::new(),
            incognito: options.incognito,
            destroyed: false,
            subscriptions: vec![subscription],
            window: outbox,
        };

        if let Err(e) = handle.load_url(&url) {
            handle.destroy();
            return Err(e);
        }

        debug!(tab_id = %tab_id, surface = %surface_id, url = %url, ?partition, "view created");
        Ok(handle)
    }
}
