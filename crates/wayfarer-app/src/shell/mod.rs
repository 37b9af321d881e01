//! The shell: one browser window plus the shared session, driven by UI
//! commands and a periodic tick.

mod dispatch;
mod polling;
mod prompt;
mod window;

#[cfg(test)]
mod tests;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use wayfarer_common::WindowId;
use wayfarer_config::WayfarerConfig;
use wayfarer_view::headless::HeadlessPartition;
use wayfarer_view::{
    encode_notification, parse_command, FaviconFetcher, Partition, PartitionEvent, PartitionKind,
    SessionPartitionManager, ViewError,
};

use window::BrowserWindow;

pub struct Shell {
    session: SessionPartitionManager,
    window: BrowserWindow,
}

impl Shell {
    /// Build a shell on in-memory partitions.
    pub fn new(
        config: &WayfarerConfig,
        favicons: Arc<dyn FaviconFetcher>,
        width: f64,
        height: f64,
    ) -> Result<Self, ViewError> {
        let normal: Arc<dyn Partition> = Arc::new(HeadlessPartition::new(PartitionKind::Normal));
        let incognito: Arc<dyn Partition> =
            Arc::new(HeadlessPartition::new(PartitionKind::Incognito));
        Self::with_partitions(config, favicons, normal, incognito, width, height)
    }

    pub fn with_partitions(
        config: &WayfarerConfig,
        favicons: Arc<dyn FaviconFetcher>,
        normal: Arc<dyn Partition>,
        incognito: Arc<dyn Partition>,
        width: f64,
        height: f64,
    ) -> Result<Self, ViewError> {
        let mut session = SessionPartitionManager::new(&config.session, normal, incognito);
        let extensions_dir = config.session.resolved_extensions_dir();
        session.load_extensions(extensions_dir.as_deref());

        let mut window = BrowserWindow::new(WindowId(1), config, favicons, width, height)?;
        window.registry.start_title_poll(Instant::now());

        Ok(Self { session, window })
    }

    /// Handle one inbound line. Malformed lines are logged and dropped.
    pub fn handle_line(&mut self, line: &str, now: Instant) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        match parse_command(line) {
            Ok(command) => {
                debug!(command = command.kind(), "command received");
                self.dispatch(command, now);
            }
            Err(e) => warn!(error = %e, "dropping inbound line"),
        }
    }

    /// Route an event raised by one of the session's partitions.
    // Only a native runtime raises these; the in-memory partitions are silent.
    #[allow(dead_code)]
    pub fn handle_partition_event(&mut self, kind: PartitionKind, event: PartitionEvent) {
        self.session.handle_event(kind, event, &self.window);
    }

    /// Encode every pending notification as an outbound line.
    pub fn drain_frames(&self) -> Vec<String> {
        self.window
            .registry
            .outbox()
            .drain()
            .iter()
            .filter_map(|notification| match encode_notification(notification) {
                Ok(frame) => Some(frame),
                Err(e) => {
                    warn!(channel = %notification.channel(), error = %e, "dropping notification");
                    None
                }
            })
            .collect()
    }

    pub fn shutdown(&mut self) {
        self.window.close();
        self.session.clear_cache(PartitionKind::Incognito);
        info!("shell shut down");
    }
}
