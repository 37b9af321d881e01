use tracing::{debug, warn};
use wayfarer_common::{Notification, TabId};
use wayfarer_config::CertificatePolicy;

use crate::events::{EventQueue, SurfaceEvent, ViewEvent, WindowDisposition};
use crate::favicon::{self, FaviconFetcher, FaviconReply};

use super::handle::ViewHandle;

// =============================================================================
// NEW-WINDOW POLICY
// =============================================================================

/// What to do with a page's request to open a new window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewWindowAction {
    /// Suppress the popup and load the URL in the requesting tab.
    NavigateSelf,
    /// Suppress the popup and open the URL in a new tab.
    OpenTab { select: bool },
    /// Let the runtime open its own window.
    Allow,
}

pub fn new_window_action(disposition: WindowDisposition, frame_name: &str) -> NewWindowAction {
    match disposition {
        WindowDisposition::NewWindow => match frame_name {
            "_self" => NewWindowAction::NavigateSelf,
            "_blank" => NewWindowAction::OpenTab { select: true },
            _ => NewWindowAction::Allow,
        },
        WindowDisposition::ForegroundTab => NewWindowAction::OpenTab { select: true },
        WindowDisposition::BackgroundTab => NewWindowAction::OpenTab { select: false },
        WindowDisposition::Other => NewWindowAction::Allow,
    }
}

// =============================================================================
// EVENT HANDLING
// =============================================================================

/// Registry state a handle needs while reacting to one event.
pub struct EventContext<'a> {
    pub selected: Option<TabId>,
    pub certificate_policy: CertificatePolicy,
    pub favicons: &'a dyn FaviconFetcher,
    pub queue: &'a EventQueue,
}

/// Work a handle cannot do alone and hands back to its registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewRequest {
    OpenTab { url: String, select: bool },
}

impl ViewHandle {
    /// React to one queued event. Never fails; problems are logged.
    pub fn handle_event(&mut self, event: ViewEvent, ctx: &EventContext<'_>) -> Option<ViewRequest> {
        if self.is_destroyed() {
            debug!(tab_id = %self.tab_id, "event for destroyed view ignored");
            return None;
        }

        match event {
            ViewEvent::Surface(event) => self.handle_surface_event(event, ctx),
            ViewEvent::FaviconFetched { source, result } => {
                self.on_favicon_fetched(source, result);
                None
            }
        }
    }

    fn handle_surface_event(
        &mut self,
        event: SurfaceEvent,
        ctx: &EventContext<'_>,
    ) -> Option<ViewRequest> {
        let tab_id = self.tab_id;
        match event {
            SurfaceEvent::DidStartLoading | SurfaceEvent::DidStopLoading => {
                let loading = matches!(event, SurfaceEvent::DidStartLoading);
                self.update_navigation_state(ctx.selected);
                self.notify(Notification::LoadingStateChanged { tab_id, loading });
            }
            SurfaceEvent::DidStartNavigation {
                url,
                in_place,
                main_frame,
            } => {
                debug!(tab_id = %tab_id, url = %url, in_place, main_frame, "navigation started");
                self.update_navigation_state(ctx.selected);
                self.notify(Notification::LoadCommitted {
                    tab_id,
                    url,
                    main_frame,
                });
            }
            SurfaceEvent::DidNavigate { url } => {
                self.url = url.clone();
                self.notify(Notification::UrlUpdated { tab_id, url });
            }
            SurfaceEvent::TitleUpdated { title } => {
                self.title = title.clone();
                self.notify(Notification::TitleUpdated { tab_id, title });
            }
            SurfaceEvent::FaviconUpdated { candidates } => {
                self.on_favicon_candidates(candidates, ctx);
            }
            SurfaceEvent::ThemeColorChanged { color } => {
                self.notify(Notification::ThemeColorUpdated { tab_id, color });
            }
            SurfaceEvent::FoundInPage {
                active_match,
                matches,
            } => {
                self.notify(Notification::FoundInPage {
                    tab_id,
                    active_match,
                    matches,
                });
            }
            SurfaceEvent::NewWindow {
                request_id,
                url,
                frame_name,
                disposition,
            } => return self.on_new_window(request_id, url, &frame_name, disposition),
            SurfaceEvent::CertificateError {
                request_id,
                url,
                error,
            } => {
                let allow = ctx.certificate_policy.allows();
                warn!(
                    tab_id = %tab_id,
                    url = %url,
                    error = %error,
                    allow,
                    "certificate error"
                );
                self.surface.resolve_certificate(request_id, allow);
            }
        }
        None
    }

    fn on_new_window(
        &mut self,
        request_id: u64,
        url: String,
        frame_name: &str,
        disposition: WindowDisposition,
    ) -> Option<ViewRequest> {
        let action = new_window_action(disposition, frame_name);
        debug!(tab_id = %self.tab_id, url = %url, frame_name, ?disposition, ?action, "new window requested");

        match action {
            NewWindowAction::Allow => {
                self.surface.resolve_new_window(request_id, true);
                None
            }
            NewWindowAction::NavigateSelf => {
                self.surface.resolve_new_window(request_id, false);
                if let Err(e) = self.load_url(&url) {
                    warn!(tab_id = %self.tab_id, url = %url, error = %e, "in-place navigation failed");
                }
                None
            }
            NewWindowAction::OpenTab { select } => {
                self.surface.resolve_new_window(request_id, false);
                Some(ViewRequest::OpenTab { url, select })
            }
        }
    }

    // -- favicon -------------------------------------------------------------

    fn on_favicon_candidates(&mut self, candidates: Vec<String>, ctx: &EventContext<'_>) {
        let Some(source) = candidates.into_iter().next() else {
            return;
        };
        self.favicon = source.clone();

        if favicon::is_remote(&source) {
            let reply = FaviconReply::new(self.tab_id, source.clone(), ctx.queue.clone());
            ctx.favicons.fetch(source, reply);
            return;
        }
        self.publish_favicon();
    }

    fn on_favicon_fetched(&mut self, source: String, result: Result<String, String>) {
        if source != self.favicon {
            debug!(tab_id = %self.tab_id, source = %source, "stale favicon fetch ignored");
            return;
        }
        match result {
            Ok(data_uri) => self.favicon = data_uri,
            Err(e) => {
                warn!(tab_id = %self.tab_id, source = %source, error = %e, "favicon fetch failed");
                self.favicon.clear();
            }
        }
        self.publish_favicon();
    }

    /// Send the tab colour (when one can be extracted) and the favicon. A
    /// favicon that is not a decodable data URI is cleared.
    fn publish_favicon(&mut self) {
        let tab_id = self.tab_id;
        if !self.favicon.is_empty() {
            match favicon::decode_data_uri(&self.favicon) {
                Ok(bytes) => match favicon::vibrant_color(&bytes) {
                    Ok(Some(color)) => self.notify(Notification::TabColorUpdated {
                        tab_id,
                        color: color.to_hex(),
                    }),
                    Ok(None) => debug!(tab_id = %tab_id, "favicon has no vibrant colour"),
                    Err(e) => {
                        debug!(tab_id = %tab_id, error = %e, "favicon colour extraction failed")
                    }
                },
                Err(e) => {
                    warn!(tab_id = %tab_id, error = %e, "unusable favicon, clearing");
                    self.favicon.clear();
                }
            }
        }
        self.notify(Notification::FaviconUpdated {
            tab_id,
            favicon: self.favicon.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_window_policy_table() {
        use WindowDisposition::*;

        assert_eq!(new_window_action(NewWindow, "_self"), NewWindowAction::NavigateSelf);
        assert_eq!(
            new_window_action(NewWindow, "_blank"),
            NewWindowAction::OpenTab { select: true }
        );
        assert_eq!(new_window_action(NewWindow, "popup"), NewWindowAction::Allow);
        assert_eq!(new_window_action(NewWindow, ""), NewWindowAction::Allow);
        assert_eq!(
            new_window_action(ForegroundTab, "_self"),
            NewWindowAction::OpenTab { select: true }
        );
        assert_eq!(
            new_window_action(BackgroundTab, "anything"),
            NewWindowAction::OpenTab { select: false }
        );
        assert_eq!(new_window_action(Other, "_blank"), NewWindowAction::Allow);
    }
}
