//! Command dispatch: routes UI commands to the window or the session.

use std::time::Instant;

use tracing::debug;
use wayfarer_view::{Command, DialogKind, ViewOptions};

use super::Shell;

impl Shell {
    pub(super) fn dispatch(&mut self, command: Command, now: Instant) {
        match command {
            Command::CreateView {
                tab_id,
                url,
                incognito,
            } => {
                self.window
                    .registry
                    .create(tab_id, ViewOptions { url, incognito });
            }
            Command::SelectView { tab_id } => {
                self.window.registry.select(tab_id);
            }
            Command::RemoveView { tab_id } => {
                self.window.registry.remove(tab_id);
            }
            Command::HideViews => self.window.registry.hide_view(),
            Command::ShowView => {
                self.window.registry.show_view();
            }
            Command::ClearViews => self.window.registry.clear(),
            Command::RelayCall(request) => {
                self.window.registry.relay(request);
            }
            Command::ClearBrowsingData => self.session.clear_browsing_data(),
            Command::ShowDialog { dialog, bounds } => {
                if let Some(d) = self.window.dialog_mut(dialog) {
                    d.show(bounds);
                }
            }
            Command::HideDialog { dialog } => {
                if let Some(d) = self.window.dialog_mut(dialog) {
                    d.hide(now);
                }
            }
            Command::ToggleDialog { dialog } => {
                if let Some(d) = self.window.dialog_mut(dialog) {
                    d.toggle(now);
                }
            }
            Command::RearrangeDialog { dialog, bounds } => {
                if let Some(d) = self.window.dialog_mut(dialog) {
                    d.rearrange(bounds);
                }
            }
            Command::PermissionResponse {
                request_id,
                granted,
            } => {
                if !self.window.prompt.resolve(request_id, granted) {
                    return;
                }
                debug!(request_id, granted, "permission answered");
                if self.window.prompt.pending_count() == 0 {
                    if let Some(d) = self.window.dialog_mut(DialogKind::Permission) {
                        d.hide(now);
                    }
                }
            }
            Command::Resize { width, height } => self.window.resize(width, height),
        }
    }
}
