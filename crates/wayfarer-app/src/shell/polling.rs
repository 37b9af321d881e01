//! Periodic work: surface events, title polling, and dialog timers.

use std::time::Instant;

use wayfarer_common::RectPatch;
use wayfarer_view::DialogKind;

use super::Shell;

impl Shell {
    /// Run everything that is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        self.window.registry.pump();
        self.window.registry.poll_titles(now);

        for dialog in self.window.dialogs.values_mut() {
            dialog.tick(now);
        }

        if self.window.prompt.take_show_request() {
            if let Some(d) = self.window.dialog_mut(DialogKind::Permission) {
                d.show(RectPatch::default());
            }
        }
    }
}
