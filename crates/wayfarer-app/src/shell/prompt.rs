//! Permission prompts answered through the permission dialog.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use tracing::debug;
use wayfarer_common::{Notification, WeakOutbox};
use wayfarer_view::{PermissionPrompt, PermissionReply, PermissionRequest, ViewError};

/// Forwards permission requests to the UI and holds the replies until the
/// user answers with a `permission-response` command.
pub struct DialogPrompt {
    outbox: WeakOutbox,
    pending: Mutex<HashMap<u64, PermissionReply>>,
    show_requested: AtomicBool,
}

impl DialogPrompt {
    pub fn new(outbox: WeakOutbox) -> Self {
        Self {
            outbox,
            pending: Mutex::new(HashMap::new()),
            show_requested: AtomicBool::new(false),
        }
    }

    /// Answer a pending request. Returns false if it is unknown.
    pub fn resolve(&self, request_id: u64, granted: bool) -> bool {
        let reply = match self.pending.lock() {
            Ok(mut pending) => pending.remove(&request_id),
            Err(_) => None,
        };
        match reply {
            Some(reply) => {
                reply.respond(granted);
                true
            }
            None => {
                debug!(request_id, "response for unknown permission request");
                false
            }
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Whether a request arrived since the last call.
    pub fn take_show_request(&self) -> bool {
        self.show_requested.swap(false, Ordering::AcqRel)
    }

    /// Deny everything still waiting.
    pub fn deny_all(&self) {
        let replies: Vec<PermissionReply> = match self.pending.lock() {
            Ok(mut pending) => pending.drain().map(|(_, reply)| reply).collect(),
            Err(_) => Vec::new(),
        };
        for reply in replies {
            reply.deny();
        }
    }
}

impl PermissionPrompt for DialogPrompt {
    fn request(&self, request: PermissionRequest, reply: PermissionReply) -> Result<(), ViewError> {
        let delivered = self.outbox.push(Notification::PermissionRequested {
            request_id: request.request_id,
            permission: request.permission.to_string(),
            origin: request.origin.clone(),
        });
        if !delivered {
            return Err(ViewError::Prompt("window is closed".into()));
        }

        let mut pending = self
            .pending
            .lock()
            .map_err(|_| ViewError::Prompt("prompt state poisoned".into()))?;
        pending.insert(request.request_id, reply);
        self.show_requested.store(true, Ordering::Release);
        debug!(request_id = request.request_id, permission = %request.permission, "permission prompt queued");
        Ok(())
    }
}
