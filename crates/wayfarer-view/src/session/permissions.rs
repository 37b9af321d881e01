//! Permission requests and their single-use replies.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::partition::Partition;
use crate::error::ViewError;
use crate::surface::SurfaceId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Permission {
    Media,
    Geolocation,
    Notifications,
    MidiSysex,
    PointerLock,
    Fullscreen,
    OpenExternal,
    ClipboardRead,
    Other(String),
}

impl Permission {
    pub fn parse(name: &str) -> Self {
        match name {
            "media" => Self::Media,
            "geolocation" => Self::Geolocation,
            "notifications" => Self::Notifications,
            "midiSysex" => Self::MidiSysex,
            "pointerLock" => Self::PointerLock,
            "fullscreen" => Self::Fullscreen,
            "openExternal" => Self::OpenExternal,
            "clipboard-read" => Self::ClipboardRead,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Media => "media",
            Self::Geolocation => "geolocation",
            Self::Notifications => "notifications",
            Self::MidiSysex => "midiSysex",
            Self::PointerLock => "pointerLock",
            Self::Fullscreen => "fullscreen",
            Self::OpenExternal => "openExternal",
            Self::ClipboardRead => "clipboard-read",
            Self::Other(name) => name,
        }
    }

    /// Granted without asking the user.
    pub fn is_auto_granted(&self) -> bool {
        matches!(self, Self::Fullscreen)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A permission request forwarded to a window's prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct PermissionRequest {
    pub request_id: u64,
    pub surface: SurfaceId,
    pub permission: Permission,
    /// Serialized origin of the requesting page, or the raw URL if it has none.
    pub origin: String,
}

impl PermissionRequest {
    pub fn new(request_id: u64, surface: SurfaceId, permission: Permission, url: &str) -> Self {
        let origin = url::Url::parse(url)
            .map(|u| u.origin().ascii_serialization())
            .ok()
            .filter(|o| o != "null")
            .unwrap_or_else(|| url.to_string());
        Self {
            request_id,
            surface,
            permission,
            origin,
        }
    }
}

/// One-shot answer to a permission request.
///
/// Dropping an unanswered reply denies the request, so a prompt that fails
/// or a window that closes never leaves the page waiting.
pub struct PermissionReply {
    request_id: u64,
    partition: Arc<dyn Partition>,
    answered: bool,
}

impl PermissionReply {
    pub(crate) fn new(request_id: u64, partition: Arc<dyn Partition>) -> Self {
        Self {
            request_id,
            partition,
            answered: false,
        }
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn respond(mut self, granted: bool) {
        self.answer(granted);
    }

    pub fn grant(self) {
        self.respond(true);
    }

    pub fn deny(self) {
        self.respond(false);
    }

    fn answer(&mut self, granted: bool) {
        if self.answered {
            return;
        }
        self.answered = true;
        debug!(request_id = self.request_id, granted, partition = ?self.partition.kind(), "permission resolved");
        self.partition.resolve_permission(self.request_id, granted);
    }
}

impl Drop for PermissionReply {
    fn drop(&mut self) {
        self.answer(false);
    }
}

impl fmt::Debug for PermissionReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionReply")
            .field("request_id", &self.request_id)
            .field("answered", &self.answered)
            .finish()
    }
}

/// Asks the user of a window to decide on a permission request.
pub trait PermissionPrompt: Send + Sync {
    /// Take ownership of the reply and answer it eventually. Returning an
    /// error drops the reply, which denies the request.
    fn request(&self, request: PermissionRequest, reply: PermissionReply) -> Result<(), ViewError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_names_round_trip() {
        for name in ["media", "geolocation", "fullscreen", "midiSysex", "clipboard-read"] {
            assert_eq!(Permission::parse(name).as_str(), name);
        }
        assert_eq!(
            Permission::parse("idle-detection"),
            Permission::Other("idle-detection".into())
        );
    }

    #[test]
    fn only_fullscreen_is_auto_granted() {
        assert!(Permission::Fullscreen.is_auto_granted());
        assert!(!Permission::Media.is_auto_granted());
        assert!(!Permission::Other("fullscreen-ish".into()).is_auto_granted());
    }

    #[test]
    fn request_origin_strips_path() {
        let req = PermissionRequest::new(
            1,
            SurfaceId(2),
            Permission::Geolocation,
            "https://maps.example.com:8443/place?q=1",
        );
        assert_eq!(req.origin, "https://maps.example.com:8443");
    }

    #[test]
    fn opaque_origin_falls_back_to_url() {
        let req = PermissionRequest::new(1, SurfaceId(2), Permission::Media, "about:blank");
        assert_eq!(req.origin, "about:blank");
    }
}
