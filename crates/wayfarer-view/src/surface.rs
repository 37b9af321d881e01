//! The embedding runtime's content surface, as seen by the core.
//!
//! A surface is one independently rendered content area. The runtime owns
//! the real object; the core drives it through this trait and learns about
//! its lifecycle through subscribed listeners.

use std::fmt;
use std::sync::Arc;

use wayfarer_common::Rect;

use crate::error::ViewError;
use crate::events::SurfaceEvent;
use crate::session::PartitionKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface-{}", self.0)
    }
}

/// Token returned by [`Surface::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Callback invoked by the runtime for every surface event. Listeners must
/// only enqueue; they run on the runtime's thread.
pub type SurfaceListener = Arc<dyn Fn(SurfaceEvent) + Send + Sync>;

/// Creation parameters for a surface.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    /// Isolation partition. `None` for internal UI surfaces such as dialogs.
    pub partition: Option<PartitionKind>,
    /// Bridge script run before any page script.
    pub preload: Option<String>,
    pub javascript: bool,
    /// Same-origin enforcement.
    pub web_security: bool,
    pub context_isolation: bool,
    pub user_agent: Option<String>,
    pub devtools: bool,
}

impl SurfaceOptions {
    /// Options for tab content: scripts on, same-origin on, isolated context.
    pub fn tab(partition: PartitionKind, preload: Option<String>) -> Self {
        Self {
            partition: Some(partition),
            preload,
            javascript: true,
            web_security: true,
            context_isolation: true,
            user_agent: None,
            devtools: cfg!(debug_assertions),
        }
    }

    /// Options for trusted browser UI overlays.
    pub fn overlay(devtools: bool) -> Self {
        Self {
            partition: None,
            preload: None,
            javascript: true,
            web_security: true,
            context_isolation: false,
            user_agent: None,
            devtools,
        }
    }
}

/// A content surface provided by the embedding runtime.
pub trait Surface: Send {
    fn id(&self) -> SurfaceId;

    fn load_url(&mut self, url: &str) -> Result<(), ViewError>;
    fn url(&self) -> String;
    fn title(&self) -> String;

    fn can_go_back(&self) -> bool;
    fn can_go_forward(&self) -> bool;
    fn go_back(&mut self) -> Result<(), ViewError>;
    fn go_forward(&mut self) -> Result<(), ViewError>;
    fn reload(&mut self) -> Result<(), ViewError>;
    fn stop(&mut self) -> Result<(), ViewError>;

    fn zoom_factor(&self) -> f64;
    fn set_zoom_factor(&mut self, factor: f64) -> Result<(), ViewError>;
    fn find_in_page(&mut self, text: &str, forward: bool) -> Result<(), ViewError>;
    fn stop_find_in_page(&mut self) -> Result<(), ViewError>;
    fn open_devtools(&mut self);

    fn bounds(&self) -> Rect;
    fn set_bounds(&mut self, bounds: Rect) -> Result<(), ViewError>;
    /// Follow the parent window's size changes along the given axes.
    fn set_auto_resize(&mut self, width: bool, height: bool);
    fn focus(&mut self) -> Result<(), ViewError>;

    fn subscribe(&mut self, listener: SurfaceListener) -> ListenerId;
    fn unsubscribe(&mut self, listener: ListenerId);

    /// Answer a [`SurfaceEvent::CertificateError`].
    fn resolve_certificate(&mut self, request_id: u64, allow: bool);
    /// Answer a [`SurfaceEvent::NewWindow`]: `allow` lets the runtime open
    /// its own popup, `false` suppresses it.
    fn resolve_new_window(&mut self, request_id: u64, allow: bool);

    /// Release the runtime surface. Must not be called while attached.
    fn destroy(&mut self);
    fn is_destroyed(&self) -> bool;
}
