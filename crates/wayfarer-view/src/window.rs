//! The windowing layer that hosts surfaces.

use wayfarer_common::{Rect, WindowId};

use crate::error::ViewError;
use crate::surface::{Surface, SurfaceId, SurfaceOptions};

/// A top-level browser window provided by the embedding runtime.
///
/// One tab surface at a time is "attached" (visible). Overlay surfaces are
/// stacked in attach order; the last added is front-most.
pub trait HostWindow: Send + Sync {
    fn id(&self) -> WindowId;

    /// The drawable content area, excluding native decorations.
    fn content_bounds(&self) -> Rect;

    fn create_surface(&self, options: &SurfaceOptions) -> Result<Box<dyn Surface>, ViewError>;

    /// Make `surface` the sole attached tab surface, or detach all with `None`.
    /// Returns once the windowing layer no longer references the old surface.
    fn set_attached(&self, surface: Option<SurfaceId>);
    fn attached(&self) -> Option<SurfaceId>;

    fn add_overlay(&self, surface: SurfaceId);
    fn remove_overlay(&self, surface: SurfaceId);
}
