//! In-memory runtime backend.
//!
//! Implements the runtime seams ([`HostWindow`](crate::window::HostWindow),
//! [`Surface`](crate::surface::Surface), [`Partition`](crate::session::Partition),
//! [`FaviconFetcher`](crate::favicon::FaviconFetcher)) without a renderer.
//! Every window operation is recorded in a journal so tests can check
//! ordering, and pages can be driven by emitting surface events by hand.

mod favicons;
mod partition;
mod surface;
mod window;

pub use favicons::StaticFavicons;
pub use partition::HeadlessPartition;
pub use surface::HeadlessSurface;
pub use window::{HeadlessWindow, WindowOp};
