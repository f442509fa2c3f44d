// Drawable surface collaborators

use crate::error::Result;

/// One renderable target allocated by the platform.
///
/// The surface's stable identifier doubles as the player handle, so it must
/// stay unique for as long as the surface is live.
pub trait DrawableSurface: Send {
    fn id(&self) -> i64;

    /// Release the underlying platform resource. Safe to call once only;
    /// the owning player calls it exactly once during disposal.
    fn release(&mut self);
}

/// Platform facility allocating drawable surfaces and their identifiers.
pub trait SurfaceProvider: Send + Sync {
    fn create_surface(&self) -> Result<Box<dyn DrawableSurface>>;
}
