//! # Pool Policies
//!
//! A policy is a strategy value injected at pool construction. It bundles
//! the three customization points the pool exposes: which live objects
//! iteration yields, whether freshly issued handles are written back into
//! objects, and whether `clear` releases growth storage.

use crate::handle::Handle;

/// Customization points for an object pool.
///
/// Every method has a default, so a policy only overrides what it needs.
pub trait PoolPolicy<T> {
    /// Whether iteration yields this object.
    ///
    /// An object for which this returns `false` stays live and reachable
    /// through its handle; it is merely skipped by iteration. This is how
    /// sentinel placeholders are kept out of traversals without removing
    /// them.
    fn is_iterable(&self, value: &T) -> bool {
        let _ = value;
        true
    }

    /// Writes a freshly issued handle into the object it identifies.
    ///
    /// Called once per construction, before the handle is returned to the
    /// caller. The default stores nothing.
    fn bind_handle(&self, value: &mut T, handle: Handle) {
        let _ = (value, handle);
    }

    /// Whether `clear` releases growth chunks back to the pool's original
    /// capacity.
    fn shrink_on_clear(&self) -> bool {
        false
    }
}

/// Policy with every customization point at its default: all objects are
/// iterable, handles are not stored in objects, `clear` keeps capacity.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultPolicy;

impl<T> PoolPolicy<T> for DefaultPolicy {}
