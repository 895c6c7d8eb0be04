//! # Diagnostic Hooks
//!
//! Best-effort notifications about storage traffic and failed operations.
//!
//! The pool never depends on a concrete logging mechanism: embedders wire
//! [`PoolHooks`] to their own logging or telemetry, or use [`TracingHooks`]
//! to forward everything to the `tracing` facade. Notifications carry no
//! return value and have no effect on control flow.

use std::rc::Rc;

/// Observer for pool storage traffic and errors.
///
/// Every method has a no-op default, so an implementation only overrides
/// what it cares about. Implementations must not panic; the pool treats
/// these calls as fire-and-forget.
pub trait PoolHooks {
    /// Called after a chunk of `slots` elements (`bytes` bytes) is allocated.
    fn on_allocation(&self, slots: usize, bytes: usize) {
        let _ = (slots, bytes);
    }

    /// Called after a chunk of `slots` elements (`bytes` bytes) is released.
    fn on_release(&self, slots: usize, bytes: usize) {
        let _ = (slots, bytes);
    }

    /// Called when an operation fails, with a human-readable description.
    fn on_error(&self, message: &str) {
        let _ = message;
    }
}

/// Default hooks: every notification is discarded.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHooks;

impl PoolHooks for NoopHooks {}

/// Hooks that forward every notification to the `tracing` facade.
///
/// Allocation traffic is emitted at `debug` level, errors at `error` level.
/// Zero-cost when no subscriber is installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingHooks;

impl PoolHooks for TracingHooks {
    fn on_allocation(&self, slots: usize, bytes: usize) {
        tracing::debug!(slots, bytes, "pool storage allocated");
    }

    fn on_release(&self, slots: usize, bytes: usize) {
        tracing::debug!(slots, bytes, "pool storage released");
    }

    fn on_error(&self, message: &str) {
        tracing::error!("pool error: {}", message);
    }
}

/// Shared hook handle used across the pool and its storage.
///
/// Pools are single-threaded, so plain reference counting suffices.
pub(crate) fn noop_hooks() -> Rc<dyn PoolHooks> {
    Rc::new(NoopHooks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_hooks_accept_everything() {
        let hooks = NoopHooks;
        hooks.on_allocation(16, 1024);
        hooks.on_release(16, 1024);
        hooks.on_error("nothing listens");
    }

    #[test]
    fn test_tracing_hooks_accept_everything() {
        // No subscriber installed; events must still be side-effect free.
        let hooks = TracingHooks;
        hooks.on_allocation(16, 1024);
        hooks.on_release(16, 1024);
        hooks.on_error("nothing listens");
    }
}
