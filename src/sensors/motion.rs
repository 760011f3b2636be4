//! PIR motion latch.
//!
//! The PIR edge interrupt sets the latch; the controller consumes it with
//! an atomic take-and-clear so an edge that arrives between two ticks is
//! never lost, and never seen twice.  Lock-free, safe to signal from
//! interrupt context.

use core::sync::atomic::{AtomicBool, Ordering};

/// Single-producer / single-consumer motion flag.
#[derive(Debug, Default)]
pub struct MotionLatch {
    pending: AtomicBool,
}

impl MotionLatch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Record a motion edge (producer side, ISR).
    pub fn signal(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Consume the pending edge, if any (consumer side, control loop).
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    /// Look without consuming.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}
