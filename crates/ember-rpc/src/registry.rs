//! # Opcode Synchronization Registry
//!
//! Maps every opcode onto its wait class and owns the one latch each
//! class is built on. The receive path signals by opcode; callers wait
//! by opcode; the class mapping keeps configuration traffic from ever
//! waking a transfer waiter and vice versa.

use alloc::boxed::Box;
use alloc::sync::Arc;

use ember_core::{Clock, Error, Opcode, Result, WaitClass};

use crate::signal::{PollingSignal, WaitSignal};

#[cfg(any(test, feature = "std"))]
use crate::signal::CondvarSignal;

// =============================================================================
// SIGNAL REGISTRY
// =============================================================================

/// One latch per wait class, indexed by [`WaitClass`]
///
/// Invariant: at most one outstanding wait per class. A raise for a
/// class with no waiter is latched and consumed by that class's next
/// wait; callers issuing a fresh request clear the class first.
pub struct SignalRegistry {
    classes: [Box<dyn WaitSignal>; WaitClass::COUNT],
}

impl SignalRegistry {
    /// Registry of flag-polling latches bounded by wall time
    pub fn polling(clock: Arc<dyn Clock>) -> Self {
        Self {
            classes: [
                Box::new(PollingSignal::new(Arc::clone(&clock))),
                Box::new(PollingSignal::new(Arc::clone(&clock))),
                Box::new(PollingSignal::new(clock)),
            ],
        }
    }

    /// Registry of flag-polling latches bounded by iteration budgets
    pub fn polling_clockless() -> Self {
        Self {
            classes: [
                Box::new(PollingSignal::clockless()),
                Box::new(PollingSignal::clockless()),
                Box::new(PollingSignal::clockless()),
            ],
        }
    }

    /// Registry of thread-blocking latches
    #[cfg(any(test, feature = "std"))]
    pub fn threaded() -> Self {
        Self {
            classes: [
                Box::new(CondvarSignal::new()),
                Box::new(CondvarSignal::new()),
                Box::new(CondvarSignal::new()),
            ],
        }
    }

    /// Latch the class of `opcode`
    ///
    /// Called from the receive path. Opcodes with no wait class
    /// (fault notifications) are ignored.
    pub fn signal(&self, opcode: Opcode) {
        if let Some(class) = opcode.wait_class() {
            self.classes[class.index()].raise();
        }
    }

    /// Drop a stale latch on the class of `opcode`
    pub fn clear(&self, opcode: Opcode) {
        if let Some(class) = opcode.wait_class() {
            self.classes[class.index()].clear();
        }
    }

    /// Wait for the class of `opcode`, consuming the latch
    pub fn wait(&self, opcode: Opcode, timeout_ms: u32) -> Result<()> {
        let class = opcode.wait_class().ok_or(Error::InvalidParameter)?;
        self.classes[class.index()].wait(timeout_ms)
    }
}

// =============================================================================
// TESTS
// =============================================================================
