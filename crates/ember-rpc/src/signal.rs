//! # Wait Signals
//!
//! One-slot latches a caller parks on until the receive path raises
//! them. Two implementations behind one trait, selected at construction
//! by platform capability:
//!
//! - [`CondvarSignal`]: blocks the calling thread (threaded platforms)
//! - [`PollingSignal`]: busy-polls an atomic flag with a minimal sleep
//!   quantum (cooperative / threadless platforms)
//!
//! Both latch: a raise with no waiter is stored and consumed by the next
//! wait. At most one pending raise is remembered per signal.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicBool, Ordering};

use ember_core::{Clock, Error, Result};

// =============================================================================
// WAIT SIGNAL
// =============================================================================

/// A latching, consume-on-wait synchronization primitive
pub trait WaitSignal: Send + Sync {
    /// Latch the signal; wakes at most one waiter
    fn raise(&self);

    /// Drop any pending latch
    fn clear(&self);

    /// Block or poll until raised, then consume the latch
    ///
    /// Fails with [`Error::Timeout`] when `timeout_ms` elapses first.
    fn wait(&self, timeout_ms: u32) -> Result<()>;
}

// =============================================================================
// POLLING SIGNAL
// =============================================================================

/// Poll budget per millisecond when no clock is available
const POLLS_PER_MS: u32 = 1000;

/// Sleep quantum between polls, microseconds
const POLL_QUANTUM_US: u32 = 1;

/// Flag-polling signal for platforms without blocking waits
///
/// The wait loop checks an atomic flag and sleeps one quantum between
/// checks. With a clock the loop is bounded by wall time; without one it
/// decrements an iteration budget derived from the timeout.
pub struct PollingSignal {
    flag: AtomicBool,
    clock: Option<Arc<dyn Clock>>,
}

impl PollingSignal {
    /// Create a signal bounded by wall-clock time
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            flag: AtomicBool::new(false),
            clock: Some(clock),
        }
    }

    /// Create a signal bounded by iteration count only
    pub fn clockless() -> Self {
        Self {
            flag: AtomicBool::new(false),
            clock: None,
        }
    }
}

impl WaitSignal for PollingSignal {
    fn raise(&self) {
        self.flag.store(true, Ordering::Release);
    }

    fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }

    fn wait(&self, timeout_ms: u32) -> Result<()> {
        match &self.clock {
            Some(clock) => {
                let start = clock.uptime_ms();
                while !self.flag.swap(false, Ordering::AcqRel) {
                    if clock.uptime_ms().saturating_sub(start) > timeout_ms as u64 {
                        return Err(Error::Timeout);
                    }
                    clock.sleep_us(POLL_QUANTUM_US);
                }
                Ok(())
            }
            None => {
                let mut budget = timeout_ms.saturating_mul(POLLS_PER_MS);
                while !self.flag.swap(false, Ordering::AcqRel) {
                    if budget == 0 {
                        return Err(Error::Timeout);
                    }
                    budget -= 1;
                    core::hint::spin_loop();
                }
                Ok(())
            }
        }
    }
}

// =============================================================================
// CONDVAR SIGNAL
// =============================================================================

/// Blocking signal for threaded platforms
///
/// The receive callback raises from the channel's context; the waiting
/// thread parks on a condition variable with a millisecond deadline.
#[cfg(any(test, feature = "std"))]
pub struct CondvarSignal {
    state: std::sync::Mutex<bool>,
    cond: std::sync::Condvar,
}

#[cfg(any(test, feature = "std"))]
impl CondvarSignal {
    /// Create an unraised signal
    pub fn new() -> Self {
        Self {
            state: std::sync::Mutex::new(false),
            cond: std::sync::Condvar::new(),
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl WaitSignal for CondvarSignal {
    fn raise(&self) {
        let mut raised = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *raised = true;
        self.cond.notify_one();
    }

    fn clear(&self) {
        let mut raised = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *raised = false;
    }

    fn wait(&self, timeout_ms: u32) -> Result<()> {
        let deadline = core::time::Duration::from_millis(timeout_ms as u64);
        let guard = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let (mut raised, outcome) = self
            .cond
            .wait_timeout_while(guard, deadline, |raised| !*raised)
            .unwrap_or_else(|e| e.into_inner());

        if outcome.timed_out() && !*raised {
            return Err(Error::Timeout);
        }
        *raised = false;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
