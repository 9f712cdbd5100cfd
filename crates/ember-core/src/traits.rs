//! # Collaborator Traits
//!
//! Seams between the transport core and the platform glue it does not
//! own: pin multiplexing, time, and the watchdog timer. Each trait
//! exposes exactly what the core needs and nothing else.

use alloc::boxed::Box;

use crate::config::PinAssignment;
use crate::error::Result;
use crate::types::SharedAddr;

// =============================================================================
// CLOCK
// =============================================================================

/// Monotonic time source with a sleep primitive
///
/// Platforms without a system clock run the driver without one; retry
/// and poll loops then fall back to bounded iteration budgets.
pub trait Clock: Send + Sync {
    /// Milliseconds since an arbitrary epoch
    fn uptime_ms(&self) -> u64;

    /// Yield the CPU for at least `us` microseconds
    fn sleep_us(&self, us: u32);
}

/// Host clock backed by `std::time`
#[cfg(any(test, feature = "std"))]
#[derive(Debug)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(any(test, feature = "std"))]
impl StdClock {
    /// Create a clock starting at zero
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl Clock for StdClock {
    fn uptime_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }

    fn sleep_us(&self, us: u32) {
        std::thread::sleep(core::time::Duration::from_micros(us as u64));
    }
}

// =============================================================================
// PIN PORT
// =============================================================================

/// Pin-multiplexer glue owned by the platform
pub trait PinPort {
    /// Apply the default pin state to the hardware
    fn apply_default(&mut self) -> Result<()>;

    /// Pins of the default state, or `None` when the platform defines no
    /// default state
    fn default_state(&self) -> Option<&[PinAssignment]>;
}

// =============================================================================
// FAULT TIMER
// =============================================================================

/// Expiry handler invoked from the timer's own context
pub type TimerHandler = Box<dyn Fn() + Send + Sync>;

/// Hardware timer used as a liveness guard on the secondary core
///
/// The coprocessor reloads the timer while healthy; expiry means it
/// stopped responding.
pub trait FaultTimer {
    /// Program the expiry timeout and handler without starting the timer
    fn arm(&mut self, timeout_us: u32, handler: TimerHandler) -> Result<()>;

    /// Start counting
    fn start(&mut self) -> Result<()>;

    /// Address of the timer register block, as seen by the secondary core
    fn register_block(&self) -> SharedAddr;
}
