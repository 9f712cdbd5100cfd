//! Shared scaffolding for driver tests: a scripted peer, pin-port and
//! fault-timer doubles, and a one-call driver bring-up over the
//! loopback channel.

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use ember_core::{
    Clock, ControllerConfig, FaultTimer, Options, PinAssignment, PinPort, Result, SharedAddr,
    StdClock, TimerHandler,
};
use ember_ipc::{Endpoint, LoopbackChannel, Service};
use ember_rpc::SignalRegistry;

use crate::driver::MspiOffload;

// =============================================================================
// PEER
// =============================================================================

/// Peer that acknowledges every request with a bare response opcode
pub(crate) fn echo_service() -> Service {
    Box::new(|msg| msg.first().map(|op| vec![*op]))
}

// =============================================================================
// PIN PORT DOUBLE
// =============================================================================

pub(crate) struct TestPins {
    pub pins: Vec<PinAssignment>,
    pub applied: bool,
    has_default: bool,
}

impl TestPins {
    /// Four default-state pins, the usual single-line wiring
    pub fn default_four() -> Self {
        Self {
            pins: vec![
                PinAssignment(0x10),
                PinAssignment(0x11),
                PinAssignment(0x12),
                PinAssignment(0x13),
            ],
            applied: false,
            has_default: true,
        }
    }

    /// A platform with no default pin state
    pub fn empty() -> Self {
        Self {
            pins: Vec::new(),
            applied: false,
            has_default: false,
        }
    }
}

impl PinPort for TestPins {
    fn apply_default(&mut self) -> Result<()> {
        self.applied = true;
        Ok(())
    }

    fn default_state(&self) -> Option<&[PinAssignment]> {
        if self.has_default {
            Some(&self.pins)
        } else {
            None
        }
    }
}

// =============================================================================
// FAULT TIMER DOUBLE
// =============================================================================

pub(crate) struct TestTimer {
    pub armed_us: Option<u32>,
    pub handler: Option<TimerHandler>,
    pub started: bool,
    block: SharedAddr,
}

impl TestTimer {
    pub fn new(block: SharedAddr) -> Self {
        Self {
            armed_us: None,
            handler: None,
            started: false,
            block,
        }
    }
}

impl FaultTimer for TestTimer {
    fn arm(&mut self, timeout_us: u32, handler: TimerHandler) -> Result<()> {
        self.armed_us = Some(timeout_us);
        self.handler = Some(handler);
        Ok(())
    }

    fn start(&mut self) -> Result<()> {
        self.started = true;
        Ok(())
    }

    fn register_block(&self) -> SharedAddr {
        self.block
    }
}

// =============================================================================
// BRING-UP
// =============================================================================

/// Open a driver over `ch` with a 32 MHz ceiling and four default pins
pub(crate) fn open_driver(ch: &Arc<LoopbackChannel>, options: Options) -> Result<MspiOffload> {
    let clock: Arc<dyn Clock> = Arc::new(StdClock::new());
    let mut pins = TestPins::default_four();

    MspiOffload::open(
        Arc::clone(ch) as Arc<dyn Endpoint>,
        ControllerConfig::new(32_000_000),
        options,
        SignalRegistry::polling(Arc::clone(&clock)),
        Some(clock),
        &mut pins,
        None,
    )
}
