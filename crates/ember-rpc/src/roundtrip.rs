//! # Round-Trip Coordinator
//!
//! The single point where "send" and "await response" compose. Every
//! configuration and transfer operation funnels through [`RoundTrip`]:
//! clear any stale latch for the opcode's class, push the message
//! through the send pipeline, then park on the class until the receive
//! path signals the response or the deadline passes.

use alloc::sync::Arc;

use ember_core::{Clock, Error, Opcode, Result};
use ember_ipc::Endpoint;

use crate::pipeline::send_with_retry;
use crate::registry::SignalRegistry;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default response deadline, milliseconds
pub const RESPONSE_TIMEOUT_MS: u32 = 100;

// =============================================================================
// ROUND TRIP
// =============================================================================

/// Blocking request/response coordinator
///
/// Owns nothing exclusively: the endpoint and registry are shared with
/// the receive path, the clock with every timing loop in the stack.
pub struct RoundTrip {
    endpoint: Arc<dyn Endpoint>,
    registry: Arc<SignalRegistry>,
    clock: Option<Arc<dyn Clock>>,
}

impl RoundTrip {
    /// Compose a coordinator over shared transport state
    pub fn new(
        endpoint: Arc<dyn Endpoint>,
        registry: Arc<SignalRegistry>,
        clock: Option<Arc<dyn Clock>>,
    ) -> Self {
        Self {
            endpoint,
            registry,
            clock,
        }
    }

    /// The shared signal registry
    pub fn registry(&self) -> &Arc<SignalRegistry> {
        &self.registry
    }

    /// The shared clock, when the platform has one
    pub fn clock(&self) -> Option<&Arc<dyn Clock>> {
        self.clock.as_ref()
    }

    /// Issue one request and block until its response or the deadline
    ///
    /// A latch left over from an earlier timed-out request of the same
    /// class is cleared first so it cannot satisfy this wait.
    pub fn request(&self, opcode: Opcode, msg: &[u8], response_timeout_ms: u32) -> Result<()> {
        self.registry.clear(opcode);

        send_with_retry(&*self.endpoint, msg, self.clock.as_deref())
            .inspect_err(|e| log::error!("request send failed: {}", e))?;

        self.registry
            .wait(opcode, response_timeout_ms)
            .inspect_err(|_| {
                log::error!(
                    "response timeout, opcode: {}, deadline: {} ms",
                    opcode as u8,
                    response_timeout_ms
                );
            })
    }

    /// [`Self::request`] with the default response deadline
    pub fn request_default(&self, opcode: Opcode, msg: &[u8]) -> Result<()> {
        self.request(opcode, msg, RESPONSE_TIMEOUT_MS)
    }
}

// =============================================================================
// TESTS
// =============================================================================
