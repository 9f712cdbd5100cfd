//! # Receive Staging
//!
//! Response data for a send-receive packet arrives in the channel's
//! context, before the caller is back from its wait. The hook stages it
//! here; the orchestrator consumes it exactly once while copying out to
//! the caller's buffer.
//!
//! Staging holds at most one response. A new staging assignment replaces
//! whatever was left unconsumed, which is why the orchestrator must
//! drain it before the next transfer.

use alloc::vec::Vec;

use spin::Mutex;

// =============================================================================
// RECEIVE STAGING
// =============================================================================

/// Consume-once slot for one staged response payload
pub struct ReceiveStaging {
    slot: Mutex<Option<Vec<u8>>>,
}

impl ReceiveStaging {
    /// Create an empty staging slot
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Stage a response payload, replacing any unconsumed one
    pub fn stage(&self, data: &[u8]) {
        *self.slot.lock() = Some(data.to_vec());
    }

    /// Consume the staged payload, leaving the slot empty
    pub fn take(&self) -> Option<Vec<u8>> {
        self.slot.lock().take()
    }

    /// Drop anything staged
    pub fn clear(&self) {
        *self.slot.lock() = None;
    }

    /// Check whether a payload is staged
    pub fn is_staged(&self) -> bool {
        self.slot.lock().is_some()
    }
}

// =============================================================================
// TESTS
// =============================================================================
