//! # EMBER RPC
//!
//! Blocking request/response transport over the inter-core channel.
//!
//! Every driver operation is one or more *round trips*: encode a tagged
//! message, push it through the send pipeline (which absorbs transient
//! channel backpressure), then park on the opcode's wait class until the
//! receive path signals the matching response or the deadline passes.
//!
//! ## Message Flow
//!
//! ```text
//! caller                         channel ctx
//!   │ clear stale latch               │
//!   │ send (retry on full) ──────────►│
//!   │ wait on class ◄─── signal ──────│ response opcode
//!   ▼                                 ▼
//! ```
//!
//! Wait classes group opcodes onto one latch each; at most one request
//! per class may be outstanding. A response signal with no waiter is
//! latched and consumed by the next wait on that class.

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod pipeline;
pub mod registry;
pub mod roundtrip;
pub mod signal;

// Re-exports
pub use pipeline::{send_with_retry, SEND_RETRY_TIMEOUT_MS};
pub use registry::SignalRegistry;
pub use roundtrip::{RoundTrip, RESPONSE_TIMEOUT_MS};
pub use signal::{PollingSignal, WaitSignal};

#[cfg(any(test, feature = "std"))]
pub use signal::CondvarSignal;
