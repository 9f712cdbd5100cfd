//! # EMBER IPC
//!
//! The message-channel boundary between the application core and the
//! secondary core that drives the bus.
//!
//! The channel itself is platform property: a capacity-limited,
//! opcode-tagged byte conduit with a bound notification and an
//! asynchronous receive callback. This crate defines the [`Endpoint`]
//! trait the rest of the stack programs against, plus a bounded
//! in-process [`LoopbackChannel`] that serves as the reference endpoint
//! and as the scriptable peer in tests.
//!
//! ## Message Flow
//!
//! 1. Driver encodes a request and hands it to [`Endpoint::try_send`]
//! 2. Channel reports backpressure as [`Error::ChannelFull`]
//! 3. Coprocessor responses arrive through the registered receive hook,
//!    from the channel's own context
//!
//! [`Error::ChannelFull`]: ember_core::Error::ChannelFull

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod channel;
pub mod endpoint;

// Re-exports
pub use channel::{ChannelStats, LoopbackChannel, Service};
pub use endpoint::{BoundHook, Endpoint, EndpointHooks, ReceiveHook};
