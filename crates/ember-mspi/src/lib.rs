//! # EMBER MSPI
//!
//! MSPI controller driver that offloads bus work to the low-power
//! secondary core.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Offloaded MSPI Controller                 │
//! │                                                              │
//! │  ┌────────────────┐    Tagged Messages  ┌─────────────────┐  │
//! │  │  MspiOffload   │ ←───────────────→   │  Secondary Core │  │
//! │  │  (this crate)  │                     │    Firmware     │  │
//! │  └────────────────┘                     └─────────────────┘  │
//! │          │                                       │           │
//! │  ┌───────┴───────────────────────────────┬──────┴────────┐  │
//! │  │        Bounded Message Channel        │   MSPI Bus    │  │
//! │  └───────────────────────────────────────┴───────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation Flow
//!
//! 1. `open` registers the channel hooks, awaits the bound event,
//!    applies pins, and pushes the bus configuration across
//! 2. `configure_device` validates a device config against what the
//!    offload supports, then ships it
//! 3. `transceive` turns a descriptor into one transfer-config round
//!    trip followed by one round trip per packet, with received data
//!    staged by the channel hook and copied out here
//! 4. A watchdog timer plus a dedicated fault opcode report a crashed
//!    secondary core; nothing is reset on this side

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod dispatch;
mod ops;
mod xfer;

pub mod driver;
pub mod fault;
pub mod message;
pub mod staging;

#[cfg(test)]
mod testutil;

// Re-exports
pub use driver::MspiOffload;
pub use message::{PacketPayload, PACKET_HEADER_LEN};
pub use staging::ReceiveStaging;
