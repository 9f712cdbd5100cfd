//! # EMBER Core
//!
//! Shared data model for the EMBER MSPI offload driver stack.
//!
//! The application core cannot drive the multi-wire serial bus itself.
//! Every bus operation becomes an opcode-tagged message to a low-power
//! secondary core, and this crate defines everything both sides of that
//! conversation agree on: opcodes and their wait classes, configuration
//! types, the transfer descriptor, the fault-context layout, and the
//! unified error type.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ember-core                             │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │   Opcodes   │  │   Config    │  │      Error          │  │
//! │  │ (WaitClass  │  │ (Controller,│  │    Handling         │  │
//! │  │   mapping)  │  │  Transfer)  │  │                     │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::new_without_default)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

// =============================================================================
// MODULE EXPORTS
// =============================================================================

pub mod config;
pub mod error;
pub mod fault;
pub mod opcode;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use config::*;
pub use error::{Error, Result};
pub use fault::FaultContext;
pub use opcode::{Opcode, WaitClass};
pub use traits::*;
pub use types::*;
