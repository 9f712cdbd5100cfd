//! # EMBER Core Types
//!
//! Fundamental type definitions used across the driver stack.
//!
//! These types provide:
//! - Strong typing for cross-core shared-memory addresses
//! - Bus mode and signal-polarity enumerations
//! - Transfer direction

use core::fmt;

// =============================================================================
// SHARED ADDRESS
// =============================================================================

/// Address in the memory region shared with the secondary core
///
/// This is NOT a local CPU pointer and must never be dereferenced
/// directly; it is carried in messages so the coprocessor can reach
/// timer registers, payload buffers, and the fault-context region.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct SharedAddr(u64);

impl SharedAddr {
    /// Create a new shared address
    #[inline]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Create a null shared address
    #[inline]
    pub const fn null() -> Self {
        Self(0)
    }

    /// Create from a local pointer
    ///
    /// The pointee must live in the region visible to the secondary core;
    /// this constructor only records the address.
    #[inline]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize as u64)
    }

    /// Get the raw u64 value
    #[inline]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Check if null
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Check alignment
    #[inline]
    pub const fn is_aligned(self, alignment: u64) -> bool {
        self.0 & (alignment - 1) == 0
    }
}

impl fmt::Debug for SharedAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedAddr(0x{:08x})", self.0)
    }
}

impl fmt::Display for SharedAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

// =============================================================================
// OPERATING MODE
// =============================================================================

/// Bus controller role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpMode {
    /// Drives the bus (the only role the offload supports)
    Controller = 0,
    /// Responds on the bus
    Peripheral = 1,
}

// =============================================================================
// IO MODE
// =============================================================================

/// Multi-wire IO mode of a bus device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IoMode {
    /// Single line for command, address, and data
    Single = 0,
    /// Two data lines
    Dual = 1,
    /// Dual data, single command and address
    Dual112 = 2,
    /// Dual data and address, single command
    Dual122 = 3,
    /// Four lines for command, address, and data
    Quad = 4,
    /// Quad data, single command and address
    Quad114 = 5,
    /// Quad data and address, single command
    Quad144 = 6,
    /// Eight data lines
    Octal = 7,
}

// =============================================================================
// DATA RATE
// =============================================================================

/// Sampling edges per clock cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DataRate {
    /// One edge per cycle
    Single = 0,
    /// Both edges per cycle
    Dual = 1,
}

// =============================================================================
// SIGNAL POLARITY
// =============================================================================

/// Clock phase and polarity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClockMode {
    /// CPOL=0, CPHA=0
    Mode0 = 0,
    /// CPOL=0, CPHA=1
    Mode1 = 1,
    /// CPOL=1, CPHA=0
    Mode2 = 2,
    /// CPOL=1, CPHA=1
    Mode3 = 3,
}

/// Chip-enable polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CePolarity {
    /// Active low chip enable
    ActiveLow = 0,
    /// Active high chip enable
    ActiveHigh = 1,
}

// =============================================================================
// TRANSFER DIRECTION
// =============================================================================

/// Direction of a single transfer packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Data flows to the device
    Send,
    /// Data flows from the device
    Receive,
}

// =============================================================================
// POWER ACTION
// =============================================================================

/// Power-management transition request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    /// Enter low-power state
    Suspend,
    /// Leave low-power state
    Resume,
    /// Power the device off
    TurnOff,
    /// Power the device on
    TurnOn,
}

// =============================================================================
// TESTS
// =============================================================================
