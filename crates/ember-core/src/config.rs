//! # Configuration and Transfer Types
//!
//! Controller, device, and transaction descriptors consumed by the
//! driver layer. All of these are plain data: validation happens in the
//! driver before anything is encoded onto the channel.

use arrayvec::ArrayVec;
use bitflags::bitflags;

use crate::types::{CePolarity, ClockMode, DataRate, Direction, IoMode, OpMode, SharedAddr};

// =============================================================================
// PIN ASSIGNMENT
// =============================================================================

/// Maximum pins carried in a pin-configuration message
pub const MAX_PINS: usize = 11;

/// One raw pin-select word, as consumed by the secondary core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct PinAssignment(pub u32);

/// Bounded pin list for one controller state
pub type PinSet = ArrayVec<PinAssignment, MAX_PINS>;

// =============================================================================
// CONTROLLER CONFIGURATION
// =============================================================================

/// Controller-wide bus configuration
///
/// Held by the driver as the hardware ceiling and also passed in by
/// callers as the requested configuration; `configure` validates the
/// request against the ceiling.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Bus role
    pub op_mode: OpMode,
    /// Data-strobe assist signal requested
    pub dqs_support: bool,
    /// Maximum bus frequency in Hz
    pub max_freq: u32,
    /// Number of peripherals on the bus
    pub num_periph: u8,
}

impl ControllerConfig {
    /// Controller-mode configuration with the given frequency ceiling
    pub const fn new(max_freq: u32) -> Self {
        Self {
            op_mode: OpMode::Controller,
            dqs_support: false,
            max_freq,
            num_periph: 1,
        }
    }
}

// =============================================================================
// DEVICE CONFIGURATION
// =============================================================================

bitflags! {
    /// Fields of [`DeviceConfig`] a caller wants applied
    ///
    /// Only masked-in fields are validated and forwarded.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeviceConfigMask: u32 {
        /// Chip-enable line selection
        const CE_INDEX = 1 << 0;
        /// Frequency field
        const FREQUENCY = 1 << 1;
        /// IO mode field
        const IO_MODE = 1 << 2;
        /// Data rate field
        const DATA_RATE = 1 << 3;
        /// Clock phase/polarity field
        const CLOCK_MODE = 1 << 4;
        /// Chip-enable polarity field
        const CE_POLARITY = 1 << 5;
        /// Data-strobe enable field
        const DQS = 1 << 6;
        /// Memory boundary field
        const MEM_BOUND = 1 << 7;
        /// Transfer break-time field
        const BREAK_TIME = 1 << 8;
        /// Every field
        const ALL = Self::CE_INDEX.bits()
            | Self::FREQUENCY.bits()
            | Self::IO_MODE.bits()
            | Self::DATA_RATE.bits()
            | Self::CLOCK_MODE.bits()
            | Self::CE_POLARITY.bits()
            | Self::DQS.bits()
            | Self::MEM_BOUND.bits()
            | Self::BREAK_TIME.bits();
    }
}

/// Per-device bus configuration
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Chip-enable line index
    pub ce_index: u8,
    /// Bus frequency in Hz
    pub freq: u32,
    /// Multi-wire IO mode
    pub io_mode: IoMode,
    /// Sampling rate
    pub data_rate: DataRate,
    /// Clock phase and polarity
    pub clock_mode: ClockMode,
    /// Chip-enable polarity
    pub ce_polarity: CePolarity,
    /// Data-strobe signal enabled
    pub dqs_enable: bool,
    /// Memory boundary in bytes (unsupported, must be zero)
    pub mem_boundary: u32,
    /// Time to break a transfer in microseconds (unsupported, must be zero)
    pub time_to_break: u32,
}

impl DeviceConfig {
    /// Single-line, mode-0 configuration at the given frequency
    pub const fn new(freq: u32) -> Self {
        Self {
            ce_index: 0,
            freq,
            io_mode: IoMode::Single,
            data_rate: DataRate::Single,
            clock_mode: ClockMode::Mode0,
            ce_polarity: CePolarity::ActiveLow,
            dqs_enable: false,
            mem_boundary: 0,
            time_to_break: 0,
        }
    }
}

// =============================================================================
// TRANSFER PACKET
// =============================================================================

/// Caller-owned buffer of one transfer packet
///
/// The variant decides the packet direction: `Tx` data is shipped to the
/// device, `Rx` is filled from the staged response.
#[derive(Debug)]
pub enum PacketBuffer<'a> {
    /// Outgoing payload
    Tx(&'a [u8]),
    /// Incoming payload destination
    Rx(&'a mut [u8]),
}

/// One packet of a multi-packet transaction
#[derive(Debug)]
pub struct TransferPacket<'a> {
    /// Command value
    pub command: u32,
    /// Device address
    pub address: u32,
    /// Caller-owned data buffer
    pub buffer: PacketBuffer<'a>,
}

impl<'a> TransferPacket<'a> {
    /// Transfer direction implied by the buffer variant
    pub fn direction(&self) -> Direction {
        match self.buffer {
            PacketBuffer::Tx(_) => Direction::Send,
            PacketBuffer::Rx(_) => Direction::Receive,
        }
    }

    /// Packet payload length in bytes
    pub fn num_bytes(&self) -> usize {
        match &self.buffer {
            PacketBuffer::Tx(buf) => buf.len(),
            PacketBuffer::Rx(buf) => buf.len(),
        }
    }
}

// =============================================================================
// TRANSFER DESCRIPTOR
// =============================================================================

/// One complete transaction: shared framing plus an ordered packet list
///
/// Constructed per call and consumed by `transceive`; never persisted.
#[derive(Debug)]
pub struct TransferDescriptor<'a, 'b> {
    /// Device index on the bus
    pub device_index: u8,
    /// Command field width in bits
    pub command_length: u8,
    /// Address field width in bits
    pub address_length: u8,
    /// Keep chip enable asserted between packets
    pub hold_ce: bool,
    /// Dummy cycles before the data phase, send direction
    pub tx_dummy: u16,
    /// Dummy cycles before the data phase, receive direction
    pub rx_dummy: u16,
    /// Overall transaction timeout in milliseconds
    pub timeout_ms: u32,
    /// Non-blocking completion requested (not supported by the offload)
    pub asynchronous: bool,
    /// Ordered packet sequence
    pub packets: &'a mut [TransferPacket<'b>],
}

// =============================================================================
// DRIVER OPTIONS
// =============================================================================

/// Tunable behavior of the offload driver
#[derive(Debug, Clone)]
pub struct Options {
    /// Send packet payloads by reference when the buffer is word-aligned
    pub zero_copy: bool,
    /// Liveness watchdog timeout in microseconds; `None` disables the
    /// fault timer and the timer-pointer handshake
    pub fault_timer_us: Option<u32>,
    /// Maximum single-message payload size in bytes; a packet of exactly
    /// this size or more is rejected
    pub max_msg_size: usize,
    /// Upper bound on a descriptor's `timeout_ms`
    pub completion_timeout_tolerance_ms: u32,
    /// How long to wait for the endpoint bound event at open
    pub bound_timeout_ms: u32,
    /// Location of the shared fault-context region, when the platform
    /// reserves one
    pub fault_region: Option<SharedAddr>,
}

impl Options {
    /// Defaults matching a 512-byte shared data region, copies embedded
    pub const fn new() -> Self {
        Self {
            zero_copy: false,
            fault_timer_us: None,
            max_msg_size: 512,
            completion_timeout_tolerance_ms: 500,
            bound_timeout_ms: 100,
            fault_region: None,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_direction_follows_buffer() {
        let tx = [0u8; 4];
        let mut rx = [0u8; 4];

        let p = TransferPacket {
            command: 0x9F,
            address: 0,
            buffer: PacketBuffer::Tx(&tx),
        };
        assert_eq!(p.direction(), Direction::Send);
        assert_eq!(p.num_bytes(), 4);

        let p = TransferPacket {
            command: 0x03,
            address: 0x100,
            buffer: PacketBuffer::Rx(&mut rx),
        };
        assert_eq!(p.direction(), Direction::Receive);
        assert_eq!(p.num_bytes(), 4);
    }

    #[test]
    fn test_device_mask_all_covers_each_field() {
        let fields = [
            DeviceConfigMask::CE_INDEX,
            DeviceConfigMask::FREQUENCY,
            DeviceConfigMask::IO_MODE,
            DeviceConfigMask::DATA_RATE,
            DeviceConfigMask::CLOCK_MODE,
            DeviceConfigMask::CE_POLARITY,
            DeviceConfigMask::DQS,
            DeviceConfigMask::MEM_BOUND,
            DeviceConfigMask::BREAK_TIME,
        ];
        for f in fields {
            assert!(DeviceConfigMask::ALL.contains(f));
        }
    }

    #[test]
    fn test_pin_set_is_bounded() {
        let mut pins = PinSet::new();
        for i in 0..MAX_PINS {
            pins.push(PinAssignment(i as u32));
        }
        assert!(pins.try_push(PinAssignment(99)).is_err());
    }
}
