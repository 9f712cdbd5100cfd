//! # Message Wire Codec
//!
//! Little-endian encodings for every message the driver sends. The
//! first byte of every message is the opcode; the rest is fixed per
//! opcode. The secondary core answers with a bare response opcode,
//! except for send-receive packets whose responses carry data.

use alloc::vec::Vec;

use static_assertions::const_assert;

use ember_core::{
    DeviceConfig, Opcode, PinAssignment, SharedAddr, TransferDescriptor, MAX_PINS,
};

// =============================================================================
// LAYOUT CONSTANTS
// =============================================================================

/// Fixed bytes of a packet message before the payload: opcode, command,
/// address, byte count, payload kind
pub const PACKET_HEADER_LEN: usize = 1 + 4 + 4 + 4 + 1;

/// Payload kind: bytes embedded after the header
pub const PAYLOAD_INLINE: u8 = 0;

/// Payload kind: an 8-byte buffer address after the header
pub const PAYLOAD_BY_REF: u8 = 1;

/// Largest pin-configuration message
pub const PIN_CONFIG_MAX_LEN: usize = 2 + 4 * MAX_PINS;

/// Device-configuration message length
pub const DEVICE_CONFIG_LEN: usize = 7 + 4;

/// Transfer-configuration message length
pub const TRANSFER_CONFIG_LEN: usize = 5 + 2 + 2;

/// Timer-pointer message length
pub const TIMER_POINTER_LEN: usize = 1 + 8;

// Every fixed message must fit the smallest channel the driver supports
const_assert!(PIN_CONFIG_MAX_LEN <= 64);
const_assert!(DEVICE_CONFIG_LEN <= 64);
const_assert!(TRANSFER_CONFIG_LEN <= 64);
const_assert!(TIMER_POINTER_LEN <= 64);

// =============================================================================
// PACKET PAYLOAD
// =============================================================================

/// How a packet's payload travels
#[derive(Debug)]
pub enum PacketPayload<'a> {
    /// Bytes embedded in the message
    Inline(&'a [u8]),
    /// Address of the caller's buffer, shared with the secondary core
    ByRef(SharedAddr),
}

// =============================================================================
// ENCODERS
// =============================================================================

/// Pin-configuration message: `[opcode, count, pin...]`
pub fn pin_config(pins: &[PinAssignment]) -> Vec<u8> {
    let mut msg = Vec::with_capacity(2 + 4 * pins.len());
    msg.push(Opcode::ConfigPins as u8);
    msg.push(pins.len() as u8);
    for pin in pins {
        msg.extend_from_slice(&pin.0.to_le_bytes());
    }
    msg
}

/// Device-configuration message
pub fn device_config(device_index: u8, cfg: &DeviceConfig) -> Vec<u8> {
    let mut msg = Vec::with_capacity(DEVICE_CONFIG_LEN);
    msg.push(Opcode::ConfigDevice as u8);
    msg.push(device_index);
    msg.push(cfg.io_mode as u8);
    msg.push(cfg.data_rate as u8);
    msg.push(cfg.clock_mode as u8);
    msg.push(cfg.ce_polarity as u8);
    msg.push(cfg.ce_index);
    msg.extend_from_slice(&cfg.freq.to_le_bytes());
    msg
}

/// Transfer-configuration message: the descriptor without its packets
pub fn transfer_config(desc: &TransferDescriptor<'_, '_>) -> Vec<u8> {
    let mut msg = Vec::with_capacity(TRANSFER_CONFIG_LEN);
    msg.push(Opcode::ConfigTransfer as u8);
    msg.push(desc.device_index);
    msg.push(desc.command_length);
    msg.push(desc.address_length);
    msg.push(desc.hold_ce as u8);
    msg.extend_from_slice(&desc.tx_dummy.to_le_bytes());
    msg.extend_from_slice(&desc.rx_dummy.to_le_bytes());
    msg
}

/// Packet message with the payload inline or by reference
pub fn packet(
    opcode: Opcode,
    command: u32,
    address: u32,
    num_bytes: u32,
    payload: PacketPayload<'_>,
) -> Vec<u8> {
    let body = match &payload {
        PacketPayload::Inline(data) => data.len(),
        PacketPayload::ByRef(_) => 8,
    };

    let mut msg = Vec::with_capacity(PACKET_HEADER_LEN + body);
    msg.push(opcode as u8);
    msg.extend_from_slice(&command.to_le_bytes());
    msg.extend_from_slice(&address.to_le_bytes());
    msg.extend_from_slice(&num_bytes.to_le_bytes());
    match payload {
        PacketPayload::Inline(data) => {
            msg.push(PAYLOAD_INLINE);
            msg.extend_from_slice(data);
        }
        PacketPayload::ByRef(addr) => {
            msg.push(PAYLOAD_BY_REF);
            msg.extend_from_slice(&addr.raw().to_le_bytes());
        }
    }
    msg
}

/// Timer-pointer message carrying the register-block address
pub fn timer_pointer(addr: SharedAddr) -> Vec<u8> {
    let mut msg = Vec::with_capacity(TIMER_POINTER_LEN);
    msg.push(Opcode::ConfigTimerPointer as u8);
    msg.extend_from_slice(&addr.raw().to_le_bytes());
    msg
}

// =============================================================================
// TESTS
// =============================================================================
