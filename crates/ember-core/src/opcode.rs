//! # Opcodes and Wait Classes
//!
//! Every message between the cores starts with an opcode byte. Responses
//! carry the same opcode as the request they answer, so a caller awaiting
//! a response waits on the opcode's *wait class*: a many-to-one grouping
//! of opcodes onto synchronization primitives.

use static_assertions::const_assert_eq;

// =============================================================================
// OPCODE
// =============================================================================

/// Message tag carried as the first byte of every inter-core message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Endpoint bound notification from the channel
    BoundEvent = 0,
    /// Pin assignment configuration
    ConfigPins = 1,
    /// Per-device bus configuration
    ConfigDevice = 2,
    /// Transaction-wide transfer configuration
    ConfigTransfer = 3,
    /// Address of the liveness-guard timer register block
    ConfigTimerPointer = 4,
    /// Transmit-only packet
    Send = 5,
    /// Transmit packet expecting response data
    SendReceive = 6,
    /// Secondary core crashed; fault context is in the shared region
    CoprocessorFault = 7,
}

// The opcode travels as the first wire byte
const_assert_eq!(core::mem::size_of::<Opcode>(), 1);

impl Opcode {
    /// Decode from a wire byte
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::BoundEvent),
            1 => Some(Self::ConfigPins),
            2 => Some(Self::ConfigDevice),
            3 => Some(Self::ConfigTransfer),
            4 => Some(Self::ConfigTimerPointer),
            5 => Some(Self::Send),
            6 => Some(Self::SendReceive),
            7 => Some(Self::CoprocessorFault),
            _ => None,
        }
    }

    /// Wait class this opcode's response is signaled on
    ///
    /// `CoprocessorFault` is a terminal notification with no awaiting
    /// caller; it maps to no class and must be handled by the receive
    /// path directly.
    pub const fn wait_class(self) -> Option<WaitClass> {
        match self {
            Self::BoundEvent => Some(WaitClass::Bound),
            Self::ConfigPins
            | Self::ConfigDevice
            | Self::ConfigTransfer
            | Self::ConfigTimerPointer => Some(WaitClass::Config),
            Self::Send | Self::SendReceive => Some(WaitClass::Transfer),
            Self::CoprocessorFault => None,
        }
    }
}

// =============================================================================
// WAIT CLASS
// =============================================================================

/// Group of opcodes sharing one synchronization primitive
///
/// Each class owns exactly one latch. At most one request per class may
/// be in flight; the latch holds at most one pending signal, consumed by
/// the next wait on that class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WaitClass {
    /// Endpoint binding
    Bound = 0,
    /// Configuration round trips
    Config = 1,
    /// Transfer packet round trips
    Transfer = 2,
}

impl WaitClass {
    /// Number of wait classes
    pub const COUNT: usize = 3;

    /// Index into per-class storage
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_wire_roundtrip() {
        for raw in 0u8..8 {
            let op = Opcode::from_u8(raw).unwrap();
            assert_eq!(op as u8, raw);
        }
        assert_eq!(Opcode::from_u8(8), None);
        assert_eq!(Opcode::from_u8(0xFF), None);
    }

    #[test]
    fn test_wait_class_mapping() {
        assert_eq!(Opcode::BoundEvent.wait_class(), Some(WaitClass::Bound));
        assert_eq!(Opcode::ConfigPins.wait_class(), Some(WaitClass::Config));
        assert_eq!(Opcode::ConfigDevice.wait_class(), Some(WaitClass::Config));
        assert_eq!(Opcode::ConfigTransfer.wait_class(), Some(WaitClass::Config));
        assert_eq!(
            Opcode::ConfigTimerPointer.wait_class(),
            Some(WaitClass::Config)
        );
        assert_eq!(Opcode::Send.wait_class(), Some(WaitClass::Transfer));
        assert_eq!(Opcode::SendReceive.wait_class(), Some(WaitClass::Transfer));
        assert_eq!(Opcode::CoprocessorFault.wait_class(), None);
    }

    #[test]
    fn test_wait_class_indices_are_dense() {
        assert!(WaitClass::Bound.index() < WaitClass::COUNT);
        assert!(WaitClass::Config.index() < WaitClass::COUNT);
        assert!(WaitClass::Transfer.index() < WaitClass::COUNT);
    }
}
