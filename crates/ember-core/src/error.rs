//! # EMBER Error Handling
//!
//! Unified error type for the MSPI offload driver stack.
//!
//! Error handling in EMBER follows these principles:
//! - Errors are typed and categorized
//! - No panics in production code paths
//! - Validation errors are returned before any coprocessor interaction
//! - Errors are `no_std` compatible

use core::fmt;

// =============================================================================
// RESULT TYPE
// =============================================================================

/// EMBER Result type alias
pub type Result<T> = core::result::Result<T, Error>;

// =============================================================================
// ERROR ENUM
// =============================================================================

/// EMBER unified error type
///
/// This enum covers all error conditions across the driver stack.
/// Errors are categorized by subsystem for easier debugging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// Feature or mode the controller cannot implement
    NotSupported,
    /// Size, timeout, or bound out of range
    InvalidParameter,
    /// Malformed request (empty packet list, timeout over tolerance)
    InvalidRequest,

    // =========================================================================
    // Channel Errors
    // =========================================================================
    /// Channel saturated past the retry deadline
    ChannelFull,
    /// Channel is closed
    ChannelClosed,
    /// Endpoint not bound to the secondary core
    NotBound,
    /// Hooks already registered on this endpoint
    AlreadyRegistered,

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// No response within the deadline
    Timeout,
    /// Response does not match the request
    Io,

    // =========================================================================
    // Platform Errors
    // =========================================================================
    /// Pin state could not be applied
    PinConfigFailed,
    /// Fault timer could not be armed or started
    TimerFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Validation
            Self::NotSupported => write!(f, "operation not supported"),
            Self::InvalidParameter => write!(f, "invalid parameter"),
            Self::InvalidRequest => write!(f, "malformed request"),

            // Channel
            Self::ChannelFull => write!(f, "channel full"),
            Self::ChannelClosed => write!(f, "channel closed"),
            Self::NotBound => write!(f, "endpoint not bound"),
            Self::AlreadyRegistered => write!(f, "endpoint hooks already registered"),

            // Transport
            Self::Timeout => write!(f, "operation timed out"),
            Self::Io => write!(f, "response mismatch"),

            // Platform
            Self::PinConfigFailed => write!(f, "pin configuration failed"),
            Self::TimerFailed => write!(f, "fault timer failure"),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_lowercase_and_short() {
        let errors = [
            Error::NotSupported,
            Error::InvalidParameter,
            Error::ChannelFull,
            Error::Timeout,
            Error::Io,
        ];
        for e in errors {
            let s = std::format!("{}", e);
            assert!(!s.is_empty());
            assert!(s.len() < 64);
        }
    }

    #[test]
    fn test_errors_are_comparable() {
        assert_eq!(Error::Timeout, Error::Timeout);
        assert_ne!(Error::Timeout, Error::ChannelFull);
    }
}
