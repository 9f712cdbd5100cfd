//! # Send Pipeline
//!
//! The channel to the secondary core has a small, shared capacity;
//! transient "full" is expected and recoverable. The pipeline retries a
//! rejected send in a tight loop under a short deadline independent of
//! the caller's transfer timeout. A deadline overrun means the channel
//! is stuck, which is fatal to the call but not to the process.

use ember_core::{Clock, Error, Result};
use ember_ipc::Endpoint;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Overall deadline for absorbing channel backpressure, milliseconds
pub const SEND_RETRY_TIMEOUT_MS: u32 = 10;

/// Retry attempts per millisecond of deadline when no clock is available
const ATTEMPTS_PER_MS: u32 = 1;

// =============================================================================
// SEND WITH RETRY
// =============================================================================

/// Send one message, absorbing transient backpressure
///
/// Retries immediately while the endpoint reports
/// [`Error::ChannelFull`], bounded by [`SEND_RETRY_TIMEOUT_MS`] of wall
/// time, or by a decrementing attempt budget when `clock` is `None`.
/// Any other endpoint error surfaces unchanged on the first occurrence.
pub fn send_with_retry(
    endpoint: &dyn Endpoint,
    msg: &[u8],
    clock: Option<&dyn Clock>,
) -> Result<()> {
    log::debug!("sending msg, opcode: {}", msg.first().copied().unwrap_or(0xFF));

    let start = clock.map(|c| c.uptime_ms());
    let mut budget = SEND_RETRY_TIMEOUT_MS.saturating_mul(ATTEMPTS_PER_MS);

    loop {
        match endpoint.try_send(msg) {
            Ok(()) => return Ok(()),
            Err(Error::ChannelFull) => {}
            Err(e) => return Err(e),
        }

        // No space in the channel. Retry until the deadline.
        match (clock, start) {
            (Some(c), Some(t0)) => {
                if c.uptime_ms().saturating_sub(t0) > SEND_RETRY_TIMEOUT_MS as u64 {
                    return Err(Error::ChannelFull);
                }
            }
            _ => {
                if budget == 0 {
                    return Err(Error::ChannelFull);
                }
                budget -= 1;
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use ember_core::StdClock;
    use ember_ipc::LoopbackChannel;

    #[test]
    fn test_first_try_success() {
        let ch = LoopbackChannel::new(4);
        let clock = StdClock::new();

        assert!(send_with_retry(&*ch, &[1, 2], Some(&clock)).is_ok());
        assert_eq!(ch.sent_count(), 1);
    }

    #[test]
    fn test_retries_through_transient_backpressure() {
        let ch = LoopbackChannel::new(4);
        let clock = StdClock::new();

        // Three rejections, then the channel has room again
        ch.force_full(3);
        assert!(send_with_retry(&*ch, &[5], Some(&clock)).is_ok());
        assert_eq!(ch.sent_count(), 1);
    }

    #[test]
    fn test_stuck_channel_fails_with_full() {
        let ch = LoopbackChannel::new(1);
        let clock = StdClock::new();

        // Saturate the queue with no peer draining it
        assert!(ch.try_send(&[0]).is_ok());

        let t0 = clock.uptime_ms();
        let err = send_with_retry(&*ch, &[1], Some(&clock)).unwrap_err();
        let elapsed = clock.uptime_ms() - t0;

        assert_eq!(err, Error::ChannelFull);
        assert!(elapsed >= SEND_RETRY_TIMEOUT_MS as u64);
        // Bounded retry, not an unbounded spin
        assert!(elapsed < 10 * SEND_RETRY_TIMEOUT_MS as u64);
    }

    #[test]
    fn test_clockless_budget_bounds_retries() {
        let ch = LoopbackChannel::new(1);
        assert!(ch.try_send(&[0]).is_ok());

        assert_eq!(
            send_with_retry(&*ch, &[1], None).unwrap_err(),
            Error::ChannelFull
        );
    }

    #[test]
    fn test_non_backpressure_error_surfaces_immediately() {
        let ch = LoopbackChannel::new(4);
        let clock = StdClock::new();
        ch.close();

        assert_eq!(
            send_with_retry(&*ch, &[1], Some(&clock)).unwrap_err(),
            Error::ChannelClosed
        );
    }

    #[test]
    fn test_peer_drain_resolves_real_backpressure() {
        let ch = LoopbackChannel::new(2);
        let clock = StdClock::new();

        assert!(ch.try_send(&[0]).is_ok());
        assert!(ch.try_send(&[1]).is_ok());

        // Install a peer from another thread shortly after; the retry
        // loop should pick up the freed capacity within its deadline.
        let drainer = Arc::clone(&ch);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(core::time::Duration::from_millis(2));
            drainer.set_service(Box::new(|_| None));
        });

        assert!(send_with_retry(&*ch, &[2], Some(&clock)).is_ok());
        handle.join().unwrap();
        assert_eq!(ch.sent_count(), 3);
    }
}
