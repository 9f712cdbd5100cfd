//! # Receive Dispatch
//!
//! The endpoint's receive hook, built once at open. Runs in the
//! channel's own context: stages send-receive payloads, signals the
//! opcode's wait class, and hands fault notifications to the fault
//! path. Unknown opcodes are logged and dropped.

use alloc::boxed::Box;
use alloc::sync::Arc;

use ember_core::{Opcode, SharedAddr};
use ember_ipc::EndpointHooks;
use ember_rpc::SignalRegistry;

use crate::fault;
use crate::staging::ReceiveStaging;

// =============================================================================
// HOOK CONSTRUCTION
// =============================================================================

/// Build the endpoint hook pair for one driver instance
pub(crate) fn hooks(
    registry: Arc<SignalRegistry>,
    staging: Arc<ReceiveStaging>,
    fault_region: Option<SharedAddr>,
) -> EndpointHooks {
    let bound_registry = Arc::clone(&registry);

    EndpointHooks {
        bound: Box::new(move || {
            log::debug!("endpoint bound");
            bound_registry.signal(Opcode::BoundEvent);
        }),
        received: Box::new(move |msg| {
            dispatch(&registry, &staging, fault_region, msg);
        }),
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

fn dispatch(
    registry: &SignalRegistry,
    staging: &ReceiveStaging,
    fault_region: Option<SharedAddr>,
    msg: &[u8],
) {
    let opcode = match msg.first().copied().and_then(Opcode::from_u8) {
        Some(op) => op,
        None => {
            log::error!(
                "invalid response opcode: {}",
                msg.first().copied().unwrap_or(0xFF)
            );
            return;
        }
    };

    log::trace!("received msg, opcode: {}, len: {}", opcode as u8, msg.len());

    match opcode {
        Opcode::SendReceive => {
            if msg.len() > 1 {
                staging.stage(&msg[1..]);
            }
            registry.signal(opcode);
        }
        Opcode::CoprocessorFault => {
            fault::report(fault_region);
        }
        _ => {
            registry.signal(opcode);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::{Error, StdClock};

    fn parts() -> (Arc<SignalRegistry>, Arc<ReceiveStaging>) {
        let clock = Arc::new(StdClock::new());
        (
            Arc::new(SignalRegistry::polling(clock)),
            Arc::new(ReceiveStaging::new()),
        )
    }

    #[test]
    fn test_send_receive_response_is_staged_and_signaled() {
        let (registry, staging) = parts();

        dispatch(&registry, &staging, None, &[Opcode::SendReceive as u8, 9, 8, 7]);

        assert_eq!(staging.take().unwrap(), &[9, 8, 7]);
        assert!(registry.wait(Opcode::SendReceive, 5).is_ok());
    }

    #[test]
    fn test_empty_send_receive_response_stages_nothing() {
        let (registry, staging) = parts();

        dispatch(&registry, &staging, None, &[Opcode::SendReceive as u8]);

        assert!(!staging.is_staged());
        assert!(registry.wait(Opcode::SendReceive, 5).is_ok());
    }

    #[test]
    fn test_config_response_signals_config_class() {
        let (registry, staging) = parts();

        dispatch(&registry, &staging, None, &[Opcode::ConfigPins as u8]);

        assert!(registry.wait(Opcode::ConfigDevice, 5).is_ok());
        assert!(!staging.is_staged());
    }

    #[test]
    fn test_unknown_opcode_dropped_without_signal() {
        let (registry, staging) = parts();

        dispatch(&registry, &staging, None, &[0xEE]);
        dispatch(&registry, &staging, None, &[]);

        assert_eq!(registry.wait(Opcode::Send, 5).unwrap_err(), Error::Timeout);
        assert_eq!(
            registry.wait(Opcode::ConfigPins, 5).unwrap_err(),
            Error::Timeout
        );
    }

    #[test]
    fn test_fault_notification_signals_no_class() {
        let (registry, staging) = parts();

        dispatch(&registry, &staging, None, &[Opcode::CoprocessorFault as u8]);

        assert_eq!(registry.wait(Opcode::Send, 5).unwrap_err(), Error::Timeout);
        assert_eq!(
            registry.wait(Opcode::ConfigPins, 5).unwrap_err(),
            Error::Timeout
        );
        assert_eq!(
            registry.wait(Opcode::BoundEvent, 5).unwrap_err(),
            Error::Timeout
        );
    }
}
