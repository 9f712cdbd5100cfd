//! # Offload Driver
//!
//! [`MspiOffload`] is the owned context for one controller instance:
//! the channel endpoint, the signal registry, receive staging, and the
//! driver options all live here, so independent instances never share
//! hidden state.
//!
//! Operations serialize through one internal guard; callers do not need
//! to coordinate with each other. Under the guard each operation is one
//! or more blocking round trips to the secondary core.

use alloc::sync::Arc;

use spin::Mutex;

use ember_core::{
    Clock, ControllerConfig, Error, FaultTimer, Opcode, Options, PinPort, PinSet, PowerAction,
    Result, MAX_PINS,
};
use ember_ipc::Endpoint;
use ember_rpc::{RoundTrip, SignalRegistry};

use crate::dispatch;
use crate::fault;
use crate::staging::ReceiveStaging;

// =============================================================================
// DRIVER
// =============================================================================

/// An MSPI controller whose bus work runs on the secondary core
pub struct MspiOffload {
    /// Hardware ceiling this controller was built with
    hw: ControllerConfig,
    /// Driver options
    options: Options,
    /// Pin state applied at open, shipped by `configure`
    pins: PinSet,
    /// Request/response transport
    rpc: RoundTrip,
    /// Staged send-receive response data
    staging: Arc<ReceiveStaging>,
    /// Serializes configure/transceive against each other
    guard: Mutex<()>,
}

impl core::fmt::Debug for MspiOffload {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MspiOffload")
            .field("hw", &self.hw)
            .field("options", &self.options)
            .field("pins", &self.pins)
            .finish_non_exhaustive()
    }
}

impl MspiOffload {
    /// Bring up the offload: register hooks, await binding, apply pins,
    /// push the bus configuration, and optionally start the watchdog
    ///
    /// Mirrors the hardware bring-up order; any failing step aborts the
    /// open and surfaces its error.
    pub fn open(
        endpoint: Arc<dyn Endpoint>,
        hw: ControllerConfig,
        options: Options,
        registry: SignalRegistry,
        clock: Option<Arc<dyn Clock>>,
        pin_port: &mut dyn PinPort,
        mut fault_timer: Option<&mut dyn FaultTimer>,
    ) -> Result<Self> {
        let registry = Arc::new(registry);
        let staging = Arc::new(ReceiveStaging::new());

        endpoint.register(dispatch::hooks(
            Arc::clone(&registry),
            Arc::clone(&staging),
            options.fault_region,
        ))?;

        registry
            .wait(Opcode::BoundEvent, options.bound_timeout_ms)
            .map_err(|_| Error::NotBound)?;

        pin_port.apply_default()?;
        let state = pin_port.default_state().ok_or_else(|| {
            log::error!("pins default state not found");
            Error::NotSupported
        })?;
        if state.len() > MAX_PINS {
            log::error!("too many pins defined, max: {}", MAX_PINS);
            return Err(Error::NotSupported);
        }
        let mut pins = PinSet::new();
        pins.try_extend_from_slice(state)
            .map_err(|_| Error::NotSupported)?;

        let driver = Self {
            hw: hw.clone(),
            options,
            pins,
            rpc: RoundTrip::new(endpoint, registry, clock),
            staging,
            guard: Mutex::new(()),
        };

        driver.configure_inner(&hw)?;

        if let (Some(timeout_us), Some(timer)) =
            (driver.options.fault_timer_us, fault_timer.as_deref_mut())
        {
            fault::arm_watchdog(timer, timeout_us)?;
            driver.configure_timer_pointer_inner(timer.register_block())?;
            timer.start()?;
        }

        Ok(driver)
    }

    /// Hardware ceiling this controller was built with
    pub fn hw_config(&self) -> &ControllerConfig {
        &self.hw
    }

    /// Driver options
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Per-channel busy state; the offload has none
    pub fn channel_status(&self, _channel: u8) -> Result<()> {
        Ok(())
    }

    /// Handle a power-transition request
    ///
    /// Suspend and resume are accepted as no-ops.
    /// TODO: forward suspend/resume to the secondary core once its
    /// firmware exposes a low-power entry point.
    pub fn power_action(&self, action: PowerAction) -> Result<()> {
        match action {
            PowerAction::Suspend | PowerAction::Resume => Ok(()),
            _ => Err(Error::NotSupported),
        }
    }

    // Shared with ops.rs and xfer.rs
    pub(crate) fn rpc(&self) -> &RoundTrip {
        &self.rpc
    }

    pub(crate) fn staging(&self) -> &ReceiveStaging {
        &self.staging
    }

    pub(crate) fn pins(&self) -> &[ember_core::PinAssignment] {
        &self.pins
    }

    pub(crate) fn hw(&self) -> &ControllerConfig {
        &self.hw
    }

    pub(crate) fn opts(&self) -> &Options {
        &self.options
    }

    pub(crate) fn lock(&self) -> spin::MutexGuard<'_, ()> {
        self.guard.lock()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{echo_service, open_driver, TestPins, TestTimer};
    use ember_core::{SharedAddr, StdClock};
    use ember_ipc::LoopbackChannel;

    #[test]
    fn test_open_configures_bus_over_channel() {
        let ch = LoopbackChannel::new(8);
        ch.set_service(echo_service());

        let driver = open_driver(&ch, Options::new());
        assert!(driver.is_ok());

        // Exactly one message crossed at open: the pin configuration
        let transcript = ch.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0][0], Opcode::ConfigPins as u8);
    }

    #[test]
    fn test_open_fails_when_never_bound() {
        let ch = LoopbackChannel::with_manual_bind(8);
        ch.set_service(echo_service());

        let mut options = Options::new();
        options.bound_timeout_ms = 10;

        let err = open_driver(&ch, options).unwrap_err();
        assert_eq!(err, Error::NotBound);
        assert_eq!(ch.sent_count(), 0);
    }

    #[test]
    fn test_open_arms_watchdog_and_sends_timer_pointer() {
        let ch = LoopbackChannel::new(8);
        ch.set_service(echo_service());

        let mut options = Options::new();
        options.fault_timer_us = Some(2_000_000);

        let clock: Arc<dyn Clock> = Arc::new(StdClock::new());
        let mut pins = TestPins::default_four();
        let mut timer = TestTimer::new(SharedAddr::new(0x5003_3000));

        MspiOffload::open(
            Arc::clone(&ch) as Arc<dyn Endpoint>,
            ControllerConfig::new(32_000_000),
            options,
            SignalRegistry::polling(Arc::clone(&clock)),
            Some(clock),
            &mut pins,
            Some(&mut timer),
        )
        .unwrap();

        assert_eq!(timer.armed_us, Some(2_000_000));
        assert!(timer.started);

        let transcript = ch.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1][0], Opcode::ConfigTimerPointer as u8);
        assert_eq!(&transcript[1][1..], &0x5003_3000u64.to_le_bytes());
    }

    #[test]
    fn test_open_applies_pin_state_first() {
        let ch = LoopbackChannel::new(8);
        ch.set_service(echo_service());

        let clock: Arc<dyn Clock> = Arc::new(StdClock::new());
        let mut pins = TestPins::default_four();

        MspiOffload::open(
            Arc::clone(&ch) as Arc<dyn Endpoint>,
            ControllerConfig::new(32_000_000),
            Options::new(),
            SignalRegistry::polling(Arc::clone(&clock)),
            Some(clock),
            &mut pins,
            None,
        )
        .unwrap();

        assert!(pins.applied);
    }

    #[test]
    fn test_open_rejects_missing_default_pin_state() {
        let ch = LoopbackChannel::new(8);
        ch.set_service(echo_service());

        let clock: Arc<dyn Clock> = Arc::new(StdClock::new());
        let mut pins = TestPins::empty();

        let err = MspiOffload::open(
            Arc::clone(&ch) as Arc<dyn Endpoint>,
            ControllerConfig::new(32_000_000),
            Options::new(),
            SignalRegistry::polling(Arc::clone(&clock)),
            Some(clock),
            &mut pins,
            None,
        )
        .unwrap_err();

        assert_eq!(err, Error::NotSupported);
        assert_eq!(ch.sent_count(), 0);
    }

    #[test]
    fn test_power_stub_accepts_suspend_resume_only() {
        let ch = LoopbackChannel::new(8);
        ch.set_service(echo_service());
        let driver = open_driver(&ch, Options::new()).unwrap();

        assert!(driver.power_action(PowerAction::Suspend).is_ok());
        assert!(driver.power_action(PowerAction::Resume).is_ok());
        assert_eq!(
            driver.power_action(PowerAction::TurnOff).unwrap_err(),
            Error::NotSupported
        );
    }

    #[test]
    fn test_channel_status_is_always_idle() {
        let ch = LoopbackChannel::new(8);
        ch.set_service(echo_service());
        let driver = open_driver(&ch, Options::new()).unwrap();

        assert!(driver.channel_status(0).is_ok());
    }

    #[test]
    fn test_fault_notification_leaves_driver_usable() {
        let ch = LoopbackChannel::new(8);
        ch.set_service(echo_service());
        let driver = open_driver(&ch, Options::new()).unwrap();

        // Crash report arrives unsolicited; it must not satisfy any wait
        ch.notify(&[Opcode::CoprocessorFault as u8]);

        // The next operation still round-trips normally
        assert!(driver
            .configure_device(
                0,
                ember_core::DeviceConfigMask::empty(),
                &ember_core::DeviceConfig::new(1_000_000)
            )
            .is_ok());
    }
}
