//! # Configuration Operations
//!
//! Idempotent validate-then-send operations. Every check runs before
//! any message is built; an unsupported request never reaches the
//! secondary core.

use ember_core::{
    ControllerConfig, DataRate, DeviceConfig, DeviceConfigMask, Error, IoMode, Opcode, OpMode,
    Result, SharedAddr,
};

use crate::driver::MspiOffload;
use crate::message;

// =============================================================================
// IO MODE SUPPORT
// =============================================================================

fn check_io_mode(io_mode: IoMode) -> Result<()> {
    match io_mode {
        IoMode::Single | IoMode::Quad | IoMode::Quad114 | IoMode::Quad144 => Ok(()),
        _ => {
            log::error!("io mode {:?} not supported", io_mode);
            Err(Error::NotSupported)
        }
    }
}

// =============================================================================
// OPERATIONS
// =============================================================================

impl MspiOffload {
    /// Configure the bus, shipping the pin state applied at open
    ///
    /// Rejects anything the offload cannot do before any message is
    /// sent: peripheral role, data-strobe support, or a frequency above
    /// the hardware ceiling.
    pub fn configure(&self, requested: &ControllerConfig) -> Result<()> {
        let _guard = self.lock();
        self.configure_inner(requested)
    }

    pub(crate) fn configure_inner(&self, requested: &ControllerConfig) -> Result<()> {
        if requested.op_mode != OpMode::Controller {
            log::error!("only controller mode is supported");
            return Err(Error::NotSupported);
        }

        if requested.dqs_support {
            log::error!("data-strobe mode is not supported");
            return Err(Error::NotSupported);
        }

        if requested.max_freq > self.hw().max_freq {
            log::error!("max_freq is too large");
            return Err(Error::NotSupported);
        }

        let msg = message::pin_config(self.pins());
        self.rpc().request_default(Opcode::ConfigPins, &msg)
    }

    /// Configure one device on the bus
    ///
    /// Only fields selected by `mask` are validated and forwarded.
    /// Memory boundaries, transfer break times, dual data rate, and the
    /// data-strobe signal are beyond the offload; requesting any of them
    /// fails before the coprocessor is contacted.
    pub fn configure_device(
        &self,
        device_index: u8,
        mask: DeviceConfigMask,
        cfg: &DeviceConfig,
    ) -> Result<()> {
        let _guard = self.lock();

        if mask.contains(DeviceConfigMask::MEM_BOUND) && cfg.mem_boundary != 0 {
            log::error!("memory boundary is not supported");
            return Err(Error::NotSupported);
        }

        if mask.contains(DeviceConfigMask::BREAK_TIME) && cfg.time_to_break != 0 {
            log::error!("transfer break is not supported");
            return Err(Error::NotSupported);
        }

        if mask.contains(DeviceConfigMask::FREQUENCY) && cfg.freq > self.hw().max_freq {
            log::error!(
                "invalid frequency: {}, max: {}",
                cfg.freq,
                self.hw().max_freq
            );
            return Err(Error::InvalidParameter);
        }

        if mask.contains(DeviceConfigMask::IO_MODE) {
            check_io_mode(cfg.io_mode)?;
        }

        if mask.contains(DeviceConfigMask::DATA_RATE) && cfg.data_rate != DataRate::Single {
            log::error!("only single data rate is supported");
            return Err(Error::NotSupported);
        }

        if mask.contains(DeviceConfigMask::DQS) && cfg.dqs_enable {
            log::error!("data-strobe signal is not supported");
            return Err(Error::NotSupported);
        }

        let msg = message::device_config(device_index, cfg);
        self.rpc().request_default(Opcode::ConfigDevice, &msg)
    }

    pub(crate) fn configure_timer_pointer_inner(&self, addr: SharedAddr) -> Result<()> {
        let msg = message::timer_pointer(addr);
        self.rpc().request_default(Opcode::ConfigTimerPointer, &msg)
    }
}

// =============================================================================
// TESTS
// =============================================================================
