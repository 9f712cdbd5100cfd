//! # Fault Context
//!
//! When the secondary core crashes it writes its fault state into a
//! fixed shared-memory region and (when still able) sends a
//! [`Opcode::CoprocessorFault`] notification. The region holds the cause
//! code, faulting program counter, bad address, and a pointer to the
//! saved register dump.
//!
//! [`Opcode::CoprocessorFault`]: crate::opcode::Opcode::CoprocessorFault

use core::fmt;

// =============================================================================
// FAULT REGION
// =============================================================================

/// Number of register-dump words captured in the snapshot
pub const FAULT_DUMP_WORDS: usize = 4;

/// Wire layout of the shared fault region
///
/// Written by the coprocessor, read-only on this side. `dump_ptr` is a
/// native pointer into the shared region where the full register dump
/// was saved.
#[repr(C)]
#[derive(Debug)]
pub struct FaultRegion {
    /// Cause code
    pub cause: u32,
    /// Faulting instruction address
    pub pc: u32,
    /// Address that triggered the fault
    pub bad_addr: u32,
    /// Location of the saved register dump
    pub dump_ptr: *const u32,
}

// =============================================================================
// FAULT CONTEXT
// =============================================================================

/// Read-only snapshot of the coprocessor fault region
///
/// The region is overwritten by the coprocessor on each fault; this
/// snapshot has no lifecycle beyond the log event it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultContext {
    /// Cause code
    pub cause: u32,
    /// Faulting instruction address
    pub pc: u32,
    /// Address that triggered the fault
    pub bad_addr: u32,
    /// Leading window of the register dump (ra, t0, t1, t2)
    pub dump: [u32; FAULT_DUMP_WORDS],
}

impl FaultContext {
    /// Assemble a snapshot from already-read values
    pub const fn from_parts(
        cause: u32,
        pc: u32,
        bad_addr: u32,
        dump: [u32; FAULT_DUMP_WORDS],
    ) -> Self {
        Self {
            cause,
            pc,
            bad_addr,
            dump,
        }
    }

    /// Snapshot the fault region at `region`
    ///
    /// # Safety
    /// `region` must point to a live, readable [`FaultRegion`] whose
    /// `dump_ptr` points to at least [`FAULT_DUMP_WORDS`] readable words.
    pub unsafe fn read_region(region: *const FaultRegion) -> Self {
        // SAFETY: region validity guaranteed by the caller contract
        unsafe {
            let cause = (&raw const (*region).cause).read_volatile();
            let pc = (&raw const (*region).pc).read_volatile();
            let bad_addr = (&raw const (*region).bad_addr).read_volatile();
            let dump_ptr = (&raw const (*region).dump_ptr).read_volatile();

            let mut dump = [0u32; FAULT_DUMP_WORDS];
            for (i, slot) in dump.iter_mut().enumerate() {
                *slot = dump_ptr.add(i).read_volatile();
            }

            Self {
                cause,
                pc,
                bad_addr,
                dump,
            }
        }
    }
}

impl fmt::Display for FaultContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cause=0x{:08x} pc=0x{:08x} bad_addr=0x{:08x}",
            self.cause, self.pc, self.bad_addr
        )
    }
}

// =============================================================================
// TESTS
// =============================================================================
