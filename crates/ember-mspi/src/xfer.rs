//! # Transfer Orchestration
//!
//! A transaction is one transfer-configuration round trip followed by
//! one round trip per packet, strictly in order. The secondary core has
//! no concept of the whole transaction, only of the configuration and
//! the packet stream, so the first failing packet aborts the rest and
//! nothing already executed is rolled back.

use ember_core::{
    Direction, Error, Opcode, PacketBuffer, Result, SharedAddr, TransferDescriptor, TransferPacket,
};

use crate::driver::MspiOffload;
use crate::message::{self, PacketPayload};

// =============================================================================
// ALIGNMENT
// =============================================================================

/// Zero-copy requires natural word alignment of the shared buffer
fn is_word_aligned(ptr: *const u8) -> bool {
    (ptr as usize) % core::mem::size_of::<u32>() == 0
}

// =============================================================================
// ORCHESTRATION
// =============================================================================

impl MspiOffload {
    /// Run one complete transaction, blocking until done or failed
    ///
    /// Validates the descriptor before any message is sent. Completed
    /// packets are never rolled back on a later packet's failure.
    pub fn transceive(&self, desc: &mut TransferDescriptor<'_, '_>) -> Result<()> {
        let _guard = self.lock();

        if desc.asynchronous {
            return Err(Error::NotSupported);
        }

        if desc.packets.is_empty() || desc.timeout_ms > self.opts().completion_timeout_tolerance_ms
        {
            return Err(Error::InvalidRequest);
        }

        let msg = message::transfer_config(desc);
        if let Err(e) = self.rpc().request_default(Opcode::ConfigTransfer, &msg) {
            log::error!("send transfer config error: {}", e);
            return Err(e);
        }

        for packet in desc.packets.iter_mut() {
            if let Err(e) = self.xfer_packet(packet) {
                log::error!("packet transfer error: {}", e);
                return Err(e);
            }
        }

        Ok(())
    }

    /// One packet round trip, including staged-data copy-out
    fn xfer_packet(&self, packet: &mut TransferPacket<'_>) -> Result<()> {
        let num_bytes = packet.num_bytes();
        if num_bytes >= self.opts().max_msg_size {
            log::error!(
                "packet size too large: {}, max: {}",
                num_bytes,
                self.opts().max_msg_size
            );
            return Err(Error::InvalidParameter);
        }

        let opcode = match packet.direction() {
            Direction::Receive => Opcode::SendReceive,
            Direction::Send => Opcode::Send,
        };

        let data: &[u8] = match &packet.buffer {
            PacketBuffer::Tx(buf) => buf,
            PacketBuffer::Rx(buf) => buf,
        };

        // Zero copy only holds on word-aligned buffers; a misaligned
        // packet falls back to embedding, alone
        let payload = if self.opts().zero_copy && is_word_aligned(data.as_ptr()) {
            PacketPayload::ByRef(SharedAddr::from_ptr(data.as_ptr()))
        } else {
            PacketPayload::Inline(data)
        };

        let msg = message::packet(
            opcode,
            packet.command,
            packet.address,
            num_bytes as u32,
            payload,
        );

        let mut result = self.rpc().request_default(opcode, &msg);

        if packet.direction() == Direction::Receive {
            // Staging is single-use: consumed here whatever the outcome
            if let Some(staged) = self.staging().take() {
                // The staged length is the only validation the response
                // allows; anything but an exact match is a wire fault
                if staged.len() != num_bytes {
                    log::error!(
                        "staged {} bytes, requested {}",
                        staged.len(),
                        num_bytes
                    );
                    result = Err(Error::Io);
                } else if let PacketBuffer::Rx(buf) = &mut packet.buffer {
                    buf.copy_from_slice(&staged);
                }
            }
        }

        result
    }
}

// =============================================================================
// TESTS
// =============================================================================
