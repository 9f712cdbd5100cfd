//! # Loopback Channel
//!
//! Bounded in-process implementation of [`Endpoint`].
//!
//! ## Features
//!
//! - Capacity-limited message queue with `ChannelFull` backpressure
//! - Hook-driven delivery of peer responses
//! - Scriptable peer service and injectable backpressure, which make it
//!   the standard test double for the whole stack
//! - Channel statistics

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use spin::Mutex;

use ember_core::{Error, Result};

use crate::endpoint::{Endpoint, EndpointHooks};

// =============================================================================
// Ring Buffer
// =============================================================================

/// A simple ring buffer for queued messages
struct RingBuffer<T> {
    /// Storage
    buffer: Vec<Option<T>>,
    /// Read position
    read_pos: usize,
    /// Write position
    write_pos: usize,
    /// Number of items
    count: usize,
    /// Capacity
    capacity: usize,
}

impl<T> RingBuffer<T> {
    fn new(capacity: usize) -> Self {
        let mut buffer = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            buffer.push(None);
        }
        Self {
            buffer,
            read_pos: 0,
            write_pos: 0,
            count: 0,
            capacity,
        }
    }

    fn push(&mut self, item: T) -> core::result::Result<(), T> {
        if self.count >= self.capacity {
            return Err(item);
        }

        self.buffer[self.write_pos] = Some(item);
        self.write_pos = (self.write_pos + 1) % self.capacity;
        self.count += 1;
        Ok(())
    }

    fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }

        let item = self.buffer[self.read_pos].take();
        self.read_pos = (self.read_pos + 1) % self.capacity;
        self.count -= 1;
        item
    }

    fn len(&self) -> usize {
        self.count
    }
}

// =============================================================================
// Peer Service
// =============================================================================

/// Scripted peer behavior: consume one request, optionally answer it
///
/// Returning `None` withholds the response, which is how tests model an
/// unresponsive or crashed secondary core.
pub type Service = Box<dyn Fn(&[u8]) -> Option<Vec<u8>> + Send + Sync>;

// =============================================================================
// Loopback Channel
// =============================================================================

/// Bounded in-process channel with a scriptable peer
///
/// Messages sent through [`Endpoint::try_send`] queue up to `capacity`;
/// when a peer service is installed the queue drains through it and any
/// response is delivered to the registered receive hook, on the sender's
/// own call stack.
pub struct LoopbackChannel {
    /// Pending outbound messages
    queue: Mutex<RingBuffer<Vec<u8>>>,
    /// Registered hooks, shared with delivery
    hooks: Mutex<Option<Arc<EndpointHooks>>>,
    /// Scripted peer
    service: Mutex<Option<Service>>,
    /// Transcript of every accepted message
    transcript: Mutex<Vec<Vec<u8>>>,
    /// Bind immediately on hook registration
    auto_bind: bool,
    /// Channel bound to the peer
    bound: AtomicBool,
    /// Channel closed
    closed: AtomicBool,
    /// Forced ChannelFull rejections remaining
    full_debt: AtomicUsize,
    /// Messages accepted
    sent: AtomicUsize,
    /// Messages delivered to the receive hook
    delivered: AtomicUsize,
}

impl LoopbackChannel {
    /// Create a channel that binds as soon as hooks are registered
    pub fn new(capacity: usize) -> Arc<Self> {
        Self::build(capacity, true)
    }

    /// Create a channel that stays unbound until [`Self::bind`] is called
    pub fn with_manual_bind(capacity: usize) -> Arc<Self> {
        Self::build(capacity, false)
    }

    fn build(capacity: usize, auto_bind: bool) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(RingBuffer::new(capacity)),
            hooks: Mutex::new(None),
            service: Mutex::new(None),
            transcript: Mutex::new(Vec::new()),
            auto_bind,
            bound: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            full_debt: AtomicUsize::new(0),
            sent: AtomicUsize::new(0),
            delivered: AtomicUsize::new(0),
        })
    }

    /// Install the scripted peer and drain anything already queued
    pub fn set_service(&self, service: Service) {
        *self.service.lock() = Some(service);
        self.pump();
    }

    /// Signal the bound event to the registered hooks
    pub fn bind(&self) {
        log::debug!("loopback channel bound");
        self.bound.store(true, Ordering::Release);
        let hooks = self.hooks.lock().clone();
        if let Some(h) = hooks {
            (h.bound)();
        }
    }

    /// Check if the channel is bound
    pub fn is_bound(&self) -> bool {
        self.bound.load(Ordering::Acquire)
    }

    /// Close the channel; subsequent sends fail with `ChannelClosed`
    pub fn close(&self) {
        log::debug!("loopback channel closed");
        self.closed.store(true, Ordering::Release);
    }

    /// Reject the next `n` sends with `ChannelFull`
    pub fn force_full(&self, n: usize) {
        self.full_debt.store(n, Ordering::Release);
    }

    /// Deliver an unsolicited message to the receive hook
    ///
    /// Models coprocessor-initiated traffic such as fault reports and
    /// stray responses.
    pub fn notify(&self, msg: &[u8]) {
        self.deliver(msg);
    }

    /// Number of messages accepted so far
    pub fn sent_count(&self) -> usize {
        self.sent.load(Ordering::Relaxed)
    }

    /// Copy of every message accepted so far, in order
    pub fn transcript(&self) -> Vec<Vec<u8>> {
        self.transcript.lock().clone()
    }

    /// Get channel statistics
    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            sent: self.sent.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            queue_length: self.queue.lock().len(),
        }
    }

    /// Run queued messages through the peer service
    fn pump(&self) {
        loop {
            if self.service.lock().is_none() {
                return;
            }

            let msg = match self.queue.lock().pop() {
                Some(m) => m,
                None => return,
            };

            let response = {
                let service = self.service.lock();
                match &*service {
                    Some(f) => f(&msg),
                    None => None,
                }
            };

            if let Some(resp) = response {
                self.deliver(&resp);
            }
        }
    }

    fn deliver(&self, msg: &[u8]) {
        let hooks = self.hooks.lock().clone();
        if let Some(h) = hooks {
            self.delivered.fetch_add(1, Ordering::Relaxed);
            (h.received)(msg);
        }
    }
}

impl Endpoint for LoopbackChannel {
    fn register(&self, hooks: EndpointHooks) -> Result<()> {
        {
            let mut slot = self.hooks.lock();
            if slot.is_some() {
                return Err(Error::AlreadyRegistered);
            }
            *slot = Some(Arc::new(hooks));
        }

        if self.auto_bind {
            self.bind();
        }
        Ok(())
    }

    fn try_send(&self, msg: &[u8]) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::ChannelClosed);
        }

        // Injected backpressure takes priority over real queue state
        let debt = self
            .full_debt
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |d| d.checked_sub(1));
        if debt.is_ok() {
            return Err(Error::ChannelFull);
        }

        if self.queue.lock().push(msg.to_vec()).is_err() {
            return Err(Error::ChannelFull);
        }

        self.sent.fetch_add(1, Ordering::Relaxed);
        self.transcript.lock().push(msg.to_vec());
        self.pump();
        Ok(())
    }
}

// =============================================================================
// Channel Statistics
// =============================================================================

/// Channel statistics
#[derive(Debug, Clone, Default)]
pub struct ChannelStats {
    /// Messages accepted
    pub sent: usize,
    /// Messages delivered to the receive hook
    pub delivered: usize,
    /// Current queue length
    pub queue_length: usize,
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn recording_hooks(bound_hits: Arc<AtomicUsize>, received: Arc<Mutex<Vec<Vec<u8>>>>) -> EndpointHooks {
        EndpointHooks {
            bound: Box::new(move || {
                bound_hits.fetch_add(1, Ordering::Relaxed);
            }),
            received: Box::new(move |msg| {
                received.lock().push(msg.to_vec());
            }),
        }
    }

    #[test]
    fn test_auto_bind_fires_bound_hook() {
        let ch = LoopbackChannel::new(4);
        let bound_hits = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));

        ch.register(recording_hooks(bound_hits.clone(), received))
            .unwrap();
        assert_eq!(bound_hits.load(Ordering::Relaxed), 1);
        assert!(ch.is_bound());
    }

    #[test]
    fn test_manual_bind_waits_for_bind_call() {
        let ch = LoopbackChannel::with_manual_bind(4);
        let bound_hits = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));

        ch.register(recording_hooks(bound_hits.clone(), received))
            .unwrap();
        assert_eq!(bound_hits.load(Ordering::Relaxed), 0);

        ch.bind();
        assert_eq!(bound_hits.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_second_registration_rejected() {
        let ch = LoopbackChannel::new(4);
        let hits = Arc::new(AtomicUsize::new(0));
        let rx = Arc::new(Mutex::new(Vec::new()));

        ch.register(recording_hooks(hits.clone(), rx.clone())).unwrap();
        let err = ch.register(recording_hooks(hits, rx)).unwrap_err();
        assert_eq!(err, Error::AlreadyRegistered);
    }

    #[test]
    fn test_service_answers_request() {
        let ch = LoopbackChannel::new(4);
        let hits = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));

        ch.register(recording_hooks(hits, received.clone())).unwrap();
        ch.set_service(Box::new(|msg| {
            assert_eq!(msg, &[1, 2, 3]);
            Some(vec![9, 9])
        }));

        ch.try_send(&[1, 2, 3]).unwrap();
        assert_eq!(received.lock().as_slice(), &[vec![9, 9]]);
        assert_eq!(ch.sent_count(), 1);
    }

    #[test]
    fn test_forced_backpressure_then_accept() {
        let ch = LoopbackChannel::new(4);
        ch.force_full(2);

        assert_eq!(ch.try_send(&[0]).unwrap_err(), Error::ChannelFull);
        assert_eq!(ch.try_send(&[0]).unwrap_err(), Error::ChannelFull);
        assert!(ch.try_send(&[0]).is_ok());
        assert_eq!(ch.sent_count(), 1);
    }

    #[test]
    fn test_capacity_limit_without_service() {
        let ch = LoopbackChannel::new(2);

        assert!(ch.try_send(&[1]).is_ok());
        assert!(ch.try_send(&[2]).is_ok());
        assert_eq!(ch.try_send(&[3]).unwrap_err(), Error::ChannelFull);

        // Installing the peer drains the queue and unblocks the channel
        ch.set_service(Box::new(|_| None));
        assert!(ch.try_send(&[3]).is_ok());
        assert_eq!(ch.transcript().len(), 3);
    }

    #[test]
    fn test_closed_channel_rejects_sends() {
        let ch = LoopbackChannel::new(4);
        ch.close();
        assert_eq!(ch.try_send(&[0]).unwrap_err(), Error::ChannelClosed);
    }

    #[test]
    fn test_notify_reaches_receive_hook() {
        let ch = LoopbackChannel::new(4);
        let hits = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));

        ch.register(recording_hooks(hits, received.clone())).unwrap();
        ch.notify(&[7, 7, 7]);
        assert_eq!(received.lock().as_slice(), &[vec![7, 7, 7]]);
    }
}
