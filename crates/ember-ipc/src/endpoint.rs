//! # Endpoint
//!
//! The contract the driver holds against the platform's inter-core
//! channel: send a tagged byte message without blocking, and receive
//! bind/receive notifications through registered hooks.

use alloc::boxed::Box;

use ember_core::Result;

// =============================================================================
// HOOKS
// =============================================================================

/// Invoked once the channel is bound to the secondary core
pub type BoundHook = Box<dyn Fn() + Send + Sync>;

/// Invoked for every message from the secondary core
///
/// Runs in the channel's own context, concurrently with caller threads;
/// the borrow is only valid for the duration of the call.
pub type ReceiveHook = Box<dyn Fn(&[u8]) + Send + Sync>;

/// Callback pair registered when the endpoint is opened
pub struct EndpointHooks {
    /// Bind notification
    pub bound: BoundHook,
    /// Asynchronous receive path
    pub received: ReceiveHook,
}

impl core::fmt::Debug for EndpointHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EndpointHooks").finish_non_exhaustive()
    }
}

// =============================================================================
// ENDPOINT
// =============================================================================

/// A capacity-limited message channel to the secondary core
///
/// The platform owns the channel; the driver only registers hooks and
/// sends. `try_send` never blocks: transient backpressure surfaces as
/// [`Error::ChannelFull`] and is the caller's to retry.
///
/// [`Error::ChannelFull`]: ember_core::Error::ChannelFull
pub trait Endpoint: Send + Sync {
    /// Register the bind and receive hooks
    ///
    /// At most one registration per endpoint lifetime; a second call
    /// fails with [`Error::AlreadyRegistered`].
    ///
    /// [`Error::AlreadyRegistered`]: ember_core::Error::AlreadyRegistered
    fn register(&self, hooks: EndpointHooks) -> Result<()>;

    /// Enqueue one message
    fn try_send(&self, msg: &[u8]) -> Result<()>;
}
