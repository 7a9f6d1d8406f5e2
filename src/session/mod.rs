//! Client sessions
//!
//! Sessions are owned upstream (by the transport that accepted the client).
//! The application only keeps a weak reference per queued packet and hands
//! the payload straight to the session, bypassing the stream registry.

use bytes::Bytes;

/// Session identifier
pub type SessionId = u64;

/// Client session capability
pub trait Session: Send + Sync + 'static {
    /// Unique session id
    fn id(&self) -> SessionId;

    /// Handle a raw packet received from the client
    ///
    /// Called from the dispatch task; must not block.
    fn on_packet_received(&self, data: Bytes);
}
