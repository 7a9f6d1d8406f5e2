//! Streams fed by the dispatch task
//!
//! A [`Stream`] is the protocol-specific output side of a publisher: it owns
//! packaging and delivery of frames to remote peers. The dispatch core only
//! depends on this trait, never on a concrete stream type.

pub mod info;

pub use info::{StreamId, StreamInfo};

use std::sync::Arc;

use crate::media::MediaPacket;

/// Output stream capability
///
/// All methods are called from the dispatch task and are expected to return
/// promptly. A blocking implementation stalls every other stream of the
/// application and delays `Application::stop`.
pub trait Stream: Send + Sync + 'static {
    /// Registry key of this stream
    fn id(&self) -> StreamId;

    /// Stream name, used for lookups by name
    fn name(&self) -> &str;

    /// Deliver a video frame
    fn send_video_frame(&self, packet: Arc<MediaPacket>);

    /// Deliver an audio frame
    fn send_audio_frame(&self, packet: Arc<MediaPacket>);

    /// Stop the stream's own processing
    ///
    /// Called once after the stream has been removed from the registry.
    fn stop(&self);
}
