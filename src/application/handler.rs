//! Hooks implemented by concrete publishers

use std::sync::Arc;

use super::config::ApplicationConfig;
use crate::stream::{Stream, StreamInfo};

/// Protocol-specific stream factory of an application
///
/// # Example
///
/// ```ignore
/// struct HlsHandler;
///
/// impl ApplicationHandler for HlsHandler {
///     type Stream = HlsStream;
///
///     fn create_stream(
///         &self,
///         info: &Arc<StreamInfo>,
///         config: &ApplicationConfig,
///         worker_count: usize,
///     ) -> Option<Arc<HlsStream>> {
///         let playlist = Playlist::new(config.segment_count, config.segment_duration);
///         HlsStream::start(Arc::clone(info), playlist, worker_count).map(Arc::new)
///     }
///
///     fn delete_stream(&self, _info: &Arc<StreamInfo>, stream: &Arc<HlsStream>) -> bool {
///         stream.release_segments();
///         true
///     }
/// }
/// ```
pub trait ApplicationHandler: Send + Sync + 'static {
    /// Concrete stream type built by this handler
    type Stream: Stream;

    /// Build a stream for a descriptor announced by the router
    ///
    /// `config` carries the application's segment and cross-domain settings;
    /// `worker_count` is its per-stream thread count, already floored at one.
    /// Returning `None` fails the create without touching the registry.
    fn create_stream(
        &self,
        info: &Arc<StreamInfo>,
        config: &ApplicationConfig,
        worker_count: usize,
    ) -> Option<Arc<Self::Stream>>;

    /// Release protocol-specific resources of a stream about to be removed
    ///
    /// Runs while the stream is still registered and before it is stopped.
    /// Returning `false` keeps the stream registered.
    fn delete_stream(&self, info: &Arc<StreamInfo>, stream: &Arc<Self::Stream>) -> bool;
}

/// The publisher an application belongs to
pub trait Publisher: Send + Sync + 'static {
    /// Human readable publisher name, e.g. "HLS"
    fn publisher_name(&self) -> &str;
}
