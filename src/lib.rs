//! Per-application dispatch core for live media publishers
//!
//! An [`Application`] sits between an upstream media router and the
//! protocol-specific streams of a publisher. Producers on any thread hand
//! over video frames, audio frames and raw client packets; a single
//! dispatch task per application routes them to the right [`Stream`] or
//! [`Session`].
//!
//! ```text
//!   router ──► submit_video_frame ──┐
//!   router ──► submit_audio_frame ──┼──► queues ──► Notify ──► dispatch task
//!   ingress ─► submit_packet ───────┘                              │
//!                                                 ┌────────────────┴───────┐
//!                                                 ▼                        ▼
//!                                      StreamRegistry ──► Stream     Session
//! ```
//!
//! Streams are built by an [`ApplicationHandler`] when the router announces
//! them and live in the registry until they are deleted.

pub mod application;
pub mod dispatch;
pub mod error;
pub mod media;
pub mod registry;
pub mod session;
pub mod stats;
pub mod stream;

#[cfg(test)]
pub(crate) mod testing;

pub use application::{Application, ApplicationConfig, ApplicationHandler, ApplicationInfo, Publisher};
pub use dispatch::DispatchState;
pub use error::{Error, Result};
pub use media::{MediaPacket, MediaTrack, MediaType, Timebase};
pub use registry::{RegistryError, StreamRegistry};
pub use session::{Session, SessionId};
pub use stats::{DispatchSnapshot, QueueDepths};
pub use stream::{Stream, StreamId, StreamInfo};
