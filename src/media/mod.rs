//! Media payload types
//!
//! The dispatch core never looks inside a frame. It only needs the track a
//! packet belongs to and its presentation timestamp to keep the last-seen
//! timestamp metrics up to date.

pub mod packet;
pub mod track;

pub use packet::{MediaPacket, MediaType};
pub use track::{MediaTrack, Timebase};
