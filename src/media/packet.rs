//! Encoded media packets handed over by the router

use bytes::Bytes;

/// Kind of media carried by a track or packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    /// Video frame
    Video,
    /// Audio frame
    Audio,
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaType::Video => write!(f, "video"),
            MediaType::Audio => write!(f, "audio"),
        }
    }
}

/// An encoded frame on its way to a stream
///
/// Cheap to share: the payload is a reference-counted `Bytes`, and the
/// dispatch path passes packets around as `Arc<MediaPacket>`.
#[derive(Debug, Clone)]
pub struct MediaPacket {
    /// Track this packet belongs to
    pub track_id: u32,
    /// Media kind
    pub media_type: MediaType,
    /// Presentation timestamp in track timebase units
    pub pts: i64,
    /// Decoding timestamp in track timebase units
    pub dts: i64,
    /// Encoded payload
    pub data: Bytes,
    /// Whether this is a keyframe (video only)
    pub is_keyframe: bool,
}

impl MediaPacket {
    /// Create a video packet
    pub fn video(track_id: u32, pts: i64, dts: i64, data: Bytes, is_keyframe: bool) -> Self {
        Self {
            track_id,
            media_type: MediaType::Video,
            pts,
            dts,
            data,
            is_keyframe,
        }
    }

    /// Create an audio packet
    pub fn audio(track_id: u32, pts: i64, data: Bytes) -> Self {
        Self {
            track_id,
            media_type: MediaType::Audio,
            pts,
            dts: pts,
            data,
            is_keyframe: false,
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
