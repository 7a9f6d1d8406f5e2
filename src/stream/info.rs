//! Stream descriptors announced by the media router

use std::collections::HashMap;

use crate::media::{MediaTrack, MediaType};

/// Stream identifier, assigned by the router
pub type StreamId = u32;

/// Descriptor of a stream as announced by the router
///
/// Frames are tagged with the descriptor of the stream they belong to; the
/// dispatch task resolves the live [`Stream`](super::Stream) through the
/// registry using [`StreamInfo::id`].
#[derive(Debug, Clone)]
pub struct StreamInfo {
    id: StreamId,
    name: String,
    tracks: HashMap<u32, MediaTrack>,
}

impl StreamInfo {
    /// Create a descriptor without tracks
    pub fn new(id: StreamId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            tracks: HashMap::new(),
        }
    }

    /// Add a track
    pub fn with_track(mut self, track: MediaTrack) -> Self {
        self.add_track(track);
        self
    }

    /// Add or replace a track
    pub fn add_track(&mut self, track: MediaTrack) {
        self.tracks.insert(track.id, track);
    }

    pub fn id(&self) -> StreamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a track by id
    pub fn track(&self, track_id: u32) -> Option<&MediaTrack> {
        self.tracks.get(&track_id)
    }

    /// Iterate over the tracks of a given kind
    pub fn tracks_of(&self, media_type: MediaType) -> impl Iterator<Item = &MediaTrack> {
        self.tracks
            .values()
            .filter(move |t| t.media_type == media_type)
    }

    /// Number of tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}

impl std::fmt::Display for StreamInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.name, self.id)
    }
}
