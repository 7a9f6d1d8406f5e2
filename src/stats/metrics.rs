//! Counters for the dispatch path
//!
//! Updated lock-free from producers and from the dispatch task; read as a
//! plain [`DispatchSnapshot`].

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Number of items waiting in each queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueDepths {
    pub video: usize,
    pub audio: usize,
    pub packets: usize,
}

impl QueueDepths {
    /// Total pending items
    pub fn total(&self) -> usize {
        self.video + self.audio + self.packets
    }
}

/// Live counters of one application's dispatch path
#[derive(Debug, Default)]
pub struct DispatchStats {
    video_delivered: AtomicU64,
    audio_delivered: AtomicU64,
    packets_delivered: AtomicU64,
    dropped_frames: AtomicU64,
    dropped_packets: AtomicU64,
    last_video_ts_ms: AtomicI64,
    last_audio_ts_ms: AtomicI64,
    snapshots: AtomicU64,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_video_delivered(&self) {
        self.video_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_audio_delivered(&self) {
        self.audio_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_packet_delivered(&self) {
        self.packets_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped_frame(&self) {
        self.dropped_frames.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_dropped_packet(&self) {
        self.dropped_packets.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_snapshot(&self) {
        self.snapshots.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn set_last_video_ts(&self, ms: i64) {
        self.last_video_ts_ms.store(ms, Ordering::Relaxed);
    }

    pub(crate) fn set_last_audio_ts(&self, ms: i64) {
        self.last_audio_ts_ms.store(ms, Ordering::Relaxed);
    }

    /// Frames and packets dropped because their destination was gone
    pub fn dropped(&self) -> u64 {
        self.dropped_frames.load(Ordering::Relaxed) + self.dropped_packets.load(Ordering::Relaxed)
    }

    /// Take a snapshot, combined with the current queue depths
    pub fn snapshot(&self, queues: QueueDepths) -> DispatchSnapshot {
        DispatchSnapshot {
            queues,
            video_delivered: self.video_delivered.load(Ordering::Relaxed),
            audio_delivered: self.audio_delivered.load(Ordering::Relaxed),
            packets_delivered: self.packets_delivered.load(Ordering::Relaxed),
            dropped_frames: self.dropped_frames.load(Ordering::Relaxed),
            dropped_packets: self.dropped_packets.load(Ordering::Relaxed),
            last_video_ts_ms: self.last_video_ts_ms.load(Ordering::Relaxed),
            last_audio_ts_ms: self.last_audio_ts_ms.load(Ordering::Relaxed),
            snapshots: self.snapshots.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the dispatch counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSnapshot {
    /// Pending items per queue
    pub queues: QueueDepths,
    /// Video frames delivered to a stream
    pub video_delivered: u64,
    /// Audio frames delivered to a stream
    pub audio_delivered: u64,
    /// Packets delivered to a session
    pub packets_delivered: u64,
    /// Frames whose stream was not registered when drained
    pub dropped_frames: u64,
    /// Packets whose session was gone when drained
    pub dropped_packets: u64,
    /// Timestamp of the last submitted video frame (ms)
    pub last_video_ts_ms: i64,
    /// Timestamp of the last submitted audio frame (ms)
    pub last_audio_ts_ms: i64,
    /// Queue depth lines written to the log so far
    pub snapshots: u64,
}

impl DispatchSnapshot {
    /// Items that left the queues, delivered or dropped
    pub fn drained(&self) -> u64 {
        self.video_delivered
            + self.audio_delivered
            + self.packets_delivered
            + self.dropped_frames
            + self.dropped_packets
    }
}
