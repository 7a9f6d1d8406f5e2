//! Recording doubles for streams, sessions and handlers used in tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;

use crate::application::{ApplicationConfig, ApplicationHandler, Publisher};
use crate::media::MediaPacket;
use crate::session::{Session, SessionId};
use crate::stream::{Stream, StreamId, StreamInfo};

/// Video packet on `track_id` with the given pts
pub fn video_packet(track_id: u32, pts: i64) -> Arc<MediaPacket> {
    Arc::new(MediaPacket::video(
        track_id,
        pts,
        pts,
        Bytes::from_static(&[0x65]),
        false,
    ))
}

/// Poll `cond` until it holds or a few seconds have passed
pub async fn wait_until(cond: impl Fn() -> bool) -> bool {
    for _ in 0..1000 {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    cond()
}

/// Stream that records everything it receives
pub struct RecordingStream {
    id: StreamId,
    name: String,
    pub worker_count: usize,
    video: Mutex<Vec<Arc<MediaPacket>>>,
    audio: Mutex<Vec<Arc<MediaPacket>>>,
    stopped: AtomicBool,
    frames_after_stop: AtomicUsize,
    panic_on_video: AtomicBool,
}

impl std::fmt::Debug for RecordingStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingStream")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("stopped", &self.is_stopped())
            .finish()
    }
}

impl RecordingStream {
    pub fn new(id: StreamId, name: &str) -> Self {
        Self::with_workers(id, name, 1)
    }

    pub fn with_workers(id: StreamId, name: &str, worker_count: usize) -> Self {
        Self {
            id,
            name: name.to_string(),
            worker_count,
            video: Mutex::new(Vec::new()),
            audio: Mutex::new(Vec::new()),
            stopped: AtomicBool::new(false),
            frames_after_stop: AtomicUsize::new(0),
            panic_on_video: AtomicBool::new(false),
        }
    }

    pub fn video_count(&self) -> usize {
        self.video.lock().unwrap().len()
    }

    pub fn audio_count(&self) -> usize {
        self.audio.lock().unwrap().len()
    }

    pub fn video_pts(&self) -> Vec<i64> {
        self.video.lock().unwrap().iter().map(|p| p.pts).collect()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn frames_after_stop(&self) -> usize {
        self.frames_after_stop.load(Ordering::SeqCst)
    }

    /// Make every following video frame panic inside `send_video_frame`
    pub fn panic_on_video(&self) {
        self.panic_on_video.store(true, Ordering::SeqCst);
    }

    fn note_if_stopped(&self) {
        if self.is_stopped() {
            self.frames_after_stop.fetch_add(1, Ordering::SeqCst);
        }
    }
}

impl Stream for RecordingStream {
    fn id(&self) -> StreamId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn send_video_frame(&self, packet: Arc<MediaPacket>) {
        if self.panic_on_video.load(Ordering::SeqCst) {
            panic!("video frame rejected");
        }
        self.note_if_stopped();
        self.video.lock().unwrap().push(packet);
    }

    fn send_audio_frame(&self, packet: Arc<MediaPacket>) {
        self.note_if_stopped();
        self.audio.lock().unwrap().push(packet);
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }
}

/// Session that records every packet handed to it
pub struct RecordingSession {
    id: SessionId,
    packets: Mutex<Vec<Bytes>>,
}

/// Session that panics on every packet
pub struct PanickingSession;

impl Session for PanickingSession {
    fn id(&self) -> SessionId {
        0
    }

    fn on_packet_received(&self, _data: Bytes) {
        panic!("packet rejected");
    }
}

impl RecordingSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            packets: Mutex::new(Vec::new()),
        }
    }

    pub fn packets(&self) -> Vec<Bytes> {
        self.packets.lock().unwrap().clone()
    }
}

impl Session for RecordingSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn on_packet_received(&self, data: Bytes) {
        self.packets.lock().unwrap().push(data);
    }
}

/// Handler building [`RecordingStream`]s, with switchable failures
#[derive(Default)]
pub struct RecordingHandler {
    pub fail_create: AtomicBool,
    pub reject_delete: AtomicBool,
    pub created: AtomicUsize,
    pub deleted: Mutex<Vec<StreamId>>,
    /// Whether the stream was not yet stopped when the delete hook ran
    pub live_during_delete: AtomicBool,
    /// Segment count and duration seen by the last create
    pub segment_policy: Mutex<Option<(u32, u32)>>,
}

impl ApplicationHandler for RecordingHandler {
    type Stream = RecordingStream;

    fn create_stream(
        &self,
        info: &Arc<StreamInfo>,
        config: &ApplicationConfig,
        worker_count: usize,
    ) -> Option<Arc<RecordingStream>> {
        if self.fail_create.load(Ordering::SeqCst) {
            return None;
        }
        self.created.fetch_add(1, Ordering::SeqCst);
        *self.segment_policy.lock().unwrap() = Some((config.segment_count, config.segment_duration));
        Some(Arc::new(RecordingStream::with_workers(
            info.id(),
            info.name(),
            worker_count,
        )))
    }

    fn delete_stream(&self, info: &Arc<StreamInfo>, stream: &Arc<RecordingStream>) -> bool {
        if self.reject_delete.load(Ordering::SeqCst) {
            return false;
        }
        self.live_during_delete
            .store(!stream.is_stopped(), Ordering::SeqCst);
        self.deleted.lock().unwrap().push(info.id());
        true
    }
}

/// Publisher with a fixed name
pub struct NamedPublisher(pub &'static str);

impl Publisher for NamedPublisher {
    fn publisher_name(&self) -> &str {
        self.0
    }
}
