//! The per-application dispatch task
//!
//! Producers call the `submit_*` methods from any thread: each one pushes
//! into its queue, releases the queue lock and then signals the wake event.
//! The `Notify` keeps a permit when nobody is waiting, so a push that
//! happens while the task is busy routing is never missed.
//!
//! One cycle of [`Dispatcher::run`]:
//!
//! 1. log queue depths if `stats_interval` has elapsed
//! 2. wait for the wake event, unless the previous cycle drained something
//! 3. route at most one video frame, one audio frame and one packet
//!
//! A stream or session that panics loses the item it was handed; the item
//! is counted as dropped and the loop keeps running.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use bytes::Bytes;
use tokio::sync::Notify;

use super::queue::{DispatchQueue, FrameItem, PacketItem, Sequenced};
use crate::application::ApplicationConfig;
use crate::media::{MediaPacket, MediaType};
use crate::registry::StreamRegistry;
use crate::session::Session;
use crate::stats::{DispatchStats, QueueDepths};
use crate::stream::{Stream, StreamInfo};

/// Queues, wake event and routing logic of one application
pub struct Dispatcher<S: Stream> {
    app_name: String,
    app_id: u32,

    video_queue: DispatchQueue<FrameItem>,
    audio_queue: DispatchQueue<FrameItem>,
    packet_queue: DispatchQueue<PacketItem>,

    wake: Notify,
    stop_requested: AtomicBool,

    registry: Arc<StreamRegistry<S>>,
    stats: DispatchStats,

    stats_interval: Duration,
    drain_on_stop: bool,
}

impl<S: Stream> Dispatcher<S> {
    /// Create a dispatcher routing frames through `registry`
    pub fn new(
        app_name: impl Into<String>,
        app_id: u32,
        registry: Arc<StreamRegistry<S>>,
        config: &ApplicationConfig,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            app_id,
            video_queue: DispatchQueue::new(),
            audio_queue: DispatchQueue::new(),
            packet_queue: DispatchQueue::new(),
            wake: Notify::new(),
            stop_requested: AtomicBool::new(false),
            registry,
            stats: DispatchStats::new(),
            stats_interval: config.stats_interval,
            drain_on_stop: config.drain_on_stop,
        }
    }

    /// Queue a video frame for `stream`
    pub fn submit_video(&self, stream: &Arc<StreamInfo>, packet: Arc<MediaPacket>) {
        if let Some(ms) = Self::timestamp_ms(stream, &packet) {
            self.stats.set_last_video_ts(ms);
        }
        self.video_queue.push(FrameItem {
            stream: Arc::clone(stream),
            packet,
        });
        self.wake.notify_one();
    }

    /// Queue an audio frame for `stream`
    pub fn submit_audio(&self, stream: &Arc<StreamInfo>, packet: Arc<MediaPacket>) {
        if let Some(ms) = Self::timestamp_ms(stream, &packet) {
            self.stats.set_last_audio_ts(ms);
        }
        self.audio_queue.push(FrameItem {
            stream: Arc::clone(stream),
            packet,
        });
        self.wake.notify_one();
    }

    /// Queue a raw client packet for `session`
    pub fn submit_packet(&self, session: Weak<dyn Session>, data: Bytes) {
        self.packet_queue.push(PacketItem { session, data });
        self.wake.notify_one();
    }

    fn timestamp_ms(stream: &StreamInfo, packet: &MediaPacket) -> Option<i64> {
        stream
            .track(packet.track_id)
            .map(|track| track.timebase.to_millis(packet.pts))
    }

    /// Current number of pending items per queue
    pub fn queue_depths(&self) -> QueueDepths {
        QueueDepths {
            video: self.video_queue.len(),
            audio: self.audio_queue.len(),
            packets: self.packet_queue.len(),
        }
    }

    /// Routing counters
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Ask the dispatch task to exit and wake it up
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    /// Clear a previous stop request before spawning a new task
    pub(crate) fn reset_stop(&self) {
        self.stop_requested.store(false, Ordering::Release);
    }

    /// Whether a stop has been requested
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Route at most one item from each queue
    ///
    /// Returns `true` if any queue yielded an item.
    pub async fn dispatch_once(&self) -> bool {
        let mut drained = false;

        if let Some(entry) = self.video_queue.try_pop() {
            drained = true;
            self.route_frame(MediaType::Video, entry).await;
        }

        if let Some(entry) = self.audio_queue.try_pop() {
            drained = true;
            self.route_frame(MediaType::Audio, entry).await;
        }

        if let Some(entry) = self.packet_queue.try_pop() {
            drained = true;
            self.route_packet(entry);
        }

        drained
    }

    async fn route_frame(&self, media_type: MediaType, entry: Sequenced<FrameItem>) {
        let Sequenced { seq, item } = entry;
        let stream_id = item.stream.id();

        let Some(stream) = self.registry.get(stream_id).await else {
            // Stream deleted between submit and drain
            self.stats.record_dropped_frame();
            tracing::trace!(
                app = %self.app_name,
                stream_id,
                seq,
                media = %media_type,
                "Dropping frame for unknown stream"
            );
            return;
        };

        let delivered = panic::catch_unwind(AssertUnwindSafe(|| match media_type {
            MediaType::Video => stream.send_video_frame(item.packet),
            MediaType::Audio => stream.send_audio_frame(item.packet),
        }));

        match (delivered, media_type) {
            (Ok(()), MediaType::Video) => self.stats.record_video_delivered(),
            (Ok(()), MediaType::Audio) => self.stats.record_audio_delivered(),
            (Err(payload), _) => {
                self.stats.record_dropped_frame();
                tracing::error!(
                    app = %self.app_name,
                    stream_id,
                    seq,
                    media = %media_type,
                    panic = panic_message(&*payload),
                    "Stream panicked while handling frame"
                );
            }
        }
    }

    fn route_packet(&self, entry: Sequenced<PacketItem>) {
        let Sequenced { seq, item } = entry;

        let Some(session) = item.session.upgrade() else {
            self.stats.record_dropped_packet();
            tracing::trace!(app = %self.app_name, seq, "Dropping packet for closed session");
            return;
        };

        let data = item.data;
        match panic::catch_unwind(AssertUnwindSafe(|| session.on_packet_received(data))) {
            Ok(()) => self.stats.record_packet_delivered(),
            Err(payload) => {
                self.stats.record_dropped_packet();
                tracing::error!(
                    app = %self.app_name,
                    session_id = session.id(),
                    seq,
                    panic = panic_message(&*payload),
                    "Session panicked while handling packet"
                );
            }
        }
    }

    fn log_queue_depths(&self) {
        let depths = self.queue_depths();
        self.stats.record_snapshot();
        tracing::debug!(
            app = %self.app_name,
            app_id = self.app_id,
            video_queue = depths.video,
            audio_queue = depths.audio,
            packet_queue = depths.packets,
            dropped = self.stats.dropped(),
            "Publisher queue stats"
        );
    }

    /// Dispatch loop; returns once a stop has been requested
    pub async fn run(self: Arc<Self>) {
        tracing::debug!(app = %self.app_name, app_id = self.app_id, "Dispatch task started");

        let mut stats_watch = Instant::now();
        let mut idle = true;

        while !self.is_stop_requested() {
            if stats_watch.elapsed() >= self.stats_interval {
                stats_watch = Instant::now();
                self.log_queue_depths();
            }

            if idle {
                self.wake.notified().await;

                if self.is_stop_requested() {
                    break;
                }
            }

            idle = !self.dispatch_once().await;
        }

        if self.drain_on_stop {
            while self.dispatch_once().await {}
        }

        tracing::debug!(
            app = %self.app_name,
            app_id = self.app_id,
            pending = self.queue_depths().total(),
            "Dispatch task stopped"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
