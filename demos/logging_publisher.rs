//! Minimal publisher application that logs every frame it receives
//!
//! Run with: RUST_LOG=debug cargo run --example logging_publisher
//!
//! Simulates a router feeding two streams and a client session sending
//! packets, then deletes one stream while frames are still arriving.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use tracing_subscriber::EnvFilter;

use media_dispatch::{
    Application, ApplicationConfig, ApplicationHandler, ApplicationInfo, MediaPacket, MediaTrack,
    Publisher, Session, SessionId, Stream, StreamId, StreamInfo,
};

struct LogPublisher;

impl Publisher for LogPublisher {
    fn publisher_name(&self) -> &str {
        "Log"
    }
}

/// Stream that only counts and logs frames
struct LogStream {
    info: Arc<StreamInfo>,
    frames: AtomicU64,
}

impl Stream for LogStream {
    fn id(&self) -> StreamId {
        self.info.id()
    }

    fn name(&self) -> &str {
        self.info.name()
    }

    fn send_video_frame(&self, packet: Arc<MediaPacket>) {
        let n = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(stream = %self.info, pts = packet.pts, keyframe = packet.is_keyframe, n, "video");
    }

    fn send_audio_frame(&self, packet: Arc<MediaPacket>) {
        let n = self.frames.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::debug!(stream = %self.info, pts = packet.pts, n, "audio");
    }

    fn stop(&self) {
        tracing::info!(
            stream = %self.info,
            frames = self.frames.load(Ordering::Relaxed),
            "Stream stopped"
        );
    }
}

struct LogHandler;

impl ApplicationHandler for LogHandler {
    type Stream = LogStream;

    fn create_stream(
        &self,
        info: &Arc<StreamInfo>,
        config: &ApplicationConfig,
        worker_count: usize,
    ) -> Option<Arc<LogStream>> {
        tracing::info!(
            stream = %info,
            workers = worker_count,
            segments = config.segment_count,
            segment_secs = config.segment_duration,
            cross_domains = ?config.cross_domains,
            "Creating stream"
        );
        Some(Arc::new(LogStream {
            info: Arc::clone(info),
            frames: AtomicU64::new(0),
        }))
    }

    fn delete_stream(&self, info: &Arc<StreamInfo>, stream: &Arc<LogStream>) -> bool {
        tracing::info!(
            stream = %info,
            frames = stream.frames.load(Ordering::Relaxed),
            "Releasing stream"
        );
        true
    }
}

struct EchoSession(SessionId);

impl Session for EchoSession {
    fn id(&self) -> SessionId {
        self.0
    }

    fn on_packet_received(&self, data: Bytes) {
        tracing::debug!(session_id = self.0, len = data.len(), "packet");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let publisher = Arc::new(LogPublisher);
    let config = ApplicationConfig::default()
        .with_thread_count(2)
        .segments(4, 2)
        .cross_domain("https://player.example.com")
        .stats_interval(Duration::from_secs(1))
        .drain_on_stop(true);
    let app = Arc::new(
        Application::new(ApplicationInfo::new(1, "live"), config, LogHandler).with_publisher(&publisher),
    );

    app.start().await?;

    let streams: Vec<Arc<StreamInfo>> = (1..=2)
        .map(|id| {
            Arc::new(
                StreamInfo::new(id, format!("camera{}", id))
                    .with_track(MediaTrack::video(0))
                    .with_track(MediaTrack::audio(1, 48_000)),
            )
        })
        .collect();
    for info in &streams {
        app.on_create_stream(info).await?;
    }

    let session: Arc<dyn Session> = Arc::new(EchoSession(100));

    for i in 0..90i64 {
        for info in &streams {
            let video = MediaPacket::video(0, i * 3000, i * 3000, Bytes::from_static(&[0x41]), i % 30 == 0);
            app.submit_video_frame(info, Arc::new(video));
            let audio = MediaPacket::audio(1, i * 1600, Bytes::from_static(&[0xff, 0xf1]));
            app.submit_audio_frame(info, Arc::new(audio));
        }
        if i % 10 == 0 {
            app.submit_packet(&session, Bytes::from_static(b"\x80\xc8"));
        }
        if i == 45 {
            app.on_delete_stream(&streams[1]).await?;
        }
        tokio::time::sleep(Duration::from_millis(33)).await;
    }

    app.stop().await?;

    let stats = app.stats();
    tracing::info!(
        app = app.type_name(),
        video = stats.video_delivered,
        audio = stats.audio_delivered,
        packets = stats.packets_delivered,
        dropped = stats.dropped_frames,
        last_video_ms = stats.last_video_ts_ms,
        "Done"
    );

    Ok(())
}
