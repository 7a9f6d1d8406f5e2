//! Application lifecycle and entry points
//!
//! Three kinds of callers talk to an application concurrently:
//!
//! - the media router announces streams (`on_create_stream`,
//!   `on_delete_stream`) and submits frames
//! - the network ingress submits raw client packets
//! - query paths look streams up by id or name
//!
//! Submissions only enqueue; all delivery happens on the dispatch task
//! started by [`Application::start`].

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock, Weak};

use bytes::Bytes;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::config::ApplicationConfig;
use super::handler::{ApplicationHandler, Publisher};
use crate::dispatch::{DispatchState, Dispatcher};
use crate::error::{Error, Result};
use crate::media::MediaPacket;
use crate::registry::{RegistryError, StreamRegistry};
use crate::session::Session;
use crate::stats::{DispatchSnapshot, QueueDepths};
use crate::stream::{Stream, StreamId, StreamInfo};

/// Identity of an application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationInfo {
    /// Numeric application id
    pub id: u32,
    /// Application name (e.g. "live")
    pub name: String,
}

impl ApplicationInfo {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ApplicationInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

/// A publisher application: stream registry plus dispatch task
pub struct Application<H: ApplicationHandler> {
    info: ApplicationInfo,
    config: ApplicationConfig,
    handler: H,

    /// Owning publisher, only used to build the display name
    publisher: Option<Weak<dyn Publisher>>,
    type_name: OnceLock<String>,

    registry: Arc<StreamRegistry<H::Stream>>,
    dispatcher: Arc<Dispatcher<H::Stream>>,

    /// Serializes start/stop; holds the running dispatch task
    worker: Mutex<Option<JoinHandle<()>>>,
    state: AtomicU8,
}

impl<H: ApplicationHandler> Application<H> {
    /// Create a stopped application
    pub fn new(info: ApplicationInfo, config: ApplicationConfig, handler: H) -> Self {
        let registry = Arc::new(StreamRegistry::new());
        let dispatcher = Arc::new(Dispatcher::new(
            info.name.clone(),
            info.id,
            Arc::clone(&registry),
            &config,
        ));

        Self {
            info,
            config,
            handler,
            publisher: None,
            type_name: OnceLock::new(),
            registry,
            dispatcher,
            worker: Mutex::new(None),
            state: AtomicU8::new(DispatchState::Stopped.as_u8()),
        }
    }

    /// Attach the owning publisher
    ///
    /// Only a weak reference is kept; the publisher owns the application.
    pub fn with_publisher<P: Publisher>(mut self, publisher: &Arc<P>) -> Self {
        let publisher: Weak<P> = Arc::downgrade(publisher);
        self.publisher = Some(publisher);
        self
    }

    pub fn info(&self) -> &ApplicationInfo {
        &self.info
    }

    pub fn id(&self) -> u32 {
        self.info.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn config(&self) -> &ApplicationConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Display name such as "HLS Application"
    ///
    /// Formatted on first use and cached. Empty while no publisher is
    /// attached or after it has been dropped.
    pub fn type_name(&self) -> &str {
        if let Some(name) = self.type_name.get() {
            return name;
        }

        match self.publisher.as_ref().and_then(Weak::upgrade) {
            Some(publisher) => self
                .type_name
                .get_or_init(|| format!("{} Application", publisher.publisher_name()))
                .as_str(),
            None => "",
        }
    }

    /// Current state of the dispatch task
    pub fn state(&self) -> DispatchState {
        DispatchState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Whether the dispatch task is running
    pub fn is_running(&self) -> bool {
        self.state() == DispatchState::Running
    }

    fn set_state(&self, state: DispatchState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Spawn the dispatch task
    ///
    /// Must be called from within a tokio runtime. Starting a running
    /// application is a no-op; a task that exited on its own is replaced.
    pub async fn start(&self) -> Result<()> {
        let mut worker = self.worker.lock().await;
        match worker.take() {
            Some(handle) if !handle.is_finished() => {
                *worker = Some(handle);
                return Ok(());
            }
            Some(handle) => {
                if let Err(e) = handle.await {
                    tracing::warn!(
                        app = %self.info.name,
                        app_id = self.info.id,
                        error = %e,
                        "Replacing exited dispatch task"
                    );
                }
            }
            None => {}
        }

        self.dispatcher.reset_stop();
        *worker = Some(tokio::spawn(Arc::clone(&self.dispatcher).run()));
        self.set_state(DispatchState::Running);

        tracing::info!(
            app = %self.info.name,
            app_id = self.info.id,
            kind = self.type_name(),
            "Application started"
        );

        Ok(())
    }

    /// Stop the dispatch task and wait for it to exit
    ///
    /// The task finishes the cycle it is in. Items still queued stay queued
    /// unless `drain_on_stop` is set. Stopping a stopped application is a
    /// no-op.
    pub async fn stop(&self) -> Result<()> {
        let mut worker = self.worker.lock().await;
        let Some(handle) = worker.take() else {
            return Ok(());
        };

        self.set_state(DispatchState::StopRequested);
        self.dispatcher.request_stop();

        let result = handle.await;
        self.set_state(DispatchState::Stopped);

        match result {
            Ok(()) => {
                tracing::info!(
                    app = %self.info.name,
                    app_id = self.info.id,
                    kind = self.type_name(),
                    pending = self.queue_depths().total(),
                    "Application stopped"
                );
                Ok(())
            }
            Err(e) if e.is_panic() => {
                tracing::error!(
                    app = %self.info.name,
                    app_id = self.info.id,
                    error = %e,
                    "Dispatch task panicked"
                );
                Err(e.into())
            }
            Err(e) => {
                tracing::warn!(
                    app = %self.info.name,
                    app_id = self.info.id,
                    "Dispatch task cancelled"
                );
                Err(e.into())
            }
        }
    }

    /// Build and register a stream announced by the router
    pub async fn on_create_stream(&self, info: &Arc<StreamInfo>) -> Result<Arc<H::Stream>> {
        let id = info.id();

        if self.registry.contains(id).await {
            tracing::warn!(app = %self.info.name, stream = %info, "Stream already exists");
            return Err(RegistryError::DuplicateStream(id).into());
        }

        let worker_count = self.config.thread_count();
        let Some(stream) = self.handler.create_stream(info, &self.config, worker_count) else {
            tracing::warn!(app = %self.info.name, stream = %info, "Handler failed to create stream");
            return Err(Error::StreamCreationFailed {
                id,
                name: info.name().to_string(),
            });
        };

        // A concurrent create with the same id may have won the insert
        if let Err(e) = self.registry.insert(id, Arc::clone(&stream)).await {
            stream.stop();
            tracing::warn!(app = %self.info.name, stream = %info, "Stream already exists");
            return Err(e.into());
        }

        tracing::info!(
            app = %self.info.name,
            stream_id = id,
            stream = info.name(),
            workers = worker_count,
            "Stream created"
        );

        Ok(stream)
    }

    /// Tear down a stream deleted by the router
    ///
    /// The handler is notified first, while the stream is still registered.
    /// Only if it agrees is the stream removed and then stopped.
    pub async fn on_delete_stream(&self, info: &Arc<StreamInfo>) -> Result<()> {
        let id = info.id();

        let Some(stream) = self.registry.get(id).await else {
            tracing::warn!(app = %self.info.name, stream = %info, "Cannot find stream to delete");
            return Err(RegistryError::StreamNotFound(id).into());
        };

        if !self.handler.delete_stream(info, &stream) {
            tracing::warn!(app = %self.info.name, stream = %info, "Handler rejected stream deletion");
            return Err(Error::StreamDeletionRejected {
                id,
                name: info.name().to_string(),
            });
        }

        self.registry.remove_entry(id, &stream).await?;
        stream.stop();

        tracing::info!(
            app = %self.info.name,
            stream_id = id,
            stream = info.name(),
            "Stream deleted"
        );

        Ok(())
    }

    /// Queue a video frame; called from the router
    pub fn submit_video_frame(&self, stream: &Arc<StreamInfo>, packet: Arc<MediaPacket>) {
        self.dispatcher.submit_video(stream, packet);
    }

    /// Queue an audio frame; called from the router
    pub fn submit_audio_frame(&self, stream: &Arc<StreamInfo>, packet: Arc<MediaPacket>) {
        self.dispatcher.submit_audio(stream, packet);
    }

    /// Queue a raw packet received from a client session
    ///
    /// The queue does not keep the session alive; a packet whose session is
    /// gone by the time it is drained is dropped.
    pub fn submit_packet(&self, session: &Arc<dyn Session>, data: Bytes) {
        self.dispatcher.submit_packet(Arc::downgrade(session), data);
    }

    /// Look up a stream by id
    pub async fn get_stream(&self, id: StreamId) -> Option<Arc<H::Stream>> {
        self.registry.get(id).await
    }

    /// Look up the first stream with the given name
    pub async fn get_stream_by_name(&self, name: &str) -> Option<Arc<H::Stream>> {
        self.registry.get_by_name(name).await
    }

    /// Snapshot of all registered streams
    pub async fn streams(&self) -> Vec<Arc<H::Stream>> {
        self.registry.streams().await
    }

    /// Number of registered streams
    pub async fn stream_count(&self) -> usize {
        self.registry.len().await
    }

    /// Pending items per queue
    pub fn queue_depths(&self) -> QueueDepths {
        self.dispatcher.queue_depths()
    }

    /// Routing counters and queue depths
    pub fn stats(&self) -> DispatchSnapshot {
        self.dispatcher.stats().snapshot(self.queue_depths())
    }
}

impl<H: ApplicationHandler> Drop for Application<H> {
    fn drop(&mut self) {
        // The task owns its own handle on the dispatcher and exits on wake
        self.dispatcher.request_stop();
    }
}
