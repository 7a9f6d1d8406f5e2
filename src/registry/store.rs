//! Stream registry implementation

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::error::RegistryError;
use crate::stream::{Stream, StreamId};

/// Registry of the live streams of one application
///
/// Thread-safe via `RwLock`. The workload is read-heavy: every dispatched
/// frame performs a lookup, while inserts and removals only happen when the
/// router creates or deletes a stream.
pub struct StreamRegistry<S: Stream> {
    /// Map of stream id to stream
    streams: RwLock<HashMap<StreamId, Arc<S>>>,
}

impl<S: Stream> StreamRegistry<S> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
        }
    }

    /// Register a stream under `id`
    ///
    /// Fails if the id is already taken; the existing entry is left untouched.
    pub async fn insert(&self, id: StreamId, stream: Arc<S>) -> Result<(), RegistryError> {
        let mut streams = self.streams.write().await;

        if streams.contains_key(&id) {
            return Err(RegistryError::DuplicateStream(id));
        }

        streams.insert(id, stream);

        tracing::debug!(stream_id = id, streams = streams.len(), "Stream registered");

        Ok(())
    }

    /// Look up a stream by id
    pub async fn get(&self, id: StreamId) -> Option<Arc<S>> {
        self.streams.read().await.get(&id).cloned()
    }

    /// Look up a stream by name
    ///
    /// Linear scan; returns the first match. Applications only carry a
    /// handful of streams.
    pub async fn get_by_name(&self, name: &str) -> Option<Arc<S>> {
        self.streams
            .read()
            .await
            .values()
            .find(|stream| stream.name() == name)
            .cloned()
    }

    /// Check whether a stream is registered
    pub async fn contains(&self, id: StreamId) -> bool {
        self.streams.read().await.contains_key(&id)
    }

    /// Remove a stream, returning it
    pub async fn remove(&self, id: StreamId) -> Result<Arc<S>, RegistryError> {
        let mut streams = self.streams.write().await;

        let stream = streams
            .remove(&id)
            .ok_or(RegistryError::StreamNotFound(id))?;

        tracing::debug!(stream_id = id, streams = streams.len(), "Stream unregistered");

        Ok(stream)
    }

    /// Remove `stream` if it is still the entry registered under `id`
    ///
    /// A stream that was deleted and re-created under the same id in the
    /// meantime is left alone.
    pub async fn remove_entry(&self, id: StreamId, stream: &Arc<S>) -> Result<Arc<S>, RegistryError> {
        let mut streams = self.streams.write().await;

        match streams.get(&id) {
            Some(current) if Arc::ptr_eq(current, stream) => {}
            _ => return Err(RegistryError::StreamNotFound(id)),
        }

        let removed = streams
            .remove(&id)
            .ok_or(RegistryError::StreamNotFound(id))?;

        tracing::debug!(stream_id = id, streams = streams.len(), "Stream unregistered");

        Ok(removed)
    }

    /// Snapshot of all registered streams
    pub async fn streams(&self) -> Vec<Arc<S>> {
        self.streams.read().await.values().cloned().collect()
    }

    /// Get total number of streams
    pub async fn len(&self) -> usize {
        self.streams.read().await.len()
    }

    /// Whether no stream is registered
    pub async fn is_empty(&self) -> bool {
        self.streams.read().await.is_empty()
    }
}

impl<S: Stream> Default for StreamRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::testing::RecordingStream;

    fn stream(id: StreamId, name: &str) -> Arc<RecordingStream> {
        Arc::new(RecordingStream::new(id, name))
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let registry = StreamRegistry::new();
        let s = stream(7, "camera");

        assert_ok!(registry.insert(7, Arc::clone(&s)).await);

        let found = registry.get(7).await.unwrap();
        assert!(Arc::ptr_eq(&found, &s));
        assert!(registry.contains(7).await);
        assert!(registry.get(8).await.is_none());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_existing() {
        let registry = StreamRegistry::new();
        let first = stream(1, "first");

        assert_ok!(registry.insert(1, Arc::clone(&first)).await);
        let result = registry.insert(1, stream(1, "second")).await;
        assert_eq!(result, Err(RegistryError::DuplicateStream(1)));

        let found = registry.get(1).await.unwrap();
        assert!(Arc::ptr_eq(&found, &first));
    }

    #[tokio::test]
    async fn test_get_by_name() {
        let registry = StreamRegistry::new();
        assert_ok!(registry.insert(1, stream(1, "alpha")).await);
        assert_ok!(registry.insert(2, stream(2, "beta")).await);

        assert_eq!(registry.get_by_name("beta").await.map(|s| s.id()), Some(2));
        assert!(registry.get_by_name("gamma").await.is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let registry = StreamRegistry::new();
        assert_ok!(registry.insert(3, stream(3, "s")).await);

        let removed = assert_ok!(registry.remove(3).await);
        assert_eq!(removed.id(), 3);
        assert!(registry.get(3).await.is_none());
        assert!(registry.is_empty().await);

        let err = assert_err!(registry.remove(3).await);
        assert_eq!(err, RegistryError::StreamNotFound(3));
    }

    #[tokio::test]
    async fn test_remove_entry_ignores_replacement() {
        let registry = StreamRegistry::new();
        let old = stream(4, "old");
        assert_ok!(registry.insert(4, Arc::clone(&old)).await);
        assert_ok!(registry.remove(4).await);

        let new = stream(4, "new");
        assert_ok!(registry.insert(4, Arc::clone(&new)).await);

        let err = assert_err!(registry.remove_entry(4, &old).await);
        assert_eq!(err, RegistryError::StreamNotFound(4));
        assert!(registry.contains(4).await);

        let removed = assert_ok!(registry.remove_entry(4, &new).await);
        assert!(Arc::ptr_eq(&removed, &new));
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_id_reuse_after_remove() {
        let registry = StreamRegistry::new();
        assert_ok!(registry.insert(5, stream(5, "old")).await);
        assert_ok!(registry.remove(5).await);
        assert_ok!(registry.insert(5, stream(5, "new")).await);

        assert_eq!(registry.get(5).await.map(|s| s.name().to_string()), Some("new".to_string()));
    }

    #[tokio::test]
    async fn test_streams_snapshot() {
        let registry = StreamRegistry::new();
        for id in 0..4 {
            assert_ok!(registry.insert(id, stream(id, "s")).await);
        }

        let mut ids: Vec<_> = registry.streams().await.iter().map(|s| s.id()).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
