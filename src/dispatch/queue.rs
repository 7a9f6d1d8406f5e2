//! Unbounded FIFO queues between producers and the dispatch task
//!
//! Each queue has its own lock, held only for the push or pop itself. The
//! queues never block a producer on consumer pace; memory grows under
//! sustained overload instead.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use bytes::Bytes;

use crate::media::MediaPacket;
use crate::session::Session;
use crate::stream::StreamInfo;

/// A media frame waiting to be routed to its stream
#[derive(Debug, Clone)]
pub struct FrameItem {
    /// Descriptor of the destination stream
    pub stream: Arc<StreamInfo>,
    /// The frame itself
    pub packet: Arc<MediaPacket>,
}

/// A raw client packet waiting to be handed to its session
#[derive(Clone)]
pub struct PacketItem {
    /// Session the packet came from; not kept alive by the queue
    pub session: Weak<dyn Session>,
    /// Packet payload
    pub data: Bytes,
}

impl std::fmt::Debug for PacketItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketItem")
            .field("session_alive", &(self.session.strong_count() > 0))
            .field("len", &self.data.len())
            .finish()
    }
}

/// An item stamped with its arrival order in the queue
#[derive(Debug, Clone)]
pub struct Sequenced<T> {
    /// Arrival order, starting at 0 for the first push
    ///
    /// Carried into the `seq` field of the dispatcher's drop and panic logs
    /// so a lost item can be matched to its submit.
    pub seq: u64,
    pub item: T,
}

struct Inner<T> {
    items: VecDeque<Sequenced<T>>,
    next_seq: u64,
}

/// Unbounded multi-producer FIFO
pub struct DispatchQueue<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> DispatchQueue<T> {
    /// Create an empty queue
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                next_seq: 0,
            }),
        }
    }

    // A panicking producer cannot leave the deque half-updated, so a
    // poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an item, returning its sequence number
    pub fn push(&self, item: T) -> u64 {
        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.items.push_back(Sequenced { seq, item });
        seq
    }

    /// Remove the oldest item, if any
    pub fn try_pop(&self) -> Option<Sequenced<T>> {
        self.lock().items.pop_front()
    }

    /// Number of pending items
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }
}

impl<T> Default for DispatchQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn test_fifo() {
        let queue = DispatchQueue::new();
        assert!(queue.try_pop().is_none());

        assert_eq!(queue.push("a"), 0);
        assert_eq!(queue.push("b"), 1);
        assert_eq!(queue.push("c"), 2);
        assert_eq!(queue.len(), 3);

        let popped: Vec<_> = std::iter::from_fn(|| queue.try_pop()).collect();
        assert_eq!(
            popped.iter().map(|s| s.item).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_sequence_continues_after_drain() {
        let queue = DispatchQueue::new();
        queue.push(1);
        queue.try_pop();

        assert_eq!(queue.push(2), 1);
    }

    #[test]
    fn test_concurrent_producers_keep_order() {
        let queue = Arc::new(DispatchQueue::new());
        let producers: Vec<_> = (0..4)
            .map(|producer| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || {
                    for n in 0..250 {
                        queue.push((producer, n));
                    }
                })
            })
            .collect();
        for p in producers {
            p.join().unwrap();
        }

        let drained: Vec<_> = std::iter::from_fn(|| queue.try_pop()).collect();
        assert_eq!(drained.len(), 1000);

        // Drain order is push order
        for (i, entry) in drained.iter().enumerate() {
            assert_eq!(entry.seq, i as u64);
        }

        // Each producer's items come out in the order it pushed them
        for producer in 0..4 {
            let ns: Vec<_> = drained
                .iter()
                .filter(|e| e.item.0 == producer)
                .map(|e| e.item.1)
                .collect();
            assert_eq!(ns, (0..250).collect::<Vec<_>>());
        }
    }
}
