//! Stream registry
//!
//! Maps stream ids to the live streams of one application. Lookups from the
//! dispatch task and from query paths take the read lock and run
//! concurrently; create and delete take the write lock.
//!
//! ```text
//!                    StreamRegistry<S>
//!              ┌──────────────────────────┐
//!              │ RwLock<HashMap<          │
//!              │   StreamId, Arc<S>>>     │
//!              └────────────┬─────────────┘
//!                           │
//!        ┌──────────────────┼───────────────────┐
//!        │ read             │ read              │ write
//!        ▼                  ▼                   ▼
//!   dispatch task     get_stream(..)     create / delete
//! ```
//!
//! Lookups hand out a cloned `Arc<S>`, so the lock is never held while a
//! frame is delivered.

pub mod error;
pub mod store;

pub use error::RegistryError;
pub use store::StreamRegistry;
