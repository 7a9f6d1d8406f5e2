//! Queues and the dispatch task
//!
//! Producers push into one of three independent FIFO queues and signal a
//! shared wake event. A single task per application drains at most one
//! item from each queue per cycle, so a flooded channel cannot starve the
//! other two.

pub mod queue;
pub mod state;
pub mod worker;

pub use queue::{DispatchQueue, FrameItem, PacketItem, Sequenced};
pub use state::DispatchState;
pub use worker::Dispatcher;
