//! Publisher applications
//!
//! An [`Application`] owns the queues, the dispatch task and the stream
//! registry of one publisher application. Protocol-specific behaviour is
//! plugged in through an [`ApplicationHandler`].

pub mod app;
pub mod config;
pub mod handler;

pub use app::{Application, ApplicationInfo};
pub use config::ApplicationConfig;
pub use handler::{ApplicationHandler, Publisher};
