//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:  resolve config → init logging/metrics → bind → serve
//! Signals:  SIGTERM/SIGINT → graceful shutdown → exit 0
//! Shutdown: broadcast to background tasks → drain → stop
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
