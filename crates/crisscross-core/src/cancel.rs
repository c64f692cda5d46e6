//! Cooperative cancellation for multi-step operations.
//!
//! The sync orchestrator polls [`CancellationToken::is_cancelled`] between
//! steps only; a backend call that has already started always runs to
//! completion. The CLI's Ctrl-C watcher holds a clone and cancels it.

pub use tokio_util::sync::CancellationToken;
