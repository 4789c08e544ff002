//! Progress event infrastructure for MediaShift.
//!
//! Provides the in-process publish/subscribe hub migration runs report
//! through:
//!
//! - [`EventBus`] — fan-out hub backed by `tokio::sync::broadcast`.
//! - [`MigrationEvent`] / [`EventKind`] — the progress event envelope.

pub mod bus;

pub use bus::{EventBus, EventKind, MigrationEvent};
