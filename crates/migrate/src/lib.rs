//! The MediaShift migration engine.
//!
//! - [`resolver`] — decides, per image reference, whether an existing WebP
//!   sibling replaces it.
//! - [`walker`] — traverses the world's collections, persists rewritten
//!   references, accumulates counters, and reports progress.
//! - [`report`] — the end-of-run outcome.
//! - [`dry_run`] — a store decorator that records planned changes instead
//!   of applying them.

pub mod dry_run;
pub mod error;
pub mod report;
pub mod resolver;
pub mod walker;

pub use dry_run::{DryRunStore, PlannedChange};
pub use error::MigrationError;
pub use report::MigrationReport;
pub use resolver::PathResolver;
pub use walker::Migrator;
