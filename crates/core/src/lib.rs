//! Core domain types for the MediaShift WebP reference migration.
//!
//! Everything in this crate is pure: asset extension rules, dotted-path
//! field patches, per-run counters, and world collection addressing. No
//! I/O and no async; the host-facing clients live in `mediashift-world`.

pub mod asset;
pub mod patch;
pub mod stats;
pub mod types;
pub mod world;
