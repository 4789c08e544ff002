//! Shared type aliases used across MediaShift crates.

/// Document ids are opaque strings assigned by the world server.
pub type DocId = String;

/// Identifier of a single migration run.
pub type RunId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
