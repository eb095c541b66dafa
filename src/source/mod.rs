//! Snapshot sources for sensor data.
//!
//! This module provides a trait-based abstraction over where raw snapshots
//! come from: the Firebase Realtime Database REST API, a local JSON file, or
//! an in-memory channel fed by an embedding program.

mod channel;
mod file;
mod firebase;
mod snapshot;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use firebase::{FirebaseSource, SourceError};
pub use snapshot::RawSnapshot;

use std::fmt::Debug;

/// Trait for reading the sensor collection from a backing store.
///
/// Every call to [`fetch`](Self::fetch) performs one full read; callers are
/// expected to bound how often that happens (see
/// [`TtlCache`](crate::data::TtlCache)).
///
/// # Example
///
/// ```
/// use agriwatch::{FileSource, SnapshotSource};
///
/// let mut source = FileSource::new("sensor_data.json");
/// if let Some(snapshot) = source.fetch() {
///     println!("Got {} date folders", snapshot.len());
/// }
/// ```
pub trait SnapshotSource: Send + Debug {
    /// Read the whole collection.
    ///
    /// Returns `None` when the store is empty or could not be read; the
    /// reason for a failed read is available from [`error`](Self::error).
    /// This call may block.
    fn fetch(&mut self) -> Option<RawSnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Error message from the last fetch, if it failed.
    fn error(&self) -> Option<&str>;
}
