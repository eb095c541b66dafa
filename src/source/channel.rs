//! Channel-based snapshot source.
//!
//! Receives snapshots via a tokio watch channel. Useful when another part of
//! the program (for example a streaming listener on the store) already holds
//! the latest tree and pushes it rather than having it re-read.

use tokio::sync::watch;

use super::{RawSnapshot, SnapshotSource};

/// A source that hands out the latest snapshot sent through a channel.
///
/// # Example
///
/// ```
/// use agriwatch::{ChannelSource, RawSnapshot, SnapshotSource};
///
/// let (tx, mut source) = ChannelSource::create("listener");
/// tx.send(Some(RawSnapshot::new())).unwrap();
/// assert!(source.fetch().is_some());
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<RawSnapshot>>,
    description: String,
    last_error: Option<String>,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - Where snapshots come from, for the status bar
    pub fn new(receiver: watch::Receiver<Option<RawSnapshot>>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            last_error: None,
        }
    }

    /// Create a channel pair. The channel starts out holding `None` (no data).
    pub fn create(source_description: &str) -> (watch::Sender<Option<RawSnapshot>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(rx, source_description))
    }
}

impl SnapshotSource for ChannelSource {
    fn fetch(&mut self) -> Option<RawSnapshot> {
        if self.receiver.has_changed().is_err() {
            self.last_error = Some("Sender closed".to_string());
        }
        // The last value stays readable after the sender is dropped
        self.receiver.borrow_and_update().clone()
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_source_fetch() {
        let (tx, mut source) = ChannelSource::create("test");
        assert_eq!(source.description(), "channel: test");

        // Nothing sent yet
        assert!(source.fetch().is_none());

        let mut snapshot = RawSnapshot::new();
        snapshot.insert("2024-05-01", json!({ "1714521600": { "ph": 7.0 } }));
        tx.send(Some(snapshot)).unwrap();

        // Every fetch returns the latest value
        assert_eq!(source.fetch().unwrap().len(), 1);
        assert_eq!(source.fetch().unwrap().len(), 1);
        assert!(source.error().is_none());
    }

    #[test]
    fn test_channel_source_sender_dropped() {
        let (tx, mut source) = ChannelSource::create("test");
        tx.send(Some(RawSnapshot::new())).unwrap();
        drop(tx);

        assert!(source.fetch().is_some());
        assert_eq!(source.error(), Some("Sender closed"));
    }
}
