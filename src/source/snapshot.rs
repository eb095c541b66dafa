//! Raw snapshot shape delivered by the remote store.
//!
//! The store returns a tree: date folders at the top, epoch-second keys
//! below them, and a flat record of sensor values at the leaves:
//!
//! ```json
//! {
//!   "2024-05-01": {
//!     "1714521600": { "temperature": 45, "ph": 9.0, "tds": 900, "turbidity": 7.5 }
//!   }
//! }
//! ```
//!
//! Folder contents are kept as untyped JSON so that a single malformed
//! branch cannot fail deserialization of the whole tree. Normalization
//! decides what to keep.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A full read of the sensor collection, keyed by date folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSnapshot(pub BTreeMap<String, Value>);

impl RawSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a response body. A JSON `null` (what the store returns for a
    /// missing collection) yields `None`.
    pub fn from_json(body: &str) -> serde_json::Result<Option<Self>> {
        serde_json::from_str(body)
    }

    /// Insert a date folder.
    pub fn insert(&mut self, folder: impl Into<String>, entries: Value) {
        self.0.insert(folder.into(), entries);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of date folders.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over `(date folder, folder contents)`.
    pub fn folders(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "2024-05-01": {
                "1714521600": { "temperature": 45, "ph": 9.0, "tds": 900, "turbidity": 7.5 }
            },
            "2024-05-02": "corrupted"
        }"#;

        let snapshot = RawSnapshot::from_json(json).unwrap().unwrap();
        assert_eq!(snapshot.len(), 2);

        let (folder, entries) = snapshot.folders().next().unwrap();
        assert_eq!(folder, "2024-05-01");
        assert_eq!(entries["1714521600"]["tds"], 900);
    }

    #[test]
    fn test_null_body_is_absent() {
        assert!(RawSnapshot::from_json("null").unwrap().is_none());
    }

    #[test]
    fn test_non_object_body_is_error() {
        assert!(RawSnapshot::from_json("[1, 2, 3]").is_err());
    }
}
