//! File-based snapshot source.
//!
//! Reads a JSON export of the sensor collection from disk.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RawSnapshot, SnapshotSource};

/// A source that reads the snapshot tree from a JSON file.
///
/// Useful offline, for demos, and with exports produced by the Firebase
/// console ("Export JSON" on the `sensor_data` node). The file is re-read on
/// every fetch so edits show up on the next cache miss.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
        }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotSource for FileSource {
    fn fetch(&mut self) -> Option<RawSnapshot> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                self.last_error = Some(format!("Read error: {}", e));
                return None;
            }
        };

        match RawSnapshot::from_json(&content) {
            Ok(snapshot) => {
                self.last_error = None;
                snapshot
            }
            Err(e) => {
                self.last_error = Some(format!("Parse error: {}", e));
                None
            }
        }
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
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "2024-05-01": {
                "1714521600": { "temperature": 24.5, "ph": 7.1, "tds": 410, "turbidity": 2.0 }
            }
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/sensor_data.json");
        assert_eq!(source.path(), Path::new("/tmp/sensor_data.json"));
        assert_eq!(source.description(), "file: /tmp/sensor_data.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_fetch_reads_file_every_time() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        let snapshot = source.fetch().unwrap();
        assert_eq!(snapshot.len(), 1);

        // Unlike change-polling sources, a second fetch returns the data again
        assert!(source.fetch().is_some());
    }

    #[test]
    fn test_file_source_null_is_no_data() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "null").unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.fetch().is_none());
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/sensor_data.json");

        assert!(source.fetch().is_none());
        assert!(source.error().unwrap().contains("Read error"));
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        assert!(source.fetch().is_none());
        assert!(source.error().unwrap().contains("Parse error"));
    }
}
