//! End-to-end: snapshot file → table → alerts → CSV.

use std::io::Write;

use agriwatch::data::export::to_csv;
use agriwatch::{normalize, Alert, FileSource, Sensor, SnapshotSource, Thresholds};

const SNAPSHOT: &str = r#"{
    "2024-05-01": {
        "1714521600": { "temperature": 45, "ph": 9.0, "tds": 900, "turbidity": 7.5 },
        "not-a-timestamp": { "temperature": 99 }
    },
    "2024-04-30": {
        "1714435200": { "temperature": "28.5", "ph": 7.1 }
    }
}"#;

fn write_snapshot(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn file_snapshot_raises_expected_alerts() {
    let file = write_snapshot(SNAPSHOT);
    let mut source = FileSource::new(file.path());

    let snapshot = source.fetch();
    assert!(source.error().is_none());

    let table = normalize(snapshot.as_ref());
    assert_eq!(table.len(), 2);

    let rows = table.rows();
    assert!(rows.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(rows[0].formatted_time, "30-04-2024 05:30:00");
    assert_eq!(rows[0].temperature, Some(28.5));

    let latest = table.latest().unwrap();
    assert_eq!(
        Thresholds::default().evaluate(latest),
        vec![Alert::AbnormalPh, Alert::HighTds, Alert::HighTurbidity]
    );
}

#[test]
fn csv_has_header_and_one_line_per_row() {
    let file = write_snapshot(SNAPSHOT);
    let mut source = FileSource::new(file.path());
    let table = normalize(source.fetch().as_ref());

    let csv = to_csv(table.rows(), &[Sensor::Ph, Sensor::Temperature]).unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), table.len() + 1);
    assert_eq!(lines[0], "formatted_time,ph,temperature");
    assert_eq!(lines[2], "01-05-2024 05:30:00,9,45");
}

#[test]
fn missing_or_empty_snapshot_is_no_data() {
    let mut missing = FileSource::new("/nonexistent/snapshot.json");
    let table = normalize(missing.fetch().as_ref());
    assert!(table.is_empty());
    assert!(missing.error().is_some());

    let file = write_snapshot("null");
    let mut empty = FileSource::new(file.path());
    assert!(normalize(empty.fetch().as_ref()).is_empty());
}
