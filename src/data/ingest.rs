//! Snapshot normalization.
//!
//! Turns the nested tree returned by the remote store into a flat table of
//! [`SensorReading`]s ordered by time. Records with an unusable timestamp key
//! are dropped; they never surface as errors.

use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Value};

use super::reading::{ist, SensorReading, DISPLAY_TIME_FORMAT};
use super::table::SensorTable;
use crate::source::RawSnapshot;

/// Build a sorted table from a raw snapshot.
///
/// An absent or empty snapshot produces an empty table. The table is always
/// rebuilt from scratch.
pub fn normalize(snapshot: Option<&RawSnapshot>) -> SensorTable {
    let Some(snapshot) = snapshot else {
        return SensorTable::default();
    };

    let mut rows: Vec<SensorReading> = flatten(snapshot)
        .filter_map(|(key, record)| {
            let Some(timestamp) = parse_timestamp_key(key) else {
                tracing::debug!(key, "Skipping record with unparseable timestamp key");
                return None;
            };
            Some(build_reading(timestamp, record))
        })
        .collect();

    // Stable: equal timestamps keep snapshot order
    rows.sort_by_key(|r| r.timestamp);

    tracing::debug!(
        folders = snapshot.len(),
        rows = rows.len(),
        "Normalized sensor snapshot"
    );

    SensorTable::from_sorted(rows)
}

/// Flatten every date folder into `(timestamp key, record)` pairs.
///
/// Folders and records that are not JSON objects are skipped.
fn flatten(snapshot: &RawSnapshot) -> impl Iterator<Item = (&str, &Map<String, Value>)> {
    snapshot
        .folders()
        .filter_map(|(folder, entries)| match entries.as_object() {
            Some(entries) => Some(entries),
            None => {
                tracing::debug!(folder, "Skipping date folder that is not an object");
                None
            }
        })
        .flat_map(|entries| entries.iter())
        .filter_map(|(key, record)| record.as_object().map(|r| (key.as_str(), r)))
}

/// Parse an epoch-seconds key into a naive IST timestamp.
///
/// Returns `None` if the key is not an integer or the epoch is out of range.
pub fn parse_timestamp_key(key: &str) -> Option<NaiveDateTime> {
    let epoch: i64 = key.trim().parse().ok()?;
    epoch_to_local(epoch)
}

/// Interpret `epoch` seconds in IST and drop the zone.
pub fn epoch_to_local(epoch: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(epoch, 0).map(|utc| utc.with_timezone(&ist()).naive_local())
}

fn build_reading(timestamp: NaiveDateTime, record: &Map<String, Value>) -> SensorReading {
    SensorReading {
        timestamp,
        temperature: numeric_field(record, "temperature"),
        ph: numeric_field(record, "ph"),
        tds: numeric_field(record, "tds"),
        turbidity: numeric_field(record, "turbidity"),
        formatted_time: timestamp.format(DISPLAY_TIME_FORMAT).to_string(),
    }
}

/// Read a numeric field, accepting numbers and numeric strings.
///
/// Non-finite values (`"NaN"`, `"inf"`) are treated as missing.
fn numeric_field(record: &Map<String, Value>, name: &str) -> Option<f64> {
    let value = match record.get(name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    value.filter(|v: &f64| v.is_finite())
}
