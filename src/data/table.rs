//! The normalized, time-ordered table of readings.

use chrono::{Duration, NaiveDateTime, Utc};

use super::reading::{ist, SensorReading};

/// Longest selectable time window, in hours.
pub const MAX_WINDOW_HOURS: u32 = 24;

/// Rows sorted ascending by timestamp.
///
/// Only [`normalize`](super::ingest::normalize) builds non-empty tables;
/// everything downstream works on borrowed windows of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SensorTable {
    rows: Vec<SensorReading>,
}

impl SensorTable {
    pub(crate) fn from_sorted(rows: Vec<SensorReading>) -> Self {
        debug_assert!(rows.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        Self { rows }
    }

    pub fn rows(&self) -> &[SensorReading] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Most recent reading in the whole table.
    pub fn latest(&self) -> Option<&SensorReading> {
        self.rows.last()
    }

    /// Rows strictly newer than `now - hours`.
    pub fn window(&self, now: NaiveDateTime, hours: u32) -> &[SensorReading] {
        let cutoff = now - Duration::hours(i64::from(hours.min(MAX_WINDOW_HOURS)));
        let start = self.rows.partition_point(|r| r.timestamp <= cutoff);
        &self.rows[start..]
    }
}

/// Current wall-clock time in IST, zone stripped, for comparing against
/// [`SensorReading::timestamp`].
pub fn local_now() -> NaiveDateTime {
    Utc::now().with_timezone(&ist()).naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    fn row(ts: NaiveDateTime, temp: f64) -> SensorReading {
        SensorReading {
            timestamp: ts,
            temperature: Some(temp),
            ph: None,
            tds: None,
            turbidity: None,
            formatted_time: String::new(),
        }
    }

    fn table() -> SensorTable {
        SensorTable::from_sorted(vec![
            row(at(8, 0), 1.0),
            row(at(10, 0), 2.0),
            row(at(11, 30), 3.0),
            row(at(11, 59), 4.0),
        ])
    }

    #[test]
    fn test_window_is_strictly_after_cutoff() {
        let t = table();
        // cutoff 10:00 excludes the 10:00 row itself
        let w = t.window(at(12, 0), 2);
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].temperature, Some(3.0));
    }

    #[test]
    fn test_window_zero_hours_is_empty() {
        assert!(table().window(at(12, 0), 0).is_empty());
    }

    #[test]
    fn test_window_clamped_to_max() {
        let t = table();
        assert_eq!(t.window(at(12, 0), 100).len(), t.window(at(12, 0), 24).len());
    }

    #[test]
    fn test_latest() {
        assert_eq!(table().latest().unwrap().temperature, Some(4.0));
        assert!(SensorTable::default().latest().is_none());
    }
}
