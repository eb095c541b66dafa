//! CSV export of a window of readings.

use std::fs;
use std::path::Path;

use anyhow::Result;

use super::reading::{Sensor, SensorReading};

/// Default file name offered for interactive exports.
pub const DEFAULT_EXPORT_FILE: &str = "sensor_data.csv";

/// Render `rows` as CSV with a `formatted_time` column followed by the
/// `sensors` columns, in that order. Missing values are left empty.
pub fn to_csv(rows: &[SensorReading], sensors: &[Sensor]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let header = std::iter::once("formatted_time").chain(sensors.iter().map(|s| s.name()));
    writer.write_record(header)?;

    for row in rows {
        let mut record = Vec::with_capacity(sensors.len() + 1);
        record.push(row.formatted_time.clone());
        record.extend(
            sensors.iter().map(|s| row.value(*s).map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("CSV flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Write the CSV rendering of `rows` to `path`.
pub fn write_csv(path: &Path, rows: &[SensorReading], sensors: &[Sensor]) -> Result<()> {
    let text = to_csv(rows, sensors)?;
    fs::write(path, text)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "Exported sensor log");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rows() -> Vec<SensorReading> {
        (0..3)
            .map(|i| SensorReading {
                timestamp: NaiveDate::from_ymd_opt(2024, 5, 1)
                    .unwrap()
                    .and_hms_opt(10, i, 0)
                    .unwrap(),
                temperature: Some(20.5 + f64::from(i)),
                ph: Some(7.0),
                tds: if i == 1 { None } else { Some(450.0) },
                turbidity: Some(2.25),
                formatted_time: format!("01-05-2024 10:0{}:00", i),
            })
            .collect()
    }

    #[test]
    fn test_line_count_and_column_order() {
        let csv = to_csv(&rows(), &[Sensor::Tds, Sensor::Temperature]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "formatted_time,tds,temperature");
        assert_eq!(lines[1], "01-05-2024 10:00:00,450,20.5");
        assert_eq!(lines[2], "01-05-2024 10:01:00,,21.5");
    }

    #[test]
    fn test_no_sensors_selected() {
        let csv = to_csv(&rows(), &[]).unwrap();
        assert_eq!(csv.lines().next(), Some("formatted_time"));
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_empty_rows_is_header_only() {
        let csv = to_csv(&[], &Sensor::ALL).unwrap();
        assert_eq!(csv, "formatted_time,temperature,ph,tds,turbidity\n");
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_FILE);

        write_csv(&path, &rows(), &[Sensor::Ph]).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written.lines().count(), 4);
        assert!(written.starts_with("formatted_time,ph\n"));
    }
}
