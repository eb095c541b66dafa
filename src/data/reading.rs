//! Sensor identifiers and the normalized reading row.

use chrono::{FixedOffset, NaiveDateTime};

/// Offset of Indian Standard Time from UTC, in seconds (+05:30).
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Display format for [`SensorReading::formatted_time`].
pub const DISPLAY_TIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// The fixed regional time zone readings are reported in.
pub fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is within ±24h")
}

/// One of the four measurements reported by a field node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sensor {
    Temperature,
    Ph,
    Tds,
    Turbidity,
}

impl Sensor {
    /// All sensors in display order.
    pub const ALL: [Sensor; 4] = [
        Sensor::Temperature,
        Sensor::Ph,
        Sensor::Tds,
        Sensor::Turbidity,
    ];

    /// Field name used in the remote store and in CSV headers.
    pub fn name(self) -> &'static str {
        match self {
            Sensor::Temperature => "temperature",
            Sensor::Ph => "ph",
            Sensor::Tds => "tds",
            Sensor::Turbidity => "turbidity",
        }
    }

    /// Look up a sensor by its field name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            Sensor::Temperature => "Temperature",
            Sensor::Ph => "pH",
            Sensor::Tds => "TDS",
            Sensor::Turbidity => "Turbidity",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Sensor::Temperature => "°C",
            Sensor::Ph => "",
            Sensor::Tds => "ppm",
            Sensor::Turbidity => "NTU",
        }
    }

    /// Full scale of the gauge drawn for this sensor.
    pub fn gauge_range(self) -> (f64, f64) {
        match self {
            Sensor::Temperature => (0.0, 100.0),
            Sensor::Ph => (0.0, 14.0),
            Sensor::Tds => (0.0, 1000.0),
            Sensor::Turbidity => (0.0, 10.0),
        }
    }

    /// Format a value with the precision used on metric tiles.
    pub fn format_value(self, value: f64) -> String {
        match self {
            Sensor::Tds => format!("{:.0}", value),
            _ => format!("{:.2}", value),
        }
    }
}

/// A single row of the normalized table.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Local IST wall-clock time with the zone stripped.
    pub timestamp: NaiveDateTime,
    pub temperature: Option<f64>,
    pub ph: Option<f64>,
    pub tds: Option<f64>,
    pub turbidity: Option<f64>,
    /// `timestamp` rendered as `DD-MM-YYYY HH:MM:SS`.
    pub formatted_time: String,
}

impl SensorReading {
    /// Returns the value recorded for `sensor`, if present.
    pub fn value(&self, sensor: Sensor) -> Option<f64> {
        match sensor {
            Sensor::Temperature => self.temperature,
            Sensor::Ph => self.ph,
            Sensor::Tds => self.tds,
            Sensor::Turbidity => self.turbidity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_names_round_trip() {
        for sensor in Sensor::ALL {
            assert_eq!(Sensor::from_name(sensor.name()), Some(sensor));
        }
        assert_eq!(Sensor::from_name("humidity"), None);
    }

    #[test]
    fn test_ist_offset() {
        assert_eq!(ist().local_minus_utc(), 19_800);
    }

    #[test]
    fn test_format_value_precision() {
        assert_eq!(Sensor::Tds.format_value(900.4), "900");
        assert_eq!(Sensor::Ph.format_value(7.0), "7.00");
        assert_eq!(Sensor::Temperature.format_value(23.456), "23.46");
    }
}
