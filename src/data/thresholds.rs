//! Alert thresholds and their evaluation against a reading.
//!
//! Each bound is checked on its own, except turbidity where the low check
//! only runs when the high check did not fire. A missing pH counts as
//! abnormal, while any other missing measurement raises nothing. Both
//! asymmetries match the behavior operators are used to; raise them with the
//! product owner before changing them.

use serde::{Deserialize, Serialize};

use super::reading::{Sensor, SensorReading};

/// User-adjustable alert bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub temp_min: f64,
    pub temp_max: f64,
    pub ph_min: f64,
    pub ph_max: f64,
    pub tds_min: f64,
    pub tds_max: f64,
    pub turbidity_min: f64,
    pub turbidity_max: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            temp_min: 10.0,
            temp_max: 60.0,
            ph_min: 5.5,
            ph_max: 8.5,
            tds_min: 200.0,
            tds_max: 800.0,
            turbidity_min: 1.0,
            turbidity_max: 6.0,
        }
    }
}

impl Thresholds {
    /// Clamp every field into its allowed range.
    pub fn clamped(mut self) -> Self {
        for field in ThresholdField::ALL {
            let v = field.get(&self);
            field.set(&mut self, v);
        }
        self
    }

    /// Evaluate `reading` against these bounds.
    ///
    /// Missing measurements raise none of their alerts, except pH which is
    /// reported as abnormal.
    pub fn evaluate(&self, reading: &SensorReading) -> Vec<Alert> {
        let mut alerts = Vec::new();

        if let Some(t) = reading.temperature {
            if t > self.temp_max {
                alerts.push(Alert::HighTemperature);
            }
            if t < self.temp_min {
                alerts.push(Alert::LowTemperature);
            }
        }

        let ph_in_range = reading.ph.is_some_and(|ph| self.ph_min <= ph && ph <= self.ph_max);
        if !ph_in_range {
            alerts.push(Alert::AbnormalPh);
        }

        if let Some(tds) = reading.tds {
            if tds > self.tds_max {
                alerts.push(Alert::HighTds);
            }
            if tds < self.tds_min {
                alerts.push(Alert::LowTds);
            }
        }

        if let Some(turbidity) = reading.turbidity {
            if turbidity > self.turbidity_max {
                alerts.push(Alert::HighTurbidity);
            } else if turbidity < self.turbidity_min {
                alerts.push(Alert::LowTurbidity);
            }
        }

        alerts
    }
}

/// An out-of-range condition on the latest reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    HighTemperature,
    LowTemperature,
    AbnormalPh,
    HighTds,
    LowTds,
    HighTurbidity,
    LowTurbidity,
}

impl Alert {
    pub fn message(self) -> &'static str {
        match self {
            Alert::HighTemperature => "High Temperature!",
            Alert::LowTemperature => "Low Temperature!",
            Alert::AbnormalPh => "Abnormal pH Level!",
            Alert::HighTds => "High TDS Detected!",
            Alert::LowTds => "Low TDS Detected!",
            Alert::HighTurbidity => "High Turbidity Detected!",
            Alert::LowTurbidity => "Low Turbidity Detected!",
        }
    }

    pub fn sensor(self) -> Sensor {
        match self {
            Alert::HighTemperature | Alert::LowTemperature => Sensor::Temperature,
            Alert::AbnormalPh => Sensor::Ph,
            Alert::HighTds | Alert::LowTds => Sensor::Tds,
            Alert::HighTurbidity | Alert::LowTurbidity => Sensor::Turbidity,
        }
    }
}

/// One editable field of [`Thresholds`], with its slider range and step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdField {
    #[default]
    TempMax,
    TempMin,
    PhMin,
    PhMax,
    TdsMin,
    TdsMax,
    TurbidityMax,
    TurbidityMin,
}

impl ThresholdField {
    /// Fields in editor order.
    pub const ALL: [ThresholdField; 8] = [
        ThresholdField::TempMax,
        ThresholdField::TempMin,
        ThresholdField::PhMin,
        ThresholdField::PhMax,
        ThresholdField::TdsMin,
        ThresholdField::TdsMax,
        ThresholdField::TurbidityMax,
        ThresholdField::TurbidityMin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ThresholdField::TempMax => "Temperature Max (°C)",
            ThresholdField::TempMin => "Temperature Min (°C)",
            ThresholdField::PhMin => "pH Min",
            ThresholdField::PhMax => "pH Max",
            ThresholdField::TdsMin => "TDS Min (ppm)",
            ThresholdField::TdsMax => "TDS Max (ppm)",
            ThresholdField::TurbidityMax => "Turbidity Max (NTU)",
            ThresholdField::TurbidityMin => "Turbidity Min (NTU)",
        }
    }

    /// Inclusive `(min, max)` the value may take.
    pub fn range(self) -> (f64, f64) {
        match self {
            ThresholdField::TempMax => (40.0, 100.0),
            ThresholdField::TempMin => (0.0, 40.0),
            ThresholdField::PhMin | ThresholdField::PhMax => (0.0, 14.0),
            ThresholdField::TdsMin | ThresholdField::TdsMax => (100.0, 1200.0),
            ThresholdField::TurbidityMax | ThresholdField::TurbidityMin => (0.0, 10.0),
        }
    }

    pub fn step(self) -> f64 {
        match self {
            ThresholdField::TempMax
            | ThresholdField::TempMin
            | ThresholdField::TdsMin
            | ThresholdField::TdsMax => 1.0,
            _ => 0.1,
        }
    }

    pub fn get(self, t: &Thresholds) -> f64 {
        match self {
            ThresholdField::TempMax => t.temp_max,
            ThresholdField::TempMin => t.temp_min,
            ThresholdField::PhMin => t.ph_min,
            ThresholdField::PhMax => t.ph_max,
            ThresholdField::TdsMin => t.tds_min,
            ThresholdField::TdsMax => t.tds_max,
            ThresholdField::TurbidityMax => t.turbidity_max,
            ThresholdField::TurbidityMin => t.turbidity_min,
        }
    }

    /// Store `value`, clamped to [`range`](Self::range).
    pub fn set(self, t: &mut Thresholds, value: f64) {
        let (lo, hi) = self.range();
        let value = value.clamp(lo, hi);
        match self {
            ThresholdField::TempMax => t.temp_max = value,
            ThresholdField::TempMin => t.temp_min = value,
            ThresholdField::PhMin => t.ph_min = value,
            ThresholdField::PhMax => t.ph_max = value,
            ThresholdField::TdsMin => t.tds_min = value,
            ThresholdField::TdsMax => t.tds_max = value,
            ThresholdField::TurbidityMax => t.turbidity_max = value,
            ThresholdField::TurbidityMin => t.turbidity_min = value,
        }
    }

    /// Move the value by `steps` increments, rounding away float drift.
    pub fn adjust(self, t: &mut Thresholds, steps: i32) {
        let step = self.step();
        let raw = self.get(t) + step * f64::from(steps);
        let rounded = (raw / step).round() * step;
        // keep one decimal for fractional steps
        self.set(t, (rounded * 10.0).round() / 10.0);
    }

    pub fn format(self, t: &Thresholds) -> String {
        if self.step() >= 1.0 {
            format!("{:.0}", self.get(t))
        } else {
            format!("{:.1}", self.get(t))
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}
