//! Application state and control logic.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::NaiveDateTime;
use tokio::runtime::Handle;

use crate::config::DashboardSettings;
use crate::data::export::write_csv;
use crate::data::table::{local_now, MAX_WINDOW_HOURS};
use crate::data::{
    normalize, Alert, Sensor, SensorReading, SensorTable, ThresholdField, Thresholds, TtlCache,
};
use crate::source::SnapshotSource;
use crate::ui::Theme;
use crate::weather::{UnitLabels, Weather, WeatherClient, WeatherError, WeatherSettings};

/// The current page of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Current conditions at the farm.
    Weather,
    /// Alerts, metrics, trend charts and gauges for the time window.
    Sensors,
    /// Tabular log of the time window.
    Logs,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Weather => View::Sensors,
            View::Sensors => View::Logs,
            View::Logs => View::Weather,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Weather => View::Logs,
            View::Sensors => View::Weather,
            View::Logs => View::Sensors,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Weather => "Weather",
            View::Sensors => "Soil & Sensors",
            View::Logs => "Sensor Logs",
        }
    }
}

/// How trend charts are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartStyle {
    #[default]
    Line,
    Bar,
    Area,
}

impl ChartStyle {
    pub fn next(self) -> Self {
        match self {
            ChartStyle::Line => ChartStyle::Bar,
            ChartStyle::Bar => ChartStyle::Area,
            ChartStyle::Area => ChartStyle::Line,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ChartStyle::Line => "Line",
            ChartStyle::Bar => "Bar",
            ChartStyle::Area => "Area",
        }
    }
}

/// Result of the last weather request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherState {
    #[default]
    NotLoaded,
    Ready(Weather),
    Unavailable(WeatherError),
}

/// Main application state.
///
/// Nothing here survives between refreshes except the cached table; every
/// view is derived from `table`, `now` and the controls on each draw.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_thresholds: bool,

    // Data source
    source: Box<dyn SnapshotSource>,
    cache: TtlCache<SensorTable>,
    pub table: Arc<SensorTable>,
    pub load_error: Option<String>,
    pub last_updated: Option<Instant>,
    /// Wall-clock time the window is anchored to.
    pub now: NaiveDateTime,

    // Weather
    weather: Option<(WeatherClient, Handle)>,
    pub weather_state: WeatherState,

    // Controls
    pub window_hours: u32,
    pub chart_style: ChartStyle,
    pub sensors: Vec<Sensor>,
    pub show_gauges: bool,
    pub thresholds: Thresholds,
    pub selected_threshold: ThresholdField,

    // Logs navigation (index into the window, newest last)
    pub selected_row: usize,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source` with the given alert bounds.
    pub fn new(source: Box<dyn SnapshotSource>, thresholds: Thresholds) -> Self {
        let defaults = DashboardSettings::default();
        Self {
            running: true,
            current_view: View::Sensors,
            show_help: false,
            show_thresholds: false,
            source,
            cache: TtlCache::new(Duration::from_secs(defaults.cache_ttl_secs)),
            table: Arc::new(SensorTable::default()),
            load_error: None,
            last_updated: None,
            now: local_now(),
            weather: None,
            weather_state: WeatherState::NotLoaded,
            window_hours: defaults.window_hours,
            chart_style: ChartStyle::default(),
            sensors: defaults.selected_sensors(),
            show_gauges: defaults.show_gauges,
            thresholds,
            selected_threshold: ThresholdField::default(),
            selected_row: 0,
            theme: Theme::dark(),
            status_message: None,
        }
    }

    /// Apply initial control values and cache lifetime from settings.
    pub fn with_dashboard(mut self, settings: &DashboardSettings) -> Self {
        self.cache = TtlCache::new(Duration::from_secs(settings.cache_ttl_secs));
        self.window_hours = settings.window_hours.min(MAX_WINDOW_HOURS);
        self.sensors = settings.selected_sensors();
        self.show_gauges = settings.show_gauges;
        self
    }

    /// Enable the weather page, running requests on `runtime`.
    pub fn with_weather(mut self, client: WeatherClient, runtime: Handle) -> Self {
        self.weather = Some((client, runtime));
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Move the window anchor to the current wall-clock time.
    pub fn tick(&mut self) {
        self.now = local_now();
    }

    /// Refresh the table through the cache.
    ///
    /// The store is only queried when the cached table has expired. Returns
    /// `true` if a fresh read happened.
    pub fn refresh_data(&mut self) -> bool {
        let now = Instant::now();
        let source = &mut self.source;
        let mut fetched = false;

        let table = self.cache.get_or_refresh(now, || {
            fetched = true;
            normalize(source.fetch().as_ref())
        });

        if fetched {
            self.load_error = self.source.error().map(str::to_string);
            if let Some(ref err) = self.load_error {
                tracing::warn!(
                    source = self.source.description(),
                    error = %err,
                    "Sensor fetch failed"
                );
            } else {
                tracing::debug!(rows = table.len(), "Sensor table refreshed");
            }
            self.last_updated = Some(now);
        }

        self.table = table;
        self.tick();
        self.clamp_selection();
        fetched
    }

    /// Drop the cached table and read the store again.
    pub fn force_reload(&mut self) {
        self.cache.invalidate();
        self.refresh_data();
        if self.current_view == View::Weather {
            self.refresh_weather();
        }
    }

    /// Request current weather, if a client is configured.
    pub fn refresh_weather(&mut self) {
        let Some((ref client, ref runtime)) = self.weather else {
            return;
        };

        self.weather_state = match runtime.block_on(client.current()) {
            Ok(weather) => WeatherState::Ready(weather),
            Err(e) => {
                tracing::warn!(error = %e, "Weather API unavailable");
                WeatherState::Unavailable(e)
            }
        };
    }

    pub fn weather_enabled(&self) -> bool {
        self.weather.is_some()
    }

    /// Unit labels for the configured weather units.
    pub fn weather_units(&self) -> UnitLabels {
        match self.weather {
            Some((ref client, _)) => client.settings().unit_labels(),
            None => WeatherSettings::default().unit_labels(),
        }
    }

    /// Rows inside the selected time window, oldest first.
    pub fn window(&self) -> &[SensorReading] {
        self.table.window(self.now, self.window_hours)
    }

    /// Latest reading inside the window.
    pub fn latest(&self) -> Option<&SensorReading> {
        self.window().last()
    }

    /// Alerts raised by the latest reading in the window.
    pub fn alerts(&self) -> Vec<Alert> {
        self.latest().map(|r| self.thresholds.evaluate(r)).unwrap_or_default()
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.set_view(self.current_view.next());
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.set_view(self.current_view.prev());
    }

    /// Switch to a specific view. Entering the weather page fetches it.
    pub fn set_view(&mut self, view: View) {
        let entering_weather = view == View::Weather && self.current_view != View::Weather;
        self.current_view = view;
        if entering_weather {
            self.refresh_weather();
        }
    }

    pub fn widen_window(&mut self) {
        self.window_hours = (self.window_hours + 1).min(MAX_WINDOW_HOURS);
        self.clamp_selection();
    }

    pub fn narrow_window(&mut self) {
        self.window_hours = self.window_hours.saturating_sub(1);
        self.clamp_selection();
    }

    pub fn cycle_chart_style(&mut self) {
        self.chart_style = self.chart_style.next();
    }

    /// Show or hide `sensor` on charts and in the log.
    pub fn toggle_sensor(&mut self, sensor: Sensor) {
        if let Some(pos) = self.sensors.iter().position(|s| *s == sensor) {
            self.sensors.remove(pos);
        } else {
            self.sensors.push(sensor);
            self.sensors.sort();
        }
    }

    pub fn is_sensor_selected(&self, sensor: Sensor) -> bool {
        self.sensors.contains(&sensor)
    }

    pub fn toggle_gauges(&mut self) {
        self.show_gauges = !self.show_gauges;
    }

    /// Toggle the threshold editor overlay.
    pub fn toggle_thresholds(&mut self) {
        self.show_thresholds = !self.show_thresholds;
    }

    pub fn next_threshold(&mut self) {
        self.selected_threshold = self.selected_threshold.next();
    }

    pub fn prev_threshold(&mut self) {
        self.selected_threshold = self.selected_threshold.prev();
    }

    /// Move the selected threshold by `steps` increments.
    pub fn adjust_threshold(&mut self, steps: i32) {
        self.selected_threshold.adjust(&mut self.thresholds, steps);
    }

    /// Reset every threshold to its default.
    pub fn reset_thresholds(&mut self) {
        self.thresholds = Thresholds::default();
    }

    /// Move log selection down (towards newer rows) by n.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.window().len().saturating_sub(1);
        self.selected_row = (self.selected_row + n).min(max);
    }

    /// Move log selection up (towards older rows) by n.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_row = self.selected_row.saturating_sub(n);
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    pub fn select_first(&mut self) {
        self.selected_row = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_row = self.window().len().saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        let max = self.window().len().saturating_sub(1);
        self.selected_row = self.selected_row.min(max);
    }

    /// Close overlays first, then fall back to the sensors page.
    pub fn go_back(&mut self) {
        if self.show_thresholds {
            self.show_thresholds = false;
        } else if self.current_view != View::Sensors {
            self.set_view(View::Sensors);
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Write the current window as CSV. Returns the number of rows written.
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let rows = self.window();
        if rows.is_empty() {
            anyhow::bail!("No data to export");
        }
        write_csv(path, rows, &self.sensors)?;
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, RawSnapshot};
    use serde_json::json;

    fn snapshot(value: serde_json::Value) -> Option<RawSnapshot> {
        Some(serde_json::from_value(value).unwrap())
    }

    fn app_with(value: serde_json::Value) -> App {
        let (tx, source) = ChannelSource::create("test");
        tx.send(snapshot(value)).unwrap();
        let mut app = App::new(Box::new(source), Thresholds::default());
        app.refresh_data();
        app
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Weather.next(), View::Sensors);
        assert_eq!(View::Logs.next(), View::Weather);
        assert_eq!(View::Weather.prev(), View::Logs);
    }

    #[test]
    fn test_refresh_uses_cache() {
        let (tx, source) = ChannelSource::create("test");
        tx.send(snapshot(json!({ "d": { "1714521600": { "ph": 7.0 } } }))).unwrap();

        let mut app = App::new(Box::new(source), Thresholds::default());
        assert!(app.refresh_data());
        assert_eq!(app.table.len(), 1);

        // New data is not picked up until the cache expires
        tx.send(None).unwrap();
        assert!(!app.refresh_data());
        assert_eq!(app.table.len(), 1);

        app.force_reload();
        assert!(app.table.is_empty());
    }

    #[test]
    fn test_alerts_use_latest_row_in_window() {
        let mut app = app_with(json!({
            "2024-05-01": {
                "1714521600": { "temperature": 45, "ph": 9.0, "tds": 900, "turbidity": 7.5 },
                "1714521000": { "temperature": 5, "ph": 7.0, "tds": 500, "turbidity": 3.0 }
            }
        }));
        // 2024-05-01 06:00 IST, half an hour after the newest reading
        app.now = crate::data::ingest::epoch_to_local(1714523400).unwrap();

        assert_eq!(app.window().len(), 2);
        assert_eq!(app.alerts(), vec![Alert::AbnormalPh, Alert::HighTds, Alert::HighTurbidity]);

        app.window_hours = 0;
        assert!(app.window().is_empty());
        assert!(app.alerts().is_empty());
    }

    #[test]
    fn test_window_controls_clamp() {
        let mut app = app_with(json!({}));
        app.window_hours = 24;
        app.widen_window();
        assert_eq!(app.window_hours, 24);

        app.window_hours = 0;
        app.narrow_window();
        assert_eq!(app.window_hours, 0);
    }

    #[test]
    fn test_toggle_sensor_keeps_display_order() {
        let mut app = app_with(json!({}));
        app.toggle_sensor(Sensor::Temperature);
        assert!(!app.is_sensor_selected(Sensor::Temperature));

        app.toggle_sensor(Sensor::Temperature);
        assert_eq!(app.sensors, Sensor::ALL.to_vec());
    }

    #[test]
    fn test_threshold_editing() {
        let mut app = app_with(json!({}));
        app.selected_threshold = ThresholdField::TdsMax;
        app.adjust_threshold(10);
        assert_eq!(app.thresholds.tds_max, 810.0);

        app.next_threshold();
        assert_eq!(app.selected_threshold, ThresholdField::TurbidityMax);

        app.reset_thresholds();
        assert_eq!(app.thresholds, Thresholds::default());
    }

    #[test]
    fn test_export_empty_window_fails() {
        let app = app_with(json!({}));
        let dir = tempfile::tempdir().unwrap();
        assert!(app.export_csv(&dir.path().join("out.csv")).is_err());
    }

    #[test]
    fn test_go_back_closes_overlay_first() {
        let mut app = app_with(json!({}));
        app.current_view = View::Logs;
        app.show_thresholds = true;

        app.go_back();
        assert!(!app.show_thresholds);
        assert_eq!(app.current_view, View::Logs);

        app.go_back();
        assert_eq!(app.current_view, View::Sensors);
    }
}
