//! Runtime configuration.
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file (`--config agriwatch.toml`)
//! 3. Environment variables prefixed with `AGRIWATCH__`, with `__` between
//!    nested keys (e.g. `AGRIWATCH__STORE__AUTH`, `AGRIWATCH__WEATHER__API_KEY`)
//!
//! ```toml
//! [store]
//! database_url = "https://sensor-data-90987-default-rtdb.firebaseio.com"
//! collection = "sensor_data"
//! auth_file = "/etc/agriwatch/token"
//!
//! [weather]
//! api_key = "..."
//! latitude = 21.1458
//! longitude = 79.0882
//!
//! [dashboard]
//! refresh_secs = 10
//! window_hours = 1
//!
//! [thresholds]
//! temp_max = 60
//! ph_min = 5.5
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::data::{Sensor, Thresholds};
use crate::weather::WeatherSettings;

/// Remote store connection settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    pub database_url: String,
    pub collection: String,
    /// Credential passed as the `auth` query parameter.
    pub auth: Option<String>,
    /// File holding the credential; read when `auth` is unset.
    pub auth_file: Option<PathBuf>,
    /// Request timeout in seconds; transport default when unset.
    pub timeout_secs: Option<u64>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: "https://sensor-data-90987-default-rtdb.firebaseio.com".to_string(),
            collection: "sensor_data".to_string(),
            auth: None,
            auth_file: None,
            timeout_secs: None,
        }
    }
}

impl StoreSettings {
    /// Resolve the credential from `auth` or `auth_file`.
    pub fn credential(&self) -> Result<Option<String>> {
        if let Some(ref auth) = self.auth {
            return Ok(Some(auth.clone()));
        }
        match self.auth_file {
            Some(ref path) => {
                let token = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read credential {}", path.display()))?;
                Ok(Some(token.trim().to_string()))
            }
            None => Ok(None),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Initial state of the dashboard controls.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Seconds between automatic refreshes.
    pub refresh_secs: u64,
    /// Lifetime of the cached table in seconds.
    pub cache_ttl_secs: u64,
    /// Initial time window, 0-24 hours.
    pub window_hours: u32,
    /// Sensors shown on charts and in the log, by field name.
    pub sensors: Vec<String>,
    pub show_gauges: bool,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_secs: 10,
            cache_ttl_secs: 10,
            window_hours: 1,
            sensors: Sensor::ALL.iter().map(|s| s.name().to_string()).collect(),
            show_gauges: true,
        }
    }
}

impl DashboardSettings {
    /// Selected sensors in display order; unknown names are ignored.
    pub fn selected_sensors(&self) -> Vec<Sensor> {
        Sensor::ALL
            .into_iter()
            .filter(|s| self.sensors.iter().any(|name| name.eq_ignore_ascii_case(s.name())))
            .collect()
    }
}

/// Complete application settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store: StoreSettings,
    pub weather: WeatherSettings,
    pub dashboard: DashboardSettings,
    pub thresholds: Thresholds,
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let env = Environment::with_prefix("AGRIWATCH")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("dashboard.sensors");
        let config = builder.add_source(env).build().context("Failed to load configuration")?;

        let mut settings: Settings = config.try_deserialize().context("Invalid configuration")?;
        settings.thresholds = settings.thresholds.clamped();
        Ok(settings)
    }

    /// Log the effective configuration with the credential masked.
    pub fn log_summary(&self) {
        let credential = match (&self.store.auth, &self.store.auth_file) {
            (Some(_), _) => "****".to_string(),
            (None, Some(path)) => format!("file {}", path.display()),
            (None, None) => "none".to_string(),
        };
        let api_key = if self.weather.api_key.is_empty() {
            "unset"
        } else {
            "****"
        };

        tracing::info!("Configuration loaded:");
        tracing::info!("  store.database_url   : {}", self.store.database_url);
        tracing::info!("  store.collection     : {}", self.store.collection);
        tracing::info!("  store.credential     : {}", credential);
        tracing::info!("  weather.api_key      : {}", api_key);
        tracing::info!(
            "  weather.location     : {}, {}",
            self.weather.latitude,
            self.weather.longitude
        );
        tracing::info!("  dashboard.refresh    : {}s", self.dashboard.refresh_secs);
        tracing::info!("  dashboard.cache_ttl  : {}s", self.dashboard.cache_ttl_secs);
        tracing::info!("  dashboard.window     : {}h", self.dashboard.window_hours);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Settings::load reads the process environment
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "{}", contents).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.store.collection, "sensor_data");
        assert_eq!(settings.dashboard.refresh_secs, 10);
        assert_eq!(settings.dashboard.selected_sensors(), Sensor::ALL.to_vec());
        assert_eq!(settings.thresholds, Thresholds::default());
        assert_eq!(settings.weather.units, "metric");
    }

    #[test]
    fn test_load_from_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = toml_file(
            r#"
[store]
database_url = "https://example.firebaseio.com"
auth = "token-123"

[dashboard]
window_hours = 6
sensors = ["ph", "TDS"]

[thresholds]
temp_max = 75
ph_max = 20
"#,
        );

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.store.database_url, "https://example.firebaseio.com");
        assert_eq!(settings.store.collection, "sensor_data");
        assert_eq!(settings.store.credential().unwrap().as_deref(), Some("token-123"));
        assert_eq!(settings.dashboard.window_hours, 6);
        assert_eq!(settings.dashboard.selected_sensors(), vec![Sensor::Ph, Sensor::Tds]);
        assert_eq!(settings.thresholds.temp_max, 75.0);
        // clamped to the slider range
        assert_eq!(settings.thresholds.ph_max, 14.0);
        assert_eq!(settings.thresholds.tds_max, 800.0);
    }

    #[test]
    fn test_environment_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = toml_file("[dashboard]\nwindow_hours = 6\n");

        env::set_var("AGRIWATCH__DASHBOARD__WINDOW_HOURS", "12");
        env::set_var("AGRIWATCH__DASHBOARD__SENSORS", "ph,turbidity");
        env::set_var("AGRIWATCH__WEATHER__API_KEY", "abc123");
        let settings = Settings::load(Some(file.path()));
        env::remove_var("AGRIWATCH__DASHBOARD__WINDOW_HOURS");
        env::remove_var("AGRIWATCH__DASHBOARD__SENSORS");
        env::remove_var("AGRIWATCH__WEATHER__API_KEY");

        let settings = settings.unwrap();
        assert_eq!(settings.dashboard.window_hours, 12);
        assert_eq!(settings.dashboard.selected_sensors(), vec![Sensor::Ph, Sensor::Turbidity]);
        assert_eq!(settings.weather.api_key, "abc123");
    }

    #[test]
    fn test_weather_timeout_is_separate_from_store() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let file = toml_file("[store]\ntimeout_secs = 30\n\n[weather]\ntimeout_secs = 5\n");
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.store.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(settings.weather.timeout(), Some(Duration::from_secs(5)));

        let file = toml_file("[store]\ntimeout_secs = 30\n");
        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.weather.timeout(), None);
    }

    #[test]
    fn test_credential_from_file() {
        let mut token = NamedTempFile::new().unwrap();
        writeln!(token, "  secret-token  ").unwrap();

        let store = StoreSettings {
            auth_file: Some(token.path().to_path_buf()),
            ..StoreSettings::default()
        };
        assert_eq!(store.credential().unwrap().as_deref(), Some("secret-token"));
    }

    #[test]
    fn test_missing_credential_file_is_error() {
        let store = StoreSettings {
            auth_file: Some(PathBuf::from("/nonexistent/token")),
            ..StoreSettings::default()
        };
        assert!(store.credential().is_err());
    }
}
