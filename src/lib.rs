// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # agriwatch
//!
//! A terminal dashboard and library for monitoring farm water and soil sensors.
//!
//! Sensor devices push readings (temperature, pH, TDS, turbidity) into a
//! Firebase-style realtime store, grouped into folders keyed by epoch
//! seconds. This crate reads that nested snapshot, flattens it into a
//! time-sorted table in India Standard Time, raises threshold alerts on the
//! latest reading and renders everything in an interactive terminal UI.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Application                          │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐ │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│ │
//! │  │ (state) │    │(processing)   │(rendering)   │         │ │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘ │
//! │       │                                                     │
//! │       ├──────────────┐                                      │
//! │       ▼              ▼                                      │
//! │  ┌─────────┐    ┌─────────┐                                 │
//! │  │ source  │    │ weather │◀── HTTP weather API             │
//! │  │ (input) │    └─────────┘                                 │
//! │  └─────────┘                                                │
//! │       ▲                                                     │
//! │  FirebaseSource | FileSource | ChannelSource                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation and dashboard controls
//! - **[`source`]**: Snapshot source abstraction ([`SnapshotSource`] trait) with
//!   implementations for the realtime store, JSON files and channels
//! - **[`data`]**: Normalization into a [`SensorTable`], the TTL cache,
//!   threshold alerts and CSV export
//! - **[`weather`]**: Current-conditions client with typed errors
//! - **[`config`]**: Layered settings from file and environment
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Read the realtime store configured in agriwatch.toml
//! agriwatch --config agriwatch.toml
//!
//! # Replay a snapshot saved to disk
//! agriwatch --file snapshot.json
//!
//! # Write the last 6 hours to CSV and exit
//! agriwatch --file snapshot.json --hours 6 --export sensor_data.csv
//! ```
//!
//! ### As a library
//!
//! ```
//! use agriwatch::{normalize, RawSnapshot, Thresholds};
//!
//! let snapshot = RawSnapshot::from_json(
//!     r#"{"2024-05-01": {"1714521600": {"temperature": 45, "ph": 9.0}}}"#,
//! )
//! .unwrap();
//! let table = normalize(snapshot.as_ref());
//!
//! let alerts = Thresholds::default().evaluate(table.latest().unwrap());
//! assert_eq!(alerts.len(), 1);
//! ```
//!
//! ### With a channel source
//!
//! ```
//! use agriwatch::{App, ChannelSource, Thresholds};
//!
//! let (tx, source) = ChannelSource::create("gateway");
//! let app = App::new(Box::new(source), Thresholds::default());
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;
pub mod weather;

// Re-export main types for convenience
pub use app::App;
pub use config::Settings;
pub use data::{
    normalize, Alert, Sensor, SensorReading, SensorTable, ThresholdField, Thresholds, TtlCache,
};
pub use source::{
    ChannelSource, FileSource, FirebaseSource, RawSnapshot, SnapshotSource, SourceError,
};
pub use weather::{Weather, WeatherClient, WeatherError};
