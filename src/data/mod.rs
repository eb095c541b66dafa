//! Data models and processing for sensor snapshots.
//!
//! This module turns raw store snapshots into a normalized table and
//! derives everything the views show from it.
//!
//! ## Submodules
//!
//! - [`reading`]: [`Sensor`] identifiers and the [`SensorReading`] row
//! - [`ingest`]: Snapshot flattening, timestamp decoding and sorting
//! - [`table`]: The sorted [`SensorTable`] and time-window filtering
//! - [`cache`]: Single-slot [`TtlCache`] bounding store load
//! - [`thresholds`]: Alert bounds and their evaluation
//! - [`export`]: CSV rendering of a window of readings
//!
//! ## Data Flow
//!
//! ```text
//! RawSnapshot (store JSON)
//!        │
//!        ▼
//! ingest::normalize()  ──▶ TtlCache<SensorTable>
//!                                 │
//!                                 ▼
//!                     SensorTable::window(now, hours)
//!                                 │
//!              ┌──────────────────┼──────────────────┐
//!              ▼                  ▼                  ▼
//!   Thresholds::evaluate()   charts/gauges     export::to_csv()
//! ```

pub mod cache;
pub mod export;
pub mod ingest;
pub mod reading;
pub mod table;
pub mod thresholds;

pub use cache::TtlCache;
pub use ingest::normalize;
pub use reading::{Sensor, SensorReading};
pub use table::SensorTable;
pub use thresholds::{Alert, ThresholdField, Thresholds};
