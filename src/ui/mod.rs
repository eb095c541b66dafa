//! Terminal UI rendering using ratatui.
//!
//! Each page is implemented in its own submodule with a `render` function.
//!
//! ## Submodules
//!
//! - [`sensors`]: Alerts, metric tiles, trend charts and gauges
//! - [`logs`]: Scrollable table of readings in the time window
//! - [`weather`]: Current conditions or an "unavailable" notice
//! - [`thresholds`]: Modal editor for the alert bounds
//! - [`common`]: Shared components (header, tabs, status bar, help overlay)
//! - [`theme`]: Light/dark theme support with terminal auto-detection
//!
//! ## Rendering Architecture
//!
//! The main loop in `main.rs` calls into these modules based on the current view:
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │ Tabs (common::render_tabs)           │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ View Content                         │
//! │ (weather/sensors/logs::render)       │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//!         ↑
//!    Overlays rendered on top:
//!    - thresholds::render_overlay
//!    - common::render_help
//! ```

pub mod common;
pub mod logs;
pub mod sensors;
pub mod theme;
pub mod thresholds;
pub mod weather;

pub use theme::Theme;

use ratatui::layout::Rect;

/// A rectangle of at most `width` x `height` centered in `area`.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
