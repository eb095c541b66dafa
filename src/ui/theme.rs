//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Sensor;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for notices such as "no data" and weather failures.
    pub warning: Color,
    /// Color for threshold alerts.
    pub critical: Color,
    /// Color for readings within bounds.
    pub healthy: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
    /// Per-sensor series colors, in [`Sensor::ALL`] order.
    pub sensor_colors: [Color; 4],
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
            sensor_colors: [
                Color::Rgb(239, 71, 111),
                Color::Rgb(255, 209, 102),
                Color::Rgb(6, 214, 160),
                Color::Rgb(17, 138, 178),
            ],
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
            // darker variants read better on light backgrounds
            sensor_colors: [
                Color::Rgb(200, 40, 80),
                Color::Rgb(190, 140, 20),
                Color::Rgb(0, 150, 110),
                Color::Rgb(10, 100, 140),
            ],
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Series color for a sensor.
    pub fn sensor_color(&self, sensor: Sensor) -> Color {
        match sensor {
            Sensor::Temperature => self.sensor_colors[0],
            Sensor::Ph => self.sensor_colors[1],
            Sensor::Tds => self.sensor_colors[2],
            Sensor::Turbidity => self.sensor_colors[3],
        }
    }

    /// Style for a value depending on whether it raised an alert.
    pub fn alert_style(&self, alerting: bool) -> Style {
        if alerting {
            Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.healthy)
        }
    }

    /// Style for "no data" and "unavailable" notices.
    pub fn notice_style(&self) -> Style {
        Style::default().fg(self.warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensor_colors_are_distinct() {
        let theme = Theme::dark();
        for (i, a) in Sensor::ALL.iter().enumerate() {
            for b in &Sensor::ALL[i + 1..] {
                assert_ne!(theme.sensor_color(*a), theme.sensor_color(*b));
            }
        }
    }
}
