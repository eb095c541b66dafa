//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::centered_rect;
use crate::app::{App, View};
use crate::data::Sensor;

/// Render the header bar with the dashboard state at a glance.
///
/// Displays: alert indicator, window size, rows in window, chart style and
/// the selected sensors.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let alerts = app.alerts();
    let rows = app.window().len();

    let (status_icon, status_style) = if app.last_updated.is_none() {
        ("○", Style::default().add_modifier(Modifier::DIM))
    } else {
        ("●", app.theme.alert_style(!alerts.is_empty()))
    };

    let mut spans = vec![
        Span::styled(format!(" {} ", status_icon), status_style),
        Span::styled("SMART AGRICULTURE ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
    ];

    if alerts.is_empty() {
        spans.push(Span::styled("0", Style::default().add_modifier(Modifier::DIM)));
    } else {
        spans.push(Span::styled(
            format!("{}", alerts.len()),
            Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
        ));
    }

    spans.extend([
        Span::raw(" alerts │ "),
        Span::styled(
            format!("{}h", app.window_hours),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" window, {} rows │ ", rows)),
        Span::raw(format!("{} │ ", app.chart_style.label())),
    ]);

    for sensor in Sensor::ALL {
        let style = if app.is_sensor_selected(sensor) {
            Style::default().fg(app.theme.sensor_color(sensor))
        } else {
            Style::default().add_modifier(Modifier::DIM | Modifier::CROSSED_OUT)
        };
        spans.push(Span::styled(sensor.label(), style));
        spans.push(Span::raw(" "));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Weather "),
        Line::from(" 2:Soil & Sensors "),
        Line::from(" 3:Sensor Logs "),
    ];

    let selected = match app.current_view {
        View::Weather => 0,
        View::Sensors => 1,
        View::Logs => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: current view, data source, time since last read, available
/// controls. Also displays temporary status messages and errors.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Weather => "r:reload Tab:switch ?:help q:quit",
        View::Sensors => "+/-:window v:chart g:gauges t:thresholds ?:help q:quit",
        View::Logs => "↑↓:scroll +/-:window e:export ?:help q:quit",
    };

    let status = if let Some(ref err) = app.load_error {
        format!(" Error: {} | r:retry q:quit", err)
    } else if let Some(updated) = app.last_updated {
        format!(
            " {} | {} | Updated {:.1}s ago | {}",
            app.current_view.label(),
            app.source_description(),
            updated.elapsed().as_secs_f64(),
            controls,
        )
    } else {
        " Loading... | q:quit".to_string()
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  1/2/3       Weather / Sensors / Logs"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Scroll log"),
        Line::from("  PgUp/PgDn   Jump 10 rows"),
        Line::from("  Home/End    Oldest / newest row"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Filters & Alerts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  +/-         Widen / narrow window (0-24h)"),
        Line::from("  v           Cycle chart style"),
        Line::from("  g           Toggle gauges"),
        Line::from("  T P D U     Toggle temp / pH / TDS / turb."),
        Line::from("  t           Edit alert thresholds"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload now"),
        Line::from("  e         Export window to CSV"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_area = centered_rect(area, 48, 28);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Render a centered notice inside a bordered block.
pub fn render_notice(frame: &mut Frame, app: &App, area: Rect, title: &str, message: &str) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let paragraph = Paragraph::new(Line::from(Span::styled(
        format!("⚠ {}", message),
        app.theme.notice_style(),
    )))
    .alignment(ratatui::layout::Alignment::Center)
    .block(block);

    frame.render_widget(paragraph, area);
}
