//! Soil & Sensors view rendering.
//!
//! Shows the alerts raised by the latest reading in the window, a tile per
//! sensor with its latest value, a trend chart per selected sensor and,
//! optionally, gauges.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph,
    },
    Frame,
};

use super::common::render_notice;
use crate::app::{App, ChartStyle};
use crate::data::{Alert, Sensor, SensorReading};

const AXIS_TIME_FORMAT: &str = "%H:%M";

/// Render the sensors page.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app.window();
    if rows.is_empty() {
        render_notice(frame, app, area, "Soil & Sensors", "No data for the selected time window.");
        return;
    }

    let alerts = app.alerts();
    let alerts_height = alerts.len().max(1) as u16 + 2;
    let gauges_height = if app.show_gauges && !app.sensors.is_empty() {
        3
    } else {
        0
    };

    let chunks = Layout::vertical([
        Constraint::Length(alerts_height),
        Constraint::Length(3),
        Constraint::Min(6),
        Constraint::Length(gauges_height),
    ])
    .split(area);

    render_alerts(frame, app, &alerts, chunks[0]);
    render_tiles(frame, app, &alerts, chunks[1]);

    if app.sensors.is_empty() {
        render_notice(frame, app, chunks[2], "Trends", "No sensors selected. Press T/P/D/U.");
    } else {
        render_trends(frame, app, rows, chunks[2]);
    }

    if gauges_height > 0 {
        render_gauges(frame, app, &alerts, chunks[3]);
    }
}

fn render_alerts(frame: &mut Frame, app: &App, alerts: &[Alert], area: Rect) {
    let lines: Vec<Line> = if alerts.is_empty() {
        let ok = Span::styled("✓ All readings within thresholds", app.theme.alert_style(false));
        vec![Line::from(ok)]
    } else {
        alerts
            .iter()
            .map(|alert| {
                let text = format!("⚠ {}", alert.message());
                Line::from(Span::styled(text, app.theme.alert_style(true)))
            })
            .collect()
    };

    let block = Block::default()
        .title(format!(" Alerts ({}) ", alerts.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(if alerts.is_empty() {
            app.theme.border
        } else {
            app.theme.critical
        }));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// One tile per sensor with the latest value, colored by alert state.
fn render_tiles(frame: &mut Frame, app: &App, alerts: &[Alert], area: Rect) {
    let latest = app.latest();
    let tiles = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);

    for (sensor, tile) in Sensor::ALL.into_iter().zip(tiles.iter()) {
        let alerting = alerts.iter().any(|a| a.sensor() == sensor);
        let value = latest.and_then(|r| r.value(sensor));

        let text = match value {
            Some(v) => Span::styled(
                format!("{} {}", sensor.format_value(v), sensor.unit()),
                app.theme.alert_style(alerting),
            ),
            // a missing pH still raises an alert
            None if alerting => Span::styled("-", app.theme.alert_style(true)),
            None => Span::styled("-", Style::default().add_modifier(Modifier::DIM)),
        };

        let block = Block::default()
            .title(format!(" {} ", sensor.label()))
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.sensor_color(sensor)));

        frame.render_widget(Paragraph::new(Line::from(text)).block(block), *tile);
    }
}

/// Lay the selected sensors out in a two-column grid of charts.
fn render_trends(frame: &mut Frame, app: &App, rows: &[SensorReading], area: Rect) {
    let sensors = &app.sensors;
    let grid_rows = sensors.len().div_ceil(2);
    let row_areas =
        Layout::vertical(vec![Constraint::Ratio(1, grid_rows as u32); grid_rows]).split(area);

    for (pair, row_area) in sensors.chunks(2).zip(row_areas.iter()) {
        let columns = vec![Constraint::Ratio(1, pair.len() as u32); pair.len()];
        let cells = Layout::horizontal(columns).split(*row_area);
        for (sensor, cell) in pair.iter().zip(cells.iter()) {
            match app.chart_style {
                ChartStyle::Bar => render_bar_chart(frame, app, rows, *sensor, *cell),
                ChartStyle::Line | ChartStyle::Area => {
                    render_line_chart(frame, app, rows, *sensor, *cell)
                }
            }
        }
    }
}

/// Points as (seconds since the first row, value), skipping missing values.
fn series(rows: &[SensorReading], sensor: Sensor) -> Vec<(f64, f64)> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    rows.iter()
        .filter_map(|r| {
            let value = r.value(sensor)?;
            let x = (r.timestamp - first.timestamp).num_seconds() as f64;
            Some((x, value))
        })
        .collect()
}

/// Y bounds padded by 10% so the line never sits on the border.
fn value_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let (min, max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| (lo.min(*y), hi.max(*y)));
    if !min.is_finite() {
        return [0.0, 1.0];
    }
    if (max - min).abs() < f64::EPSILON {
        return [min - 1.0, max + 1.0];
    }
    let pad = (max - min) * 0.1;
    [min - pad, max + pad]
}

fn chart_block(app: &App, sensor: Sensor) -> Block<'static> {
    Block::default()
        .title(format!(" {} ({}) ", sensor.label(), sensor.unit()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border))
}

fn render_line_chart(
    frame: &mut Frame,
    app: &App,
    rows: &[SensorReading],
    sensor: Sensor,
    area: Rect,
) {
    let points = series(rows, sensor);
    if points.is_empty() {
        render_notice(frame, app, area, sensor.label(), "No readings in window.");
        return;
    }

    let color = app.theme.sensor_color(sensor);
    let [y_min, y_max] = value_bounds(&points);
    let x_max = points.last().map(|(x, _)| *x).unwrap_or(0.0).max(1.0);

    // Area charts fill from the bottom of the axis up to each point
    let mut datasets = Vec::with_capacity(2);
    if app.chart_style == ChartStyle::Area {
        datasets.push(
            Dataset::default()
                .marker(Marker::Braille)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(color).add_modifier(Modifier::DIM))
                .data(&points),
        );
    }
    datasets.push(
        Dataset::default()
            .name(sensor.label())
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(&points),
    );

    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return;
    };
    let mid = first.timestamp + (last.timestamp - first.timestamp) / 2;
    let x_labels = vec![
        Span::raw(first.timestamp.format(AXIS_TIME_FORMAT).to_string()),
        Span::raw(mid.format(AXIS_TIME_FORMAT).to_string()),
        Span::raw(last.timestamp.format(AXIS_TIME_FORMAT).to_string()),
    ];
    let y_labels = vec![
        Span::raw(sensor.format_value(y_min)),
        Span::raw(sensor.format_value((y_min + y_max) / 2.0)),
        Span::raw(sensor.format_value(y_max)),
    ];

    let chart = Chart::new(datasets)
        .block(chart_block(app, sensor))
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(x_labels))
        .y_axis(Axis::default().bounds([y_min, y_max]).labels(y_labels))
        .legend_position(None);

    frame.render_widget(chart, area);
}

/// Bars for the most recent readings that fit in the area.
fn render_bar_chart(
    frame: &mut Frame,
    app: &App,
    rows: &[SensorReading],
    sensor: Sensor,
    area: Rect,
) {
    const BAR_WIDTH: u16 = 5;
    const BAR_GAP: u16 = 1;

    let capacity = (area.width.saturating_sub(2) / (BAR_WIDTH + BAR_GAP)).max(1) as usize;
    let recent: Vec<(&SensorReading, f64)> =
        rows.iter().filter_map(|r| r.value(sensor).map(|v| (r, v))).collect();
    if recent.is_empty() {
        render_notice(frame, app, area, sensor.label(), "No readings in window.");
        return;
    }
    let recent = &recent[recent.len().saturating_sub(capacity)..];

    let color = app.theme.sensor_color(sensor);
    // Bar heights are integers, so keep two decimals of resolution
    let bars: Vec<Bar> = recent
        .iter()
        .map(|(reading, value)| {
            Bar::default()
                .value((value.max(0.0) * 100.0).round() as u64)
                .text_value(sensor.format_value(*value))
                .label(Line::from(reading.timestamp.format(AXIS_TIME_FORMAT).to_string()))
                .style(Style::default().fg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block(app, sensor))
        .data(BarGroup::default().bars(&bars))
        .bar_width(BAR_WIDTH)
        .bar_gap(BAR_GAP);

    frame.render_widget(chart, area);
}

fn render_gauges(frame: &mut Frame, app: &App, alerts: &[Alert], area: Rect) {
    let latest = app.latest();
    let count = app.sensors.len() as u32;
    let cells =
        Layout::horizontal(vec![Constraint::Ratio(1, count); app.sensors.len()]).split(area);

    for (sensor, cell) in app.sensors.iter().zip(cells.iter()) {
        let value = latest.and_then(|r| r.value(*sensor));
        let alerting = alerts.iter().any(|a| a.sensor() == *sensor);
        let color = if alerting {
            app.theme.critical
        } else {
            app.theme.sensor_color(*sensor)
        };

        let (ratio, label) = match value {
            Some(v) => {
                (gauge_ratio(*sensor, v), format!("{} {}", sensor.format_value(v), sensor.unit()))
            }
            None => (0.0, "-".to_string()),
        };

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(format!(" {} ", sensor.label()))
                    .borders(Borders::ALL)
                    .border_type(app.theme.border_type)
                    .border_style(Style::default().fg(app.theme.border)),
            )
            .gauge_style(Style::default().fg(color))
            .ratio(ratio)
            .label(label);

        frame.render_widget(gauge, *cell);
    }
}

/// Position of `value` within the sensor's gauge range, clamped to [0, 1].
///
/// `Gauge` panics outside that range, so NaN maps to an empty gauge.
pub fn gauge_ratio(sensor: Sensor, value: f64) -> f64 {
    let (lo, hi) = sensor.gauge_range();
    let ratio = (value - lo) / (hi - lo);
    if ratio.is_nan() {
        return 0.0;
    }
    ratio.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ingest::epoch_to_local;
    use crate::data::Thresholds;
    use crate::source::{ChannelSource, RawSnapshot};
    use ratatui::{backend::TestBackend, Terminal};
    use serde_json::json;

    fn app_with(value: serde_json::Value) -> App {
        let (tx, source) = ChannelSource::create("test");
        let snapshot: RawSnapshot = serde_json::from_value(value).unwrap();
        tx.send(Some(snapshot)).unwrap();
        let mut app = App::new(Box::new(source), Thresholds::default());
        app.refresh_data();
        // ten minutes after the readings below
        app.now = epoch_to_local(1714522200).unwrap();
        app
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, app, area);
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    fn reading(epoch: i64, ph: Option<f64>) -> SensorReading {
        let timestamp = epoch_to_local(epoch).unwrap();
        SensorReading {
            timestamp,
            temperature: None,
            ph,
            tds: None,
            turbidity: None,
            formatted_time: String::new(),
        }
    }

    #[test]
    fn test_series_skips_missing_values() {
        let rows = vec![
            reading(1000, Some(7.0)),
            reading(1060, None),
            reading(1120, Some(6.5)),
        ];
        assert_eq!(series(&rows, Sensor::Ph), vec![(0.0, 7.0), (120.0, 6.5)]);
        assert!(series(&rows, Sensor::Tds).is_empty());
    }

    #[test]
    fn test_value_bounds() {
        assert_eq!(value_bounds(&[]), [0.0, 1.0]);
        assert_eq!(value_bounds(&[(0.0, 5.0)]), [4.0, 6.0]);

        let [lo, hi] = value_bounds(&[(0.0, 10.0), (1.0, 20.0)]);
        assert!((lo - 9.0).abs() < 1e-9);
        assert!((hi - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_gauge_ratio_clamps() {
        assert_eq!(gauge_ratio(Sensor::Ph, 7.0), 0.5);
        assert_eq!(gauge_ratio(Sensor::Tds, 1500.0), 1.0);
        assert_eq!(gauge_ratio(Sensor::Temperature, -5.0), 0.0);
        assert_eq!(gauge_ratio(Sensor::Ph, f64::NAN), 0.0);
        assert_eq!(gauge_ratio(Sensor::Ph, f64::INFINITY), 1.0);
    }

    #[test]
    fn test_empty_window_shows_notice() {
        let app = app_with(json!({}));
        assert!(draw(&app).contains("No data for the selected time window."));
    }

    #[test]
    fn test_renders_non_finite_strings_without_panicking() {
        let mut app = app_with(json!({
            "2024-05-01": {
                "1714521000": { "temperature": 30, "ph": 7.0, "tds": 500, "turbidity": 3.0 },
                "1714521600": { "temperature": "inf", "ph": "NaN", "tds": 450, "turbidity": 2.5 }
            }
        }));
        assert_eq!(app.window().len(), 2);

        for style in [ChartStyle::Line, ChartStyle::Bar, ChartStyle::Area] {
            app.chart_style = style;
            let screen = draw(&app);
            assert!(screen.contains("Abnormal pH Level!"));
            assert!(screen.contains("450 ppm"));
        }
    }
}
