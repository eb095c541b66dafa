//! Sensor Logs view rendering.
//!
//! Displays every reading in the time window as a table, oldest first, with
//! one column per selected sensor.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::common::render_notice;
use crate::app::App;
use crate::data::{Sensor, SensorReading};

/// Render the log table for the current window.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = app.window();
    if rows.is_empty() {
        render_notice(frame, app, area, "Sensor Logs", "No recent data available.");
        return;
    }

    let header = Row::new(
        std::iter::once(Cell::from("Time"))
            .chain(app.sensors.iter().map(|s| Cell::from(column_title(*s)))),
    )
    .height(1)
    .style(app.theme.header);

    let table_rows: Vec<Row> = rows.iter().map(|r| log_row(app, r)).collect();

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(20))
        .chain(app.sensors.iter().map(|_| Constraint::Fill(1)))
        .collect();

    let selected = app.selected_row.min(rows.len().saturating_sub(1));
    let title = format!(
        " Readings, last {}h ({}) [{}/{}] ",
        app.window_hours,
        rows.len(),
        selected + 1,
        rows.len()
    );

    let table = Table::new(table_rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

fn column_title(sensor: Sensor) -> String {
    format!("{} ({})", sensor.label(), sensor.unit())
}

fn log_row<'a>(app: &App, reading: &'a SensorReading) -> Row<'a> {
    let alerts = app.thresholds.evaluate(reading);

    let cells = std::iter::once(Cell::from(reading.formatted_time.as_str())).chain(
        app.sensors.iter().map(|sensor| match reading.value(*sensor) {
            Some(v) => {
                let alerting = alerts.iter().any(|a| a.sensor() == *sensor);
                let style = if alerting {
                    app.theme.alert_style(true)
                } else {
                    Style::default()
                };
                Cell::from(sensor.format_value(v)).style(style)
            }
            None => Cell::from("-").style(Style::default().add_modifier(Modifier::DIM)),
        }),
    );

    Row::new(cells.collect::<Vec<_>>())
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
        app.now = epoch_to_local(1714522200).unwrap();
        app
    }

    fn draw(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, app, area);
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_empty_window_shows_notice() {
        let app = app_with(json!({}));
        assert!(draw(&app).contains("No recent data available."));
    }

    #[test]
    fn test_rows_show_formatted_time_and_values() {
        let app = app_with(json!({
            "2024-05-01": {
                "1714521600": { "temperature": 31.5, "tds": 420 }
            }
        }));

        let screen = draw(&app);
        assert!(screen.contains("01-05-2024 05:30:00"));
        assert!(screen.contains("31.50"));
        assert!(screen.contains("420"));
        assert!(screen.contains("[1/1]"));
    }
}
