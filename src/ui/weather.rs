//! Weather view rendering.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::common::render_notice;
use crate::app::{App, WeatherState};
use crate::weather::Weather;

/// Render the current conditions, or why they are missing.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    if !app.weather_enabled() {
        render_notice(frame, app, area, "Weather", "Weather API key not configured.");
        return;
    }

    match &app.weather_state {
        WeatherState::NotLoaded => {
            render_notice(frame, app, area, "Weather", "Fetching weather... press r to retry.")
        }
        WeatherState::Ready(weather) => render_conditions(frame, app, weather, area),
        WeatherState::Unavailable(err) => {
            let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).split(area);
            render_notice(frame, app, chunks[0], "Weather", "Weather API unavailable.");

            let reason = Paragraph::new(Line::from(Span::styled(
                format!(" {}", err),
                Style::default().add_modifier(Modifier::DIM),
            )))
            .wrap(Wrap { trim: true });
            frame.render_widget(reason, chunks[1]);
        }
    }
}

fn render_conditions(frame: &mut Frame, app: &App, weather: &Weather, area: Rect) {
    let units = app.weather_units();
    let label = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Temperature   ", label),
            Span::styled(
                format!("{:.1} {}", weather.temperature, units.temperature),
                Style::default().fg(app.theme.highlight),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Condition     ", label),
            Span::raw(weather.condition.clone()),
        ]),
        Line::from(vec![
            Span::styled("  Humidity      ", label),
            Span::raw(format!("{:.0} %", weather.humidity)),
        ]),
        Line::from(vec![
            Span::styled("  Wind Speed    ", label),
            Span::raw(format!("{:.1} {}", weather.wind_speed, units.wind)),
        ]),
    ];

    let block = Block::default()
        .title(" Current Weather ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
