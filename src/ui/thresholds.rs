//! Threshold editor overlay.
//!
//! Each alert bound is drawn as a slider over its allowed range. Changes
//! apply immediately to the alerts on every page.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::centered_rect;
use crate::app::App;
use crate::data::{ThresholdField, Thresholds};

const SLIDER_WIDTH: usize = 20;

/// Render the editor as a centered modal on top of the current view.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::from(Span::styled("Alert Thresholds", app.theme.header)),
        Line::from(""),
    ];

    for field in ThresholdField::ALL {
        let selected = field == app.selected_threshold;
        let marker = if selected { "▶ " } else { "  " };
        let row_style = if selected {
            app.theme.selected
        } else {
            Style::default()
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{}{:<22}", marker, field.label()), row_style),
            Span::styled(slider(field, &app.thresholds), Style::default().fg(app.theme.highlight)),
            Span::styled(format!(" {:>6}", field.format(&app.thresholds)), row_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑↓ select  ←→ adjust  Shift ×10  0 reset  Esc close",
        Style::default().add_modifier(Modifier::DIM),
    )));

    let block = Block::default()
        .title(" Thresholds ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let overlay = centered_rect(area, 60, lines.len() as u16 + 2);

    frame.render_widget(Clear, overlay);
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}

/// A fixed-width bar showing where the value sits in its range.
fn slider(field: ThresholdField, thresholds: &Thresholds) -> String {
    let (lo, hi) = field.range();
    let ratio = ((field.get(thresholds) - lo) / (hi - lo)).clamp(0.0, 1.0);
    let pos = (ratio * (SLIDER_WIDTH - 1) as f64).round() as usize;

    let mut bar = String::with_capacity(SLIDER_WIDTH * 3 + 2);
    bar.push('[');
    for i in 0..SLIDER_WIDTH {
        bar.push(if i == pos { '●' } else { '─' });
    }
    bar.push(']');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slider_position() {
        let mut t = Thresholds::default();
        t.ph_min = 0.0;
        t.ph_max = 14.0;

        let low = slider(ThresholdField::PhMin, &t);
        let high = slider(ThresholdField::PhMax, &t);
        assert!(low.starts_with("[●"));
        assert!(high.ends_with("●]"));
        assert_eq!(low.chars().count(), SLIDER_WIDTH + 2);
    }
}
