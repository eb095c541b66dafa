use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};
use crate::data::export::DEFAULT_EXPORT_FILE;
use crate::data::Sensor;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Threshold editor captures navigation keys
    if app.show_thresholds {
        handle_threshold_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),

        // Direct view access
        KeyCode::Char('1') => app.set_view(View::Weather),
        KeyCode::Char('2') => app.set_view(View::Sensors),
        KeyCode::Char('3') => app.set_view(View::Logs),

        // Log navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Time window
        KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char(']') => app.widen_window(),
        KeyCode::Char('-') | KeyCode::Char('[') => app.narrow_window(),

        // Chart and sensor selection
        KeyCode::Char('v') => app.cycle_chart_style(),
        KeyCode::Char('g') => app.toggle_gauges(),
        KeyCode::Char('T') => app.toggle_sensor(Sensor::Temperature),
        KeyCode::Char('P') => app.toggle_sensor(Sensor::Ph),
        KeyCode::Char('D') => app.toggle_sensor(Sensor::Tds),
        KeyCode::Char('U') => app.toggle_sensor(Sensor::Turbidity),

        // Alert thresholds
        KeyCode::Char('t') => app.toggle_thresholds(),

        // Go back
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Reload (bypasses the cache)
        KeyCode::Char('r') => app.force_reload(),

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Export
        KeyCode::Char('e') => {
            let export_path = std::path::PathBuf::from(DEFAULT_EXPORT_FILE);
            match app.export_csv(&export_path) {
                Ok(rows) => {
                    app.set_status_message(format!(
                        "Exported {} rows to {}",
                        rows,
                        export_path.display()
                    ));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while the threshold editor is open
fn handle_threshold_input(app: &mut App, key: KeyEvent) {
    let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
    let steps = if coarse { 10 } else { 1 };

    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('t') | KeyCode::Char('q') => {
            app.toggle_thresholds();
        }
        KeyCode::Up | KeyCode::Char('k') => app.prev_threshold(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.next_threshold(),
        KeyCode::BackTab => app.prev_threshold(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+') => app.adjust_threshold(steps),
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-') => app.adjust_threshold(-steps),
        KeyCode::Char('L') => app.adjust_threshold(10),
        KeyCode::Char('H') => app.adjust_threshold(-10),
        KeyCode::Char('0') => app.reset_thresholds(),
        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        // Scroll wheel moves through the log or the threshold list
        MouseEventKind::ScrollUp => {
            if app.show_thresholds {
                app.prev_threshold();
            } else {
                app.select_prev();
            }
        }
        MouseEventKind::ScrollDown => {
            if app.show_thresholds {
                app.next_threshold();
            } else {
                app.select_next();
            }
        }

        // Check for tab clicks (row 1, after header)
        MouseEventKind::Down(MouseButton::Left) if mouse.row == 1 => {
            // Approximate tab positions: Weather (0-12), Sensors (13-32), Logs (33-49)
            let col = mouse.column;
            if col < 13 {
                app.set_view(View::Weather);
            } else if col < 33 {
                app.set_view(View::Sensors);
            } else if col < 50 {
                app.set_view(View::Logs);
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ChartStyle;
    use crate::data::{ThresholdField, Thresholds};
    use crate::source::ChannelSource;
    use crossterm::event::KeyEventKind;

    fn app() -> App {
        let (_tx, source) = ChannelSource::create("test");
        App::new(Box::new(source), Thresholds::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_view_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_view, View::Logs);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.current_view, View::Weather);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.current_view, View::Sensors);
    }

    #[test]
    fn test_control_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.window_hours, 2);
        press(&mut app, KeyCode::Char('-'));
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.window_hours, 0);

        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.chart_style, ChartStyle::Bar);

        press(&mut app, KeyCode::Char('g'));
        assert!(!app.show_gauges);

        press(&mut app, KeyCode::Char('P'));
        assert!(!app.is_sensor_selected(Sensor::Ph));
    }

    #[test]
    fn test_threshold_editor_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        assert!(app.show_thresholds);

        press(&mut app, KeyCode::Down);
        assert_eq!(app.selected_threshold, ThresholdField::TempMin);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.thresholds.temp_min, 11.0);

        let shift_left = KeyEvent {
            code: KeyCode::Left,
            modifiers: KeyModifiers::SHIFT,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        handle_key_event(&mut app, shift_left);
        assert_eq!(app.thresholds.temp_min, 1.0);

        // 'q' closes the editor instead of quitting
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_thresholds);
        assert!(app.running);
    }

    #[test]
    fn test_help_swallows_next_key() {
        let mut app = app();
        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.show_help);
        assert!(app.running);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
