pub mod charting;
pub mod screen;
pub mod summary;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

use crate::{
    app::App,
    config::LapUnit,
    pacing::{Countdown, LapRecord, Performance},
    util::format_clock,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const RUNNING_LEGEND: &str = "(space/enter) finish lap / (↑/↓ PgUp/PgDn) scroll log / (esc)ape";
const COMPLETE_LEGEND: &str = "(↑/↓ PgUp/PgDn) scroll log / (esc)ape";

/// Draw whichever screen matches the session phase
pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(app.phase()).render(app, f);
}

/// Live countdown shown while laps remain
pub struct TimerView<'a> {
    pub app: &'a App,
}

impl Widget for TimerView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.app;
        let session = app.pacer.session();
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2), // lap progress
                Constraint::Length(1), // overall remaining
                Constraint::Length(1), // lap target + countdown
                Constraint::Length(2), // performance
                Constraint::Min(3),    // lap log
                Constraint::Length(1), // static lap time
                Constraint::Length(1), // legend
            ])
            .split(area);

        let progress = Paragraph::new(Span::styled(
            format!(
                "Lap {} of {}",
                app.pacer.state().current_lap,
                session.total_laps
            ),
            bold_style,
        ))
        .alignment(Alignment::Center);
        progress.render(chunks[0], buf);

        if let Some(countdown) = app.countdown {
            Paragraph::new(overall_text(&countdown))
                .alignment(Alignment::Center)
                .render(chunks[1], buf);

            let countdown_style = if countdown.is_overtime() {
                bold_style.fg(Color::Red)
            } else {
                bold_style
            };
            Paragraph::new(Span::styled(lap_target_text(&countdown), countdown_style))
                .alignment(Alignment::Center)
                .render(chunks[2], buf);
        }

        Paragraph::new(performance_line(app))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        render_log(app, chunks[4], buf);
        render_static_target(session.static_lap_target, chunks[5], buf);
        render_legend(RUNNING_LEGEND, chunks[6], buf);
    }
}

pub fn overall_text(countdown: &Countdown) -> String {
    format!(
        "Overall Remaining Time: {}",
        format_clock(countdown.overall_remaining)
    )
}

pub fn lap_target_text(countdown: &Countdown) -> String {
    let countdown_str = if countdown.is_overtime() {
        format!("{:.2} s (Over time)", countdown.lap_countdown)
    } else {
        format!("{:.2} s", countdown.lap_countdown)
    };
    format!(
        "Lap Target: {:.2} s | Countdown: {}",
        countdown.lap_target, countdown_str
    )
}

pub fn performance_text(performance: &Performance, unit: LapUnit) -> String {
    format!(
        "{} | Extra {}s possible: {:.2}",
        performance.summary(),
        unit,
        performance.lap_ratio
    )
}

pub fn log_line(record: &LapRecord, static_lap_target: f64) -> String {
    let perf = Performance::new(record.cumulative_diff, static_lap_target);
    format!(
        "Lap {}: {:.2} s | New Target: {:.2} s | {}",
        record.lap,
        record.lap_time,
        record.new_target,
        perf.summary()
    )
}

fn performance_line(app: &App) -> Line<'static> {
    match app.pacer.performance() {
        None => Line::from("Overall Performance: --"),
        Some(perf) => {
            let color = if perf.is_ahead() {
                Color::Green
            } else {
                Color::Red
            };
            Line::from(vec![
                Span::raw("Overall Performance: "),
                Span::styled(
                    performance_text(&perf, app.unit),
                    Style::default().fg(color),
                ),
            ])
        }
    }
}

/// Scrolling log of finished laps, newest at the bottom
pub(crate) fn render_log(app: &App, area: Rect, buf: &mut Buffer) {
    let laps = app.pacer.laps();
    let visible = area.height.saturating_sub(2) as usize;
    let end = laps.len().saturating_sub(app.log_scroll);
    let start = end.saturating_sub(visible);
    let static_target = app.pacer.session().static_lap_target;

    let lines: Vec<Line> = laps[start..end]
        .iter()
        .map(|r| Line::from(log_line(r, static_target)))
        .collect();

    let title = if app.log_scroll > 0 {
        format!("Laps ({}/{})", end, laps.len())
    } else {
        "Laps".to_string()
    };

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .render(area, buf);
}

pub(crate) fn render_static_target(static_lap_target: f64, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(
        format!("Static Lap Time: {:.2} s", static_lap_target),
        Style::default().fg(Color::Blue),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

pub(crate) fn render_legend(text: &'static str, area: Rect, buf: &mut Buffer) {
    Paragraph::new(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::Pacer;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::{Duration, Instant};

    pub(crate) fn rendered(app: &App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn running_app() -> (App, Instant) {
        let t0 = Instant::now();
        let pacer = Pacer::new_at(4, 100.0, t0).unwrap();
        (App::new(pacer, LapUnit::Question), t0)
    }

    #[test]
    fn lap_target_text_marks_overtime() {
        let c = Countdown {
            overall_remaining: 40.0,
            lap_target: 10.0,
            lap_countdown: -1.234,
        };
        assert_eq!(
            lap_target_text(&c),
            "Lap Target: 10.00 s | Countdown: -1.23 s (Over time)"
        );
    }

    #[test]
    fn lap_target_text_on_time() {
        let c = Countdown {
            overall_remaining: 40.0,
            lap_target: 23.529,
            lap_countdown: 3.5,
        };
        assert_eq!(
            lap_target_text(&c),
            "Lap Target: 23.53 s | Countdown: 3.50 s"
        );
    }

    #[test]
    fn overall_text_floors_at_zero() {
        let c = Countdown {
            overall_remaining: -12.0,
            lap_target: 1.0,
            lap_countdown: 1.0,
        };
        assert_eq!(overall_text(&c), "Overall Remaining Time: 0:00");
    }

    #[test]
    fn performance_text_uses_unit_name() {
        let perf = Performance::new(5.0, 10.0);
        assert_eq!(
            performance_text(&perf, LapUnit::Question),
            "Total time saved: 5.00 s | Extra questions possible: 0.50"
        );
    }

    #[test]
    fn log_line_format() {
        let t0 = Instant::now();
        let mut pacer = Pacer::new_at(2, 20.0, t0).unwrap();
        let rec = pacer.finish_lap_at(t0 + Duration::from_secs(12)).unwrap();
        assert_eq!(
            log_line(&rec, 10.0),
            "Lap 1: 12.00 s | New Target: 8.00 s | Total time lost: 2.00 s"
        );
    }

    #[test]
    fn renders_running_screen() {
        let (app, _) = running_app();
        let text = rendered(&app, 100, 24);
        assert!(text.contains("Lap 1 of 4"));
        assert!(text.contains("Overall Remaining Time: 1:40"));
        assert!(text.contains("Lap Target: 25.00 s"));
        assert!(text.contains("Overall Performance: --"));
        assert!(text.contains("Static Lap Time: 25.00 s"));
    }

    #[test]
    fn renders_log_after_lap() {
        let (mut app, t0) = running_app();
        app.finish_lap(t0 + Duration::from_secs(20));
        let text = rendered(&app, 100, 24);
        assert!(text.contains("Lap 2 of 4"));
        assert!(text.contains("Lap 1: 20.00 s"));
        assert!(text.contains("Total time saved: 5.00 s"));
    }

    #[test]
    fn renders_overtime_marker() {
        let (mut app, t0) = running_app();
        app.on_tick(t0 + Duration::from_secs(30));
        let text = rendered(&app, 100, 24);
        assert!(text.contains("(Over time)"));
    }

    #[test]
    fn scrolled_log_shows_position() {
        let t0 = Instant::now();
        let pacer = Pacer::new_at(30, 300.0, t0).unwrap();
        let mut app = App::new(pacer, LapUnit::Lap);
        for i in 1..=20u64 {
            app.finish_lap(t0 + Duration::from_secs(i * 10));
        }
        app.log_scroll = 5;
        let text = rendered(&app, 100, 24);
        assert!(text.contains("Laps (15/20)"));
        assert!(text.contains("Lap 15:"));
        assert!(!text.contains("Lap 20:"));
    }

    #[test]
    fn renders_in_tiny_area_without_panic() {
        let (app, _) = running_app();
        let area = Rect::new(0, 0, 12, 3);
        let mut buffer = Buffer::empty(area);
        TimerView { app: &app }.render(area, &mut buffer);
        assert_eq!(*buffer.area(), area);
    }
}
