use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use crate::{
    app::App,
    pacing::Pacer,
    ui::{charting, performance_text, render_legend, render_log, render_static_target},
    util::{extremes, format_clock, mean, std_dev},
};

/// Aggregate figures over every finished lap
#[derive(Debug, Clone, PartialEq)]
pub struct LapSummary {
    pub total_time: f64,
    pub average: f64,
    pub std_dev: f64,
    pub fastest: f64,
    pub slowest: f64,
}

impl LapSummary {
    /// `None` when no lap has been finished
    pub fn from_pacer(pacer: &Pacer) -> Option<Self> {
        let times: Vec<f64> = pacer.laps().iter().map(|l| l.lap_time).collect();
        let (fastest, slowest) = extremes(&times)?;
        Some(Self {
            total_time: pacer.completed_time(),
            average: mean(&times)?,
            std_dev: std_dev(&times)?,
            fastest,
            slowest,
        })
    }
}

/// Wall-clock start and finish of the run, `None` before any lap is done
pub fn clock_line(pacer: &Pacer) -> Option<String> {
    let finished = pacer.laps().last()?.finished_at;
    Some(format!(
        "Started {}   Finished {}",
        pacer.session().started_at.format("%H:%M:%S"),
        finished.format("%H:%M:%S")
    ))
}

/// End-of-session screen: totals, a lap chart and the full log
pub struct SummaryView<'a> {
    pub app: &'a App,
}

impl Widget for SummaryView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let app = self.app;
        let pacer = &app.pacer;
        let static_target = pacer.session().static_lap_target;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(super::HORIZONTAL_MARGIN)
            .vertical_margin(super::VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),      // heading
                Constraint::Length(3),      // performance, lap stats, clock
                Constraint::Percentage(45), // chart
                Constraint::Min(3),         // lap log
                Constraint::Length(1),      // static lap time
                Constraint::Length(1),      // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            "All laps completed!",
            bold_style.fg(Color::Green),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

        let mut lines = Vec::new();
        if let Some(perf) = pacer.performance() {
            lines.push(Line::from(performance_text(&perf, app.unit)));
        }
        if let Some(summary) = LapSummary::from_pacer(pacer) {
            lines.push(Line::from(Span::styled(
                format!(
                    "{} total   {:.2} s avg   {:.2} sd   {:.2} s best   {:.2} s worst",
                    format_clock(summary.total_time),
                    summary.average,
                    summary.std_dev,
                    summary.fastest,
                    summary.slowest
                ),
                bold_style,
            )));
        }
        if let Some(clock) = clock_line(pacer) {
            lines.push(Line::from(Span::styled(
                clock,
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        let lap_times: Vec<f64> = pacer.laps().iter().map(|l| l.lap_time).collect();
        let (last_lap, ceiling) = charting::compute_chart_params(&lap_times, static_target);
        let points = charting::lap_points(&lap_times);
        let baseline = [(1.0, static_target), (last_lap, static_target)];

        let datasets = vec![
            Dataset::default()
                .name("lap time")
                .marker(Marker::Braille)
                .style(Style::default().fg(Color::Magenta))
                .graph_type(GraphType::Line)
                .data(&points),
            Dataset::default()
                .name("static target")
                .marker(Marker::Braille)
                .style(Style::default().fg(Color::Blue))
                .graph_type(GraphType::Line)
                .data(&baseline),
        ];

        Chart::new(datasets)
            .block(Block::default().borders(Borders::ALL))
            .x_axis(
                Axis::default()
                    .title("lap")
                    .bounds([1.0, last_lap])
                    .labels(vec![
                        Span::styled("1", bold_style),
                        Span::styled(charting::format_label(last_lap), bold_style),
                    ]),
            )
            .y_axis(
                Axis::default()
                    .title("seconds")
                    .bounds([0.0, ceiling])
                    .labels(vec![
                        Span::styled("0", bold_style),
                        Span::styled(charting::format_label(ceiling), bold_style),
                    ]),
            )
            .render(chunks[2], buf);

        render_log(app, chunks[3], buf);
        render_static_target(static_target, chunks[4], buf);
        render_legend(super::COMPLETE_LEGEND, chunks[5], buf);
    }
}
