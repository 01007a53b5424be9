use ratatui::Frame;

use crate::{
    app::App,
    pacing::Phase,
    ui::{summary::SummaryView, TimerView},
};

/// A UI Screen boundary: responsible for rendering one phase of the session
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Live countdown while laps remain
pub struct TimerScreen;

impl Screen for TimerScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(TimerView { app }, f.area());
    }
}

/// Totals and lap chart once every lap is done
pub struct SummaryScreen;

impl Screen for SummaryScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(SummaryView { app }, f.area());
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Running { .. } => Box::new(TimerScreen),
        Phase::Complete => Box::new(SummaryScreen),
    }
}
