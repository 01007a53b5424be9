use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    config::LapUnit,
    pacing::{Countdown, LapRecord, Pacer, Phase},
};

const PAGE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Everything the screen needs: the pacer plus display-only state
#[derive(Debug)]
pub struct App {
    pub pacer: Pacer,
    pub unit: LapUnit,
    /// last clock reading; `None` once the session is complete
    pub countdown: Option<Countdown>,
    /// lines scrolled up from the newest log entry
    pub log_scroll: usize,
}

impl App {
    pub fn new(pacer: Pacer, unit: LapUnit) -> Self {
        let countdown = pacer.tick_at(pacer.session().global_start);
        Self {
            pacer,
            unit,
            countdown,
            log_scroll: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.pacer.phase()
    }

    /// Whether the refresh ticker should keep running
    pub fn is_running(&self) -> bool {
        !self.pacer.is_complete()
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.countdown = self.pacer.tick_at(now);
    }

    pub fn finish_lap(&mut self, now: Instant) -> Option<LapRecord> {
        let record = self.pacer.finish_lap_at(now)?;
        self.log_scroll = 0;
        self.countdown = self.pacer.tick_at(now);
        Some(record)
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> KeyOutcome {
        if key.kind == KeyEventKind::Release {
            return KeyOutcome::Continue;
        }
        tracing::debug!(code = ?key.code, "key");

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return KeyOutcome::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return KeyOutcome::Quit
            }
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('l') => {
                self.finish_lap(now);
            }
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(PAGE),
            KeyCode::PageDown => self.scroll_down(PAGE),
            KeyCode::Home => self.log_scroll = self.max_scroll(),
            KeyCode::End => self.log_scroll = 0,
            _ => {}
        }
        KeyOutcome::Continue
    }

    fn max_scroll(&self) -> usize {
        self.pacer.laps().len().saturating_sub(1)
    }

    fn scroll_up(&mut self, by: usize) {
        self.log_scroll = (self.log_scroll + by).min(self.max_scroll());
    }

    fn scroll_down(&mut self, by: usize) {
        self.log_scroll = self.log_scroll.saturating_sub(by);
    }
}
