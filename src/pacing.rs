//! Adaptive lap pacing.
//!
//! A [`Pacer`] splits a fixed duration evenly over a fixed number of laps and,
//! after every finished lap, re-divides whatever time is left over the laps
//! that remain. Progress is measured against the original even split (the
//! static lap target), so time banked on a fast lap shows up as a positive
//! cumulative differential.

use std::time::Instant;

use chrono::{DateTime, Local};

use crate::error::{PacerError, Result};

/// Immutable parameters of one timed run
#[derive(Debug, Clone)]
pub struct Session {
    pub total_laps: u32,
    /// seconds
    pub total_duration: f64,
    pub static_lap_target: f64,
    pub global_start: Instant,
    pub started_at: DateTime<Local>,
}

impl Session {
    /// Seconds left in the whole run; negative once the duration is exhausted
    pub fn remaining_at(&self, now: Instant) -> f64 {
        self.total_duration - secs_between(self.global_start, now)
    }
}

/// Mutable progress through the laps
#[derive(Debug, Clone, PartialEq)]
pub struct LapState {
    /// 1-indexed; greater than `total_laps` once every lap is done
    pub current_lap: u32,
    pub current_lap_target: f64,
    pub lap_start: Instant,
    /// running sum of (static target - lap time) over completed laps
    pub cumulative_diff: f64,
}

/// One completed lap as shown in the log
#[derive(Debug, Clone, PartialEq)]
pub struct LapRecord {
    pub lap: u32,
    pub lap_time: f64,
    pub new_target: f64,
    pub cumulative_diff: f64,
    pub finished_at: DateTime<Local>,
}

/// Live view of the clocks, produced on every tick while laps remain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    pub overall_remaining: f64,
    pub lap_target: f64,
    pub lap_countdown: f64,
}

impl Countdown {
    pub fn is_overtime(&self) -> bool {
        self.lap_countdown < 0.0
    }
}

/// Time banked (or owed) relative to the static schedule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Performance {
    pub cumulative_diff: f64,
    /// `cumulative_diff / static_lap_target`: the banked time expressed in
    /// nominal lap durations. Not a count of anything.
    pub lap_ratio: f64,
}

impl Performance {
    pub fn new(cumulative_diff: f64, static_lap_target: f64) -> Self {
        let lap_ratio = if static_lap_target > 0.0 {
            cumulative_diff / static_lap_target
        } else {
            0.0
        };
        Self {
            cumulative_diff,
            lap_ratio,
        }
    }

    /// Zero counts as "lost", matching how the log has always read
    pub fn is_ahead(&self) -> bool {
        self.cumulative_diff > 0.0
    }

    pub fn summary(&self) -> String {
        if self.is_ahead() {
            format!("Total time saved: {:.2} s", self.cumulative_diff)
        } else {
            format!("Total time lost: {:.2} s", self.cumulative_diff.abs())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Running { lap: u32 },
    Complete,
}

/// Owns the session and its lap state; the only place lap state changes
#[derive(Debug, Clone)]
pub struct Pacer {
    session: Session,
    state: LapState,
    laps: Vec<LapRecord>,
}

impl Pacer {
    pub fn new(total_laps: u32, total_duration: f64) -> Result<Self> {
        Self::new_at(total_laps, total_duration, Instant::now())
    }

    pub fn new_at(total_laps: u32, total_duration: f64, now: Instant) -> Result<Self> {
        validate(total_laps, total_duration)?;

        let static_lap_target = total_duration / total_laps as f64;
        tracing::info!(
            total_laps,
            total_duration,
            static_lap_target,
            "pacing session started"
        );

        Ok(Self {
            session: Session {
                total_laps,
                total_duration,
                static_lap_target,
                global_start: now,
                started_at: Local::now(),
            },
            state: LapState {
                current_lap: 1,
                current_lap_target: static_lap_target,
                lap_start: now,
                cumulative_diff: 0.0,
            },
            laps: Vec::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> &LapState {
        &self.state
    }

    pub fn laps(&self) -> &[LapRecord] {
        &self.laps
    }

    pub fn phase(&self) -> Phase {
        if self.is_complete() {
            Phase::Complete
        } else {
            Phase::Running {
                lap: self.state.current_lap,
            }
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state.current_lap > self.session.total_laps
    }

    /// `None` until the first lap is finished
    pub fn performance(&self) -> Option<Performance> {
        if self.laps.is_empty() {
            None
        } else {
            Some(Performance::new(
                self.state.cumulative_diff,
                self.session.static_lap_target,
            ))
        }
    }

    pub fn tick(&self) -> Option<Countdown> {
        self.tick_at(Instant::now())
    }

    /// Read the clocks without touching lap state. Returns `None` once the
    /// session is complete so the refresh loop can stop.
    pub fn tick_at(&self, now: Instant) -> Option<Countdown> {
        if self.is_complete() {
            return None;
        }

        let lap_elapsed = secs_between(self.state.lap_start, now);
        Some(Countdown {
            overall_remaining: self.session.remaining_at(now),
            lap_target: self.state.current_lap_target,
            lap_countdown: self.state.current_lap_target - lap_elapsed,
        })
    }

    pub fn finish_lap(&mut self) -> Option<LapRecord> {
        self.finish_lap_at(Instant::now())
    }

    /// Close the current lap and re-spread the remaining time. A no-op that
    /// returns `None` once every lap is done.
    pub fn finish_lap_at(&mut self, now: Instant) -> Option<LapRecord> {
        if self.is_complete() {
            return None;
        }

        let lap_time = secs_between(self.state.lap_start, now);
        self.state.cumulative_diff += self.session.static_lap_target - lap_time;

        // current_lap has not been advanced yet, so this already leaves out
        // the lap that just finished
        let remaining_laps = self.session.total_laps - self.state.current_lap;
        let new_target = if remaining_laps > 0 {
            self.session.remaining_at(now) / remaining_laps as f64
        } else {
            0.0
        };

        let record = LapRecord {
            lap: self.state.current_lap,
            lap_time,
            new_target,
            cumulative_diff: self.state.cumulative_diff,
            finished_at: Local::now(),
        };
        self.laps.push(record.clone());

        tracing::info!(
            lap = record.lap,
            lap_time,
            new_target,
            cumulative_diff = record.cumulative_diff,
            "lap finished"
        );

        self.state.current_lap += 1;
        if self.is_complete() {
            tracing::info!(
                cumulative_diff = self.state.cumulative_diff,
                "all laps completed"
            );
        } else {
            self.state.current_lap_target = new_target;
            self.state.lap_start = now;
        }

        Some(record)
    }

    /// Sum of completed lap times; laps are contiguous so this is also the
    /// time spent since the session started, up to the last finished lap.
    pub fn completed_time(&self) -> f64 {
        self.laps.iter().map(|l| l.lap_time).sum()
    }
}

pub(crate) fn validate(total_laps: u32, total_duration: f64) -> Result<()> {
    if total_laps == 0 {
        return Err(PacerError::invalid("total_laps must be greater than zero"));
    }
    if !total_duration.is_finite() || total_duration <= 0.0 {
        return Err(PacerError::invalid(format!(
            "total_duration must be a positive number of seconds, got {total_duration}"
        )));
    }
    Ok(())
}

fn secs_between(start: Instant, now: Instant) -> f64 {
    now.saturating_duration_since(start).as_secs_f64()
}
