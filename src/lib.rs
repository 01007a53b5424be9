// Library surface for the binary, headless integration tests and reuse.
pub mod app;
pub mod config;
pub mod error;
pub mod pacing;
pub mod runtime;
pub mod ui;
pub mod util;

pub use error::PacerError;
pub use pacing::{Countdown, LapRecord, Pacer, Performance, Phase};
