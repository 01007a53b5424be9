use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const DEFAULT_TOTAL_LAPS: u32 = 51;
pub const DEFAULT_TOTAL_DURATION_SECS: f64 = 20.0 * 60.0;

/// What one lap stands for; only changes the wording of the banked-time ratio
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LapUnit {
    #[default]
    Lap,
    Question,
    Problem,
    Rep,
    Item,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub total_laps: u32,
    pub total_duration_secs: f64,
    #[serde(default)]
    pub unit: LapUnit,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            total_laps: DEFAULT_TOTAL_LAPS,
            total_duration_secs: DEFAULT_TOTAL_DURATION_SECS,
            unit: LapUnit::default(),
        }
    }
}

impl Config {
    /// Same rules the pacer applies when a session is created
    pub fn validate(&self) -> Result<()> {
        crate::pacing::validate(self.total_laps, self.total_duration_secs)
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "pacer") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("pacer_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}
