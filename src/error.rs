use thiserror::Error;

#[derive(Debug, Error)]
pub enum PacerError {
    /// Lap count or duration cannot describe a session
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

impl PacerError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PacerError>;
