//! Error types shared across MoodLens crates.

/// Top-level error type for MoodLens operations.
#[derive(Debug, thiserror::Error)]
pub enum MoodlensError {
    #[error("Transport unavailable: {message}")]
    Transport { message: String },

    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Analytics error: {message}")]
    Analytics { message: String },

    #[error("Export error: {message}")]
    Export { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using MoodlensError.
pub type MoodlensResult<T> = Result<T, MoodlensError>;

impl MoodlensError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport {
            message: msg.into(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn analytics(msg: impl Into<String>) -> Self {
        Self::Analytics {
            message: msg.into(),
        }
    }

    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export {
            message: msg.into(),
        }
    }

    pub fn session(msg: impl Into<String>) -> Self {
        Self::Session {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
