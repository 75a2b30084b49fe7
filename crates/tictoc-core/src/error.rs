//! Error types for timer operations
//!
//! Every failure is surfaced to the caller immediately; nothing in this crate
//! retries or recovers locally.

use thiserror::Error;

/// Error type for `Timer` and the procedural `tic`/`toc` interface
#[derive(Error, Debug)]
pub enum TimerError {
    /// `stop`/`toc` was called before any `start`/`tic`
    #[error("Timer not yet started.")]
    NotStarted,

    /// The caller-supplied barrier failed; its error is passed through as-is
    #[error(transparent)]
    Barrier(anyhow::Error),

    /// The message template could not be rendered
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Writing the stop message to the output sink failed
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Timer configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TimerError {
    /// Short label for structured log fields
    pub fn category(&self) -> &'static str {
        match self {
            TimerError::NotStarted => "usage",
            TimerError::Barrier(_) => "barrier",
            TimerError::Format(_) => "format",
            TimerError::Output(_) => "output",
            TimerError::Config(_) => "config",
        }
    }
}

/// Errors raised while parsing or rendering a message template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("single '{{' encountered at position {position}")]
    UnclosedBrace { position: usize },

    #[error("single '}}' encountered at position {position}")]
    UnmatchedClosingBrace { position: usize },

    #[error("unknown field '{name}', only 'elapsed' is available")]
    UnknownField { name: String },

    #[error("invalid format specifier '{spec}': {reason}")]
    InvalidSpec { spec: String, reason: String },
}

impl FormatError {
    pub(crate) fn invalid_spec(spec: &str, reason: impl Into<String>) -> Self {
        FormatError::InvalidSpec { spec: spec.to_string(), reason: reason.into() }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TimerError>;
