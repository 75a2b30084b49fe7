//! Timer configuration
//!
//! Settings can come from code, from a YAML document, or from the
//! environment (`TICTOC_FORMAT`, `TICTOC_SILENT`). The process-wide timer
//! behind `tic`/`toc` is built from the environment.

use crate::error::{Result, TimerError};
use crate::template::{DEFAULT_TEMPLATE, FormatTemplate};
use serde::{Deserialize, Serialize};

/// Environment variable holding the stop message template
pub const FORMAT_ENV_VAR: &str = "TICTOC_FORMAT";
/// Environment variable that disables the stop message when truthy
pub const SILENT_ENV_VAR: &str = "TICTOC_SILENT";

/// Message settings for a timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Stop message template; `None` prints nothing
    pub format: Option<String>,
    /// Suppress the stop message regardless of `format`
    pub silent: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { format: Some(DEFAULT_TEMPLATE.to_string()), silent: false }
    }
}

impl TimerConfig {
    /// Load settings from a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|err| TimerError::Config(err.to_string()))
    }

    /// Defaults overridden by `TICTOC_FORMAT` and `TICTOC_SILENT`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(format) = lookup(FORMAT_ENV_VAR) {
            config.format = Some(format);
        }
        if let Some(silent) = lookup(SILENT_ENV_VAR) {
            config.silent =
                matches!(silent.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
        config
    }

    /// The template a timer built from this config will render, if any
    pub fn template(&self) -> Option<&str> {
        if self.silent {
            return None;
        }
        self.format.as_deref().filter(|format| !format.is_empty())
    }

    /// Check the template up front instead of waiting for the first stop
    pub fn validate(&self) -> Result<()> {
        if let Some(template) = self.template() {
            FormatTemplate::parse(template)?;
        }
        Ok(())
    }
}
