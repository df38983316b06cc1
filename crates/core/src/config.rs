//! Core configuration.
//!
//! A [`Config`] is deserialized from a JSON document supplied by the host, or
//! built from [`Config::default`]. Every field has a default, so an empty
//! object `{}` is a valid configuration.

use serde::Deserialize;

use crate::common::{ClockState, CoreError, EdgeTrigger};

/// Default values applied when a field is absent from the document.
pub mod defaults {
    /// Retirement history length.
    pub const BUFFER_LEN: usize = 32;
    /// Smallest accepted retirement history length.
    pub const BUFFER_LEN_MIN: usize = 1;
    /// Largest accepted retirement history length.
    pub const BUFFER_LEN_MAX: usize = 256;
}

/// Host-facing configuration for a [`crate::Core`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Number of retired instructions kept in the history buffer.
    pub buffer_len: usize,
    /// Which clock transition shifts the pipeline.
    pub trigger: EdgeTrigger,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_len: defaults::BUFFER_LEN,
            trigger: EdgeTrigger::default(),
        }
    }
}

impl Config {
    /// Parses a configuration from a JSON document and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the document fails to parse or a field is out of
    /// its supported range.
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks field ranges.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidBufferLength`] if `buffer_len` is outside
    /// `1..=256`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(defaults::BUFFER_LEN_MIN..=defaults::BUFFER_LEN_MAX).contains(&self.buffer_len) {
            return Err(CoreError::InvalidBufferLength(self.buffer_len));
        }
        Ok(())
    }

    /// A fresh edge detector for this configuration.
    pub(crate) fn clock_state(&self) -> ClockState {
        ClockState::default()
    }
}
