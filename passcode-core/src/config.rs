use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Allowed values for [`Config::window`].
const WINDOW_RANGE: RangeInclusive<u32> = 3..=10;

/// Errors for settings that are outside of their allowed bounds.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A maximum counter of zero would reject every HOTP counter.
    #[error("the maximum counter must be at least 1")]
    MaxCounterTooSmall,
    /// The validation window is outside of the allowed range.
    #[error("the validation window must be within 3..=10, but is {0}")]
    WindowOutOfRange(u32),
}

/// Settings that limit what the generator and validator accept.
///
/// Deserializes from the snake case field names as well as the camel case names of the chat-bot
/// plugin schema (`maxStep`, `maxThreshold`). Missing fields take their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Highest HOTP counter that is accepted. Time based counters are not bound by it.
    #[serde(default = "default_max_counter", alias = "maxStep")]
    pub max_counter: u64,
    /// Amount of counters or time steps tolerated around the expected one during validation.
    #[serde(default = "default_window", alias = "maxThreshold")]
    pub window: u32,
}

impl Config {
    /// Check that all settings are within their allowed bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_counter == 0 {
            return Err(ConfigError::MaxCounterTooSmall);
        }

        if !WINDOW_RANGE.contains(&self.window) {
            return Err(ConfigError::WindowOutOfRange(self.window));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_counter: default_max_counter(),
            window: default_window(),
        }
    }
}

#[inline(always)]
fn default_max_counter() -> u64 {
    30
}

#[inline(always)]
fn default_window() -> u32 {
    5
}
