use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid value for {name}: {raw}")]
    Invalid { name: &'static str, raw: String },

    #[error("{name} must be > 0")]
    Zero { name: &'static str },
}

/// Timing knobs for a play session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayConfig {
    question_window: Duration,
    tick_interval: Duration,
}

impl Default for PlayConfig {
    /// 60 seconds per question, ticked once a second.
    fn default() -> Self {
        Self {
            question_window: Duration::from_secs(60),
            tick_interval: Duration::from_secs(1),
        }
    }
}

impl PlayConfig {
    /// Build a config.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Zero` if either duration is zero.
    pub fn new(question_window: Duration, tick_interval: Duration) -> Result<Self, ConfigError> {
        if question_window.is_zero() {
            return Err(ConfigError::Zero {
                name: "question window",
            });
        }
        if tick_interval.is_zero() {
            return Err(ConfigError::Zero {
                name: "tick interval",
            });
        }
        Ok(Self {
            question_window,
            tick_interval,
        })
    }

    /// Read overrides from `QUIZ_QUESTION_SECS` and `QUIZ_TICK_MILLIS`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a variable is set but not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let window = env_parse::<u64>("QUIZ_QUESTION_SECS")?
            .map_or(defaults.question_window, Duration::from_secs);
        let tick = env_parse::<u64>("QUIZ_TICK_MILLIS")?
            .map_or(defaults.tick_interval, Duration::from_millis);
        Self::new(window, tick)
    }

    #[must_use]
    pub fn with_question_window(mut self, window: Duration) -> Self {
        if !window.is_zero() {
            self.question_window = window;
        }
        self
    }

    #[must_use]
    pub fn question_window(&self) -> Duration {
        self.question_window
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

fn env_parse<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, raw }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sixty_second_window() {
        let config = PlayConfig::default();
        assert_eq!(config.question_window(), Duration::from_secs(60));
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn zero_durations_are_rejected() {
        assert_eq!(
            PlayConfig::new(Duration::ZERO, Duration::from_secs(1)).unwrap_err(),
            ConfigError::Zero {
                name: "question window"
            }
        );
        assert!(PlayConfig::new(Duration::from_secs(5), Duration::ZERO).is_err());
    }

    #[test]
    fn with_question_window_ignores_zero() {
        let config = PlayConfig::default().with_question_window(Duration::ZERO);
        assert_eq!(config.question_window(), Duration::from_secs(60));
        let config = config.with_question_window(Duration::from_secs(5));
        assert_eq!(config.question_window(), Duration::from_secs(5));
    }
}
