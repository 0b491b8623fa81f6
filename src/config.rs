use std::error;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_MIN_CYCLE_MS: u64 = 4000;
pub const DEFAULT_MAX_CYCLE_MS: u64 = 6000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1;

/// Timing parameters of a [`TrafficLight`](crate::TrafficLight).
///
/// Each phase lasts a random duration in `[min_cycle, max_cycle]`. The
/// timing loop wakes every `poll_interval` to compare the elapsed time
/// against that duration and to check for a stop request, so it bounds both
/// the toggle jitter and how long `stop` takes to be noticed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LightConfig {
    pub min_cycle: Duration,
    pub max_cycle: Duration,
    pub poll_interval: Duration,
}

impl Default for LightConfig {
    fn default() -> Self {
        LightConfig {
            min_cycle: Duration::from_millis(DEFAULT_MIN_CYCLE_MS),
            max_cycle: Duration::from_millis(DEFAULT_MAX_CYCLE_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl LightConfig {
    pub fn with_cycle(mut self, min_cycle: Duration, max_cycle: Duration) -> Self {
        self.min_cycle = min_cycle;
        self.max_cycle = max_cycle;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_cycle > self.max_cycle {
            return Err(ConfigError::InvertedCycle {
                min: self.min_cycle,
                max: self.max_cycle,
            });
        }
        if self.poll_interval.is_zero() {
            return Err(ConfigError::ZeroPollInterval);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `min_cycle` is longer than `max_cycle`.
    InvertedCycle { min: Duration, max: Duration },
    /// A zero poll interval would spin the timing thread on a full core.
    ZeroPollInterval,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvertedCycle { min, max } => {
                write!(f, "min cycle {:?} exceeds max cycle {:?}", min, max)
            }
            ConfigError::ZeroPollInterval => write!(f, "poll interval must be non-zero"),
        }
    }
}

impl error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::{ConfigError, LightConfig};
    use std::time::Duration;

    #[test]
    fn default_is_valid() {
        let config = LightConfig::default();
        assert_eq!(config.min_cycle, Duration::from_millis(4000));
        assert_eq!(config.max_cycle, Duration::from_millis(6000));
        assert_eq!(config.poll_interval, Duration::from_millis(1));
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_cycle() {
        let config = LightConfig::default()
            .with_cycle(Duration::from_millis(60), Duration::from_millis(40));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedCycle {
                min: Duration::from_millis(60),
                max: Duration::from_millis(40),
            })
        );
    }

    #[test]
    fn rejects_zero_poll_interval() {
        let config = LightConfig::default().with_poll_interval(Duration::ZERO);
        assert_eq!(config.validate(), Err(ConfigError::ZeroPollInterval));
    }

    #[test]
    fn fixed_cycle_is_valid() {
        let cycle = Duration::from_millis(50);
        let config = LightConfig::default().with_cycle(cycle, cycle);
        assert!(config.validate().is_ok());
    }
}
