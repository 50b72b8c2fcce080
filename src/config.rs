//! Runtime configuration for the staircase sequencer.

use crate::time::TimeDuration;
use crate::types::{ActiveLevel, DebouncePolicy};

/// Default minimum time between honored sensor triggers.
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Default time between lighting successive zones of one run.
pub const DEFAULT_STEP_ADVANCE_MS: u64 = 500;

/// Default time a zone stays lit before it is commanded off.
pub const DEFAULT_CLEAR_DELAY_MS: u64 = 2_300;

/// Default intensity written to a zone when it is lit.
pub const DEFAULT_LIT_LEVEL: u8 = u8::MAX;

/// Configuration validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Step advance interval of zero would light every zone on one tick.
    ZeroStepInterval,

    /// A lit level of zero is indistinguishable from off.
    ZeroLitLevel,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroStepInterval => {
                write!(f, "step advance interval must be non-zero")
            }
            ConfigError::ZeroLitLevel => {
                write!(f, "lit level must be non-zero")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// Timing and polarity settings for a [`StairSequencer`](crate::StairSequencer).
///
/// Zone count and per-direction run capacity are const generics on the
/// sequencer itself; everything here can change between deployments without
/// recompiling the state layout.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StairConfig<D: TimeDuration> {
    /// Minimum time between honored sensor triggers.
    pub debounce_window: D,

    /// Time between lighting successive zones of one run.
    pub step_advance_interval: D,

    /// Time a zone stays lit after being lit.
    pub clear_delay: D,

    /// Raw sensor level that counts as triggered.
    pub active_level: ActiveLevel,

    /// Whether the two sensors share one debounce window.
    pub debounce_policy: DebouncePolicy,

    /// Intensity written to a zone when it is lit.
    pub lit_level: u8,
}

impl<D: TimeDuration> StairConfig<D> {
    /// Creates a new configuration builder seeded with the defaults.
    pub fn builder() -> StairConfigBuilder<D> {
        StairConfigBuilder::new()
    }
}

impl<D: TimeDuration> Default for StairConfig<D> {
    fn default() -> Self {
        Self {
            debounce_window: D::from_millis(DEFAULT_DEBOUNCE_MS),
            step_advance_interval: D::from_millis(DEFAULT_STEP_ADVANCE_MS),
            clear_delay: D::from_millis(DEFAULT_CLEAR_DELAY_MS),
            active_level: ActiveLevel::default(),
            debounce_policy: DebouncePolicy::default(),
            lit_level: DEFAULT_LIT_LEVEL,
        }
    }
}

/// Builder for validated [`StairConfig`] values.
#[derive(Debug)]
pub struct StairConfigBuilder<D: TimeDuration> {
    config: StairConfig<D>,
}

impl<D: TimeDuration> StairConfigBuilder<D> {
    /// Creates a builder holding the default configuration.
    pub fn new() -> Self {
        Self {
            config: StairConfig::default(),
        }
    }

    /// Sets the debounce window.
    pub fn debounce_window(mut self, window: D) -> Self {
        self.config.debounce_window = window;
        self
    }

    /// Sets the step advance interval.
    pub fn step_advance_interval(mut self, interval: D) -> Self {
        self.config.step_advance_interval = interval;
        self
    }

    /// Sets the clear delay.
    pub fn clear_delay(mut self, delay: D) -> Self {
        self.config.clear_delay = delay;
        self
    }

    /// Sets the sensor polarity.
    pub fn active_level(mut self, level: ActiveLevel) -> Self {
        self.config.active_level = level;
        self
    }

    /// Sets the debounce policy.
    pub fn debounce_policy(mut self, policy: DebouncePolicy) -> Self {
        self.config.debounce_policy = policy;
        self
    }

    /// Sets the intensity used for lit zones.
    pub fn lit_level(mut self, level: u8) -> Self {
        self.config.lit_level = level;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    /// * `ZeroStepInterval` - The step advance interval is zero
    /// * `ZeroLitLevel` - The lit level is zero
    pub fn build(self) -> Result<StairConfig<D>, ConfigError> {
        if self.config.step_advance_interval.as_millis() == 0 {
            return Err(ConfigError::ZeroStepInterval);
        }

        if self.config.lit_level == 0 {
            return Err(ConfigError::ZeroLitLevel);
        }

        Ok(self.config)
    }
}

impl<D: TimeDuration> Default for StairConfigBuilder<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::MillisDuration;

    #[test]
    fn defaults_match_reference_device() {
        let config = StairConfig::<MillisDuration>::default();

        assert_eq!(config.debounce_window, MillisDuration(500));
        assert_eq!(config.step_advance_interval, MillisDuration(500));
        assert_eq!(config.clear_delay, MillisDuration(2_300));
        assert_eq!(config.active_level, ActiveLevel::High);
        assert_eq!(config.debounce_policy, DebouncePolicy::Shared);
        assert_eq!(config.lit_level, 255);
    }

    #[test]
    fn builder_rejects_zero_step_interval() {
        let result = StairConfig::<MillisDuration>::builder()
            .step_advance_interval(MillisDuration(0))
            .build();
        assert_eq!(result, Err(ConfigError::ZeroStepInterval));
    }

    #[test]
    fn builder_rejects_zero_lit_level() {
        let result = StairConfig::<MillisDuration>::builder().lit_level(0).build();
        assert_eq!(result, Err(ConfigError::ZeroLitLevel));
    }

    #[test]
    fn builder_applies_overrides() {
        let config = StairConfig::<MillisDuration>::builder()
            .debounce_window(MillisDuration(250))
            .clear_delay(MillisDuration(10_000))
            .active_level(ActiveLevel::Low)
            .debounce_policy(DebouncePolicy::PerSensor)
            .lit_level(128)
            .build()
            .unwrap();

        assert_eq!(config.debounce_window, MillisDuration(250));
        assert_eq!(config.clear_delay, MillisDuration(10_000));
        assert_eq!(config.active_level, ActiveLevel::Low);
        assert_eq!(config.debounce_policy, DebouncePolicy::PerSensor);
        assert_eq!(config.lit_level, 128);
    }
}
