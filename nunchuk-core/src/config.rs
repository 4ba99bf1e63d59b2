//! Driver configuration: bus address, settle delays and poll cadence.

use core::fmt;

/// Default 7-bit I2C address of the Nunchuk.
pub const DEFAULT_ADDRESS: u8 = 0x52;

/// Default poll interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 50;

/// Settle delay between the read-select command and the register read.
pub const READ_SETTLE_US: u32 = 10_000;

/// Settle delay between the two handshake writes.
pub const HANDSHAKE_SETTLE_US: u32 = 1_000;

/// Name the host uses to match the peripheral.
pub const DEVICE_NAME: &str = "nunchuk";

/// Device-tree compatible string for the peripheral.
pub const COMPATIBLE: &str = "nintendo,nunchuk";

/// Error type for configuration validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The poll interval does not leave room for a full read cycle.
    IntervalTooShort {
        /// Requested interval in milliseconds.
        interval_ms: u32,
        /// Settle time consumed by one cycle, in microseconds.
        budget_us: u32,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IntervalTooShort {
                interval_ms,
                budget_us,
            } => write!(
                f,
                "poll interval {interval_ms} ms does not exceed the {budget_us} us cycle budget"
            ),
        }
    }
}

/// Hardware settle delays observed by the transport client.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Wait between read-select and receive (microseconds).
    pub read_settle_us: u32,
    /// Wait between handshake steps (microseconds).
    pub handshake_settle_us: u32,
}

impl TimingConfig {
    /// Timing required by genuine Nunchuk hardware.
    pub const DEFAULT: Self = Self {
        read_settle_us: READ_SETTLE_US,
        handshake_settle_us: HANDSHAKE_SETTLE_US,
    };

    /// Settle time a full poll cycle must leave room for.
    ///
    /// The read-select settle plus the same again before the next cycle may
    /// address the peripheral.
    #[inline]
    #[must_use]
    pub const fn cycle_budget_us(&self) -> u32 {
        self.read_settle_us.saturating_mul(2)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Poll cadence and the timing it has to respect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Interval between poll ticks (milliseconds).
    pub interval_ms: u32,
    /// Settle delays.
    pub timing: TimingConfig,
}

impl PollConfig {
    #[must_use]
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            timing: TimingConfig::DEFAULT,
        }
    }

    #[must_use]
    pub const fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Check that the interval strictly exceeds the per-cycle settle budget.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        let budget_us = self.timing.cycle_budget_us();
        if (self.interval_ms as u64) * 1_000 <= budget_us as u64 {
            return Err(ConfigError::IntervalTooShort {
                interval_ms: self.interval_ms,
                budget_us,
            });
        }
        Ok(())
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL_MS)
    }
}

/// Complete driver configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NunchukConfig {
    /// 7-bit bus address.
    pub address: u8,
    pub poll: PollConfig,
}

impl NunchukConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            poll: PollConfig::new(DEFAULT_POLL_INTERVAL_MS),
        }
    }

    #[must_use]
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub const fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

impl Default for NunchukConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = NunchukConfig::default();
        assert_eq!(config.address, 0x52);
        assert_eq!(config.poll.interval_ms, 50);
        assert_eq!(config.poll.validate(), Ok(()));
    }

    #[test]
    fn test_interval_must_exceed_cycle_budget() {
        assert_eq!(TimingConfig::DEFAULT.cycle_budget_us(), 20_000);

        assert_eq!(
            PollConfig::new(20).validate(),
            Err(ConfigError::IntervalTooShort {
                interval_ms: 20,
                budget_us: 20_000,
            })
        );
        assert_eq!(PollConfig::new(21).validate(), Ok(()));
    }

    #[test]
    fn test_budget_follows_custom_timing() {
        let timing = TimingConfig {
            read_settle_us: 20_000,
            handshake_settle_us: 1_000,
        };
        let poll = PollConfig::new(50).with_timing(timing);
        assert!(poll.validate().is_ok());

        let poll = PollConfig::new(40).with_timing(timing);
        assert!(matches!(
            poll.validate(),
            Err(ConfigError::IntervalTooShort { .. })
        ));
    }
}
