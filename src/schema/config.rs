//! Configuration types for smoke propagation parameters.

use serde::{Deserialize, Serialize};

/// Lowest accepted tick rate (one simulated tick per host frame).
pub const MIN_TICK_RATE: u32 = 1;

/// Highest tick rate exposed to hosts.
pub const MAX_TICK_RATE: u32 = 50;

fn default_tick_rate() -> u32 {
    1
}

fn default_rate() -> f32 {
    1.0
}

/// When configuration edits become visible to the update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Rates and weight mode are latched after every full board update, so an
    /// edit is observed one update late.
    #[default]
    Latched,
    /// Rates and weight mode are re-read at the start of every update.
    Immediate,
}

/// Host-tunable engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Host frames per simulated tick while running.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// Scale applied to mass pushed out of emitter cells (0.0-1.0).
    #[serde(default = "default_rate")]
    pub emitter_rate: f32,
    /// Scale applied to mass drained into escape cells (0.0-1.0).
    #[serde(default = "default_rate")]
    pub escape_rate: f32,
    /// Use per-cell neighbor-count weights instead of a flat 1/4.
    #[serde(default)]
    pub use_precalculated_weights: bool,
    #[serde(default)]
    pub apply: ApplyMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate: default_tick_rate(),
            emitter_rate: default_rate(),
            escape_rate: default_rate(),
            use_precalculated_weights: false,
            apply: ApplyMode::Latched,
        }
    }
}

impl EngineConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TICK_RATE..=MAX_TICK_RATE).contains(&self.tick_rate) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        if !rate_in_range(self.emitter_rate) {
            return Err(ConfigError::InvalidRate {
                name: "emitter_rate",
                value: self.emitter_rate,
            });
        }
        if !rate_in_range(self.escape_rate) {
            return Err(ConfigError::InvalidRate {
                name: "escape_rate",
                value: self.escape_rate,
            });
        }
        Ok(())
    }

    /// Frame-skip reload value. A zero tick rate would never count down to an
    /// update, so it is treated as 1.
    #[inline]
    pub(crate) fn frame_skip(&self) -> u32 {
        self.tick_rate.max(MIN_TICK_RATE)
    }
}

fn rate_in_range(rate: f32) -> bool {
    rate.is_finite() && (0.0..=1.0).contains(&rate)
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Tick rate {0} outside [1, 50]")]
    InvalidTickRate(u32),
    #[error("{name} {value} outside [0, 1]")]
    InvalidRate { name: &'static str, value: f32 },
}
