use crate::core::io::checkpoint::CheckpointSettings;
use crate::core::mechanics::thermal::HeatSplit;
use crate::core::models::bond::DEFAULT_MIN_SEPARATION;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Heat share must lie in [0, 1], got {0}")]
    InvalidHeatShare(f64),
    #[error("Minimum separation must be finite and strictly positive, got {0}")]
    InvalidMinSeparation(f64),
}

/// Global evaluation settings shared by every bond in a run.
///
/// These flags apply run-wide; thermal coupling additionally requires a
/// per-type thermal block, so the effective coupling of one bond is the
/// conjunction of [`heat`](EngineConfig::heat) and its type's block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Whether elastic loads soften as bonds approach their failure surface.
    pub smooth: bool,
    /// Whether thermal coupling is enabled for the run.
    pub heat: bool,
    /// How the heat generated by a bond is divided between its partners.
    pub heat_split: HeatSplit,
    /// Lower clamp applied to bonded separations during evaluation.
    pub min_separation: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            smooth: false,
            heat: false,
            heat_split: HeatSplit::Even,
            min_separation: DEFAULT_MIN_SEPARATION,
        }
    }
}

impl EngineConfig {
    /// Starts a builder over the default configuration.
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// The settings record persisted into checkpoints.
    pub fn to_settings(self) -> CheckpointSettings {
        CheckpointSettings {
            smooth: self.smooth,
            heat: self.heat,
            heat_split: self.heat_split,
            min_separation: self.min_separation,
        }
    }
}

impl From<CheckpointSettings> for EngineConfig {
    fn from(settings: CheckpointSettings) -> Self {
        Self {
            smooth: settings.smooth,
            heat: settings.heat,
            heat_split: settings.heat_split,
            min_separation: settings.min_separation,
        }
    }
}

#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    smooth: Option<bool>,
    heat: Option<bool>,
    heat_split: Option<HeatSplit>,
    min_separation: Option<f64>,
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn smooth(mut self, enabled: bool) -> Self {
        self.smooth = Some(enabled);
        self
    }
    pub fn heat(mut self, enabled: bool) -> Self {
        self.heat = Some(enabled);
        self
    }
    pub fn heat_split(mut self, split: HeatSplit) -> Self {
        self.heat_split = Some(split);
        self
    }
    pub fn min_separation(mut self, minimum: f64) -> Self {
        self.min_separation = Some(minimum);
        self
    }

    /// Finalizes the configuration, validating value ranges.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidHeatShare` for a fractional heat split
    /// outside `[0, 1]` and `ConfigError::InvalidMinSeparation` for a
    /// non-positive or non-finite separation clamp.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        let defaults = EngineConfig::default();
        let config = EngineConfig {
            smooth: self.smooth.unwrap_or(defaults.smooth),
            heat: self.heat.unwrap_or(defaults.heat),
            heat_split: self.heat_split.unwrap_or(defaults.heat_split),
            min_separation: self.min_separation.unwrap_or(defaults.min_separation),
        };

        if let HeatSplit::Fraction(share) = config.heat_split {
            if !share.is_finite() || !(0.0..=1.0).contains(&share) {
                return Err(ConfigError::InvalidHeatShare(share));
            }
        }
        if !config.min_separation.is_finite() || config.min_separation <= 0.0 {
            return Err(ConfigError::InvalidMinSeparation(config.min_separation));
        }

        Ok(config)
    }
}
