//! Detection Configuration
//!
//! All tunables consumed by a single engine invocation. The configuration is
//! an immutable value passed into the detector, loadable from a TOML file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which pipeline the engine runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMode {
    /// Adaptive prominence-filtered detection with legacy fallback
    #[default]
    Robust,
    /// Zero-crossing frequency estimate with top-N extremum selection,
    /// intended for highly regular swings
    Frequency,
}

/// How a candidate's prominence is bounded.
///
/// The two variants are numerically different on purpose: the robust path
/// historically bounds against the nearest opposing candidates, the
/// frequency path against the whole series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProminenceStrategy {
    /// Bounded by the nearest earlier/later opposite-kind candidate
    #[default]
    Local,
    /// Bounded by the most extreme opposing value out to each series boundary
    Global,
}

/// Tunables for turning-point detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Minimum prominence as a factor of the smoothed amplitude (0..=1)
    pub min_prominence_factor: f64,
    /// Minimum movement threshold as a factor of the amplitude (0..=1).
    /// Computed and logged per invocation but not applied as a candidate
    /// filter; kept for parity with the historical tuning surface.
    pub min_movement_factor: f64,
    /// Half-width of the symmetric smoothing window (odd, >= 1)
    pub smoothing_window: usize,
    /// Expected turning points per second, used only for the plausibility
    /// warning
    pub expected_turns_per_second: f64,
    /// Maximum allowed deviation from the expected count, as a factor of the
    /// expected count (diagnostic only)
    pub max_deviation_factor: f64,
    /// Whether the legacy direction-reversal detector may run when the
    /// primary path under-detects
    pub allow_fallback: bool,
    /// Pipeline selection
    #[serde(default)]
    pub mode: DetectionMode,
    /// Prominence bounding used by the robust path's candidate filter
    #[serde(default)]
    pub prominence_strategy: ProminenceStrategy,
    /// Whether the frequency path analyzes the smoothed series instead of
    /// the raw x-channel
    #[serde(default)]
    pub frequency_use_smoothed: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_prominence_factor: 0.15,
            min_movement_factor: 0.03,
            smoothing_window: 5,
            expected_turns_per_second: 2.0,
            max_deviation_factor: 0.5,
            allow_fallback: true,
            mode: DetectionMode::Robust,
            prominence_strategy: ProminenceStrategy::Local,
            frequency_use_smoothed: false,
        }
    }
}

impl TrackingConfig {
    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first
    /// invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(0.0..=1.0).contains(&self.min_prominence_factor) {
            return Err(crate::Error::Config(format!(
                "min_prominence_factor must be in [0, 1], got {}",
                self.min_prominence_factor
            )));
        }
        if !(0.0..=1.0).contains(&self.min_movement_factor) {
            return Err(crate::Error::Config(format!(
                "min_movement_factor must be in [0, 1], got {}",
                self.min_movement_factor
            )));
        }
        if self.smoothing_window == 0 || self.smoothing_window % 2 == 0 {
            return Err(crate::Error::Config(format!(
                "smoothing_window must be odd and >= 1, got {}",
                self.smoothing_window
            )));
        }
        if self.expected_turns_per_second <= 0.0 {
            return Err(crate::Error::Config(format!(
                "expected_turns_per_second must be positive, got {}",
                self.expected_turns_per_second
            )));
        }
        if self.max_deviation_factor <= 0.0 {
            return Err(crate::Error::Config(format!(
                "max_deviation_factor must be positive, got {}",
                self.max_deviation_factor
            )));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".swing_analyzer").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}
