//! Transform configuration.
//!
//! A [`TransformConfig`] fixes everything about a transform instance at
//! construction: the sample rate, the log-spaced bin layout and the sliding
//! window length. It can be built in code with the `with_*` setters or
//! parsed from TOML.
//!
//! # Example
//!
//! ```rust
//! use slidecq_core::TransformConfig;
//!
//! let config = TransformConfig::default()
//!     .with_sample_rate(48000)
//!     .with_window_length(2048);
//! config.validate().expect("valid config");
//! assert_eq!(config.bin_count(), 60);
//!
//! let parsed = TransformConfig::from_toml_str("base_frequency = 55.0\noctave_count = 6\n")
//!     .expect("valid TOML");
//! assert_eq!(parsed.bin_count(), 72);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::transform::PhaseMode;

/// Immutable construction parameters for a sliding transform.
///
/// Missing TOML keys fall back to the [`Default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Lowest analysis centre frequency in Hz
    pub base_frequency: f64,
    /// Sliding window length N in samples
    pub window_length: usize,
    /// Number of octaves covered above the base frequency
    pub octave_count: usize,
    /// Bins per octave (12 for semitones)
    pub bins_per_octave: usize,
    /// Phase accumulator handling
    pub phase_mode: PhaseMode,
    /// Keep the raw samples of the first window
    pub retain_history: bool,
}

impl Default for TransformConfig {
    /// 44.1 kHz, five octaves of semitone bins from A2 (110 Hz), 4096-sample window.
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            base_frequency: 110.0,
            window_length: 4096,
            octave_count: 5,
            bins_per_octave: 12,
            phase_mode: PhaseMode::Unbounded,
            retain_history: false,
        }
    }
}

impl TransformConfig {
    /// Creates a configuration from the five layout parameters.
    ///
    /// Phase mode and history retention take their defaults. The result is
    /// not validated; the transform validates on construction.
    pub fn new(
        sample_rate: u32,
        base_frequency: f64,
        window_length: usize,
        octave_count: usize,
        bins_per_octave: usize,
    ) -> Self {
        Self {
            sample_rate,
            base_frequency,
            window_length,
            octave_count,
            bins_per_octave,
            ..Self::default()
        }
    }

    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Sets the base frequency.
    pub fn with_base_frequency(mut self, base_frequency: f64) -> Self {
        self.base_frequency = base_frequency;
        self
    }

    /// Sets the window length.
    pub fn with_window_length(mut self, window_length: usize) -> Self {
        self.window_length = window_length;
        self
    }

    /// Sets the octave count.
    pub fn with_octave_count(mut self, octave_count: usize) -> Self {
        self.octave_count = octave_count;
        self
    }

    /// Sets the bins per octave.
    pub fn with_bins_per_octave(mut self, bins_per_octave: usize) -> Self {
        self.bins_per_octave = bins_per_octave;
        self
    }

    /// Sets the phase mode.
    pub fn with_phase_mode(mut self, phase_mode: PhaseMode) -> Self {
        self.phase_mode = phase_mode;
        self
    }

    /// Enables or disables first-window history retention.
    pub fn with_retain_history(mut self, retain_history: bool) -> Self {
        self.retain_history = retain_history;
        self
    }

    /// Checks every construction rule, reporting the first one broken.
    ///
    /// Rules are checked in field order: sample rate, base frequency,
    /// window length, octave count, bins per octave. The bin layout as a
    /// whole is checked last: the bin count must fit in `usize` and the
    /// highest centre frequency must be finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::SampleRate);
        }
        if !self.base_frequency.is_finite() || self.base_frequency <= 0.0 {
            return Err(ConfigError::BaseFrequency {
                value: self.base_frequency,
            });
        }
        if self.window_length < 2 {
            return Err(ConfigError::WindowLength {
                value: self.window_length,
            });
        }
        if self.octave_count == 0 {
            return Err(ConfigError::OctaveCount);
        }
        if self.bins_per_octave == 0 {
            return Err(ConfigError::BinsPerOctave);
        }
        let bins = self
            .octave_count
            .checked_mul(self.bins_per_octave)
            .ok_or(ConfigError::BinCount {
                octave_count: self.octave_count,
                bins_per_octave: self.bins_per_octave,
            })?;
        let top = self.bin_frequency(bins - 1);
        if !top.is_finite() {
            return Err(ConfigError::TopFrequency { value: top });
        }
        Ok(())
    }

    /// Total number of analysis bins, `octave_count * bins_per_octave`.
    ///
    /// Saturates at `usize::MAX` for layouts that [`validate`](Self::validate)
    /// rejects.
    pub fn bin_count(&self) -> usize {
        self.octave_count.saturating_mul(self.bins_per_octave)
    }

    /// Centre frequency of bin `k`: `base * 2^(k / bins_per_octave)`.
    ///
    /// The exponent uses floating-point division so bins are evenly spaced
    /// on the log axis within each octave.
    pub fn bin_frequency(&self, k: usize) -> f64 {
        self.base_frequency * 2.0_f64.powf(k as f64 / self.bins_per_octave as f64)
    }

    /// Half the sample rate.
    pub fn nyquist(&self) -> f64 {
        f64::from(self.sample_rate) / 2.0
    }
}
