//! Error types for transform configuration.

use thiserror::Error;

/// Errors that can occur while building or loading a [`TransformConfig`].
///
/// [`TransformConfig`]: crate::TransformConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sample rate is zero
    #[error("sample rate must be greater than zero")]
    SampleRate,

    /// Base frequency is not a positive finite number
    #[error("base frequency must be a positive finite number, got {value}")]
    BaseFrequency {
        /// The rejected base frequency in Hz.
        value: f64,
    },

    /// Window length too short to slide
    #[error("window length must be at least 2 samples, got {value}")]
    WindowLength {
        /// The rejected window length in samples.
        value: usize,
    },

    /// Octave count is zero
    #[error("octave count must be greater than zero")]
    OctaveCount,

    /// Bins per octave is zero
    #[error("bins per octave must be greater than zero")]
    BinsPerOctave,

    /// Octave count times bins per octave does not fit in `usize`
    #[error("bin count overflows: {octave_count} octaves x {bins_per_octave} bins per octave")]
    BinCount {
        /// The requested octave count.
        octave_count: usize,
        /// The requested bins per octave.
        bins_per_octave: usize,
    },

    /// Highest bin centre frequency is not finite
    #[error("highest bin frequency is not finite, got {value}")]
    TopFrequency {
        /// The computed centre frequency of the last bin in Hz.
        value: f64,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
