//! Shared CLI helpers used across multiple commands.

use anyhow::Context;
use clap::Args;
use slidecq_core::{PhaseMode, TransformConfig};
use std::path::PathBuf;

/// Transform configuration flags shared by every command.
///
/// Values given on the command line override those from `--config`, which
/// in turn override the built-in defaults.
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// TOML file with transform settings
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sample rate in Hz
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Lowest bin frequency in Hz
    #[arg(long)]
    pub base_frequency: Option<f64>,

    /// Sliding window length in samples
    #[arg(long)]
    pub window_length: Option<usize>,

    /// Number of octaves
    #[arg(long)]
    pub octaves: Option<usize>,

    /// Bins per octave
    #[arg(long)]
    pub bins_per_octave: Option<usize>,

    /// Reduce phase accumulators modulo 2π
    #[arg(long)]
    pub wrap_phase: bool,
}

impl TransformArgs {
    /// Builds the effective configuration and validates it.
    pub fn resolve(&self) -> anyhow::Result<TransformConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config '{}'", path.display()))?;
                TransformConfig::from_toml_str(&text)
                    .with_context(|| format!("invalid config '{}'", path.display()))?
            }
            None => TransformConfig::default(),
        };

        if let Some(sample_rate) = self.sample_rate {
            config.sample_rate = sample_rate;
        }
        if let Some(base_frequency) = self.base_frequency {
            config.base_frequency = base_frequency;
        }
        if let Some(window_length) = self.window_length {
            config.window_length = window_length;
        }
        if let Some(octaves) = self.octaves {
            config.octave_count = octaves;
        }
        if let Some(bins_per_octave) = self.bins_per_octave {
            config.bins_per_octave = bins_per_octave;
        }
        if self.wrap_phase {
            config.phase_mode = PhaseMode::Wrapped;
        }

        config.validate()?;
        tracing::debug!(?config, "resolved transform config");
        Ok(config)
    }
}
