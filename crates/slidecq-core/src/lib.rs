//! Slidecq Core - sample-by-sample sliding constant-Q transform
//!
//! This crate keeps a log-frequency spectral estimate current one audio
//! sample at a time. Each bin is a recursive complex oscillator: the newest
//! sample is added at the bin's leading phase and the sample leaving the
//! window is subtracted at the phase it entered with, so no full window is
//! ever re-summed.
//!
//! # Components
//!
//! - [`DelayLine`] - Zero-primed FIFO giving the sample from exactly N steps ago
//! - [`SlidingTransform`] - The bank of per-bin recursive accumulators
//! - [`SlidingAnalyzer`] - One stream's session: transform, delay line and index
//! - [`TransformConfig`] - Construction parameters, validation and TOML loading
//!
//! # Example
//!
//! ```rust
//! use slidecq_core::{SlidingAnalyzer, TransformConfig};
//!
//! let config = TransformConfig::new(44100, 110.0, 4096, 5, 12);
//! let mut analyzer = SlidingAnalyzer::new(config).unwrap();
//!
//! for i in 0..8192 {
//!     let x = (2.0 * std::f64::consts::PI * 440.0 * i as f64 / 44100.0).sin();
//!     let spectrum = analyzer.process(x);
//!     assert_eq!(spectrum.len(), 60);
//! }
//!
//! // Bin 24 sits two octaves above 110 Hz
//! let bin = analyzer.transform().freq_to_bin(440.0);
//! assert_eq!(bin, 24);
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations, locks or logging per sample
//! - **Fail fast**: Invalid configurations are rejected at construction
//! - **Caller contract**: Sample indices must increase by one from zero;
//!   this is documented, not checked
//!
//! # Features
//!
//! - `tracing` - Emit `tracing` events when transforms are built or reset

pub mod analyzer;
pub mod config;
pub mod delay;
pub mod error;
pub mod transform;

pub use analyzer::SlidingAnalyzer;
pub use config::TransformConfig;
pub use delay::DelayLine;
pub use error::ConfigError;
pub use rustfft::num_complex::Complex64;
pub use transform::{PhaseMode, SlidingTransform};
