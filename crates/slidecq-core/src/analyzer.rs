//! Per-stream analysis session.
//!
//! [`SlidingAnalyzer`] owns a [`SlidingTransform`], the [`DelayLine`] that
//! feeds it the outgoing sample, and the running sample index, so callers
//! only hand it audio.

use rustfft::num_complex::Complex64;

use crate::config::TransformConfig;
use crate::delay::DelayLine;
use crate::error::ConfigError;
use crate::transform::SlidingTransform;

/// One audio stream's sliding constant-Q analysis.
///
/// Each call to [`process`](Self::process) reads the delayed sample, runs
/// the transform at the current index, then stores the new sample for
/// later lookback.
///
/// # Example
///
/// ```rust
/// use slidecq_core::{SlidingAnalyzer, TransformConfig};
///
/// let mut analyzer = SlidingAnalyzer::new(TransformConfig::default()).unwrap();
/// let block = [0.0f32; 128];
/// let mut frames = 0;
/// analyzer.process_block(&block, |_index, spectrum| {
///     assert_eq!(spectrum.len(), 60);
///     frames += 1;
/// });
/// assert_eq!(frames, 128);
/// assert_eq!(analyzer.samples_processed(), 128);
/// ```
#[derive(Debug, Clone)]
pub struct SlidingAnalyzer {
    transform: SlidingTransform,
    delay: DelayLine,
    index: usize,
}

impl SlidingAnalyzer {
    /// Creates a session with a zero-primed delay line of the window length.
    pub fn new(config: TransformConfig) -> Result<Self, ConfigError> {
        let transform = SlidingTransform::new(config)?;
        let delay = DelayLine::new(transform.window_length());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            bins = transform.bin_count(),
            window_length = transform.window_length(),
            "analysis session started"
        );

        Ok(Self {
            transform,
            delay,
            index: 0,
        })
    }

    /// Feeds one sample and returns the updated spectrum.
    #[inline]
    pub fn process(&mut self, sample: f64) -> &[Complex64] {
        let delayed = self.delay.get();
        let spectrum = self.transform.process_sample(sample, delayed, self.index);
        self.delay.put(sample);
        self.index += 1;
        spectrum
    }

    /// Feeds a block, handing each sample's spectrum to `on_frame`.
    ///
    /// `on_frame` receives the sample index and the spectrum after that
    /// sample. Nothing is allocated.
    pub fn process_block<S, F>(&mut self, block: &[S], mut on_frame: F)
    where
        S: Copy + Into<f64>,
        F: FnMut(usize, &[Complex64]),
    {
        for &sample in block {
            let index = self.index;
            let spectrum = self.process(sample.into());
            on_frame(index, spectrum);
        }
    }

    /// Latest spectrum.
    pub fn spectrum(&self) -> &[Complex64] {
        self.transform.spectrum()
    }

    /// Owned copy of the latest spectrum, for consumers that keep frames.
    pub fn snapshot(&self) -> Vec<Complex64> {
        self.transform.spectrum().to_vec()
    }

    /// Samples fed since construction or the last reset.
    pub fn samples_processed(&self) -> usize {
        self.index
    }

    /// The underlying transform (bin layout, phases, history).
    pub fn transform(&self) -> &SlidingTransform {
        &self.transform
    }

    /// Starts a fresh stream without reallocating.
    pub fn reset(&mut self) {
        self.transform.reset();
        self.delay.clear();
        self.delay.prime();
        self.index = 0;
    }
}
