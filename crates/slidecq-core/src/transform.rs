//! Sliding constant-Q transform.
//!
//! A bank of recursive complex oscillators, one per log-spaced bin, that
//! keeps a windowed spectral estimate current one sample at a time. For bin
//! `k` with angular increment `dθ = -2π f_k / fs` the estimate after sample
//! `s` is
//!
//! ```text
//! F_k[s] = Σ x[j] · e^{i j dθ}    for j in (s - N, s]
//! ```
//!
//! Rather than re-summing the window each step, the transform adds the
//! newest sample rotated by the leading phase and subtracts the sample
//! leaving the window rotated by the phase it had when it entered:
//!
//! ```text
//! F_k[s] = F_k[s-1] + e^{iθ}·x[s] - e^{i(θ - N dθ)}·x[s-N]
//! ```
//!
//! The outgoing sample `x[s-N]` comes from the caller, normally through a
//! primed [`DelayLine`](crate::DelayLine). [`SlidingAnalyzer`](crate::SlidingAnalyzer)
//! wires the two together.
//!
//! # Real-time use
//!
//! All per-bin storage is allocated in [`SlidingTransform::new`].
//! [`SlidingTransform::process_sample`] does not allocate, lock or log.

use std::f64::consts::TAU;

use rustfft::num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::config::TransformConfig;
use crate::error::ConfigError;

/// How the per-bin phase accumulators are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseMode {
    /// Phase grows without bound for the life of the transform
    #[default]
    Unbounded,
    /// Phase is reduced modulo 2π after every increment
    ///
    /// The trailing-edge phase is derived from the reduced leading phase, so
    /// the difference between the two is the same as in unbounded mode.
    Wrapped,
}

/// Recursive sliding spectral transform over log-spaced bins.
///
/// # Example
///
/// ```rust
/// use slidecq_core::{DelayLine, SlidingTransform, TransformConfig};
///
/// let config = TransformConfig::new(8000, 250.0, 64, 3, 1);
/// let mut transform = SlidingTransform::new(config).unwrap();
/// let mut delay = DelayLine::new(transform.window_length());
///
/// for (t, x) in [0.5, -0.25, 1.0].into_iter().enumerate() {
///     let delayed = delay.get();
///     let spectrum = transform.process_sample(x, delayed, t);
///     assert_eq!(spectrum.len(), 3);
///     delay.put(x);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SlidingTransform {
    sample_rate: u32,
    window_length: usize,
    bins_per_octave: usize,
    phase_mode: PhaseMode,
    /// Centre frequency per bin (Hz)
    frequencies: Vec<f64>,
    /// Phase advance per sample per bin (radians)
    increments: Vec<f64>,
    /// Leading-edge phase per bin
    phases: Vec<f64>,
    /// Trailing-edge phase per bin, valid once the window is full
    edge_phases: Vec<f64>,
    /// Committed spectral estimate per bin
    spectrum: Vec<Complex64>,
    /// Next estimate, built before committing to `spectrum`
    pending: Vec<Complex64>,
    /// Raw samples of the first window when history is retained
    history: Option<Vec<f64>>,
}

impl SlidingTransform {
    /// Builds a transform, validating the configuration first.
    ///
    /// Every per-bin array is sized to `config.bin_count()` here and never
    /// resized afterwards.
    pub fn new(config: TransformConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let bins = config.bin_count();
        let sample_rate = f64::from(config.sample_rate);
        let frequencies: Vec<f64> = (0..bins).map(|k| config.bin_frequency(k)).collect();
        let increments: Vec<f64> = frequencies
            .iter()
            .map(|&f| -TAU * f / sample_rate)
            .collect();

        #[cfg(feature = "tracing")]
        {
            let top = frequencies[bins - 1];
            tracing::debug!(
                bins,
                window_length = config.window_length,
                sample_rate = config.sample_rate,
                "sliding transform: {:.2} Hz .. {:.2} Hz",
                frequencies[0],
                top
            );
            if top > config.nyquist() {
                tracing::warn!(
                    top_frequency = top,
                    nyquist = config.nyquist(),
                    "highest bins lie above Nyquist and will alias"
                );
            }
        }

        Ok(Self {
            sample_rate: config.sample_rate,
            window_length: config.window_length,
            bins_per_octave: config.bins_per_octave,
            phase_mode: config.phase_mode,
            frequencies,
            increments,
            phases: vec![0.0; bins],
            edge_phases: vec![0.0; bins],
            spectrum: vec![Complex64::new(0.0, 0.0); bins],
            pending: vec![Complex64::new(0.0, 0.0); bins],
            history: config
                .retain_history
                .then(|| vec![0.0; config.window_length]),
        })
    }

    /// Advances every bin by one sample and returns the new spectrum.
    ///
    /// # Arguments
    ///
    /// * `current` - The newest sample `x[s]`
    /// * `delayed` - The sample `x[s - N]`, or 0 while the window is filling
    /// * `sample_index` - `s`, counting from 0 for the first sample this
    ///   instance sees and increasing by exactly 1 per call
    ///
    /// The index selects one of three regimes:
    ///
    /// - `s == 0`: every bin is seeded with `current`, no rotation.
    /// - `0 < s < N`: the window is filling; `delayed` is ignored.
    /// - `s >= N`: steady state; `delayed` is subtracted at its entry phase.
    ///
    /// Skipping or repeating indices is not detected and yields wrong
    /// (finite) output. Non-finite samples propagate.
    ///
    /// The returned slice is overwritten by the next call. Copy it (see
    /// [`SlidingAnalyzer::snapshot`](crate::SlidingAnalyzer::snapshot)) to
    /// keep a frame.
    #[inline]
    pub fn process_sample(
        &mut self,
        current: f64,
        delayed: f64,
        sample_index: usize,
    ) -> &[Complex64] {
        let n = self.window_length;

        if sample_index == 0 {
            self.spectrum.fill(Complex64::new(current, 0.0));
        } else if sample_index < n {
            for k in 0..self.spectrum.len() {
                let theta = self.advance_phase(k);
                self.spectrum[k] += Complex64::from_polar(1.0, theta) * current;
            }
        } else {
            let window = n as f64;
            for k in 0..self.spectrum.len() {
                let theta = self.advance_phase(k);
                let leading = Complex64::from_polar(1.0, theta);

                let phi = theta - self.increments[k] * window;
                self.edge_phases[k] = phi;
                let trailing = Complex64::from_polar(1.0, phi);

                self.pending[k] = self.spectrum[k] + leading * current - trailing * delayed;
            }
            self.spectrum.copy_from_slice(&self.pending);
        }

        if let Some(slot) = self.history.as_mut().and_then(|h| h.get_mut(sample_index)) {
            *slot = current;
        }

        &self.spectrum
    }

    /// Adds one increment to bin `k`'s leading phase and returns it.
    #[inline]
    fn advance_phase(&mut self, k: usize) -> f64 {
        let mut theta = self.phases[k] + self.increments[k];
        if self.phase_mode == PhaseMode::Wrapped {
            theta = theta.rem_euclid(TAU);
        }
        self.phases[k] = theta;
        theta
    }

    /// Returns to the freshly constructed state without reallocating.
    pub fn reset(&mut self) {
        self.phases.fill(0.0);
        self.edge_phases.fill(0.0);
        self.spectrum.fill(Complex64::new(0.0, 0.0));
        self.pending.fill(Complex64::new(0.0, 0.0));
        if let Some(history) = self.history.as_mut() {
            history.fill(0.0);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(bins = self.spectrum.len(), "sliding transform reset");
    }

    /// Current spectral estimate, one value per bin.
    pub fn spectrum(&self) -> &[Complex64] {
        &self.spectrum
    }

    /// Number of bins M.
    pub fn bin_count(&self) -> usize {
        self.frequencies.len()
    }

    /// Window length N in samples.
    pub fn window_length(&self) -> usize {
        self.window_length
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Bins per octave.
    pub fn bins_per_octave(&self) -> usize {
        self.bins_per_octave
    }

    /// Phase accumulator handling.
    pub fn phase_mode(&self) -> PhaseMode {
        self.phase_mode
    }

    /// Centre frequency of every bin in Hz.
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Per-sample phase advance of every bin in radians.
    pub fn angular_increments(&self) -> &[f64] {
        &self.increments
    }

    /// Leading-edge phase of every bin.
    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    /// Trailing-edge phase of every bin, from the latest steady-state step.
    pub fn edge_phases(&self) -> &[f64] {
        &self.edge_phases
    }

    /// The raw samples of the first window, if history is retained.
    ///
    /// Slots for samples not yet seen read 0.
    pub fn history(&self) -> Option<&[f64]> {
        self.history.as_deref()
    }

    /// Lowest and highest centre frequency.
    pub fn frequency_range(&self) -> (f64, f64) {
        (
            self.frequencies[0],
            self.frequencies[self.frequencies.len() - 1],
        )
    }

    /// Nearest bin to `freq` on the log-frequency axis, clamped to the bank.
    pub fn freq_to_bin(&self, freq: f64) -> usize {
        let base = self.frequencies[0];
        if freq <= base {
            return 0;
        }
        let bin = (self.bins_per_octave as f64 * (freq / base).log2()).round() as usize;
        bin.min(self.bin_count() - 1)
    }

    /// Centre frequency of `bin`, or `None` past the last bin.
    pub fn bin_to_freq(&self, bin: usize) -> Option<f64> {
        self.frequencies.get(bin).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::DelayLine;

    const SAMPLE_RATE: u32 = 8000;

    fn small_config() -> TransformConfig {
        // 250, 500, 1000 Hz: whole cycles in a 256-sample window at 8 kHz
        TransformConfig::new(SAMPLE_RATE, 250.0, 256, 3, 1)
    }

    /// Direct evaluation of the windowed sum the recursion maintains.
    fn direct_sum(signal: &[f64], end: usize, window: usize, increment: f64) -> Complex64 {
        let start = (end + 1).saturating_sub(window);
        (start..=end)
            .map(|j| Complex64::from_polar(1.0, j as f64 * increment) * signal[j])
            .sum()
    }

    fn run(transform: &mut SlidingTransform, signal: &[f64]) -> Vec<Vec<Complex64>> {
        let mut delay = DelayLine::new(transform.window_length());
        signal
            .iter()
            .enumerate()
            .map(|(t, &x)| {
                let delayed = delay.get();
                let frame = transform.process_sample(x, delayed, t).to_vec();
                delay.put(x);
                frame
            })
            .collect()
    }

    #[test]
    fn test_construction_layout() {
        let transform =
            SlidingTransform::new(TransformConfig::new(44100, 110.0, 4096, 5, 12)).unwrap();
        assert_eq!(transform.bin_count(), 60);
        assert_eq!(transform.window_length(), 4096);
        assert_eq!(transform.frequencies()[0], 110.0);
        assert!((transform.frequencies()[12] - 2.0 * transform.frequencies()[0]).abs() < 1e-9);
        assert!(transform.phases().iter().all(|&p| p == 0.0));
        assert!(transform.spectrum().iter().all(|c| c.norm() == 0.0));
        assert!(transform.history().is_none());
    }

    #[test]
    fn test_angular_increment_formula() {
        let transform = SlidingTransform::new(small_config()).unwrap();
        for (&f, &d) in transform.frequencies().iter().zip(transform.angular_increments()) {
            assert_eq!(d, -TAU * f / f64::from(SAMPLE_RATE));
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = SlidingTransform::new(small_config().with_window_length(1)).unwrap_err();
        assert!(matches!(err, ConfigError::WindowLength { value: 1 }));
        assert!(SlidingTransform::new(small_config().with_sample_rate(0)).is_err());
        assert!(SlidingTransform::new(small_config().with_octave_count(0)).is_err());
        assert!(SlidingTransform::new(small_config().with_bins_per_octave(0)).is_err());
    }

    #[test]
    fn test_first_sample_seeds_every_bin() {
        let mut transform = SlidingTransform::new(small_config()).unwrap();
        let spectrum = transform.process_sample(0.75, 123.0, 0);
        for c in spectrum {
            assert_eq!(*c, Complex64::new(0.75, 0.0));
        }
        // No rotation applied yet
        assert!(transform.phases().iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_zero_input_stays_zero() {
        let mut transform = SlidingTransform::new(small_config()).unwrap();
        let frames = run(&mut transform, &vec![0.0; 600]);
        for (t, frame) in frames.iter().enumerate() {
            assert!(frame.iter().all(|c| c.norm() == 0.0), "nonzero output at t={t}");
        }
    }

    #[test]
    fn test_matches_direct_window_sum() {
        let config = TransformConfig::new(SAMPLE_RATE, 300.0, 16, 2, 3);
        let mut transform = SlidingTransform::new(config).unwrap();
        let signal: Vec<f64> = (0..80).map(|i| ((i * 7 % 13) as f64 - 6.0) / 6.0).collect();
        let increments = transform.angular_increments().to_vec();

        let frames = run(&mut transform, &signal);

        for (t, frame) in frames.iter().enumerate() {
            for (k, &d) in increments.iter().enumerate() {
                let expected = direct_sum(&signal, t, 16, d);
                assert!(
                    (frame[k] - expected).norm() < 1e-9,
                    "bin {k} at t={t}: {} vs {}",
                    frame[k],
                    expected
                );
            }
        }
    }

    #[test]
    fn test_delayed_ignored_until_window_full() {
        let window = 8;
        let config = TransformConfig::new(SAMPLE_RATE, 250.0, window, 2, 2);
        let mut honest = SlidingTransform::new(config.clone()).unwrap();
        let mut noisy = SlidingTransform::new(config).unwrap();

        for t in 0..window {
            let a = honest.process_sample(1.0, 0.0, t).to_vec();
            let b = noisy.process_sample(1.0, 5.0, t).to_vec();
            assert_eq!(a, b, "delayed sample leaked into filling branch at t={t}");
        }

        // Index N is the first steady-state step
        let a = honest.process_sample(1.0, 0.0, window).to_vec();
        let b = noisy.process_sample(1.0, 5.0, window).to_vec();
        assert_ne!(a, b, "steady-state subtraction did not engage at t={window}");
    }

    #[test]
    fn test_edge_phase_trails_by_window() {
        let mut transform = SlidingTransform::new(small_config()).unwrap();
        let n = transform.window_length();
        for t in 0..=n + 3 {
            transform.process_sample(0.1, 0.0, t);
        }
        for k in 0..transform.bin_count() {
            let d = transform.angular_increments()[k];
            let expected = transform.phases()[k] - d * n as f64;
            assert_eq!(transform.edge_phases()[k], expected);
        }
    }

    #[test]
    fn test_phase_accumulates_once_per_sample() {
        let mut transform = SlidingTransform::new(small_config()).unwrap();
        let steps = 1000;
        for t in 0..steps {
            transform.process_sample(0.0, 0.0, t);
        }
        for k in 0..transform.bin_count() {
            let d = transform.angular_increments()[k];
            let expected = d * (steps - 1) as f64;
            assert!((transform.phases()[k] - expected).abs() < 1e-9 * expected.abs());
        }
    }

    #[test]
    fn test_sinusoid_selectivity() {
        let mut transform = SlidingTransform::new(small_config()).unwrap();
        let n = transform.window_length();
        let amplitude = 0.5;
        let freq = 500.0;
        let signal: Vec<f64> = (0..8 * n)
            .map(|i| amplitude * (TAU * freq * i as f64 / f64::from(SAMPLE_RATE)).cos())
            .collect();

        let frames = run(&mut transform, &signal);
        let target = transform.freq_to_bin(freq);
        assert_eq!(target, 1);

        let expected = amplitude * n as f64 / 2.0;
        for frame in &frames[n..] {
            assert!(
                (frame[target].norm() - expected).abs() < 1e-6,
                "target magnitude {} should be {}",
                frame[target].norm(),
                expected
            );
            for (k, c) in frame.iter().enumerate() {
                if k != target {
                    assert!(c.norm() < 1e-6, "bin {k} leaked {}", c.norm());
                }
            }
        }
    }

    #[test]
    fn test_wrapped_tracks_unbounded() {
        let config = small_config();
        let mut unbounded = SlidingTransform::new(config.clone()).unwrap();
        let mut wrapped =
            SlidingTransform::new(config.with_phase_mode(PhaseMode::Wrapped)).unwrap();

        let signal: Vec<f64> = (0..2000).map(|i| (i as f64 * 0.37).sin()).collect();
        let a = run(&mut unbounded, &signal);
        let b = run(&mut wrapped, &signal);

        for (t, (fa, fb)) in a.iter().zip(&b).enumerate() {
            for (x, y) in fa.iter().zip(fb) {
                assert!((x - y).norm() < 1e-8, "diverged at t={t}: {x} vs {y}");
            }
        }
        assert!(wrapped.phases().iter().all(|&p| (0.0..=TAU).contains(&p)));
    }

    #[test]
    fn test_history_keeps_first_window() {
        let config = TransformConfig::new(SAMPLE_RATE, 250.0, 4, 1, 1).with_retain_history(true);
        let mut transform = SlidingTransform::new(config).unwrap();

        transform.process_sample(1.0, 0.0, 0);
        transform.process_sample(2.0, 0.0, 1);
        assert_eq!(transform.history(), Some(&[1.0, 2.0, 0.0, 0.0][..]));

        for (t, x) in [(2, 3.0), (3, 4.0), (4, 5.0), (5, 6.0)] {
            transform.process_sample(x, 0.0, t);
        }
        assert_eq!(transform.history(), Some(&[1.0, 2.0, 3.0, 4.0][..]));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut fresh = SlidingTransform::new(small_config()).unwrap();
        let mut used = fresh.clone();
        let signal: Vec<f64> = (0..300).map(|i| (i as f64 * 0.1).cos()).collect();
        run(&mut used, &signal);
        used.reset();

        assert_eq!(used.phases(), fresh.phases());
        assert_eq!(used.spectrum(), fresh.spectrum());
        assert_eq!(run(&mut used, &signal), run(&mut fresh, &signal));
    }

    #[test]
    fn test_nan_propagates() {
        let mut transform = SlidingTransform::new(small_config()).unwrap();
        transform.process_sample(0.0, 0.0, 0);
        let spectrum = transform.process_sample(f64::NAN, 0.0, 1);
        assert!(spectrum.iter().all(|c| c.re.is_nan() || c.im.is_nan()));
    }

    #[test]
    fn test_bin_lookup() {
        let transform =
            SlidingTransform::new(TransformConfig::new(44100, 110.0, 4096, 5, 12)).unwrap();
        assert_eq!(transform.freq_to_bin(50.0), 0);
        assert_eq!(transform.freq_to_bin(220.0), 12);
        assert_eq!(transform.freq_to_bin(440.0), 24);
        assert_eq!(transform.freq_to_bin(20000.0), 59);
        assert_eq!(transform.bin_to_freq(0), Some(110.0));
        assert_eq!(transform.bin_to_freq(60), None);

        let (lo, hi) = transform.frequency_range();
        assert_eq!(lo, 110.0);
        assert!((hi - 110.0 * 2.0_f64.powf(59.0 / 12.0)).abs() < 1e-9);
    }
}
