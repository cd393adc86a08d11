//! Synthetic tone analysis command.

use clap::Args;
use slidecq_core::SlidingAnalyzer;
use std::f64::consts::TAU;

use super::common::TransformArgs;

/// Analyze a generated sine wave.
#[derive(Args)]
pub struct ToneArgs {
    /// Tone frequency in Hz
    #[arg(long, default_value = "440.0")]
    frequency: f64,

    /// Peak amplitude
    #[arg(long, default_value = "0.5")]
    amplitude: f64,

    /// Duration in seconds
    #[arg(long, default_value = "1.0")]
    duration: f64,

    /// Show only the N strongest bins
    #[arg(long)]
    top: Option<usize>,

    #[command(flatten)]
    transform: TransformArgs,
}

/// Run the tone command.
pub fn run(args: ToneArgs) -> anyhow::Result<()> {
    if !args.duration.is_finite() || args.duration <= 0.0 {
        anyhow::bail!("duration must be positive and finite, got {}", args.duration);
    }
    if !args.frequency.is_finite() {
        anyhow::bail!("frequency must be finite, got {}", args.frequency);
    }
    if !args.amplitude.is_finite() {
        anyhow::bail!("amplitude must be finite, got {}", args.amplitude);
    }

    let config = args.transform.resolve()?;
    let sample_rate = f64::from(config.sample_rate);
    let num_samples = (args.duration * sample_rate).round() as usize;
    let mut analyzer = SlidingAnalyzer::new(config)?;

    tracing::info!(
        frequency = args.frequency,
        samples = num_samples,
        "analyzing tone"
    );

    let step = TAU * args.frequency / sample_rate;
    for i in 0..num_samples {
        analyzer.process(args.amplitude * (step * i as f64).sin());
    }

    let transform = analyzer.transform();
    let window = transform.window_length().min(num_samples.max(1)) as f64;
    // Normalise so a full-window sine of amplitude A reads A
    let scale = 2.0 / window;

    let mut rows: Vec<(usize, f64, f64)> = transform
        .frequencies()
        .iter()
        .zip(analyzer.spectrum())
        .enumerate()
        .map(|(k, (&freq, value))| (k, freq, value.norm() * scale))
        .collect();

    let peak = rows
        .iter()
        .copied()
        .max_by(|a, b| a.2.total_cmp(&b.2))
        .ok_or_else(|| anyhow::anyhow!("transform has no bins"))?;

    if let Some(top) = args.top {
        rows.sort_by(|a, b| b.2.total_cmp(&a.2));
        rows.truncate(top);
    }

    println!(
        "Tone {:.3} Hz, amplitude {}, {} samples",
        args.frequency, args.amplitude, num_samples
    );
    println!();
    println!("  {:>5}  {:>12}  {:>10}", "Bin", "Freq (Hz)", "Level");
    println!("  {:>5}  {:>12}  {:>10}", "---", "---------", "-----");
    for (k, freq, level) in &rows {
        println!("  {k:>5}  {freq:>12.3}  {level:>10.4}");
    }
    println!();
    println!("Peak bin: {} ({:.3} Hz, level {:.4})", peak.0, peak.1, peak.2);

    Ok(())
}
