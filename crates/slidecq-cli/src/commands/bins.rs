//! Bin layout listing command.

use clap::Args;
use slidecq_core::SlidingTransform;

use super::common::TransformArgs;

/// List bin centre frequencies.
#[derive(Args)]
pub struct BinsArgs {
    #[command(flatten)]
    transform: TransformArgs,
}

/// Run the bins command.
pub fn run(args: BinsArgs) -> anyhow::Result<()> {
    let config = args.transform.resolve()?;
    let nyquist = config.nyquist();
    let transform = SlidingTransform::new(config)?;

    println!(
        "{} bins, window {} samples @ {} Hz",
        transform.bin_count(),
        transform.window_length(),
        transform.sample_rate()
    );
    println!();
    println!("  {:>5}  {:>12}  {:>14}", "Bin", "Freq (Hz)", "dθ (rad)");
    println!("  {:>5}  {:>12}  {:>14}", "---", "---------", "--------");

    for (k, (&freq, &increment)) in transform
        .frequencies()
        .iter()
        .zip(transform.angular_increments())
        .enumerate()
    {
        let marker = if freq > nyquist { "  (above Nyquist)" } else { "" };
        println!("  {k:>5}  {freq:>12.3}  {increment:>14.6}{marker}");
    }

    Ok(())
}
