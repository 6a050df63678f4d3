//! srcscan - sample rate converter quality scan
//!
//! Run with: cargo run --bin srcscan [-- <quality>]
//!
//! Converts a sine tone between every pair of common rates and prints one
//! row per conversion. Set RUST_LOG=debug to see which resampler each row
//! picked.

mod report;

use flowgraph_dsp::{MultiChannelResampler, Quality};
use report::{Measurement, RATES};
use tracing_subscriber::EnvFilter;

fn parse_quality(arg: &str) -> color_eyre::Result<Quality> {
    let quality = match arg.to_ascii_lowercase().as_str() {
        "fastest" => Quality::Fastest,
        "low" => Quality::Low,
        "medium" => Quality::Medium,
        "high" => Quality::High,
        "best" => Quality::Best,
        other => color_eyre::eyre::bail!(
            "unknown quality {other:?}, expected fastest, low, medium, high or best"
        ),
    };
    Ok(quality)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let qualities = match std::env::args().nth(1) {
        Some(arg) => vec![parse_quality(&arg)?],
        None => Quality::ALL.to_vec(),
    };

    println!("{}", Measurement::header());
    for quality in qualities {
        for &source_rate in RATES {
            for &sink_rate in RATES {
                if source_rate == sink_rate {
                    continue;
                }
                let mut resampler = MultiChannelResampler::make(1, source_rate, sink_rate, quality)?;
                let measurement = Measurement::run(&mut resampler, source_rate, sink_rate);
                println!("{:?}\t{}", quality, measurement.row());
            }
        }
    }
    Ok(())
}
