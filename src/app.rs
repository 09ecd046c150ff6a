//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the CSV pair or generates the demonstration pair
//! - runs the profiling pipeline
//! - prints the summary, JSON, and optional plot

use clap::Parser;

use crate::cli::{Cli, Command, DemoArgs, ProfileArgs, RunArgs};
use crate::data::{DemoSpec, generate_pair};
use crate::domain::{EntropyBins, ProfileConfig};
use crate::entropy::{DEFAULT_BINS, spanning_edges};
use crate::error::ProfileError;

pub mod pipeline;

/// Entry point for the `milag` binary.
pub fn run() -> Result<(), ProfileError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Demo(args) => handle_demo(args),
        Command::Profile(args) => handle_profile(args),
    }
}

fn handle_demo(args: DemoArgs) -> Result<(), ProfileError> {
    let spec = DemoSpec {
        len: args.length,
        noise: args.noise,
        shift: args.shift,
        seed: args.run.seed,
    };
    let (a, b) = generate_pair(&spec)?;
    profile_and_print(&args.run, &a, &b)
}

fn handle_profile(args: ProfileArgs) -> Result<(), ProfileError> {
    let (a, b) = crate::io::load_series_pair(&args.input)?;
    profile_and_print(&args.run, &a, &b)
}

fn profile_and_print(args: &RunArgs, a: &[f64], b: &[f64]) -> Result<(), ProfileError> {
    let config = profile_config_from_args(args, a, b);
    let output = pipeline::run_profile(&config, a, b)?;

    if args.json {
        let json = serde_json::to_string_pretty(&output)
            .map_err(|e| ProfileError::internal(format!("serializing output: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_run_summary(&output));
    }

    if args.plot {
        println!(
            "{}",
            crate::plot::render_profile_plot(&output, args.width, args.height)
        );
    }

    Ok(())
}

/// Build the run configuration from shared CLI flags.
///
/// `--entropy` derives one spanning histogram per series from the raw values,
/// before any trimming, so the bound reflects the data actually supplied.
pub fn profile_config_from_args(
    args: &RunArgs,
    series_a: &[f64],
    series_b: &[f64],
) -> ProfileConfig {
    let entropy_bins = args.entropy.then(|| EntropyBins {
        edges_a: spanning_edges(series_a, DEFAULT_BINS),
        edges_b: spanning_edges(series_b, DEFAULT_BINS),
    });

    ProfileConfig {
        resolution: args.resolution,
        min_lag: args.min_lag,
        max_lag: args.max_lag,
        confidence: args.confidence,
        missing_data: args.missing_data,
        seed: args.seed,
        entropy_bins,
    }
}
