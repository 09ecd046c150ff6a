//! Command-line parsing for the lag profiler.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the estimation/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::MissingDataPolicy;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "milag",
    version,
    about = "Lagged mutual information profiler for paired time series"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Profile a seeded synthetic signal pair with a known shift.
    Demo(DemoArgs),
    /// Profile a two-column CSV of paired observations.
    Profile(ProfileArgs),
}

/// Options for the built-in demonstration pair.
#[derive(Debug, Args, Clone)]
pub struct DemoArgs {
    /// Samples per generated series.
    #[arg(long, default_value_t = 500)]
    pub length: usize,

    /// Gaussian noise sigma added to both series.
    #[arg(long, default_value_t = 0.5)]
    pub noise: f64,

    /// Shift (in samples) applied to the second series.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub shift: i64,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options for profiling a CSV pair.
#[derive(Debug, Args, Clone)]
pub struct ProfileArgs {
    /// CSV with two numeric columns (optional header).
    #[arg(short = 'i', long, value_name = "CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options shared by every profiling run.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Smallest lag (in samples) to profile.
    #[arg(long, default_value_t = -60, allow_negative_numbers = true)]
    pub min_lag: i64,

    /// Largest lag (in samples) to profile.
    #[arg(long, default_value_t = 60, allow_negative_numbers = true)]
    pub max_lag: i64,

    /// Lag step between profiled points.
    #[arg(long, default_value_t = 1)]
    pub resolution: i64,

    /// Confidence level of the prediction bands, in (0, 1).
    #[arg(long, default_value_t = 0.80)]
    pub confidence: f64,

    /// What to do when a row holds a NaN or infinite value.
    #[arg(long, value_enum, default_value_t = MissingDataPolicy::Fail)]
    pub missing_data: MissingDataPolicy,

    /// Seed for the jitter and surrogate randomness.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Also report the entropy upper bound from spanning histograms.
    #[arg(long)]
    pub entropy: bool,

    /// Emit the full result as JSON instead of the text summary.
    #[arg(long)]
    pub json: bool,

    /// Render an ASCII plot of the profile.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_defaults_parse() {
        let cli = Cli::try_parse_from(["milag", "demo"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo subcommand");
        };
        assert_eq!(args.length, 500);
        assert_eq!(args.shift, 0);
        assert_eq!(args.run.min_lag, -60);
        assert_eq!(args.run.max_lag, 60);
        assert_eq!(args.run.resolution, 1);
        assert!(!args.run.json);
        assert!(!args.run.entropy);
    }

    #[test]
    fn profile_accepts_negative_window_and_policy() {
        let cli = Cli::try_parse_from([
            "milag",
            "profile",
            "--input",
            "pair.csv",
            "--min-lag",
            "-12",
            "--max-lag",
            "12",
            "--missing-data",
            "drop-rows",
            "--json",
        ])
        .unwrap();
        let Command::Profile(args) = cli.command else {
            panic!("expected profile subcommand");
        };
        assert_eq!(args.input, PathBuf::from("pair.csv"));
        assert_eq!(args.run.min_lag, -12);
        assert_eq!(args.run.max_lag, 12);
        assert_eq!(args.run.missing_data, MissingDataPolicy::DropRows);
        assert!(args.run.json);
    }

    #[test]
    fn input_is_required_for_profile() {
        assert!(Cli::try_parse_from(["milag", "profile"]).is_err());
    }

    #[test]
    fn negative_shift_parses() {
        let cli = Cli::try_parse_from(["milag", "demo", "--shift", "-9"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo subcommand");
        };
        assert_eq!(args.shift, -9);
    }
}
