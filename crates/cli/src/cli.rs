//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Gesture Racer - drive a car with two hands in front of a webcam
#[derive(Parser, Debug)]
#[command(
    name = "gesture-racer",
    author,
    version,
    about = "Hand-gesture racer control pipeline",
    long_about = "Runs the gesture racer control pipeline headless.\n\n\
                  Reads hand landmarks from a scripted mock tracker or a recorded \n\
                  session, turns them into gear and steering, integrates speed, \n\
                  drives a kinematic car with a chase camera and emits HUD frames."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "GESTURE_RACER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "GESTURE_RACER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Default log level unless `RUST_LOG` is set
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a driving session
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "racer.toml", env = "GESTURE_RACER_CONFIG")]
    pub config: PathBuf,

    /// Replay a recorded tracking session (JSON lines) instead of the mock tracker
    #[arg(long, env = "GESTURE_RACER_REPLAY")]
    pub replay: Option<PathBuf>,

    /// Replay speed multiplier
    #[arg(long, default_value = "1.0")]
    pub replay_speed: f64,

    /// Loop the recording when it ends
    #[arg(long)]
    pub replay_loop: bool,

    /// Mock tracker script: lap, straight, brake-test, signal-loss
    #[arg(long, default_value = "lap")]
    pub script: String,

    /// Maximum number of rendered frames (0 = unlimited)
    #[arg(long, default_value = "0", env = "GESTURE_RACER_MAX_FRAMES")]
    pub max_frames: u64,

    /// Session timeout in seconds (0 = no timeout)
    #[arg(long, default_value = "0", env = "GESTURE_RACER_TIMEOUT")]
    pub timeout: u64,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", env = "GESTURE_RACER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and exit without driving
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[arg(short, long, default_value = "racer.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    #[arg(short, long, default_value = "racer.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_args() {
        let cli = Cli::parse_from([
            "gesture-racer",
            "-v",
            "run",
            "--config",
            "track.toml",
            "--script",
            "brake-test",
            "--max-frames",
            "120",
        ]);
        assert_eq!(cli.log_level(), "debug");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("track.toml"));
                assert_eq!(args.script, "brake-test");
                assert_eq!(args.max_frames, 120);
                assert!(args.replay.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["gesture-racer", "-q", "-v", "info"]).is_err());
        let cli = Cli::parse_from(["gesture-racer", "-q", "validate", "--json"]);
        assert_eq!(cli.log_level(), "warn");
    }
}
