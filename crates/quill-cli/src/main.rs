//! Quill CLI - replay recorded pointer traces through the gesture recognizer.

#![allow(clippy::needless_pass_by_value, clippy::doc_markdown)]

mod trace;

use clap::{Parser, Subcommand};
use quill_core::{GestureConfig, GestureEvent};
use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use trace::{FlickReport, TraceError};

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Pen flick and gesture recognizer")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a trace through the full gesture engine
    Replay {
        /// JSON-lines trace file
        trace: PathBuf,

        /// Config file (default: ./quill.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Flick tolerance override, exclusive range (0, 1)
        #[arg(short, long)]
        tolerance: Option<f64>,
    },

    /// Run only the flick detector and print its verdict at every Up
    Flicks {
        /// JSON-lines trace file
        trace: PathBuf,

        /// Flick tolerance, 0 (relaxed) to 1 (precise)
        #[arg(short, long, default_value = "0.5")]
        tolerance: f64,
    },

    /// Print or write the default config
    Config {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Replay {
            trace,
            config,
            tolerance,
        } => replay(&trace, config.as_deref(), tolerance),
        Commands::Flicks { trace, tolerance } => flicks(&trace, tolerance),
        Commands::Config { output } => write_config(output.as_deref()),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn replay(
    path: &Path,
    config_path: Option<&Path>,
    tolerance: Option<f64>,
) -> Result<(), TraceError> {
    let mut config = match config_path {
        Some(p) => GestureConfig::load_from_file(p)?,
        None => GestureConfig::load_default(),
    };
    if let Some(t) = tolerance {
        config.tolerance = t;
        config.validate()?;
    }

    let records = trace::load_trace(path)?;
    let events: Vec<GestureEvent> = trace::replay(&records, config);
    log::info!("replay: {} gestures from {}", events.len(), path.display());
    print_json_lines(&events)
}

fn flicks(path: &Path, tolerance: f64) -> Result<(), TraceError> {
    let thresholds = trace::thresholds_for(tolerance)?;
    let records = trace::load_trace(path)?;
    let reports: Vec<FlickReport> = trace::flick_reports(&records, thresholds);
    print_json_lines(&reports)
}

fn write_config(output: Option<&Path>) -> Result<(), TraceError> {
    let config = GestureConfig::default();
    match output {
        Some(path) => {
            config.save_to_file(path)?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", config.to_toml()?),
    }
    Ok(())
}

fn print_json_lines<T: Serialize>(items: &[T]) -> Result<(), TraceError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for item in items {
        serde_json::to_writer(&mut out, item).map_err(io::Error::from)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_replay_args() {
        let cli = Cli::parse_from(["quill", "replay", "trace.jsonl", "--tolerance", "0.7"]);
        match cli.command {
            Commands::Replay {
                trace,
                config,
                tolerance,
            } => {
                assert_eq!(trace, PathBuf::from("trace.jsonl"));
                assert!(config.is_none());
                assert_eq!(tolerance, Some(0.7));
            }
            _ => panic!("expected replay"),
        }
    }

    #[test]
    fn test_parse_flicks_default_tolerance() {
        let cli = Cli::parse_from(["quill", "flicks", "trace.jsonl"]);
        match cli.command {
            Commands::Flicks { tolerance, .. } => assert_eq!(tolerance, 0.5),
            _ => panic!("expected flicks"),
        }
    }

    #[test]
    fn test_replay_rejects_bad_tolerance_before_reading() {
        let err = replay(Path::new("/nonexistent.jsonl"), None, Some(1.0)).unwrap_err();
        assert!(matches!(err, TraceError::Config(_)));
    }

    #[test]
    fn test_flicks_missing_trace_is_io_error() {
        let err = flicks(Path::new("/nonexistent.jsonl"), 0.5).unwrap_err();
        assert!(matches!(err, TraceError::Io(_)));
    }
}
