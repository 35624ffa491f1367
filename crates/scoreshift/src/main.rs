//! scoreshift binary - transpose a JSON array of events

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use scoreshift::config::MAX_SEMITONES;
use scoreshift::{decode_events, encode_events, transpose, ShiftConfig};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Transpose note, chord, and key events by a number of semitones
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Semitones to shift by (negative shifts down); defaults to the config value
    #[arg(
        short,
        long,
        allow_negative_numbers = true,
        value_parser = clap::value_parser!(i32).range(-(MAX_SEMITONES as i64)..=MAX_SEMITONES as i64)
    )]
    semitones: Option<i32>,

    /// Config file to use instead of ./scoreshift.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long, overrides_with = "no_pretty")]
    pretty: bool,

    /// Print compact JSON even if config asks for pretty output
    #[arg(long, overrides_with = "pretty")]
    no_pretty: bool,

    /// JSON file with an array of events; "-" or omitted reads stdin
    input: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, sources) =
        ShiftConfig::load_from(args.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.log_level);
    debug!(files = ?sources.files, env = ?sources.env_overrides, "configuration loaded");

    let semitones = args.semitones.unwrap_or(config.semitones);
    let pretty = match (args.pretty, args.no_pretty) {
        (true, _) => true,
        (_, true) => false,
        _ => config.pretty,
    };

    let input = read_input(args.input.as_deref())?;
    let events = decode_events(&input).context("decoding events")?;

    info!(semitones, count = events.len(), "transposing");
    let shifted = transpose(semitones, &events);

    let output = encode_events(&shifted);
    let text = if pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{}", text);

    Ok(())
}

/// Logs go to stderr; stdout carries only the JSON result.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("reading events from {}", path.display())),
        _ => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading events from stdin")?;
            Ok(input)
        }
    }
}
