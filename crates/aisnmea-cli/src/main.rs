//! aisnmea: batch-decodes AIS NMEA captures into station summaries.

use std::path::PathBuf;

use aisnmea_models::Mmsi;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

mod config;
mod export;
mod input;
mod pipeline;

use config::RunConfig;
use input::InputFormat;

/// AIS NMEA 0183 decoder.
#[derive(Parser, Debug)]
#[command(name = "aisnmea", about = "AIS NMEA 0183 decoder", version)]
struct Args {
    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a capture file and write the overview bundle.
    File(FileArgs),
}

#[derive(clap::Args, Debug)]
struct FileArgs {
    /// Capture to decode.
    input: PathBuf,

    /// Directory for the output files.
    outdir: PathBuf,

    /// Also write one sub-directory per station.
    #[arg(short = 'e', long = "every-station")]
    every_station: bool,

    /// Input is plain NMEA text (default).
    #[arg(short = 't', long, group = "format")]
    text: bool,

    /// Input is an ais-messages.csv export.
    #[arg(short = 'c', long, group = "format")]
    csv: bool,

    /// Input is an ais-messages.jsonl export.
    #[arg(short = 'j', long, group = "format")]
    jsonl: bool,

    /// Trust this base station's UTC broadcasts (repeatable).
    #[arg(long = "timing-source", value_name = "MMSI")]
    timing_sources: Vec<Mmsi>,
}

impl FileArgs {
    fn format(&self) -> InputFormat {
        if self.csv {
            InputFormat::Csv
        } else if self.jsonl {
            InputFormat::Jsonl
        } else {
            InputFormat::Text
        }
    }
}

fn run_file(args: FileArgs) -> Result<()> {
    let format = args.format();
    let config = RunConfig {
        per_station: args.every_station,
        ..RunConfig::from_env()?
    }
    .with_timing_sources(args.timing_sources);

    let records = input::read_input(&args.input, format)?;
    info!(input = %args.input.display(), records = records.len(), %format, "capture loaded");

    let output = pipeline::run(&records, format, &config);
    export::write_overview(&args.outdir, &output)?;
    if config.per_station {
        export::write_station_dirs(&args.outdir, &output.tracker)?;
    }

    println!(
        "{} messages accepted, {} rejected, {} stations",
        output.summary.accepted,
        output.summary.rejected,
        output.tracker.len()
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialise structured logging (controlled via RUST_LOG env var).
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match args.command {
        Command::File(file_args) => run_file(file_args),
    }
}
