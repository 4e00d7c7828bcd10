use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use rlzip_core::{Pipeline, PipelineOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rlzip",
    version,
    about = "Parallel run-length file compressor",
    long_about = "Compresses the given files into one run-length-encoded \
                  stream on stdout, byte-identical to a sequential encoder."
)]
struct Cli {
    /// Input files, compressed in the order given.
    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Number of compressor worker threads (defaults to CPU count).
    #[arg(long, default_value_t = num_cpus::get())]
    workers: usize,
}

fn main() {
    // Diagnostics go to stderr; stdout carries the binary stream.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(error) = run() {
        eprintln!("rlzip: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let pipeline = Pipeline::with_options(PipelineOptions {
        num_workers: cli.workers.max(1),
        ..PipelineOptions::default()
    });

    let stdout = io::stdout();
    let mut out = stdout.lock();
    pipeline.compress_to(&cli.files, &mut out)?;
    out.flush()?;

    Ok(())
}
