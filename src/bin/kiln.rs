//! kiln: infer per-category JSON Schemas from a stream of events
//!
//! Reads newline-delimited JSON events, groups them by their computed
//! category title, and prints one merged JSON Schema document per category
//! once the input is exhausted. Diagnostics for skipped lines go to stderr.
//!
//! Usage:
//!   # Read from file, output to stdout
//!   kiln tracking.jsonl
//!
//!   # Read from stdin, output to stdout
//!   cat tracking.log | kiln
//!
//!   # Show per-group merge activity
//!   kiln -vv tracking.jsonl

// Use MiMalloc allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::Result;
use clap::Parser;
use kiln::StreamProcessor;
use std::fs::File;
use std::io::{stdin, stdout, BufRead, BufReader, Write};
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kiln")]
#[command(about = "Infer per-category JSON Schemas from JSON-Lines events", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Increase diagnostic verbosity (-v: info, -vv: debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress skipped-line diagnostics
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.quiet {
        Level::ERROR
    } else {
        match args.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    // Create reader based on input source
    let reader: Box<dyn BufRead> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(File::open(file_path)?))
    } else {
        Box::new(BufReader::new(stdin()))
    };

    let mut processor = StreamProcessor::new();
    let mut processed: usize = 0;
    let mut skipped: usize = 0;

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        match processor.process_line(&line) {
            Ok(()) => processed += 1,
            Err(err) => {
                skipped += 1;
                warn!("Line {}: {}", line_num + 1, err);
            }
        }
    }

    info!(
        "Processed {} events ({} skipped), emitting {} schemas",
        processed,
        skipped,
        processor.schema_count()
    );

    let stdout = stdout();
    let mut out = stdout.lock();
    processor.write_schemas(&mut out)?;
    out.flush()?;

    Ok(())
}
