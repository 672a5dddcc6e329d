mod replay;

use std::io::Read;
use std::path::PathBuf;

use a2ui_client::{MessageProcessor, ProcessorConfig};
use clap::Parser;
use log::info;

use crate::replay::{ReplayError, render, replay};

/// Replay an A2UI message log and print the resulting surfaces
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Message log to replay (JSON array or newline-delimited JSON); stdin if omitted
    input: Option<PathBuf>,

    /// Only print this surface
    #[clap(long)]
    surface: Option<String>,

    /// Print raw surface state instead of resolved render trees
    #[clap(long)]
    raw: bool,

    /// Pretty-print the output
    #[clap(long)]
    pretty: bool,

    /// Log every applied message payload
    #[clap(long)]
    debug: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String, ReplayError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
            source_name: path.display().to_string(),
            source,
        }),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .map_err(|source| ReplayError::Read {
                    source_name: "stdin".to_string(),
                    source,
                })?;
            Ok(input)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let input = read_input(args.input.as_ref())?;
    let mut processor = MessageProcessor::with_config(ProcessorConfig::new().with_debug(args.debug));
    let report = replay(&mut processor, &input);

    info!(
        "Applied {} message(s), skipped {}",
        report.applied,
        report.skipped.len()
    );
    for skipped in &report.skipped {
        eprintln!("skipped message #{}: {}", skipped.index, skipped.error);
    }

    let output = render(&processor.refresh(), args.surface.as_deref(), args.raw)?;
    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");
    Ok(())
}
