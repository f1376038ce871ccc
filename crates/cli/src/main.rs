//! CLI tool for generating name-card slide decks from visitor lists.

use anyhow::{Context, Result};
use clap::Parser;
use namecard_core::{plan_deck, VisitorLoader};
use namecard_pptx::PptxWriter;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

/// Generate a printable name-card deck from a visitor list.
#[derive(Parser, Debug)]
#[command(name = "namecard-gen")]
#[command(version, about, long_about = None)]
struct Args {
    /// Input visitor list (comma-delimited: name, title, graduate cohort, hometown)
    input: PathBuf,

    /// Output presentation file (.pptx)
    output: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --help and --version exit successfully through clap.
            if !err.use_stderr() {
                err.exit();
            }
            eprintln!("{}", err);
            eprintln!("Run 'namecard-gen --help' for details.");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

/// Run the whole pipeline: load visitors, plan the deck, write it out.
///
/// The output file is only created once loading and layout succeeded,
/// so a failed run never leaves a partial document at a path that was
/// previously empty.
fn run(args: &Args) -> Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let reader = BufReader::new(file);

    let visitors = VisitorLoader::new()
        .load(reader)
        .with_context(|| format!("Failed to parse {}", args.input.display()))?;
    log::debug!("planning cards for {} visitors", visitors.len());

    let deck = plan_deck(&visitors);
    log::debug!("planned {} slides", deck.slide_count());

    let out = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    PptxWriter::new()
        .write(&deck, out)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    Ok(())
}
