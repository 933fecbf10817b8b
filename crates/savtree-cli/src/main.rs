//! `savtree` CLI — convert Clausewitz-style save files to JSON from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Convert a save to compact JSON (stdin → stdout)
//! savtree json < gamestate
//!
//! # Convert from file to file, pretty-printed
//! savtree json -i gamestate -o gamestate.json --pretty
//!
//! # Show parse diagnostics
//! savtree stats -i gamestate
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io;

#[derive(Parser)]
#[command(
    name = "savtree",
    version,
    about = "Convert strategy-game save files to JSON"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a save file and emit JSON
    Json {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Parse a save file and report diagnostics
    Stats {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Json {
            input,
            output,
            pretty,
        } => {
            let doc = parse_input(input.as_deref())?;
            let json = if pretty {
                serde_json::to_string_pretty(&doc.root)?
            } else {
                serde_json::to_string(&doc.root)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Stats { input } => {
            let doc = parse_input(input.as_deref())?;
            let entries = doc.root.as_object().map(|m| m.len()).unwrap_or(0);
            println!("Lines scanned:   {}", doc.lines);
            println!("Root entries:    {}", entries);
            println!("Undefined keys:  {}", doc.undefined_keys);
            println!("Skipped equals:  {}", doc.skipped_equals);
        }
    }

    Ok(())
}

/// Parse from a file or stdin. The parser consumes the stream directly; the
/// save never needs to be buffered whole.
fn parse_input(path: Option<&str>) -> Result<savtree_core::Document> {
    match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open file: {}", path))?;
            savtree_core::parse(file).with_context(|| format!("Failed to parse save: {}", path))
        }
        None => {
            let stdin = io::stdin();
            savtree_core::parse(stdin.lock()).context("Failed to parse save from stdin")
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
