//! Tessera CLI - inspect and fingerprint canonical values.

use clap::{Parser, Subcommand};

mod commands;
mod input;
mod logging;
mod output;

use commands::{fingerprint, inspect, integer};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Inspect and fingerprint canonical Tessera values")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a decimal integer and show its canonical form and fingerprint
    Integer {
        /// Decimal text (e.g. "-0042")
        #[arg(allow_hyphen_values = true)]
        text: String,
        /// JSON file with number format settings (default: invariant)
        #[arg(long)]
        format: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the inspect text for input JSON
    Inspect {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
    /// Show the fingerprint for input JSON
    Fingerprint {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Integer { text, format, json } => integer::run(text, format, json),
        Commands::Inspect { input } => inspect::run(input),
        Commands::Fingerprint { input, json } => fingerprint::run(input, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
