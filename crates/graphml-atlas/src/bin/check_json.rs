use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use graphml_atlas::{RepairOptions, RepairPaths, repair_files};

/// Validate a converted graph and give unplaced nodes random coordinates.
#[derive(Parser, Debug)]
#[command(name = "check_json", version)]
struct Args {
    /// Plain JSON document
    #[arg(long, default_value = "paper_atlas_data.json")]
    json: PathBuf,

    /// Gzip copy of the document
    #[arg(long, default_value = "paper_atlas_data.json.gz")]
    compressed: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let paths = RepairPaths::new(args.json, args.compressed);
    if let Err(err) = repair_files(&paths, &RepairOptions::default()) {
        tracing::error!(kind = ?err.kind(), "Error: {err}");
        std::process::exit(1);
    }
}
