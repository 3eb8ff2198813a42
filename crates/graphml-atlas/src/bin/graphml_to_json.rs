use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use graphml_atlas::{ConvertOptions, ConvertResult, convert_file};

/// Convert a GraphML file into the JSON graph consumed by the atlas front end.
#[derive(Parser, Debug)]
#[command(name = "graphml_to_json", version)]
struct Args {
    /// GraphML input
    input: PathBuf,

    /// JSON output
    output: PathBuf,

    /// Optional gzip copy of the JSON output
    compressed: Option<PathBuf>,

    /// JSON file with conversion options
    #[arg(long)]
    config: Option<PathBuf>,
}

fn run(args: &Args) -> ConvertResult<()> {
    let options = match &args.config {
        Some(path) => ConvertOptions::from_json_file(path)?,
        None => ConvertOptions::default(),
    };
    let summary = convert_file(
        &args.input,
        &args.output,
        args.compressed.as_deref(),
        &options,
    )?;
    tracing::info!(
        nodes = summary.nodes,
        edges = summary.edges,
        output = %summary.output.display(),
        "Conversion completed"
    );
    if let Some(path) = &summary.compressed_output {
        tracing::info!(path = %path.display(), "Compressed version saved");
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        tracing::error!(kind = ?err.kind(), "Error during conversion: {err}");
        std::process::exit(1);
    }
}
