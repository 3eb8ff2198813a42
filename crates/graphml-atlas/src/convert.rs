use std::io::BufRead;
use std::path::{Path, PathBuf};

use crate::assemble::Assembler;
use crate::config::ConvertOptions;
use crate::error::ConvertResult;
use crate::map::AttributeMapper;
use crate::model::GraphDocument;
use crate::parse::{GraphParser, KeyDeclarations, ParsedGraph};
use crate::serialize::EncodedDocument;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub nodes: usize,
    pub edges: usize,
    pub output: PathBuf,
    pub compressed_output: Option<PathBuf>,
}

/// Converts GraphML text into a [`GraphDocument`].
pub fn convert_str(xml: &str, options: &ConvertOptions) -> ConvertResult<GraphDocument> {
    let parsed = GraphParser::new(options).parse_str(xml)?;
    build_document(&parsed, options)
}

pub fn convert_reader<R: BufRead>(
    reader: R,
    options: &ConvertOptions,
) -> ConvertResult<GraphDocument> {
    let parsed = GraphParser::new(options).parse_reader(reader)?;
    build_document(&parsed, options)
}

/// Maps every node, then every edge, of an already located graph.
pub fn build_document(
    parsed: &ParsedGraph,
    options: &ConvertOptions,
) -> ConvertResult<GraphDocument> {
    let mapper = AttributeMapper::new(&options.palette);
    let mut assembler = Assembler::new();

    tracing::debug!(
        graph = parsed.graph().attribute("id"),
        namespace = parsed.graph().namespace.as_deref(),
        declared_keys = parsed.key_declarations().map(KeyDeclarations::count),
        "Located graph element"
    );

    tracing::info!("Processing nodes...");
    for element in parsed.nodes() {
        assembler.push_node(mapper.map_node(&element)?);
    }
    tracing::info!(count = assembler.node_count(), "Processed nodes");

    tracing::info!("Processing edges...");
    for (ordinal, element) in parsed.edges().enumerate() {
        assembler.push_edge(mapper.map_edge(ordinal, &element)?);
    }
    tracing::info!(count = assembler.edge_count(), "Processed edges");

    Ok(assembler.finish())
}

/// Converts the GraphML file at `input` and writes the JSON document to
/// `output`, plus a gzip copy to `compressed_output` when given.
///
/// Nothing is written unless parsing, mapping and encoding all succeed.
pub fn convert_file<P, Q>(
    input: P,
    output: Q,
    compressed_output: Option<&Path>,
    options: &ConvertOptions,
) -> ConvertResult<ConversionSummary>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let input = input.as_ref();
    let output = output.as_ref();

    tracing::info!(path = %input.display(), "Parsing GraphML file");
    let parsed = GraphParser::new(options).parse_file(input)?;
    let document = build_document(&parsed, options)?;

    let encoded = EncodedDocument::encode(
        &document,
        compressed_output.map(|_| options.compression_level),
    )?;
    encoded.write_to(output, compressed_output)?;

    Ok(ConversionSummary {
        nodes: document.nodes.len(),
        edges: document.edges.len(),
        output: output.to_path_buf(),
        compressed_output: compressed_output.map(Path::to_path_buf),
    })
}
