//! Validates a converted document on disk and fills in missing positions.
//!
//! Works on a pair of files: the plain JSON document and its gzip copy. The
//! plain file is restored from the copy when it is absent or empty. Files are
//! only rewritten when at least one node was given coordinates.
//!
//! The document is handled as raw JSON so that fields this crate does not
//! model survive a rewrite; only `x` and `y` are ever added.

use rand::Rng;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{CoordinateRange, RepairOptions};
use crate::error::{ConvertError, ConvertResult};
use crate::serialize::{EncodedDocument, gunzip_bytes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairPaths {
    pub plain: PathBuf,
    pub compressed: PathBuf,
}

impl RepairPaths {
    pub fn new(plain: impl Into<PathBuf>, compressed: impl Into<PathBuf>) -> Self {
        RepairPaths {
            plain: plain.into(),
            compressed: compressed.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairReport {
    pub nodes: usize,
    pub edges: usize,
    /// Nodes that received random coordinates.
    pub fixed: usize,
    /// The plain file was restored from the compressed copy.
    pub decompressed: bool,
}

impl RepairReport {
    pub fn rewrote_files(&self) -> bool {
        self.fixed > 0
    }
}

pub fn repair_files(paths: &RepairPaths, options: &RepairOptions) -> ConvertResult<RepairReport> {
    repair_files_with_rng(paths, options, &mut rand::thread_rng())
}

pub fn repair_files_with_rng<R: Rng>(
    paths: &RepairPaths,
    options: &RepairOptions,
    rng: &mut R,
) -> ConvertResult<RepairReport> {
    let decompressed = restore_plain_if_needed(paths)?;

    if is_missing_or_empty(&paths.plain) {
        return Err(ConvertError::MissingInput(paths.plain.clone()));
    }

    let bytes = fs::read(&paths.plain)?;
    let mut document = parse_checked(&bytes)?;

    let fixed = backfill_positions(&mut document, options.coordinate_range, rng)?;
    if fixed > 0 {
        tracing::info!(fixed, "Fixed nodes without coordinates");
        let plain = serde_json::to_vec(&document)?;
        EncodedDocument::from_plain(plain, Some(options.compression_level))?
            .write_to(&paths.plain, Some(&paths.compressed))?;
        tracing::info!("Updated JSON files with fixes");
    }

    let report = RepairReport {
        nodes: collection_len(&document, "nodes"),
        edges: collection_len(&document, "edges"),
        fixed,
        decompressed,
    };
    tracing::info!(
        nodes = report.nodes,
        edges = report.edges,
        "JSON data is valid"
    );
    Ok(report)
}

/// Decodes a document, requiring `nodes` and `edges` arrays at the top level.
/// Everything else is kept untouched.
pub fn parse_checked(bytes: &[u8]) -> ConvertResult<Map<String, Value>> {
    let value: Value = serde_json::from_slice(bytes)?;
    match value {
        Value::Object(map)
            if map.get("nodes").is_some_and(Value::is_array)
                && map.get("edges").is_some_and(Value::is_array) =>
        {
            Ok(map)
        }
        _ => Err(ConvertError::Structure(
            "JSON data doesn't have expected 'nodes' and 'edges' properties".into(),
        )),
    }
}

/// Gives every node object without an `x` or `y` key a fresh uniform random
/// pair drawn from `range`. Returns how many nodes changed.
///
/// Key presence decides, so an explicit `"x": null` is left alone.
pub fn backfill_positions<R: Rng>(
    document: &mut Map<String, Value>,
    range: CoordinateRange,
    rng: &mut R,
) -> ConvertResult<usize> {
    if !range.min.is_finite() || !range.max.is_finite() || range.min > range.max {
        return Err(ConvertError::Structure(format!(
            "invalid coordinate range [{}, {}]",
            range.min, range.max
        )));
    }

    let nodes = document
        .get_mut("nodes")
        .and_then(Value::as_array_mut)
        .ok_or_else(|| ConvertError::Structure("'nodes' is not an array".into()))?;

    let mut fixed = 0;
    for node in nodes {
        let fields = match node {
            Value::Object(fields) => fields,
            other => {
                return Err(ConvertError::Structure(format!(
                    "node is not an object: {other}"
                )));
            }
        };
        if fields.contains_key("x") && fields.contains_key("y") {
            continue;
        }
        fields.insert("x".into(), Value::from(rng.gen_range(range.min..=range.max)));
        fields.insert("y".into(), Value::from(rng.gen_range(range.min..=range.max)));
        fixed += 1;
    }
    Ok(fixed)
}

fn collection_len(document: &Map<String, Value>, key: &str) -> usize {
    document
        .get(key)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

fn restore_plain_if_needed(paths: &RepairPaths) -> ConvertResult<bool> {
    if !paths.compressed.exists() || !is_missing_or_empty(&paths.plain) {
        return Ok(false);
    }
    tracing::info!(
        from = %paths.compressed.display(),
        to = %paths.plain.display(),
        "Decompressing"
    );
    let compressed = fs::read(&paths.compressed)?;
    fs::write(&paths.plain, gunzip_bytes(&compressed)?)?;
    Ok(true)
}

fn is_missing_or_empty(path: &Path) -> bool {
    !fs::metadata(path).is_ok_and(|m| m.len() > 0)
}
