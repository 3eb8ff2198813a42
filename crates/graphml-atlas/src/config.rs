use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConvertResult;

pub const GRAPHML_NAMESPACE: &str = "http://graphml.graphdrawing.org/xmlns";

/// Maximum gzip compression.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Namespace tried before falling back to unqualified element names.
    pub namespace: String,
    pub palette: TypePalette,
    pub compression_level: u32,
    /// Rewrite `<data key="d0">` to the `attr.name` of its `<key>` declaration.
    pub resolve_key_declarations: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions {
            namespace: GRAPHML_NAMESPACE.to_string(),
            palette: TypePalette::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            resolve_key_declarations: false,
        }
    }
}

impl ConvertOptions {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConvertResult<Self> {
        let raw = std::fs::read(path)?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

/// Default node colors keyed by exact match on the node `type` value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TypePalette {
    pub types: BTreeMap<String, String>,
    pub fallback: String,
}

impl Default for TypePalette {
    fn default() -> Self {
        let types = [
            ("author", "rgb(154,150,229)"),
            ("paper", "rgb(229,150,154)"),
        ]
        .into_iter()
        .map(|(t, c)| (t.to_string(), c.to_string()))
        .collect();
        TypePalette {
            types,
            fallback: "rgb(150,229,154)".to_string(),
        }
    }
}

impl TypePalette {
    pub fn color_for(&self, node_type: &str) -> &str {
        self.types
            .get(node_type)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct RepairOptions {
    pub coordinate_range: CoordinateRange,
    pub compression_level: u32,
}

impl Default for RepairOptions {
    fn default() -> Self {
        RepairOptions {
            coordinate_range: CoordinateRange::default(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
        }
    }
}

/// Closed interval random coordinates are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CoordinateRange {
    pub min: f64,
    pub max: f64,
}

impl Default for CoordinateRange {
    fn default() -> Self {
        CoordinateRange {
            min: -10.0,
            max: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let options: ConvertOptions =
            serde_json::from_str(r#"{"compression_level": 6, "palette": {"fallback": "rgb(0,0,0)"}}"#)
                .unwrap();
        assert_eq!(options.compression_level, 6);
        assert_eq!(options.namespace, GRAPHML_NAMESPACE);
        assert_eq!(options.palette.color_for("author"), "rgb(154,150,229)");
        assert_eq!(options.palette.color_for("venue"), "rgb(0,0,0)");
        assert!(!options.resolve_key_declarations);
    }

    #[test]
    fn palette_match_is_exact() {
        let palette = TypePalette::default();
        assert_eq!(palette.color_for("paper"), "rgb(229,150,154)");
        assert_eq!(palette.color_for("paper "), "rgb(150,229,154)");
    }
}
