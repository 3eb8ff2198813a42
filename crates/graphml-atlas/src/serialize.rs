//! JSON encoding of a [`GraphDocument`] and its gzip copy.
//!
//! The compressed copy is always made from the exact plain bytes, so
//! decompressing it reproduces the plain file byte for byte. The gzip header
//! carries no timestamp, which keeps the copy deterministic.

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::ConvertResult;
use crate::model::GraphDocument;

pub fn to_json_bytes(document: &GraphDocument) -> ConvertResult<Vec<u8>> {
    Ok(serde_json::to_vec(document)?)
}

pub fn from_json_bytes(bytes: &[u8]) -> ConvertResult<GraphDocument> {
    Ok(serde_json::from_slice(bytes)?)
}

/// `level` is clamped to 0..=9.
pub fn gzip_bytes(plain: &[u8], level: u32) -> ConvertResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(plain)?;
    Ok(encoder.finish()?)
}

pub fn gunzip_bytes(compressed: &[u8]) -> ConvertResult<Vec<u8>> {
    let mut decoder = GzDecoder::new(compressed);
    let mut plain = Vec::new();
    decoder.read_to_end(&mut plain)?;
    Ok(plain)
}

/// Serialized forms of one document, produced before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDocument {
    pub plain: Vec<u8>,
    pub compressed: Option<Vec<u8>>,
}

impl EncodedDocument {
    pub fn encode(
        document: &GraphDocument,
        compression_level: Option<u32>,
    ) -> ConvertResult<Self> {
        Self::from_plain(to_json_bytes(document)?, compression_level)
    }

    /// Wraps already serialized JSON, compressing it when a level is given.
    pub fn from_plain(plain: Vec<u8>, compression_level: Option<u32>) -> ConvertResult<Self> {
        let compressed = compression_level
            .map(|level| gzip_bytes(&plain, level))
            .transpose()?;
        Ok(EncodedDocument { plain, compressed })
    }

    /// Writes the plain bytes, then the compressed copy when both a copy and
    /// a destination exist.
    pub fn write_to<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        plain_path: P,
        compressed_path: Option<Q>,
    ) -> ConvertResult<()> {
        let plain_path = plain_path.as_ref();
        tracing::info!(path = %plain_path.display(), "Writing JSON");
        std::fs::write(plain_path, &self.plain)?;

        if let (Some(bytes), Some(path)) = (&self.compressed, compressed_path) {
            let path = path.as_ref();
            tracing::info!(path = %path.display(), "Creating compressed file");
            std::fs::write(path, bytes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Edge, Node};

    fn sample() -> GraphDocument {
        let mut author = Node::new("a1");
        author.label = Some("Ada".into());
        author.x = Some(-0.0);
        author.y = Some(2.5);
        author.color = Some("rgb(154,150,229)".into());
        author.attr.colors.node_type = Some("author".into());
        GraphDocument {
            nodes: vec![author, Node::new("p1")],
            edges: vec![Edge {
                id: Edge::ordinal_id(0),
                source: Some("a1".into()),
                target: Some("p1".into()),
                weight: Some(1.0),
                label: None,
            }],
        }
    }

    #[test]
    fn empty_document_keeps_both_keys() {
        let bytes = to_json_bytes(&GraphDocument::default()).unwrap();
        assert_eq!(bytes, br#"{"nodes":[],"edges":[]}"#);
    }

    #[test]
    fn node_attr_colors_is_always_present() {
        let json = String::from_utf8(to_json_bytes(&sample()).unwrap()).unwrap();
        assert!(json.contains(r#"{"id":"p1","attr":{"colors":{}}}"#), "{json}");
        assert!(json.contains(r#""attr":{"colors":{"type":"author"}}"#), "{json}");
        assert!(json.contains(r#""x":0.0"#), "{json}");
    }

    #[test]
    fn json_roundtrip_is_lossless() {
        let doc = sample();
        let back = from_json_bytes(&to_json_bytes(&doc).unwrap()).unwrap();
        assert_eq!(back.nodes[0].y, Some(2.5));
        assert_eq!(back.edges, doc.edges);
        assert_eq!(back.nodes[1], doc.nodes[1]);
    }

    #[test]
    fn non_finite_coordinates_fail_to_serialize() {
        let mut doc = sample();
        doc.nodes[1].size = Some(f64::NAN);
        assert!(to_json_bytes(&doc).is_err());
    }

    #[test]
    fn compressed_copy_decompresses_to_plain_bytes() {
        let encoded = EncodedDocument::encode(&sample(), Some(9)).unwrap();
        let compressed = encoded.compressed.as_deref().unwrap();
        assert_eq!(gunzip_bytes(compressed).unwrap(), encoded.plain);
    }

    #[test]
    fn compression_is_deterministic() {
        let plain = to_json_bytes(&sample()).unwrap();
        assert_eq!(gzip_bytes(&plain, 9).unwrap(), gzip_bytes(&plain, 9).unwrap());
    }
}
