//! Maps GraphML node and edge elements onto the render-ready schema.
//!
//! Node keys: `label`, `x`, `y`, `size`, `r` (with sibling `g`/`b`) and
//! `type`. Edge keys: `weight` and `edgelabel`. Everything else is dropped.
//!
//! A data element without text maps to an absent string field (`label`,
//! `edgelabel`, the kept `type`) and to empty text everywhere else.
//!
//! Colors are resolved in a single forward pass over the data entries: an
//! `r` entry (with both `g` and `b` present) and a `type` entry each assign
//! the color when they are reached, so whichever comes last in source order
//! wins.

use crate::config::TypePalette;
use crate::error::{ConvertError, ConvertResult};
use crate::model::{Edge, Node};
use crate::parse::GraphElement;

pub struct AttributeMapper<'a> {
    palette: &'a TypePalette,
}

impl<'a> AttributeMapper<'a> {
    pub fn new(palette: &'a TypePalette) -> Self {
        AttributeMapper { palette }
    }

    pub fn map_node(&self, element: &GraphElement<'_>) -> ConvertResult<Node> {
        let id = element.id().ok_or(ConvertError::MissingAttr("node@id"))?;
        let mut node = Node::new(id);

        for entry in element.data() {
            match entry.key {
                "label" => node.label = entry.value.map(str::to_string),
                "x" => node.x = Some(parse_f64(entry.text(), "x")?),
                "y" => node.y = Some(parse_f64(entry.text(), "y")?),
                "size" => node.size = Some(parse_f64(entry.text(), "size")?),
                "r" => {
                    if let Some(color) = channel_rgb(element, entry.text()) {
                        node.color = Some(color);
                    }
                }
                "type" => {
                    node.attr.colors.node_type = entry.value.map(str::to_string);
                    node.color = Some(self.palette.color_for(entry.text()).to_string());
                }
                _ => {}
            }
        }

        Ok(node)
    }

    /// `ordinal` is the zero-based position of the edge in the source.
    pub fn map_edge(&self, ordinal: usize, element: &GraphElement<'_>) -> ConvertResult<Edge> {
        let mut edge = Edge {
            id: Edge::ordinal_id(ordinal),
            source: element.attribute("source").map(str::to_string),
            target: element.attribute("target").map(str::to_string),
            weight: None,
            label: None,
        };

        for entry in element.data() {
            match entry.key {
                "weight" => edge.weight = Some(parse_f64(entry.text(), "weight")?),
                "edgelabel" => edge.label = entry.value.map(str::to_string),
                _ => {}
            }
        }

        Ok(edge)
    }
}

/// `rgb(r,g,b)` from the raw channel texts, if both `g` and `b` exist.
/// An empty channel element contributes empty text.
fn channel_rgb(element: &GraphElement<'_>, r: &str) -> Option<String> {
    let g = element.data_entry("g")?.text();
    let b = element.data_entry("b")?.text();
    Some(format!("rgb({r},{g},{b})"))
}

fn parse_f64(raw: &str, field: &str) -> ConvertResult<f64> {
    let invalid = || ConvertError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    };
    let parsed = raw.trim().parse::<f64>().map_err(|_| invalid())?;
    if !parsed.is_finite() {
        return Err(invalid());
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_trims_and_rejects_garbage() {
        assert_eq!(parse_f64(" 1.5\n", "x").unwrap(), 1.5);
        assert_eq!(parse_f64("-3", "x").unwrap(), -3.0);
        assert!(parse_f64("", "x").is_err());
        assert!(parse_f64("1,5", "x").is_err());
    }

    #[test]
    fn parse_f64_rejects_non_finite() {
        for raw in ["NaN", "inf", "-infinity"] {
            let err = parse_f64(raw, "size").unwrap_err();
            assert!(
                matches!(err, ConvertError::InvalidNumber { ref field, .. } if field == "size"),
                "{raw}: {err}"
            );
        }
    }
}
