use serde::{Deserialize, Serialize};

use crate::serde_f64;

/// The render-ready graph: two ordered collections, both always present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_f64::ser_opt_finite",
        deserialize_with = "serde_f64::de_opt_finite"
    )]
    pub x: Option<f64>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_f64::ser_opt_finite",
        deserialize_with = "serde_f64::de_opt_finite"
    )]
    pub y: Option<f64>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_f64::ser_opt_finite",
        deserialize_with = "serde_f64::de_opt_finite"
    )]
    pub size: Option<f64>,

    /// `rgb(r,g,b)` text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default)]
    pub attr: NodeAttr,
}

impl Node {
    /// A node with only its id and an empty `attr.colors` map.
    pub fn new(id: impl Into<String>) -> Self {
        Node {
            id: id.into(),
            label: None,
            x: None,
            y: None,
            size: None,
            color: None,
            attr: NodeAttr::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeAttr {
    #[serde(default)]
    pub colors: TypeColors,
}

/// Serialized as `{"type": ...}`; the front end filters on it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeColors {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// `e<ordinal>`, see [`Edge::ordinal_id`].
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serde_f64::ser_opt_finite",
        deserialize_with = "serde_f64::de_opt_finite"
    )]
    pub weight: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub const ID_PREFIX: &'static str = "e";

    pub fn ordinal_id(ordinal: usize) -> String {
        format!("{}{ordinal}", Self::ID_PREFIX)
    }
}
