use crate::model::{Edge, GraphDocument, Node};

/// Collects mapped records in encounter order. Append-only.
#[derive(Debug, Default)]
pub struct Assembler {
    document: GraphDocument,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_node(&mut self, node: Node) {
        self.document.nodes.push(node);
    }

    pub fn push_edge(&mut self, edge: Edge) {
        self.document.edges.push(edge);
    }

    pub fn node_count(&self) -> usize {
        self.document.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.document.edges.len()
    }

    pub fn finish(self) -> GraphDocument {
        self.document
    }
}
