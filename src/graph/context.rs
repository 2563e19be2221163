//! Mutable context-graph accumulator.
//!
//! Backed by a petgraph `DiGraph` with a GUID → `NodeIndex` side index for
//! O(1) vertex lookups and an `EdgeKey` set for idempotent edge insertion.
//! One instance exists per traversal request; it is created fresh, filled
//! during the walk, and then projected to a [`LineageSubgraph`]. It is
//! never shared between traversals, so no interior locking is needed.

use std::collections::{HashMap, HashSet};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::GraphError;
use crate::instance::EntityRef;

use super::{EdgeKey, LineageEdge, LineageSubgraph, LineageVertex};

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Edge payload stored on petgraph edges.
#[derive(Debug, Clone)]
struct EdgeLabel {
    edge_type: String,
    edge_id: String,
}

/// Accumulated vertices and edges of one context traversal.
#[derive(Debug, Default)]
pub struct ContextGraph {
    graph: DiGraph<LineageVertex, EdgeLabel>,
    /// GUID → NodeIndex for O(1) vertex lookups.
    node_index: HashMap<String, NodeIndex>,
    /// Edge identities already present; re-adding is a no-op.
    edge_keys: HashSet<EdgeKey>,
}

impl ContextGraph {
    /// Create an empty context graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a vertex, keyed by GUID.
    ///
    /// Idempotent: a GUID already present is left untouched (the first
    /// snapshot wins) and no duplicate node is created.
    pub fn add_vertex(&mut self, vertex: LineageVertex) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(&vertex.guid) {
            return idx;
        }
        let guid = vertex.guid.clone();
        let idx = self.graph.add_node(vertex);
        self.node_index.insert(guid, idx);
        idx
    }

    /// Project an entity snapshot into a vertex and insert it.
    pub fn add_entity(&mut self, entity: &EntityRef) -> NodeIndex {
        self.add_vertex(LineageVertex::from(entity))
    }

    /// Insert an edge between two existing vertices.
    ///
    /// Idempotent by (type, id, start, end). Both endpoint vertices must
    /// already be in the graph.
    pub fn add_edge(
        &mut self,
        edge_type: impl Into<String>,
        edge_id: impl Into<String>,
        from_guid: &str,
        to_guid: &str,
    ) -> GraphResult<()> {
        let from_idx = *self
            .node_index
            .get(from_guid)
            .ok_or_else(|| GraphError::MissingVertex {
                guid: from_guid.to_owned(),
            })?;
        let to_idx = *self
            .node_index
            .get(to_guid)
            .ok_or_else(|| GraphError::MissingVertex {
                guid: to_guid.to_owned(),
            })?;

        let key = EdgeKey {
            edge_type: edge_type.into(),
            edge_id: edge_id.into(),
            from: from_guid.to_owned(),
            to: to_guid.to_owned(),
        };
        if !self.edge_keys.insert(key.clone()) {
            return Ok(());
        }

        self.graph.add_edge(
            from_idx,
            to_idx,
            EdgeLabel {
                edge_type: key.edge_type,
                edge_id: key.edge_id,
            },
        );
        Ok(())
    }

    /// Whether a vertex with this GUID is in the graph.
    pub fn contains_vertex(&self, guid: &str) -> bool {
        self.node_index.contains_key(guid)
    }

    /// Look up a vertex by GUID.
    pub fn vertex(&self, guid: &str) -> Option<&LineageVertex> {
        let idx = self.node_index.get(guid)?;
        self.graph.node_weight(*idx)
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All vertices, in insertion order.
    pub fn vertices(&self) -> impl Iterator<Item = &LineageVertex> {
        self.graph.node_weights()
    }

    /// All edges as projections.
    pub fn edges(&self) -> Vec<LineageEdge> {
        self.graph
            .edge_references()
            .filter_map(|e| {
                let from = self.graph.node_weight(e.source())?;
                let to = self.graph.node_weight(e.target())?;
                Some(LineageEdge {
                    edge_type: e.weight().edge_type.clone(),
                    edge_id: e.weight().edge_id.clone(),
                    from: from.guid.clone(),
                    to: to.guid.clone(),
                })
            })
            .collect()
    }

    /// Edges attached to a vertex, incoming and outgoing. The result is a
    /// set — callers must not rely on ordering.
    pub fn edges_of(&self, guid: &str) -> Vec<LineageEdge> {
        let Some(&idx) = self.node_index.get(guid) else {
            return Vec::new();
        };

        let mut seen: HashSet<EdgeKey> = HashSet::new();
        let mut result = Vec::new();
        for direction in [Direction::Outgoing, Direction::Incoming] {
            for e in self.graph.edges_directed(idx, direction) {
                let (Some(from), Some(to)) = (
                    self.graph.node_weight(e.source()),
                    self.graph.node_weight(e.target()),
                ) else {
                    continue;
                };
                let edge = LineageEdge {
                    edge_type: e.weight().edge_type.clone(),
                    edge_id: e.weight().edge_id.clone(),
                    from: from.guid.clone(),
                    to: to.guid.clone(),
                };
                if seen.insert(EdgeKey::from(&edge)) {
                    result.push(edge);
                }
            }
        }
        result
    }

    /// Project the accumulated graph for the response layer.
    pub fn subgraph(&self) -> LineageSubgraph {
        LineageSubgraph {
            vertices: self.vertices().cloned().collect(),
            edges: self.edges(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(guid: &str) -> LineageVertex {
        LineageVertex::new(guid, "RelationalColumn")
    }

    #[test]
    fn vertex_insertion_is_idempotent() {
        let mut graph = ContextGraph::new();
        let mut first = v("e1");
        first.version = 7;
        graph.add_vertex(first);

        // Second insert with different payload must not replace the first.
        let mut second = v("e1");
        second.version = 99;
        graph.add_vertex(second);

        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.vertex("e1").unwrap().version, 7);
    }

    #[test]
    fn edge_insertion_is_idempotent() {
        let mut graph = ContextGraph::new();
        graph.add_vertex(v("e1"));
        graph.add_vertex(v("e2"));

        graph
            .add_edge("AttributeForSchema", "r1", "e1", "e2")
            .unwrap();
        graph
            .add_edge("AttributeForSchema", "r1", "e1", "e2")
            .unwrap();

        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn distinct_keys_create_distinct_edges() {
        let mut graph = ContextGraph::new();
        graph.add_vertex(v("e1"));
        graph.add_vertex(v("e2"));

        graph
            .add_edge("AttributeForSchema", "r1", "e1", "e2")
            .unwrap();
        graph.add_edge("LineageMapping", "r2", "e1", "e2").unwrap();
        // Same relationship seen from the other direction is a new key.
        graph
            .add_edge("AttributeForSchema", "r1", "e2", "e1")
            .unwrap();

        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn edge_requires_both_vertices() {
        let mut graph = ContextGraph::new();
        graph.add_vertex(v("e1"));

        let err = graph
            .add_edge("AttributeForSchema", "r1", "e1", "e2")
            .unwrap_err();
        assert!(matches!(err, GraphError::MissingVertex { guid } if guid == "e2"));
    }

    #[test]
    fn edges_of_covers_both_directions() {
        let mut graph = ContextGraph::new();
        graph.add_vertex(v("e1"));
        graph.add_vertex(v("e2"));
        graph.add_vertex(v("e3"));
        graph
            .add_edge("AttributeForSchema", "r1", "e1", "e2")
            .unwrap();
        graph
            .add_edge("AttributeForSchema", "r2", "e3", "e1")
            .unwrap();

        let edges = graph.edges_of("e1");
        assert_eq!(edges.len(), 2);
        assert!(graph.edges_of("unknown").is_empty());
    }

    #[test]
    fn subgraph_projection() {
        let mut graph = ContextGraph::new();
        graph.add_vertex(v("e1"));
        graph.add_vertex(v("e2"));
        graph
            .add_edge("AttributeForSchema", "r1", "e1", "e2")
            .unwrap();

        let subgraph = graph.subgraph();
        assert_eq!(subgraph.vertices.len(), 2);
        assert_eq!(subgraph.edges.len(), 1);
        assert_eq!(subgraph.edges[0].from, "e1");
        assert_eq!(subgraph.edges[0].to, "e2");
    }
}
