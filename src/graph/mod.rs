//! Context graph: the accumulated projection of one lineage traversal.
//!
//! Vertices are entity projections keyed by GUID, edges are relationship
//! projections keyed by (type, id, start, end). Both insertions are
//! idempotent, so a traversal can rediscover the same entity or
//! relationship through several paths without growing the graph.

pub mod context;

pub use context::ContextGraph;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::instance::EntityRef;

/// Graph-node projection of an entity: identity, audit fields, and a
/// flattened property map with primitive values rendered as plain strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageVertex {
    pub guid: String,
    pub type_name: String,
    pub version: i64,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub create_time: u64,
    pub update_time: u64,
    pub properties: BTreeMap<String, String>,
}

impl LineageVertex {
    /// Create a vertex with bare identity and no properties.
    pub fn new(guid: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            type_name: type_name.into(),
            version: 0,
            created_by: None,
            updated_by: None,
            create_time: 0,
            update_time: 0,
            properties: BTreeMap::new(),
        }
    }
}

impl From<&EntityRef> for LineageVertex {
    fn from(entity: &EntityRef) -> Self {
        Self {
            guid: entity.guid.clone(),
            type_name: entity.type_name.clone(),
            version: entity.version,
            created_by: entity.audit.created_by.clone(),
            updated_by: entity.audit.updated_by.clone(),
            create_time: entity.audit.create_time,
            update_time: entity.audit.update_time,
            properties: entity
                .properties
                .iter()
                .map(|(name, value)| (name.clone(), value.flatten()))
                .collect(),
        }
    }
}

/// Graph-edge projection of a relationship (or of a classification, with a
/// synthetic id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageEdge {
    /// Relationship type name, or an edge label for classification edges.
    pub edge_type: String,
    /// Relationship GUID, or a synthetic id for classification edges.
    pub edge_id: String,
    /// GUID of the start vertex.
    pub from: String,
    /// GUID of the end vertex.
    pub to: String,
}

/// Identity of an edge in the context graph. Re-adding an edge with the
/// same key is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey {
    pub edge_type: String,
    pub edge_id: String,
    pub from: String,
    pub to: String,
}

impl From<&LineageEdge> for EdgeKey {
    fn from(edge: &LineageEdge) -> Self {
        Self {
            edge_type: edge.edge_type.clone(),
            edge_id: edge.edge_id.clone(),
            from: edge.from.clone(),
            to: edge.to.clone(),
        }
    }
}

/// Serializable projection of a finished context graph, handed to the
/// response layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineageSubgraph {
    pub vertices: Vec<LineageVertex>,
    pub edges: Vec<LineageEdge>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{AuditHeader, PropertyValue};

    #[test]
    fn vertex_from_entity_flattens_properties() {
        let entity = EntityRef::new("e1", "RelationalColumn")
            .with_property("displayName", PropertyValue::Text("order_id".into()))
            .with_property("position", PropertyValue::Int(3))
            .with_audit(AuditHeader {
                created_by: Some("etl".into()),
                updated_by: None,
                create_time: 1_700_000_000,
                update_time: 1_700_000_100,
            });

        let vertex = LineageVertex::from(&entity);
        assert_eq!(vertex.guid, "e1");
        assert_eq!(vertex.properties["displayName"], "order_id");
        assert_eq!(vertex.properties["position"], "3");
        assert_eq!(vertex.created_by.as_deref(), Some("etl"));
        assert_eq!(vertex.create_time, 1_700_000_000);
    }

    #[test]
    fn edge_key_round_trip() {
        let edge = LineageEdge {
            edge_type: "AttributeForSchema".into(),
            edge_id: "r1".into(),
            from: "e1".into(),
            to: "e2".into(),
        };
        let key = EdgeKey::from(&edge);
        assert_eq!(key.edge_id, "r1");
        assert_eq!(key, EdgeKey::from(&edge.clone()));
    }
}
