//! Metadata instance types returned by the repository.
//!
//! Entities, relationships, and classifications are immutable snapshots
//! handed back by the [`MetadataStore`](crate::store::MetadataStore). The
//! traversal core reads them and projects them into lineage vertices; it
//! never mutates an instance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a metadata instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstanceStatus {
    /// Live instance, visible to consumers.
    Active,
    /// Not yet approved for general use.
    Draft,
    /// Soft-deleted, retained for audit.
    Deleted,
    /// Status the store could not map to a known value.
    Unknown,
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceStatus::Active => write!(f, "Active"),
            InstanceStatus::Draft => write!(f, "Draft"),
            InstanceStatus::Deleted => write!(f, "Deleted"),
            InstanceStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A typed property value on an entity or classification.
///
/// The store returns primitives, enum symbols, and arrays; maps and nested
/// structs are flattened by the store adapter before they reach the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    Text(String),
    Int(i64),
    Boolean(bool),
    /// Symbolic name of an enum literal (e.g. an ordering or cardinality).
    Enum(String),
    Array(Vec<PropertyValue>),
}

impl PropertyValue {
    /// Render the value as a plain display string for vertex projections.
    pub fn flatten(&self) -> String {
        match self {
            PropertyValue::Text(s) => s.clone(),
            PropertyValue::Int(i) => i.to_string(),
            PropertyValue::Boolean(b) => b.to_string(),
            PropertyValue::Enum(sym) => sym.clone(),
            PropertyValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(PropertyValue::flatten).collect();
                parts.join(", ")
            }
        }
    }
}

/// Who created and last updated an instance, and when (epoch seconds).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditHeader {
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub create_time: u64,
    pub update_time: u64,
}

/// A classification attached to an entity: a name plus its own properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub name: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Classification {
    /// Create a classification with no properties.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property to the classification.
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

/// Immutable snapshot of a metadata entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    /// Globally unique identifier assigned by the repository.
    pub guid: String,
    /// Open-metadata type name (e.g. `RelationalColumn`).
    pub type_name: String,
    /// Instance version, incremented by the repository on update.
    pub version: i64,
    pub status: InstanceStatus,
    pub audit: AuditHeader,
    pub properties: BTreeMap<String, PropertyValue>,
    pub classifications: Vec<Classification>,
}

impl EntityRef {
    /// Create a minimal active entity with the given identity.
    pub fn new(guid: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            type_name: type_name.into(),
            version: 1,
            status: InstanceStatus::Active,
            audit: AuditHeader::default(),
            properties: BTreeMap::new(),
            classifications: Vec::new(),
        }
    }

    /// Add a property to the entity.
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    /// Attach a classification to the entity.
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.classifications.push(classification);
        self
    }

    /// Set the audit header.
    pub fn with_audit(mut self, audit: AuditHeader) -> Self {
        self.audit = audit;
        self
    }
}

/// Lightweight reference to one end of a relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProxy {
    pub guid: String,
    pub type_name: String,
}

impl EntityProxy {
    pub fn new(guid: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            guid: guid.into(),
            type_name: type_name.into(),
        }
    }
}

/// A relationship between two entities.
///
/// Direction is conventional (end one / end two); a traversal holding one
/// end's GUID uses [`Relationship::other_end`] to find the far entity. The
/// proxies are optional because a store can return a relationship whose
/// endpoint entity has been purged; such relationships are unusable and the
/// fetcher drops them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub guid: String,
    pub type_name: String,
    pub status: InstanceStatus,
    pub end_one: Option<EntityProxy>,
    pub end_two: Option<EntityProxy>,
}

impl Relationship {
    /// Create an active relationship between two proxies.
    pub fn new(
        guid: impl Into<String>,
        type_name: impl Into<String>,
        end_one: EntityProxy,
        end_two: EntityProxy,
    ) -> Self {
        Self {
            guid: guid.into(),
            type_name: type_name.into(),
            status: InstanceStatus::Active,
            end_one: Some(end_one),
            end_two: Some(end_two),
        }
    }

    /// Set the relationship status.
    pub fn with_status(mut self, status: InstanceStatus) -> Self {
        self.status = status;
        self
    }

    /// Both endpoint proxies are present.
    pub fn has_both_ends(&self) -> bool {
        self.end_one.is_some() && self.end_two.is_some()
    }

    /// Given the GUID of the "current" entity, return the proxy at the far
    /// end. Returns `None` when the GUID matches neither end, or when the
    /// far proxy is absent.
    pub fn other_end(&self, current_guid: &str) -> Option<&EntityProxy> {
        match (&self.end_one, &self.end_two) {
            (Some(one), _) if one.guid == current_guid => self.end_two.as_ref(),
            (_, Some(two)) if two.guid == current_guid => self.end_one.as_ref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_end_selects_far_proxy() {
        let rel = Relationship::new(
            "r1",
            "AttributeForSchema",
            EntityProxy::new("e1", "RelationalColumn"),
            EntityProxy::new("e2", "RelationalTableType"),
        );

        assert_eq!(rel.other_end("e1").unwrap().guid, "e2");
        assert_eq!(rel.other_end("e2").unwrap().guid, "e1");
        assert!(rel.other_end("e3").is_none());
    }

    #[test]
    fn other_end_missing_proxy() {
        let mut rel = Relationship::new(
            "r1",
            "AttributeForSchema",
            EntityProxy::new("e1", "RelationalColumn"),
            EntityProxy::new("e2", "RelationalTableType"),
        );
        rel.end_two = None;

        assert!(!rel.has_both_ends());
        assert!(rel.other_end("e1").is_none());
    }

    #[test]
    fn flatten_property_values() {
        assert_eq!(PropertyValue::Text("name".into()).flatten(), "name");
        assert_eq!(PropertyValue::Int(42).flatten(), "42");
        assert_eq!(PropertyValue::Enum("PRIMARY_KEY".into()).flatten(), "PRIMARY_KEY");
        let arr = PropertyValue::Array(vec![
            PropertyValue::Text("a".into()),
            PropertyValue::Int(1),
        ]);
        assert_eq!(arr.flatten(), "a, 1");
    }

    #[test]
    fn entity_builder() {
        let entity = EntityRef::new("e1", "DataFile")
            .with_property("path", PropertyValue::Text("/data/a.csv".into()))
            .with_classification(Classification::new("Confidential"));

        assert_eq!(entity.type_name, "DataFile");
        assert_eq!(entity.properties.len(), 1);
        assert_eq!(entity.classifications.len(), 1);
        assert_eq!(entity.status, InstanceStatus::Active);
    }
}
