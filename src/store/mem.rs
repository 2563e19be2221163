//! In-memory metadata store backed by DashMap.
//!
//! Serves two purposes: the fixture store for the test suite, and a small
//! embeddable repository for hosts that assemble metadata in-process. All
//! data is lost on process exit.

use dashmap::DashMap;

use crate::error::StoreError;
use crate::instance::{EntityRef, Relationship};
use crate::typedef::TypeCatalog;

use super::{MetadataStore, StoreResult};

/// Concurrent in-memory metadata repository.
///
/// Entities and relationships live in sharded hashmaps; an adjacency index
/// maps entity GUID → anchored relationship GUIDs so the filtered
/// relationship query stays cheap.
#[derive(Debug)]
pub struct InMemoryStore {
    catalog: TypeCatalog,
    entities: DashMap<String, EntityRef>,
    relationships: DashMap<String, Relationship>,
    /// Entity GUID → GUIDs of relationships with that entity at either end.
    anchored: DashMap<String, Vec<String>>,
}

impl InMemoryStore {
    /// Create an empty store over the given type catalog.
    pub fn new(catalog: TypeCatalog) -> Self {
        Self {
            catalog,
            entities: DashMap::new(),
            relationships: DashMap::new(),
            anchored: DashMap::new(),
        }
    }

    /// Insert or replace an entity.
    pub fn add_entity(&self, entity: EntityRef) {
        self.entities.insert(entity.guid.clone(), entity);
    }

    /// Insert a relationship and index it at both ends.
    pub fn add_relationship(&self, relationship: Relationship) {
        for proxy in [&relationship.end_one, &relationship.end_two]
            .into_iter()
            .flatten()
        {
            self.anchored
                .entry(proxy.guid.clone())
                .or_default()
                .push(relationship.guid.clone());
        }
        self.relationships
            .insert(relationship.guid.clone(), relationship);
    }

    /// Number of entities held.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of relationships held.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }
}

impl MetadataStore for InMemoryStore {
    fn entity(&self, guid: &str, expected_type: &str) -> StoreResult<EntityRef> {
        let entity = self
            .entities
            .get(guid)
            .map(|e| e.value().clone())
            .ok_or_else(|| StoreError::EntityNotFound {
                guid: guid.to_owned(),
                type_name: expected_type.to_owned(),
            })?;

        // Type check honours the catalog's supertype chain: asking for a
        // RelationalColumn as SchemaAttribute succeeds.
        if entity.type_name != expected_type
            && !self.catalog.is_subtype_of(&entity.type_name, expected_type)
        {
            return Err(StoreError::EntityNotFound {
                guid: guid.to_owned(),
                type_name: expected_type.to_owned(),
            });
        }
        Ok(entity)
    }

    fn relationships(
        &self,
        entity_guid: &str,
        _entity_type: &str,
        relationship_type_guid: &str,
    ) -> StoreResult<Vec<Relationship>> {
        let Some(guids) = self.anchored.get(entity_guid) else {
            return Ok(Vec::new());
        };

        let mut matches = Vec::new();
        for rel_guid in guids.value() {
            if let Some(rel) = self.relationships.get(rel_guid) {
                let type_matches = self
                    .catalog
                    .type_guid(&rel.type_name)
                    .is_some_and(|g| g == relationship_type_guid);
                if type_matches {
                    matches.push(rel.value().clone());
                }
            }
        }
        Ok(matches)
    }

    fn type_catalog(&self) -> StoreResult<TypeCatalog> {
        Ok(self.catalog.clone())
    }

    fn type_guid(&self, type_name: &str) -> StoreResult<Option<String>> {
        Ok(self.catalog.type_guid(type_name).map(str::to_owned))
    }
}
