//! Typed relationship fetching over the metadata store.
//!
//! The traversal always asks for relationships by type *name*; the fetcher
//! resolves the name to the store's internal identifier, runs the filtered
//! query, and cleans the result: never null, no non-active relationships,
//! no relationships with a missing end proxy.

use tracing::debug;

use crate::error::{StoreError, TraversalError};
use crate::instance::{InstanceStatus, Relationship};
use crate::store::MetadataStore;

/// Fetches relationships of a named type anchored at an entity.
pub struct RelationshipFetcher<'a> {
    store: &'a dyn MetadataStore,
}

impl<'a> RelationshipFetcher<'a> {
    pub fn new(store: &'a dyn MetadataStore) -> Self {
        Self { store }
    }

    /// All usable relationships of `relationship_type` anchored at the
    /// entity.
    ///
    /// An unresolvable type name yields an empty list — deployments with
    /// partial type registries are normal, not an error. Relationships
    /// that are not active, or that are missing an end proxy, are dropped.
    pub fn relationships_of(
        &self,
        entity_guid: &str,
        entity_type: &str,
        relationship_type: &str,
        operation: &'static str,
    ) -> Result<Vec<Relationship>, TraversalError> {
        let type_guid = self
            .store
            .type_guid(relationship_type)
            .map_err(|source| self.wrap(entity_guid, operation, source))?;

        let Some(type_guid) = type_guid else {
            debug!(
                relationship_type,
                entity_guid, "relationship type not registered, treating as no matches"
            );
            return Ok(Vec::new());
        };

        let relationships = self
            .store
            .relationships(entity_guid, entity_type, &type_guid)
            .map_err(|source| self.wrap(entity_guid, operation, source))?;

        Ok(relationships
            .into_iter()
            .filter(|rel| rel.status == InstanceStatus::Active)
            .filter(|rel| {
                if rel.has_both_ends() {
                    true
                } else {
                    // A relationship without both proxies cannot identify
                    // the far entity; drop it silently.
                    debug!(relationship_guid = %rel.guid, "dropping relationship with missing end proxy");
                    false
                }
            })
            .collect())
    }

    fn wrap(
        &self,
        entity_guid: &str,
        operation: &'static str,
        source: StoreError,
    ) -> TraversalError {
        TraversalError::RelationshipResolution {
            guid: entity_guid.to_owned(),
            operation,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{EntityProxy, EntityRef};
    use crate::store::InMemoryStore;
    use crate::typedef::{self, well_known_catalog};

    fn fixture() -> InMemoryStore {
        let store = InMemoryStore::new(well_known_catalog());
        store.add_entity(EntityRef::new("e1", typedef::RELATIONAL_COLUMN));
        store.add_entity(EntityRef::new("e2", typedef::RELATIONAL_TABLE_TYPE));
        store
    }

    #[test]
    fn empty_when_no_relationships() {
        let store = fixture();
        let fetcher = RelationshipFetcher::new(&store);
        let rels = fetcher
            .relationships_of(
                "e1",
                typedef::RELATIONAL_COLUMN,
                typedef::ATTRIBUTE_FOR_SCHEMA,
                "test",
            )
            .unwrap();
        assert!(rels.is_empty());
    }

    #[test]
    fn empty_when_type_unknown() {
        let store = fixture();
        let fetcher = RelationshipFetcher::new(&store);
        let rels = fetcher
            .relationships_of("e1", typedef::RELATIONAL_COLUMN, "NotARealType", "test")
            .unwrap();
        assert!(rels.is_empty());
    }

    #[test]
    fn drops_missing_proxy_relationships() {
        let store = fixture();
        let mut broken = Relationship::new(
            "r-broken",
            typedef::ATTRIBUTE_FOR_SCHEMA,
            EntityProxy::new("e1", typedef::RELATIONAL_COLUMN),
            EntityProxy::new("e2", typedef::RELATIONAL_TABLE_TYPE),
        );
        broken.end_two = None;
        store.add_relationship(broken);
        store.add_relationship(Relationship::new(
            "r-good",
            typedef::ATTRIBUTE_FOR_SCHEMA,
            EntityProxy::new("e1", typedef::RELATIONAL_COLUMN),
            EntityProxy::new("e2", typedef::RELATIONAL_TABLE_TYPE),
        ));

        let fetcher = RelationshipFetcher::new(&store);
        let rels = fetcher
            .relationships_of(
                "e1",
                typedef::RELATIONAL_COLUMN,
                typedef::ATTRIBUTE_FOR_SCHEMA,
                "test",
            )
            .unwrap();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].guid, "r-good");
    }

    #[test]
    fn drops_inactive_relationships() {
        let store = fixture();
        store.add_relationship(
            Relationship::new(
                "r-deleted",
                typedef::ATTRIBUTE_FOR_SCHEMA,
                EntityProxy::new("e1", typedef::RELATIONAL_COLUMN),
                EntityProxy::new("e2", typedef::RELATIONAL_TABLE_TYPE),
            )
            .with_status(InstanceStatus::Deleted),
        );

        let fetcher = RelationshipFetcher::new(&store);
        let rels = fetcher
            .relationships_of(
                "e1",
                typedef::RELATIONAL_COLUMN,
                typedef::ATTRIBUTE_FOR_SCHEMA,
                "test",
            )
            .unwrap();
        assert!(rels.is_empty());
    }
}
