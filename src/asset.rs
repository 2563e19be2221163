//! Asset resolution: the terminal step of a schema descent.
//!
//! Once a schema chain bottoms out at a complex schema type (or the caller
//! already holds an asset-like entity), the only remaining work is to
//! attach the owning asset's identity to the context graph. Files hang off
//! a `NestedFile` relationship to their containing folder asset; everything
//! else reaches its asset through `DataContentForDataSet`.

use tracing::warn;

use crate::error::LineageResult;
use crate::fetch::RelationshipFetcher;
use crate::graph::ContextGraph;
use crate::instance::EntityRef;
use crate::traverse::ContextBuilder;
use crate::typedef::{DATA_CONTENT_FOR_DATA_SET, DATA_FILE, NESTED_FILE};

impl<'a> ContextBuilder<'a> {
    /// Attach asset detail for the entity with the given GUID.
    ///
    /// Resolves the entity first; useful when a caller wants asset context
    /// without a full schema traversal.
    pub fn resolve_asset(
        &self,
        guid: &str,
        type_name: &str,
        graph: &mut ContextGraph,
    ) -> LineageResult<()> {
        let entity = self.resolve_entity(guid, type_name, "resolve_asset")?;
        graph.add_entity(&entity);
        self.resolve_asset_for(&entity, graph)
    }

    /// Attach asset detail for an already-resolved entity.
    ///
    /// The relationship walked is `NestedFile` for data files and
    /// `DataContentForDataSet` otherwise. The cardinality assumption is
    /// 0..1; when the store returns several candidate parents only the
    /// first is used — tolerated with a warning, not an error.
    pub(crate) fn resolve_asset_for(
        &self,
        entity: &EntityRef,
        graph: &mut ContextGraph,
    ) -> LineageResult<()> {
        let relationship_type = if self.catalog.is_subtype_of(&entity.type_name, DATA_FILE) {
            NESTED_FILE
        } else {
            DATA_CONTENT_FOR_DATA_SET
        };

        let fetcher = RelationshipFetcher::new(self.store());
        let relationships = fetcher.relationships_of(
            &entity.guid,
            &entity.type_name,
            relationship_type,
            "resolve_asset",
        )?;

        if relationships.len() > 1 {
            warn!(
                guid = %entity.guid,
                relationship_type,
                count = relationships.len(),
                "multiple candidate parent assets, using the first"
            );
        }

        if let Some(relationship) = relationships.first() {
            self.attach_neighbor(entity, relationship, graph, "resolve_asset")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{EntityProxy, Relationship};
    use crate::store::InMemoryStore;
    use crate::typedef::{self, well_known_catalog};

    fn link(store: &InMemoryStore, guid: &str, rel_type: &str, a: &EntityRef, b: &EntityRef) {
        store.add_relationship(Relationship::new(
            guid,
            rel_type,
            EntityProxy::new(&a.guid, &a.type_name),
            EntityProxy::new(&b.guid, &b.type_name),
        ));
    }

    #[test]
    fn data_file_walks_nested_file() {
        let store = InMemoryStore::new(well_known_catalog());
        let file = EntityRef::new("f1", typedef::DATA_FILE);
        let folder = EntityRef::new("folder1", typedef::DATA_STORE);
        store.add_entity(file.clone());
        store.add_entity(folder.clone());
        link(&store, "nf-1", typedef::NESTED_FILE, &file, &folder);

        let builder = ContextBuilder::new(&store).unwrap();
        let mut graph = ContextGraph::new();
        builder
            .resolve_asset("f1", typedef::DATA_FILE, &mut graph)
            .unwrap();

        assert!(graph.contains_vertex("folder1"));
        let edges = graph.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].edge_type, typedef::NESTED_FILE);
    }

    #[test]
    fn schema_type_walks_data_content() {
        let store = InMemoryStore::new(well_known_catalog());
        let table_type = EntityRef::new("tt1", typedef::RELATIONAL_TABLE_TYPE);
        let data_set = EntityRef::new("ds1", typedef::DATA_SET);
        store.add_entity(table_type.clone());
        store.add_entity(data_set.clone());
        link(
            &store,
            "dc-1",
            typedef::DATA_CONTENT_FOR_DATA_SET,
            &table_type,
            &data_set,
        );

        let builder = ContextBuilder::new(&store).unwrap();
        let mut graph = ContextGraph::new();
        builder
            .resolve_asset("tt1", typedef::RELATIONAL_TABLE_TYPE, &mut graph)
            .unwrap();

        assert!(graph.contains_vertex("ds1"));
        assert_eq!(graph.edges()[0].edge_type, typedef::DATA_CONTENT_FOR_DATA_SET);
    }

    #[test]
    fn first_candidate_parent_wins() {
        let store = InMemoryStore::new(well_known_catalog());
        let file = EntityRef::new("f1", typedef::DATA_FILE);
        let parent_a = EntityRef::new("pa", typedef::DATA_STORE);
        let parent_b = EntityRef::new("pb", typedef::DATA_STORE);
        store.add_entity(file.clone());
        store.add_entity(parent_a.clone());
        store.add_entity(parent_b.clone());
        link(&store, "nf-a", typedef::NESTED_FILE, &file, &parent_a);
        link(&store, "nf-b", typedef::NESTED_FILE, &file, &parent_b);

        let builder = ContextBuilder::new(&store).unwrap();
        let mut graph = ContextGraph::new();
        builder
            .resolve_asset("f1", typedef::DATA_FILE, &mut graph)
            .unwrap();

        // Documented tolerance: the first returned candidate is used and
        // the second is ignored without error.
        assert!(graph.contains_vertex("pa"));
        assert!(!graph.contains_vertex("pb"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn no_parent_is_not_an_error() {
        let store = InMemoryStore::new(well_known_catalog());
        store.add_entity(EntityRef::new("f1", typedef::DATA_FILE));

        let builder = ContextBuilder::new(&store).unwrap();
        let mut graph = ContextGraph::new();
        builder
            .resolve_asset("f1", typedef::DATA_FILE, &mut graph)
            .unwrap();

        assert_eq!(graph.vertex_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }
}
