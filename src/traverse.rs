//! Context traversal: walk typed relationships outward from a root entity
//! and accumulate the discovered vertices and edges into a context graph.
//!
//! One parameterized core serves both traversal variants:
//!
//! - **Schema context** descends `AttributeForSchema` edges from a schema
//!   element (plus `SchemaAttributeType` edges for column kinds, which
//!   link a column to its structured type directly), collecting lateral
//!   `LineageMapping` edges along the way, until a complex schema type
//!   ends the branch and asset resolution attaches the owning asset.
//! - **Classification context** walks the entity's embedded classification
//!   list (no store round-trips) and materializes matching classifications
//!   as synthetic vertices.
//!
//! The graph is threaded through every call as an explicit `&mut`
//! parameter and a visited set guards against cycles in the underlying
//! relationship graph: an already-visited GUID still gets its edge
//! recorded (once — edge insertion is idempotent) but is never descended
//! into again. Any failure resolving an entity aborts the whole traversal;
//! a partial graph is never returned as success.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{LineageResult, TraversalError};
use crate::fetch::RelationshipFetcher;
use crate::graph::{ContextGraph, LineageVertex};
use crate::instance::{EntityRef, Relationship};
use crate::store::MetadataStore;
use crate::typedef::{
    ATTRIBUTE_FOR_SCHEMA, CLASSIFIED_ENTITY, LINEAGE_MAPPING, SCHEMA_ATTRIBUTE_TYPE,
    TYPE_EMBEDDED_ATTRIBUTE, TypeCatalog, is_schema_attribute_type,
};

/// Configuration for a context traversal.
#[derive(Debug, Clone, Deserialize)]
pub struct TraversalConfig {
    /// Maximum schema-descent depth from the root entity. The underlying
    /// store places no bound on fan-out, so the traversal carries its own:
    /// branches deeper than this stop descending (with a warning) rather
    /// than failing the request.
    pub max_depth: usize,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self { max_depth: 40 }
    }
}

/// Builds context graphs for entities in a metadata repository.
///
/// Construction snapshots the type-definition catalog once; every
/// classification decision during the traversal reads that snapshot, never
/// the store. The builder holds no graph state — each traversal owns its
/// own [`ContextGraph`], so one builder can serve concurrent requests.
pub struct ContextBuilder<'a> {
    store: &'a dyn MetadataStore,
    pub(crate) catalog: TypeCatalog,
    config: TraversalConfig,
}

impl<'a> ContextBuilder<'a> {
    /// Create a builder with the default configuration.
    pub fn new(store: &'a dyn MetadataStore) -> LineageResult<Self> {
        Self::with_config(store, TraversalConfig::default())
    }

    /// Create a builder, snapshotting the store's type catalog.
    pub fn with_config(
        store: &'a dyn MetadataStore,
        config: TraversalConfig,
    ) -> LineageResult<Self> {
        let catalog = store
            .type_catalog()
            .map_err(|source| TraversalError::TypeCatalogUnavailable { source })?;
        Ok(Self {
            store,
            catalog,
            config,
        })
    }

    /// The type-catalog snapshot this builder classifies against.
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Build the schema context graph for the entity with the given GUID.
    ///
    /// Descends `AttributeForSchema` relationships depth-first from the
    /// root (and `SchemaAttributeType` relationships for column-kind
    /// entities), records lateral `LineageMapping` edges, and attaches
    /// asset detail once a branch reaches a complex schema type.
    pub fn schema_context(&self, guid: &str, type_name: &str) -> LineageResult<ContextGraph> {
        let root = self.resolve_entity(guid, type_name, "schema_context")?;

        let mut graph = ContextGraph::new();
        let mut visited: HashSet<String> = HashSet::new();
        graph.add_entity(&root);
        visited.insert(root.guid.clone());

        self.descend(&root, &mut graph, &mut visited, 0)?;
        Ok(graph)
    }

    /// Build the classification context graph for an entity.
    ///
    /// Matches `classification_type` (by name) against the entity's
    /// already-loaded classification list; each match becomes a synthetic
    /// vertex linked from the entity by a `ClassifiedEntity` edge. Besides
    /// the root entity fetch, no store round-trips are made.
    pub fn classification_context(
        &self,
        guid: &str,
        type_name: &str,
        classification_type: &str,
    ) -> LineageResult<ContextGraph> {
        let root = self.resolve_entity(guid, type_name, "classification_context")?;

        let mut graph = ContextGraph::new();
        graph.add_entity(&root);

        for classification in &root.classifications {
            if classification.name != classification_type {
                continue;
            }
            // Classifications have no repository GUID of their own; derive
            // a stable synthetic identity from name + owning entity.
            let synthetic_guid = format!("{}{}", classification.name, root.guid);
            let vertex = LineageVertex {
                guid: synthetic_guid.clone(),
                type_name: classification.name.clone(),
                version: root.version,
                created_by: root.audit.created_by.clone(),
                updated_by: root.audit.updated_by.clone(),
                create_time: root.audit.create_time,
                update_time: root.audit.update_time,
                properties: classification
                    .properties
                    .iter()
                    .map(|(name, value)| (name.clone(), value.flatten()))
                    .collect(),
            };
            self.attach(&mut graph, &root.guid, vertex, CLASSIFIED_ENTITY, &synthetic_guid)?;
        }
        Ok(graph)
    }

    /// Classification context for the default `TypeEmbeddedAttribute`
    /// classification.
    pub fn embedded_type_context(
        &self,
        guid: &str,
        type_name: &str,
    ) -> LineageResult<ContextGraph> {
        self.classification_context(guid, type_name, TYPE_EMBEDDED_ATTRIBUTE)
    }

    // -----------------------------------------------------------------------
    // Schema descent
    // -----------------------------------------------------------------------

    fn descend(
        &self,
        entity: &EntityRef,
        graph: &mut ContextGraph,
        visited: &mut HashSet<String>,
        depth: usize,
    ) -> LineageResult<()> {
        if depth >= self.config.max_depth {
            warn!(
                guid = %entity.guid,
                depth,
                max_depth = self.config.max_depth,
                "schema descent reached depth bound, stopping this branch"
            );
            return Ok(());
        }
        debug!(guid = %entity.guid, type_name = %entity.type_name, depth, "descending schema element");

        let fetcher = RelationshipFetcher::new(self.store);

        // Descent always follows AttributeForSchema; column kinds
        // additionally link to their structured type via
        // SchemaAttributeType, and carry lateral column-to-column lineage.
        let mut descent_types = vec![ATTRIBUTE_FOR_SCHEMA];
        if is_schema_attribute_type(&entity.type_name) {
            descent_types.push(SCHEMA_ATTRIBUTE_TYPE);

            // Lateral edges first. Side channel only — it never changes
            // the descent.
            let mappings = fetcher.relationships_of(
                &entity.guid,
                &entity.type_name,
                LINEAGE_MAPPING,
                "schema_context",
            )?;
            for relationship in &mappings {
                self.attach_neighbor(entity, relationship, graph, "schema_context")?;
            }
        }

        for relationship_type in descent_types {
            let relationships = fetcher.relationships_of(
                &entity.guid,
                &entity.type_name,
                relationship_type,
                "schema_context",
            )?;

            // Zero relationships is a clean dead-end.
            for relationship in &relationships {
                let Some(neighbor) =
                    self.attach_neighbor(entity, relationship, graph, "schema_context")?
                else {
                    continue;
                };

                if self.catalog.is_complex_schema_type(&neighbor.type_name) {
                    debug!(guid = %neighbor.guid, type_name = %neighbor.type_name, "reached complex schema type, resolving asset");
                    self.resolve_asset_for(&neighbor, graph)?;
                } else if visited.insert(neighbor.guid.clone()) {
                    self.descend(&neighbor, graph, visited, depth + 1)?;
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Shared accumulation primitives
    // -----------------------------------------------------------------------

    /// Resolve the entity at the far end of a relationship and record both
    /// the vertex and the connecting edge.
    ///
    /// Returns `Ok(None)` when the relationship does not actually anchor at
    /// `current` (a store inconsistency; skipped, not fatal). Resolution
    /// failures abort the traversal.
    pub(crate) fn attach_neighbor(
        &self,
        current: &EntityRef,
        relationship: &Relationship,
        graph: &mut ContextGraph,
        operation: &'static str,
    ) -> LineageResult<Option<EntityRef>> {
        let Some(far) = relationship.other_end(&current.guid) else {
            debug!(
                relationship_guid = %relationship.guid,
                current_guid = %current.guid,
                "relationship does not anchor at the current entity, skipping"
            );
            return Ok(None);
        };

        let neighbor = self.resolve_entity(&far.guid, &far.type_name, operation)?;
        self.attach(
            graph,
            &current.guid,
            LineageVertex::from(&neighbor),
            &relationship.type_name,
            &relationship.guid,
        )?;
        Ok(Some(neighbor))
    }

    /// Write a discovered vertex and its connecting edge into the graph.
    ///
    /// The single edge-sink shared by every edge source: schema
    /// relationships, asset relationships, and classification matches.
    fn attach(
        &self,
        graph: &mut ContextGraph,
        from_guid: &str,
        to_vertex: LineageVertex,
        edge_type: &str,
        edge_id: &str,
    ) -> LineageResult<()> {
        let to_guid = to_vertex.guid.clone();
        graph.add_vertex(to_vertex);
        graph.add_edge(edge_type, edge_id, from_guid, &to_guid)?;
        Ok(())
    }

    pub(crate) fn resolve_entity(
        &self,
        guid: &str,
        type_name: &str,
        operation: &'static str,
    ) -> LineageResult<EntityRef> {
        Ok(self
            .store
            .entity(guid, type_name)
            .map_err(|source| TraversalError::EntityResolution {
                guid: guid.to_owned(),
                operation,
                source,
            })?)
    }

    pub(crate) fn store(&self) -> &'a dyn MetadataStore {
        self.store
    }
}
