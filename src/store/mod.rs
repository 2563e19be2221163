//! Metadata store boundary.
//!
//! The lineage core performs no writes and owns no storage: everything it
//! knows about entities, relationships, and type definitions comes through
//! the narrow read-only [`MetadataStore`] trait. Production deployments
//! implement it against their repository connector; tests and embedded use
//! get the DashMap-backed [`InMemoryStore`].

pub mod mem;

pub use mem::InMemoryStore;

use crate::error::StoreError;
use crate::instance::{EntityRef, Relationship};
use crate::typedef::TypeCatalog;

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read-only query capability of a metadata repository.
///
/// Calls are synchronous and may block on I/O; the traversal issues them
/// strictly sequentially (a child entity is never fetched before its parent
/// resolves). Implementations must be usable from multiple threads so that
/// concurrent traversals can share one store.
pub trait MetadataStore: Send + Sync {
    /// Resolve an entity by GUID.
    ///
    /// `expected_type` names the type the caller believes the entity has;
    /// stores should fail with [`StoreError::EntityNotFound`] when the GUID
    /// resolves to an entity of an incompatible type.
    fn entity(&self, guid: &str, expected_type: &str) -> StoreResult<EntityRef>;

    /// All relationships of one type anchored at an entity.
    ///
    /// `relationship_type_guid` is the store's internal type identifier
    /// (resolve it first via [`MetadataStore::type_guid`]). The full
    /// filtered set is returned in one call — fan-out per (entity, type)
    /// pair is assumed bounded.
    fn relationships(
        &self,
        entity_guid: &str,
        entity_type: &str,
        relationship_type_guid: &str,
    ) -> StoreResult<Vec<Relationship>>;

    /// Snapshot of the full type-definition catalog.
    fn type_catalog(&self) -> StoreResult<TypeCatalog>;

    /// Resolve a type name to the store's internal identifier.
    ///
    /// Returns `Ok(None)` when the type is not registered — callers treat
    /// this as "no matches", not as an error.
    fn type_guid(&self, type_name: &str) -> StoreResult<Option<String>>;
}
