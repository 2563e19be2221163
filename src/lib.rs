//! # asset-lineage
//!
//! Lineage and asset-context graph building for open-metadata
//! repositories. Starting from a single entity GUID, the traversal walks
//! typed relationships outward — schema attribute → schema type → asset —
//! accumulating the discovered vertices and edges into a per-request
//! context graph that a REST layer can serialize.
//!
//! ## Architecture
//!
//! - **Instances** (`instance`): immutable entity/relationship snapshots
//! - **Type catalog** (`typedef`): supertype-chain classification
//! - **Store boundary** (`store`): the read-only [`MetadataStore`](store::MetadataStore) trait
//! - **Accumulator** (`graph`): petgraph-backed [`ContextGraph`](graph::ContextGraph) with idempotent inserts
//! - **Traversal** (`traverse`, `asset`): schema descent, classification
//!   context, and terminal asset resolution
//!
//! ## Library usage
//!
//! ```no_run
//! use asset_lineage::store::InMemoryStore;
//! use asset_lineage::traverse::ContextBuilder;
//! use asset_lineage::typedef::{self, well_known_catalog};
//!
//! let store = InMemoryStore::new(well_known_catalog());
//! let builder = ContextBuilder::new(&store).unwrap();
//! let graph = builder
//!     .schema_context("column-guid", typedef::RELATIONAL_COLUMN)
//!     .unwrap();
//! let subgraph = graph.subgraph(); // serializable projection
//! ```

pub mod asset;
pub mod error;
pub mod fetch;
pub mod graph;
pub mod instance;
pub mod store;
pub mod traverse;
pub mod typedef;
