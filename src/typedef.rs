//! Type-definition catalog and structural type classification.
//!
//! Open-metadata types form a single-inheritance hierarchy (every type has
//! at most one supertype). The catalog is fetched once per top-level
//! traversal and treated as an immutable snapshot; all classification
//! questions — "is this a schema attribute?", "is this a complex schema
//! type?" — are answered by walking the supertype chain in that snapshot.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Well-known type names
// ---------------------------------------------------------------------------

/// Root type for all asset-catalog entities.
pub const REFERENCEABLE: &str = "Referenceable";
/// Base type for assets (data stores, data sets, files).
pub const ASSET: &str = "Asset";
pub const DATA_STORE: &str = "DataStore";
pub const DATA_SET: &str = "DataSet";
pub const DATA_FILE: &str = "DataFile";

/// Base type for schema attributes (columns, fields).
pub const SCHEMA_ATTRIBUTE: &str = "SchemaAttribute";
/// Base type for structured schema types (tables, structs).
pub const COMPLEX_SCHEMA_TYPE: &str = "ComplexSchemaType";
pub const TABULAR_COLUMN: &str = "TabularColumn";
pub const RELATIONAL_COLUMN: &str = "RelationalColumn";
pub const TABULAR_SCHEMA_TYPE: &str = "TabularSchemaType";
pub const RELATIONAL_TABLE_TYPE: &str = "RelationalTableType";

// Relationship type names walked by the traversal.
pub const ATTRIBUTE_FOR_SCHEMA: &str = "AttributeForSchema";
pub const LINEAGE_MAPPING: &str = "LineageMapping";
pub const SCHEMA_ATTRIBUTE_TYPE: &str = "SchemaAttributeType";
pub const ASSET_SCHEMA_TYPE: &str = "AssetSchemaType";
pub const NESTED_FILE: &str = "NestedFile";
pub const DATA_CONTENT_FOR_DATA_SET: &str = "DataContentForDataSet";
pub const CONNECTION_TO_ASSET: &str = "ConnectionToAsset";

/// Classification type matched by the classification-context traversal.
pub const TYPE_EMBEDDED_ATTRIBUTE: &str = "TypeEmbeddedAttribute";
/// Edge label linking an entity to one of its classifications.
pub const CLASSIFIED_ENTITY: &str = "ClassifiedEntity";

/// The fixed set of schema-attribute kinds that carry lateral lineage.
const SCHEMA_ATTRIBUTE_KINDS: &[&str] = &[TABULAR_COLUMN, RELATIONAL_COLUMN];

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Summary of a single type definition: its store identifier and its direct
/// supertype (None for root types).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDefSummary {
    pub guid: String,
    pub super_type: Option<String>,
}

/// Immutable snapshot of the repository's type definitions, keyed by name.
///
/// Covers entity, relationship, and classification types alike — the
/// traversal only ever asks for a GUID or a supertype by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeCatalog {
    defs: HashMap<String, TypeDefSummary>,
}

impl TypeCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type definition. Later registrations replace earlier ones.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        guid: impl Into<String>,
        super_type: Option<&str>,
    ) {
        self.defs.insert(
            name.into(),
            TypeDefSummary {
                guid: guid.into(),
                super_type: super_type.map(str::to_owned),
            },
        );
    }

    /// Look up a type definition by name.
    pub fn get(&self, name: &str) -> Option<&TypeDefSummary> {
        self.defs.get(name)
    }

    /// Store identifier for a type name, if the type is known.
    pub fn type_guid(&self, name: &str) -> Option<&str> {
        self.defs.get(name).map(|def| def.guid.as_str())
    }

    /// Number of registered type definitions.
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Whether the catalog has no definitions.
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Check whether `type_name` is a strict or reflexive subtype of
    /// `candidate` by walking the supertype chain.
    ///
    /// A type absent from the catalog yields `false`, never an error —
    /// deployments routinely run with partial type registries. A visited
    /// set guards against malformed catalogs with cyclic supertype links.
    pub fn is_subtype_of(&self, type_name: &str, candidate: &str) -> bool {
        if type_name == candidate {
            return true;
        }
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = type_name;
        while let Some(def) = self.defs.get(current) {
            let Some(super_type) = def.super_type.as_deref() else {
                return false;
            };
            if super_type == candidate {
                return true;
            }
            if !visited.insert(current) {
                return false;
            }
            current = super_type;
        }
        false
    }

    /// Whether the type is (a subtype of) `ComplexSchemaType` — a table,
    /// struct, or other structured schema type that ends schema descent.
    pub fn is_complex_schema_type(&self, type_name: &str) -> bool {
        self.is_subtype_of(type_name, COMPLEX_SCHEMA_TYPE)
    }
}

/// Whether the type is one of the schema-attribute kinds that participate
/// in column-level lineage. Membership test against a fixed set; the type
/// catalog is not consulted.
pub fn is_schema_attribute_type(type_name: &str) -> bool {
    SCHEMA_ATTRIBUTE_KINDS.contains(&type_name)
}

/// A catalog pre-loaded with the well-known types the traversal branches
/// on, plus GUIDs for the relationship types it walks. Store adapters for
/// real repositories replace this with the deployment's own registry.
pub fn well_known_catalog() -> TypeCatalog {
    let mut catalog = TypeCatalog::new();

    catalog.insert(REFERENCEABLE, "t-referenceable", None);
    catalog.insert(ASSET, "t-asset", Some(REFERENCEABLE));
    catalog.insert(DATA_STORE, "t-data-store", Some(ASSET));
    catalog.insert(DATA_SET, "t-data-set", Some(ASSET));
    catalog.insert(DATA_FILE, "t-data-file", Some(DATA_STORE));

    catalog.insert(SCHEMA_ATTRIBUTE, "t-schema-attribute", Some(REFERENCEABLE));
    catalog.insert(TABULAR_COLUMN, "t-tabular-column", Some(SCHEMA_ATTRIBUTE));
    catalog.insert(
        RELATIONAL_COLUMN,
        "t-relational-column",
        Some(TABULAR_COLUMN),
    );
    catalog.insert(
        COMPLEX_SCHEMA_TYPE,
        "t-complex-schema-type",
        Some(REFERENCEABLE),
    );
    catalog.insert(
        TABULAR_SCHEMA_TYPE,
        "t-tabular-schema-type",
        Some(COMPLEX_SCHEMA_TYPE),
    );
    catalog.insert(
        RELATIONAL_TABLE_TYPE,
        "t-relational-table-type",
        Some(TABULAR_SCHEMA_TYPE),
    );

    catalog.insert(ATTRIBUTE_FOR_SCHEMA, "r-attribute-for-schema", None);
    catalog.insert(LINEAGE_MAPPING, "r-lineage-mapping", None);
    catalog.insert(SCHEMA_ATTRIBUTE_TYPE, "r-schema-attribute-type", None);
    catalog.insert(ASSET_SCHEMA_TYPE, "r-asset-schema-type", None);
    catalog.insert(NESTED_FILE, "r-nested-file", None);
    catalog.insert(
        DATA_CONTENT_FOR_DATA_SET,
        "r-data-content-for-data-set",
        None,
    );
    catalog.insert(CONNECTION_TO_ASSET, "r-connection-to-asset", None);

    catalog.insert(
        TYPE_EMBEDDED_ATTRIBUTE,
        "c-type-embedded-attribute",
        None,
    );

    catalog
}
