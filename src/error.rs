//! Rich diagnostic error types for the lineage core.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]`
//! derives, providing error codes and help text. Store-facing failures are
//! a tagged enum — the traversal matches on kind, never on a concrete
//! backend exception type — and the top-level [`LineageError`] exposes an
//! [`ErrorKind`] so a REST layer can map a failed traversal to the right
//! HTTP status.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the lineage core.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum LineageError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Traversal(#[from] TraversalError),
}

/// HTTP-status-like classification of a failed traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required entity GUID did not resolve.
    NotFound,
    /// The store rejected the caller's credentials.
    Unauthorized,
    /// Everything else: backend failures, malformed graphs.
    ServerError,
}

impl LineageError {
    /// Classify the error for status mapping in the response layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LineageError::Store(e) => e.kind(),
            LineageError::Graph(_) => ErrorKind::ServerError,
            LineageError::Traversal(e) => e.source_kind(),
        }
    }
}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Failures reported by the metadata store.
///
/// Note what is deliberately *not* here: an unresolvable type name. Type
/// lookup misses are returned as `Ok(None)` / empty result sets because
/// schemas evolve and not every type is present in every deployment.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("entity {guid} (expected type {type_name}) not found")]
    #[diagnostic(
        code(lineage::store::entity_not_found),
        help(
            "The GUID does not resolve in the metadata repository, or the \
             entity it resolves to is not of the expected type. Verify the \
             GUID and that the repository holding the entity is connected."
        )
    )]
    EntityNotFound { guid: String, type_name: String },

    #[error("unauthorized: {message}")]
    #[diagnostic(
        code(lineage::store::unauthorized),
        help(
            "The repository rejected the request's credentials. Check the \
             caller's user identity and the repository's access policies."
        )
    )]
    Unauthorized { message: String },

    #[error("metadata store failure: {message}")]
    #[diagnostic(
        code(lineage::store::backend),
        help(
            "The repository could not complete the query. This usually means \
             the backing server is unreachable or returned an internal error. \
             Retry once the repository is healthy."
        )
    )]
    Backend { message: String },
}

impl StoreError {
    /// Classify the store failure for status mapping.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::EntityNotFound { .. } => ErrorKind::NotFound,
            StoreError::Unauthorized { .. } => ErrorKind::Unauthorized,
            StoreError::Backend { .. } => ErrorKind::ServerError,
        }
    }
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("edge endpoint {guid} has no vertex in the context graph")]
    #[diagnostic(
        code(lineage::graph::missing_vertex),
        help(
            "Edges may only connect vertices that were added to the context \
             graph first. Add both endpoint vertices before the edge."
        )
    )]
    MissingVertex { guid: String },
}

// ---------------------------------------------------------------------------
// Traversal errors
// ---------------------------------------------------------------------------

/// Store failures re-wrapped at the traversal boundary with enough context
/// (originating GUID, operation) to diagnose. Inner recursive calls do not
/// handle errors individually; they propagate to the top of the traversal
/// and the whole request fails — partial graphs are never returned as
/// success.
#[derive(Debug, Error, Diagnostic)]
pub enum TraversalError {
    #[error("failed to resolve entity {guid} during {operation}")]
    #[diagnostic(
        code(lineage::traverse::entity_resolution),
        help(
            "An intermediate entity of the context graph could not be \
             resolved. The traversal aborts rather than returning a \
             truncated graph."
        )
    )]
    EntityResolution {
        guid: String,
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("failed to resolve relationships of {guid} during {operation}")]
    #[diagnostic(
        code(lineage::traverse::relationship_resolution),
        help(
            "The store failed while listing relationships anchored at this \
             entity. The traversal aborts rather than skipping the branch."
        )
    )]
    RelationshipResolution {
        guid: String,
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("type catalog unavailable")]
    #[diagnostic(
        code(lineage::traverse::type_catalog),
        help(
            "The type-definition catalog could not be fetched at traversal \
             start. No classification decisions can be made without it."
        )
    )]
    TypeCatalogUnavailable {
        #[source]
        source: StoreError,
    },
}

impl TraversalError {
    fn source_kind(&self) -> ErrorKind {
        match self {
            TraversalError::EntityResolution { source, .. }
            | TraversalError::RelationshipResolution { source, .. }
            | TraversalError::TypeCatalogUnavailable { source } => source.kind(),
        }
    }
}

/// Convenience alias for functions returning lineage results.
pub type LineageResult<T> = std::result::Result<T, LineageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_converts_to_lineage_error() {
        let err = StoreError::EntityNotFound {
            guid: "e1".into(),
            type_name: "DataFile".into(),
        };
        let lineage: LineageError = err.into();
        assert!(matches!(
            lineage,
            LineageError::Store(StoreError::EntityNotFound { .. })
        ));
        assert_eq!(lineage.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn traversal_error_preserves_source_kind() {
        let err = TraversalError::EntityResolution {
            guid: "e2".into(),
            operation: "schema_context",
            source: StoreError::Unauthorized {
                message: "user npa denied".into(),
            },
        };
        let lineage: LineageError = err.into();
        assert_eq!(lineage.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn backend_failures_map_to_server_error() {
        let err = TraversalError::RelationshipResolution {
            guid: "e3".into(),
            operation: "resolve_asset",
            source: StoreError::Backend {
                message: "repository proxy timed out".into(),
            },
        };
        assert_eq!(LineageError::from(err).kind(), ErrorKind::ServerError);
    }

    #[test]
    fn error_display_names_the_guid() {
        let err = StoreError::EntityNotFound {
            guid: "abc-123".into(),
            type_name: "RelationalColumn".into(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("abc-123"));
        assert!(msg.contains("RelationalColumn"));
    }
}
