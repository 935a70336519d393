//! Error types for loading YASF documents.

use thiserror::Error;

/// Errors that abort a load entirely.
///
/// Anything scoped to a single node, material or texture is reported as a
/// [`Diagnostic`](crate::Diagnostic) instead, so the rest of the scene still loads.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Section '{0}' must be a JSON object")]
    NotAnObject(&'static str),

    #[error("Document has no '{0}' section")]
    MissingSection(&'static str),

    #[error("Graph section has no 'rootid'")]
    MissingRootId,

    #[error("Root node '{0}' is not defined in the graph")]
    RootNotFound(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// Errors raised while constructing geometry for a single node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("NURBS surface of degree {degree_u}x{degree_v} needs {expected} control points, got {actual}")]
    ControlPointCount {
        degree_u: usize,
        degree_v: usize,
        expected: usize,
        actual: usize,
    },

    #[error("NURBS surface needs at least one sample along {axis}")]
    NoSamples { axis: char },

    #[error("{tag} would need {vertices} vertices, more than a mesh can index")]
    TooManyVertices { tag: &'static str, vertices: u64 },
}
