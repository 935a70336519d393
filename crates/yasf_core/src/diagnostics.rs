//! Recoverable problems found while loading a scene.

use thiserror::Error;

use crate::error::GeometryError;

/// A problem that skipped part of the scene without aborting the load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Diagnostic {
    #[error("node '{parent}' references missing child '{child}'")]
    DanglingChild { parent: String, child: String },

    #[error("node '{node}' is its own ancestor through child '{child}'")]
    CyclicChild { node: String, child: String },

    #[error("node '{node}' references unknown material '{material}'")]
    UnknownMaterial { node: String, material: String },

    #[error("'{owner}' references unknown texture '{texture}'")]
    UnknownTexture { owner: String, texture: String },

    #[error("node '{node}' declares unknown geometry type '{tag}'")]
    UnknownGeometry { node: String, tag: String },

    #[error("node '{node}' declares unknown transform type '{tag}'")]
    UnknownTransform { node: String, tag: String },

    #[error("{section} entry '{id}' is malformed: {message}")]
    Malformed {
        section: &'static str,
        id: String,
        message: String,
    },

    #[error("node '{node}': {error}")]
    Geometry { node: String, error: GeometryError },

    #[error("texture '{texture}' failed to load: {message}")]
    TextureLoad { texture: String, message: String },
}

/// Ordered list of diagnostics. Every push is also logged at warn level.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    /// Record a diagnostic unless an equal one was already recorded.
    ///
    /// Instantiation may visit the same node many times; this keeps one entry per problem.
    pub fn push_unique(&mut self, diagnostic: Diagnostic) {
        if !self.entries.contains(&diagnostic) {
            self.push(diagnostic);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
