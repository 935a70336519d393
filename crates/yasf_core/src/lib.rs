//! YASF Core - scene description interpreter.
//!
//! This crate turns a YASF ("Yet Another Scene Format") JSON document into
//! an instantiated scene tree:
//!
//! - **Document model**: `document`, `environment` (globals and cameras)
//! - **Tables**: `TextureTable`, `MaterialTable`
//! - **Node graph**: breadth-first build of a flat `NodeDictionary`
//! - **Instantiation**: depth-first walk producing `SceneGroup` trees with
//!   transforms, effective materials, shadow flags, meshes and lights
//!
//! # Example
//!
//! ```ignore
//! use yasf_core::load_yasf;
//!
//! let loaded = load_yasf("scenes/park.json")?;
//! println!("{} nodes, {} meshes, {} lights",
//!     loaded.nodes.len(),
//!     loaded.scene.mesh_count(),
//!     loaded.scene.light_count());
//! for diagnostic in loaded.diagnostics() {
//!     println!("warning: {diagnostic}");
//! }
//! ```

pub mod diagnostics;
pub mod document;
pub mod environment;
pub mod error;
pub mod graph;
pub mod instantiate;
pub mod loader;
pub mod material;
pub mod mesh;
pub mod node;
pub mod nurbs;
pub mod primitives;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, Diagnostics};
pub use document::YasfDocument;
pub use error::{GeometryError, LoadError, LoadResult};
pub use graph::{build_node_graph, NodeDictionary};
pub use instantiate::SceneInstantiator;
pub use loader::{load_yasf, load_yasf_from_string, LoadOptions, LoadedScene};
pub use material::{Material, MaterialTable};
pub use mesh::{Mesh, Vertex};
pub use node::{Geometry, Node, NodeTransform, TransformKind};
pub use scene::{MeshInstance, MeshMaterial, SceneGroup, SceneObject, SceneRoot, Transform};
pub use texture::{TextureHandle, TextureTable};
