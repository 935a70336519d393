//! High-level YASF scene loading.
//!
//! This module provides the main entry points: parse the document, build the
//! texture and material tables, build the node graph, then instantiate it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::document::YasfDocument;
use crate::environment::{CameraSet, Globals};
use crate::error::{LoadError, LoadResult};
use crate::graph::{build_node_graph, NodeDictionary};
use crate::instantiate::SceneInstantiator;
use crate::material::{Material, MaterialTable};
use crate::scene::SceneRoot;
use crate::texture::TextureTable;

/// Options controlling a load.
#[derive(Clone, Debug)]
pub struct LoadOptions {
    /// Directory that relative texture paths are resolved against
    pub base_dir: Option<PathBuf>,

    /// Start background image loads once the texture table is built
    pub load_textures: bool,

    /// Material inherited by the root node
    pub default_material: Arc<Material>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            base_dir: None,
            load_textures: true,
            default_material: Arc::new(Material::default()),
        }
    }
}

impl LoadOptions {
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    pub fn with_textures(mut self, load_textures: bool) -> Self {
        self.load_textures = load_textures;
        self
    }

    pub fn with_default_material(mut self, material: Material) -> Self {
        self.default_material = Arc::new(material);
        self
    }
}

/// A loaded document: its tables, node dictionary and one instantiated scene.
#[derive(Debug)]
pub struct LoadedScene {
    pub name: String,
    pub globals: Globals,
    pub cameras: CameraSet,
    pub textures: TextureTable,
    pub materials: MaterialTable,
    pub nodes: NodeDictionary,
    pub root_id: String,
    pub default_material: Arc<Material>,

    /// Scene tree from the last instantiation
    pub scene: SceneRoot,

    /// Problems found while building the tables and the node graph
    pub load_diagnostics: Diagnostics,
}

impl LoadedScene {
    /// All diagnostics: table and graph problems, then instantiation problems.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.load_diagnostics.iter().chain(self.scene.diagnostics.iter())
    }

    /// Run a fresh instantiation pass without touching `self.scene`.
    pub fn instantiate(&self) -> SceneRoot {
        SceneInstantiator::new(&self.nodes, &self.materials, &self.textures)
            .create_objects(&self.root_id, self.default_material.clone())
    }

    /// Discard the current scene tree and instantiate a new one.
    pub fn rebuild(&mut self) {
        self.scene = self.instantiate();
    }
}

/// Load a YASF file.
///
/// Texture paths are resolved relative to the file's directory.
///
/// # Example
///
/// ```ignore
/// use yasf_core::load_yasf;
///
/// let loaded = load_yasf("scenes/demo.json")?;
/// println!("Loaded {} groups", loaded.scene.group_count());
/// ```
pub fn load_yasf<P: AsRef<Path>>(path: P) -> LoadResult<LoadedScene> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let mut options = LoadOptions::default();
    if let Some(dir) = path.parent() {
        options = options.with_base_dir(dir);
    }

    load_yasf_from_string(&content, name, options)
}

/// Load YASF from a string (useful for testing).
pub fn load_yasf_from_string(
    content: &str,
    name: &str,
    options: LoadOptions,
) -> LoadResult<LoadedScene> {
    let document = YasfDocument::parse(content)?;

    let root_id = document.graph.root_id.clone();
    if document.graph.record(&root_id).is_none() {
        return Err(LoadError::RootNotFound(root_id));
    }

    let mut diagnostics = Diagnostics::new();

    let globals = Globals::from_section(&document.globals, &mut diagnostics);
    let cameras = CameraSet::from_section(&document.cameras, &mut diagnostics);

    let textures =
        TextureTable::from_section(&document.textures, options.base_dir.as_deref(), &mut diagnostics);
    if options.load_textures {
        let started = textures.load_pending();
        log::debug!("Started {} background texture loads", started);
    }

    let materials = MaterialTable::from_section(&document.materials, &textures, &mut diagnostics);
    let nodes = build_node_graph(&document.graph, &root_id, &mut diagnostics);

    let scene = SceneInstantiator::new(&nodes, &materials, &textures)
        .create_objects(&root_id, options.default_material.clone());

    log::info!(
        "Loaded '{}': {} textures, {} materials, {} nodes, {} groups, {} meshes, {} lights",
        name,
        textures.len(),
        materials.len(),
        nodes.len(),
        scene.group_count(),
        scene.mesh_count(),
        scene.light_count()
    );

    Ok(LoadedScene {
        name: name.to_string(),
        globals,
        cameras,
        textures,
        materials,
        nodes,
        root_id,
        default_material: options.default_material,
        scene,
        load_diagnostics: diagnostics,
    })
}
