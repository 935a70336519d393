//! Scene Instantiator.
//!
//! Walks the [`NodeDictionary`] depth-first from a root id and builds a fresh
//! [`SceneGroup`] for every visit. Unlike the graph build, the walk is not
//! memoized: a node reachable from several parents is instantiated once per
//! path, and its effective material is resolved per path.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glam::Vec3;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::NodeDictionary;
use crate::material::{Material, MaterialTable};
use crate::mesh::Mesh;
use crate::node::{Geometry, Node};
use crate::primitives::{build_light, build_shape};
use crate::scene::{MeshInstance, MeshMaterial, SceneGroup, SceneObject, SceneRoot, Transform};
use crate::texture::TextureTable;

/// Builds scene trees from a node dictionary and its material and texture tables.
pub struct SceneInstantiator<'a> {
    nodes: &'a NodeDictionary,
    materials: &'a MaterialTable,
    textures: &'a TextureTable,

    /// Meshes built during the current pass, by node id, with their group offset.
    meshes: HashMap<String, (Arc<Mesh>, Vec3)>,
    /// Node ids whose geometry failed to build during the current pass.
    failed: HashSet<String>,
    /// Ids on the current root-to-node path.
    ancestors: Vec<String>,
    diagnostics: Diagnostics,
}

impl<'a> SceneInstantiator<'a> {
    pub fn new(
        nodes: &'a NodeDictionary,
        materials: &'a MaterialTable,
        textures: &'a TextureTable,
    ) -> Self {
        Self {
            nodes,
            materials,
            textures,
            meshes: HashMap::new(),
            failed: HashSet::new(),
            ancestors: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Instantiate the tree under `root_id`.
    ///
    /// The root inherits `default_material`. Every call starts a new pass and
    /// returns independent groups; the node dictionary is never modified.
    pub fn create_objects(&mut self, root_id: &str, default_material: Arc<Material>) -> SceneRoot {
        self.meshes.clear();
        self.failed.clear();
        self.ancestors.clear();

        let mut root = SceneRoot::new();
        if self.nodes.contains(root_id) {
            let group = self.build_scene_graph(root_id, &default_material);
            root.add(group);
        } else {
            self.diagnostics.push_unique(Diagnostic::DanglingChild {
                parent: "rootid".to_string(),
                child: root_id.to_string(),
            });
        }

        root.diagnostics = std::mem::take(&mut self.diagnostics);

        log::info!(
            "Instantiated {} groups, {} meshes, {} lights from '{}' ({} diagnostics)",
            root.group_count(),
            root.mesh_count(),
            root.light_count(),
            root_id,
            root.diagnostics.len()
        );

        root
    }

    /// Build the group for one visit of `node_id` and, recursively, its children.
    ///
    /// `node_id` must be present in the dictionary.
    pub fn build_scene_graph(&mut self, node_id: &str, inherited: &Arc<Material>) -> SceneGroup {
        let nodes = self.nodes;
        let Some(node) = nodes.get(node_id) else {
            return SceneGroup::new(node_id, inherited.clone());
        };

        let material = self.effective_material(node, inherited);

        let mut group = SceneGroup::new(node_id, material.clone());
        group.transform = Transform::from_node_transforms(&node.transforms);
        group.cast_shadows = node.cast_shadows;
        group.receive_shadows = node.receive_shadows;

        if let Some(geometry) = &node.geometry {
            if let Some(object) = self.build_object(node, geometry, &material) {
                group.objects.push(object);
            }
        }

        self.ancestors.push(node.id.clone());
        for child_id in &node.children {
            if !nodes.contains(child_id) {
                self.diagnostics.push_unique(Diagnostic::DanglingChild {
                    parent: node.id.clone(),
                    child: child_id.clone(),
                });
                continue;
            }
            if self.ancestors.contains(child_id) {
                self.diagnostics.push_unique(Diagnostic::CyclicChild {
                    node: node.id.clone(),
                    child: child_id.clone(),
                });
                continue;
            }

            let child = self.build_scene_graph(child_id, &material);
            group.children.push(child);
        }
        self.ancestors.pop();

        group
    }

    /// The node's own material if it names a known one, else the inherited one.
    fn effective_material(&mut self, node: &Node, inherited: &Arc<Material>) -> Arc<Material> {
        let Some(material_ref) = &node.material_ref else {
            return inherited.clone();
        };

        match self.materials.lookup(material_ref) {
            Some(material) => material,
            None => {
                self.diagnostics.push_unique(Diagnostic::UnknownMaterial {
                    node: node.id.clone(),
                    material: material_ref.clone(),
                });
                inherited.clone()
            }
        }
    }

    fn build_object(
        &mut self,
        node: &Node,
        geometry: &Geometry,
        material: &Arc<Material>,
    ) -> Option<SceneObject> {
        if geometry.is_light() {
            let light = build_light(geometry)?;
            if !light.enabled {
                log::debug!("Node '{}': {} disabled", node.id, geometry.tag());
                return None;
            }
            return Some(SceneObject::Light(light));
        }

        let (mesh, position) = self.mesh_for(node, geometry)?;

        let material = match geometry {
            Geometry::Polygon(_) => MeshMaterial::VertexColors,
            Geometry::VideoEmitter(video) => {
                let texture_id = video.textureref.to_lowercase();
                let texture = self.textures.lookup(&texture_id);
                if texture.is_none() {
                    self.diagnostics.push_unique(Diagnostic::UnknownTexture {
                        owner: node.id.clone(),
                        texture: texture_id,
                    });
                }
                MeshMaterial::Video { texture }
            }
            _ => MeshMaterial::Shared(material.clone()),
        };

        Some(SceneObject::Mesh(MeshInstance {
            mesh,
            material,
            position,
            cast_shadows: node.cast_shadows,
            receive_shadows: node.receive_shadows,
        }))
    }

    /// Mesh of a node, built on first use in this pass.
    fn mesh_for(&mut self, node: &Node, geometry: &Geometry) -> Option<(Arc<Mesh>, Vec3)> {
        if let Some((mesh, offset)) = self.meshes.get(&node.id) {
            return Some((mesh.clone(), *offset));
        }
        if self.failed.contains(&node.id) {
            return None;
        }

        match build_shape(geometry)? {
            Ok(shape) => {
                let mesh = Arc::new(shape.mesh);
                log::debug!(
                    "Node '{}': built {} with {} triangles",
                    node.id,
                    geometry.tag(),
                    mesh.triangle_count()
                );
                self.meshes
                    .insert(node.id.clone(), (mesh.clone(), shape.offset));
                Some((mesh, shape.offset))
            }
            Err(error) => {
                self.diagnostics.push_unique(Diagnostic::Geometry {
                    node: node.id.clone(),
                    error,
                });
                self.failed.insert(node.id.clone());
                None
            }
        }
    }
}
