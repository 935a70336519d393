//! Instantiated scene tree.
//!
//! This is the output of the Scene Instantiator: one [`SceneGroup`] per visit
//! of a node, carrying its local transform, effective material, shadow policy
//! and the meshes or lights built from the node's geometry. Meshes are held
//! in `Arc`s so repeated instantiations of a node share vertex data.

use std::sync::Arc;

use yasf_math::{euler_degrees_to_quat, Aabb, Mat4, Mat4Ext, Quat, Vec3};

use crate::diagnostics::Diagnostics;
use crate::material::Material;
use crate::mesh::Mesh;
use crate::node::{NodeTransform, TransformKind};
use crate::primitives::Light;
use crate::texture::TextureHandle;

/// One step of a group's local transform.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    Translate(Vec3),
    /// Euler angles in degrees, applied X then Y then Z.
    Rotate(Vec3),
    Scale(Vec3),
}

impl TransformOp {
    pub fn kind(&self) -> TransformKind {
        match self {
            TransformOp::Translate(_) => TransformKind::Translate,
            TransformOp::Rotate(_) => TransformKind::Rotate,
            TransformOp::Scale(_) => TransformKind::Scale,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        match self {
            TransformOp::Translate(t) => Mat4::from_translation(*t),
            TransformOp::Rotate(deg) => Mat4::from_quat(euler_degrees_to_quat(*deg)),
            TransformOp::Scale(s) => Mat4::from_scale(*s),
        }
    }
}

impl From<&NodeTransform> for TransformOp {
    fn from(t: &NodeTransform) -> Self {
        match t.kind {
            TransformKind::Translate => TransformOp::Translate(t.amount),
            TransformKind::Rotate => TransformOp::Rotate(t.amount),
            TransformKind::Scale => TransformOp::Scale(t.amount),
        }
    }
}

/// Local transform of a group: at most one op per kind, kept in the order
/// the surviving entries were declared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transform {
    ops: Vec<TransformOp>,
}

impl Transform {
    /// Apply a node's transform list in order.
    ///
    /// A later entry replaces any earlier entry of the same kind and takes
    /// its own position in the sequence.
    pub fn from_node_transforms(transforms: &[NodeTransform]) -> Self {
        let mut transform = Self::default();
        for t in transforms {
            transform.set(TransformOp::from(t));
        }
        transform
    }

    /// Replace the op of the same kind, moving it to the end.
    pub fn set(&mut self, op: TransformOp) {
        self.ops.retain(|existing| existing.kind() != op.kind());
        self.ops.push(op);
    }

    pub fn ops(&self) -> &[TransformOp] {
        &self.ops
    }

    /// Compose the ops into a single matrix, first op outermost.
    pub fn matrix(&self) -> Mat4 {
        self.ops
            .iter()
            .fold(Mat4::IDENTITY, |acc, op| acc * op.to_matrix())
    }

    pub fn position(&self) -> Vec3 {
        self.ops
            .iter()
            .find_map(|op| match op {
                TransformOp::Translate(t) => Some(*t),
                _ => None,
            })
            .unwrap_or(Vec3::ZERO)
    }

    pub fn rotation(&self) -> Quat {
        self.ops
            .iter()
            .find_map(|op| match op {
                TransformOp::Rotate(deg) => Some(euler_degrees_to_quat(*deg)),
                _ => None,
            })
            .unwrap_or(Quat::IDENTITY)
    }

    pub fn scale(&self) -> Vec3 {
        self.ops
            .iter()
            .find_map(|op| match op {
                TransformOp::Scale(s) => Some(*s),
                _ => None,
            })
            .unwrap_or(Vec3::ONE)
    }
}

/// How a mesh instance is shaded.
#[derive(Clone, Debug)]
pub enum MeshMaterial {
    /// The group's effective material.
    Shared(Arc<Material>),
    /// Per-vertex colors from the mesh, ignoring the effective material.
    VertexColors,
    /// Unlit video surface with vertex-alpha fade. The texture is `None`
    /// when the referenced video was not declared.
    Video { texture: Option<TextureHandle> },
}

/// A placed mesh inside a group.
#[derive(Clone, Debug)]
pub struct MeshInstance {
    pub mesh: Arc<Mesh>,
    pub material: MeshMaterial,
    /// Offset of the mesh origin in group space.
    pub position: Vec3,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl MeshInstance {
    /// Mesh-to-group matrix.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
    }
}

/// Renderable content attached to a group.
#[derive(Clone, Debug)]
pub enum SceneObject {
    Mesh(MeshInstance),
    Light(Light),
}

/// One instantiation of a node.
#[derive(Clone, Debug)]
pub struct SceneGroup {
    /// Id of the node this group was built from.
    pub node_id: String,
    pub transform: Transform,
    /// Effective material on this instantiation path.
    pub material: Arc<Material>,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    pub objects: Vec<SceneObject>,
    pub children: Vec<SceneGroup>,
}

impl SceneGroup {
    pub fn new(node_id: impl Into<String>, material: Arc<Material>) -> Self {
        Self {
            node_id: node_id.into(),
            transform: Transform::default(),
            material,
            cast_shadows: false,
            receive_shadows: false,
            objects: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn local_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    pub fn meshes(&self) -> impl Iterator<Item = &MeshInstance> {
        self.objects.iter().filter_map(|object| match object {
            SceneObject::Mesh(m) => Some(m),
            SceneObject::Light(_) => None,
        })
    }

    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.objects.iter().filter_map(|object| match object {
            SceneObject::Light(l) => Some(l),
            SceneObject::Mesh(_) => None,
        })
    }

    /// First direct child built from `node_id`.
    pub fn child(&self, node_id: &str) -> Option<&SceneGroup> {
        self.children.iter().find(|c| c.node_id == node_id)
    }

    fn visit_with<F>(&self, parent: Mat4, f: &mut F)
    where
        F: FnMut(&SceneGroup, Mat4),
    {
        let world = parent * self.local_matrix();
        f(self, world);
        for child in &self.children {
            child.visit_with(world, f);
        }
    }
}

/// Root of an instantiated scene.
#[derive(Clone, Debug, Default)]
pub struct SceneRoot {
    pub children: Vec<SceneGroup>,

    /// Problems met while instantiating.
    pub diagnostics: Diagnostics,
}

impl SceneRoot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, group: SceneGroup) {
        self.children.push(group);
    }

    /// Depth-first walk with each group's world matrix.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&SceneGroup, Mat4),
    {
        for child in &self.children {
            child.visit_with(Mat4::IDENTITY, &mut f);
        }
    }

    pub fn group_count(&self) -> usize {
        let mut count = 0;
        self.visit(|_, _| count += 1);
        count
    }

    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.visit(|group, _| count += group.meshes().count());
        count
    }

    /// Number of lights attached to the scene.
    pub fn light_count(&self) -> usize {
        let mut count = 0;
        self.visit(|group, _| count += group.lights().count());
        count
    }

    /// First group built from `node_id`, in depth-first order.
    pub fn find(&self, node_id: &str) -> Option<&SceneGroup> {
        fn search<'a>(group: &'a SceneGroup, node_id: &str) -> Option<&'a SceneGroup> {
            if group.node_id == node_id {
                return Some(group);
            }
            group.children.iter().find_map(|c| search(c, node_id))
        }
        self.children.iter().find_map(|c| search(c, node_id))
    }

    /// Compute the world-space bounding box of all mesh instances.
    pub fn world_bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        self.visit(|group, world| {
            for instance in group.meshes() {
                let matrix = world * instance.local_matrix();
                bounds = bounds.union(&matrix.transform_aabb(&instance.mesh.bounds));
            }
        });
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(x: f32, y: f32, z: f32) -> NodeTransform {
        NodeTransform::new(TransformKind::Translate, Vec3::new(x, y, z))
    }

    fn rotate(x: f32, y: f32, z: f32) -> NodeTransform {
        NodeTransform::new(TransformKind::Rotate, Vec3::new(x, y, z))
    }

    fn scale(x: f32, y: f32, z: f32) -> NodeTransform {
        NodeTransform::new(TransformKind::Scale, Vec3::new(x, y, z))
    }

    fn unit_cube() -> Arc<Mesh> {
        Arc::new(Mesh::new(
            vec![Vec3::splat(-0.5), Vec3::splat(0.5)],
            Vec::new(),
            None,
        ))
    }

    #[test]
    fn test_last_translate_wins() {
        let t = Transform::from_node_transforms(&[translate(1.0, 0.0, 0.0), translate(0.0, 2.0, 0.0)]);

        assert_eq!(t.ops().len(), 1);
        assert_eq!(t.position(), Vec3::new(0.0, 2.0, 0.0));
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_declared_order_is_significant() {
        let translate_then_rotate =
            Transform::from_node_transforms(&[translate(1.0, 0.0, 0.0), rotate(0.0, 0.0, 90.0)]);
        let rotate_then_translate =
            Transform::from_node_transforms(&[rotate(0.0, 0.0, 90.0), translate(1.0, 0.0, 0.0)]);

        let a = translate_then_rotate.matrix().transform_point3(Vec3::X);
        let b = rotate_then_translate.matrix().transform_point3(Vec3::X);

        // T * R: rotate the point, then move it.
        assert!((a - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
        // R * T: move the point, then rotate it.
        assert!((b - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotate_and_nonuniform_scale_order() {
        let rotate_then_scale =
            Transform::from_node_transforms(&[rotate(0.0, 0.0, 90.0), scale(2.0, 1.0, 1.0)]);
        let scale_then_rotate =
            Transform::from_node_transforms(&[scale(2.0, 1.0, 1.0), rotate(0.0, 0.0, 90.0)]);

        let a = rotate_then_scale.matrix().transform_point3(Vec3::X);
        let b = scale_then_rotate.matrix().transform_point3(Vec3::X);

        // R * S: stretch along x, then turn onto y.
        assert!((a - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);
        // S * R: turn onto y first, so the x stretch misses it.
        assert!((b - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_replaced_op_moves_to_end() {
        let t = Transform::from_node_transforms(&[
            scale(2.0, 2.0, 2.0),
            translate(1.0, 0.0, 0.0),
            scale(3.0, 3.0, 3.0),
        ]);

        assert_eq!(
            t.ops(),
            &[
                TransformOp::Translate(Vec3::X),
                TransformOp::Scale(Vec3::splat(3.0))
            ]
        );
        assert_eq!(t.scale(), Vec3::splat(3.0));
        assert_eq!(t.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_counts_and_world_bounds() {
        let material = Arc::new(Material::default());
        let mesh = unit_cube();

        let mut child = SceneGroup::new("child", material.clone());
        child.transform.set(TransformOp::Translate(Vec3::new(10.0, 0.0, 0.0)));
        child.objects.push(SceneObject::Mesh(MeshInstance {
            mesh: mesh.clone(),
            material: MeshMaterial::Shared(material.clone()),
            position: Vec3::new(0.0, 1.0, 0.0),
            cast_shadows: false,
            receive_shadows: false,
        }));

        let mut root_group = SceneGroup::new("scene", material.clone());
        root_group.transform.set(TransformOp::Scale(Vec3::splat(2.0)));
        root_group.objects.push(SceneObject::Mesh(MeshInstance {
            mesh,
            material: MeshMaterial::VertexColors,
            position: Vec3::ZERO,
            cast_shadows: true,
            receive_shadows: true,
        }));
        root_group.children.push(child);

        let mut root = SceneRoot::new();
        root.add(root_group);

        assert_eq!(root.group_count(), 2);
        assert_eq!(root.mesh_count(), 2);
        assert_eq!(root.light_count(), 0);
        assert_eq!(root.find("child").map(|g| g.node_id.as_str()), Some("child"));

        let bounds = root.world_bounds();
        assert!((bounds.min - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);
        assert!((bounds.max - Vec3::new(21.0, 3.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_empty_scene_bounds() {
        assert!(SceneRoot::new().world_bounds().is_empty());
    }
}
