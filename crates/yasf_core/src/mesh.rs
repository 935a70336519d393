//! Mesh geometry produced by the primitive constructors.
//!
//! Meshes are renderer-agnostic; `to_vertices` interleaves them into a
//! `bytemuck`-compatible layout for upload.

use bytemuck::{Pod, Zeroable};
use yasf_math::{Aabb, Rgba, Vec2, Vec3};

/// A mesh consisting of vertex positions, optional attributes, and triangle indices.
///
/// Triangles wind counter-clockwise when seen from the side their normal points to.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional - computed on demand)
    pub normals: Option<Vec<Vec3>>,

    /// UV coordinates (optional - one per vertex)
    pub uvs: Option<Vec<Vec2>>,

    /// Per-vertex colors (optional)
    pub colors: Option<Vec<Rgba>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Axis-aligned bounding box
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        let bounds = Aabb::enclosing(positions.iter().copied());
        Self {
            positions,
            normals,
            uvs: None,
            colors: None,
            indices,
            bounds,
        }
    }

    /// Attach UV coordinates.
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = Some(uvs);
        self
    }

    /// Attach per-vertex colors.
    pub fn with_colors(mut self, colors: Vec<Rgba>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Compute smooth vertex normals by averaging face normals.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (face[0] as usize, face[1] as usize, face[2] as usize);
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Z);
        }

        self.normals = Some(normals);
    }

    /// Ensure the mesh has one normal per vertex, computing them if necessary.
    pub fn ensure_normals(&mut self) {
        let matches = self
            .normals
            .as_ref()
            .is_some_and(|n| n.len() == self.positions.len());
        if !matches {
            self.compute_normals();
        }
    }

    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    pub fn has_uvs(&self) -> bool {
        self.uvs.is_some()
    }

    pub fn has_colors(&self) -> bool {
        self.colors.is_some()
    }

    /// Get the mesh center (center of bounding box).
    pub fn center(&self) -> Vec3 {
        self.bounds.centroid()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Interleave all attributes. Missing attributes use neutral defaults
    /// (up normal, zero UV, opaque white).
    pub fn to_vertices(&self) -> Vec<Vertex> {
        (0..self.positions.len())
            .map(|i| Vertex {
                position: self.positions[i].to_array(),
                normal: self
                    .normals
                    .as_ref()
                    .and_then(|n| n.get(i))
                    .map_or([0.0, 0.0, 1.0], |n| n.to_array()),
                uv: self
                    .uvs
                    .as_ref()
                    .and_then(|uv| uv.get(i))
                    .map_or([0.0, 0.0], |uv| uv.to_array()),
                color: self
                    .colors
                    .as_ref()
                    .and_then(|c| c.get(i))
                    .map_or([1.0; 4], |c| c.to_array()),
            })
            .collect()
    }
}

/// Interleaved vertex for GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}
