use glam::Vec2;

use super::Shape;
use crate::mesh::Mesh;
use crate::node::TriangleGeometry;

/// A single face through three explicit vertices.
pub fn build_triangle(g: &TriangleGeometry) -> Shape {
    let positions = vec![g.xyz1, g.xyz2, g.xyz3];

    // UVs keep the triangle's proportions: edge 1-2 along u, vertex 3 projected onto it.
    let a = g.xyz1.distance(g.xyz2);
    let b = g.xyz2.distance(g.xyz3);
    let c = g.xyz3.distance(g.xyz1);
    let cos_alpha = if a > 0.0 && c > 0.0 {
        (a * a - b * b + c * c) / (2.0 * a * c)
    } else {
        0.0
    };
    let sin_alpha = (1.0 - cos_alpha * cos_alpha).max(0.0).sqrt();
    let uvs = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(a, 0.0),
        Vec2::new(c * cos_alpha, c * sin_alpha),
    ];

    let mut mesh = Mesh::new(positions, vec![0, 1, 2], None).with_uvs(uvs);
    mesh.compute_normals();
    Shape::at_origin(mesh)
}
