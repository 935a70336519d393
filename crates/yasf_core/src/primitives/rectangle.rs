use glam::{Vec2, Vec3};

use super::{grid_indices, Shape};
use crate::mesh::Mesh;
use crate::node::RectangleGeometry;

/// Subdivided rectangle in the XY plane facing +Z, centered between its corners.
pub fn build_rectangle(g: &RectangleGeometry) -> Shape {
    let size = (g.xy2 - g.xy1).abs();
    let center = (g.xy1 + g.xy2) * 0.5;
    let (gx, gy) = (g.parts_x.max(1), g.parts_y.max(1));

    let half = size * 0.5;
    let segment = Vec2::new(size.x / gx as f32, size.y / gy as f32);

    let mut positions = Vec::with_capacity((gx as usize + 1) * (gy as usize + 1));
    let mut uvs = Vec::with_capacity(positions.capacity());

    for iy in 0..=gy {
        let y = iy as f32 * segment.y - half.y;
        for ix in 0..=gx {
            let x = ix as f32 * segment.x - half.x;
            positions.push(Vec3::new(x, -y, 0.0));
            uvs.push(Vec2::new(ix as f32 / gx as f32, 1.0 - iy as f32 / gy as f32));
        }
    }

    let mut indices = Vec::with_capacity(gx as usize * gy as usize * 6);
    grid_indices(0, gx, gy, &mut indices);

    let normals = vec![Vec3::Z; positions.len()];
    Shape {
        mesh: Mesh::new(positions, indices, Some(normals)).with_uvs(uvs),
        offset: center.extend(0.0),
    }
}
