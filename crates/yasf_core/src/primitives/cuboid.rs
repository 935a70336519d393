use glam::{Vec2, Vec3};

use super::{grid_indices, Shape};
use crate::mesh::Mesh;
use crate::node::BoxGeometry;

/// One face of the box: a grid on the plane spanned by axes `u` and `v`,
/// offset along `w`.
struct Face {
    u: usize,
    v: usize,
    w: usize,
    u_dir: f32,
    v_dir: f32,
    width: f32,
    height: f32,
    depth: f32,
    grid_x: u32,
    grid_y: u32,
}

/// Axis-aligned box between two corners with per-axis subdivisions,
/// centered between its corners.
pub fn build_box(g: &BoxGeometry) -> Shape {
    let size = (g.xyz2 - g.xyz1).abs();
    let center = (g.xyz1 + g.xyz2) * 0.5;
    let (sx, sy, sz) = (g.parts_x.max(1), g.parts_y.max(1), g.parts_z.max(1));
    let (w, h, d) = (size.x, size.y, size.z);

    #[rustfmt::skip]
    let faces = [
        Face { u: 2, v: 1, w: 0, u_dir: -1.0, v_dir: -1.0, width: d, height: h, depth:  w, grid_x: sz, grid_y: sy }, // +x
        Face { u: 2, v: 1, w: 0, u_dir:  1.0, v_dir: -1.0, width: d, height: h, depth: -w, grid_x: sz, grid_y: sy }, // -x
        Face { u: 0, v: 2, w: 1, u_dir:  1.0, v_dir:  1.0, width: w, height: d, depth:  h, grid_x: sx, grid_y: sz }, // +y
        Face { u: 0, v: 2, w: 1, u_dir:  1.0, v_dir: -1.0, width: w, height: d, depth: -h, grid_x: sx, grid_y: sz }, // -y
        Face { u: 0, v: 1, w: 2, u_dir:  1.0, v_dir: -1.0, width: w, height: h, depth:  d, grid_x: sx, grid_y: sy }, // +z
        Face { u: 0, v: 1, w: 2, u_dir: -1.0, v_dir: -1.0, width: w, height: h, depth: -d, grid_x: sx, grid_y: sy }, // -z
    ];

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    for face in &faces {
        let start = positions.len() as u32;
        let segment_w = face.width / face.grid_x as f32;
        let segment_h = face.height / face.grid_y as f32;
        let half_w = face.width * 0.5;
        let half_h = face.height * 0.5;

        let mut normal = Vec3::ZERO;
        normal[face.w] = if face.depth > 0.0 { 1.0 } else { -1.0 };

        for iy in 0..=face.grid_y {
            let y = iy as f32 * segment_h - half_h;
            for ix in 0..=face.grid_x {
                let x = ix as f32 * segment_w - half_w;

                let mut p = Vec3::ZERO;
                p[face.u] = x * face.u_dir;
                p[face.v] = y * face.v_dir;
                p[face.w] = face.depth * 0.5;

                positions.push(p);
                normals.push(normal);
                uvs.push(Vec2::new(
                    ix as f32 / face.grid_x as f32,
                    1.0 - iy as f32 / face.grid_y as f32,
                ));
            }
        }

        grid_indices(start, face.grid_x, face.grid_y, &mut indices);
    }

    Shape {
        mesh: Mesh::new(positions, indices, Some(normals)).with_uvs(uvs),
        offset: center,
    }
}
