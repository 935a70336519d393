use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use yasf_math::Rgba;

use super::Shape;
use crate::mesh::Mesh;
use crate::node::PolygonGeometry;

/// Flat, vertex-colored rosette in the XY plane.
///
/// Vertex 0 is the apex at the origin. Ring `r` (1-based) slice `s` lives at
/// `1 + (r - 1) * slices + s`, at radius `r / stacks * radius`, colored
/// between `color_c` and `color_p` by `r / stacks`.
///
/// The first ring is fanned to the apex facing +Z and the last ring is fanned
/// again facing -Z, so the outline reads from both sides. Each pair of
/// neighbouring rings is joined by two triangles per slice.
pub fn build_polygon(g: &PolygonGeometry) -> Shape {
    let slices = g.slices.max(3);
    let stacks = g.stacks.max(1);

    let vertex_count = 1 + slices as usize * stacks as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut colors = Vec::with_capacity(vertex_count);
    let mut uvs = Vec::with_capacity(vertex_count);

    positions.push(Vec3::ZERO);
    colors.push(g.color_c);
    uvs.push(Vec2::splat(0.5));

    for ring in 1..=stacks {
        let t = ring as f32 / stacks as f32;
        let radius = t * g.radius;
        let color: Rgba = g.color_c.lerp(g.color_p, t);

        for slice in 0..slices {
            let (sin, cos) = (slice as f32 / slices as f32 * TAU).sin_cos();
            positions.push(Vec3::new(radius * cos, radius * sin, 0.0));
            colors.push(color);
            uvs.push(Vec2::new(0.5 + 0.5 * t * cos, 0.5 + 0.5 * t * sin));
        }
    }

    let ring_vertex = |ring: u32, slice: u32| 1 + (ring - 1) * slices + slice % slices;

    let mut indices = Vec::with_capacity(6 * slices as usize * stacks as usize);
    for slice in 0..slices {
        indices.extend_from_slice(&[0, ring_vertex(1, slice), ring_vertex(1, slice + 1)]);
    }
    for ring in 1..stacks {
        for slice in 0..slices {
            let a = ring_vertex(ring, slice);
            let b = ring_vertex(ring, slice + 1);
            let c = ring_vertex(ring + 1, slice + 1);
            let d = ring_vertex(ring + 1, slice);
            indices.extend_from_slice(&[a, d, c, a, c, b]);
        }
    }
    for slice in 0..slices {
        indices.extend_from_slice(&[0, ring_vertex(stacks, slice + 1), ring_vertex(stacks, slice)]);
    }

    let normals = vec![Vec3::Z; positions.len()];
    let mesh = Mesh::new(positions, indices, Some(normals))
        .with_uvs(uvs)
        .with_colors(colors);
    Shape::at_origin(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rosette(slices: u32, stacks: u32) -> PolygonGeometry {
        PolygonGeometry {
            radius: 2.0,
            stacks,
            slices,
            color_c: Rgba::rgb(1.0, 0.0, 0.0),
            color_p: Rgba::rgb(0.0, 0.0, 1.0),
        }
    }

    #[test]
    fn test_counts_four_slices_two_stacks() {
        let mesh = build_polygon(&rosette(4, 2)).mesh;
        assert_eq!(mesh.vertex_count(), 9);
        assert_eq!(mesh.indices.len(), 3 * 4 * 2 * (2 - 1) + 3 * 4 * 2);
    }

    #[test]
    fn test_counts_general() {
        for (s, k) in [(3, 1), (5, 3), (12, 4)] {
            let mesh = build_polygon(&rosette(s, k)).mesh;
            assert_eq!(mesh.vertex_count(), (1 + s * k) as usize);
            assert_eq!(mesh.indices.len(), (3 * s * 2 * (k - 1) + 3 * s * 2) as usize);
        }
    }

    #[test]
    fn test_color_gradient() {
        let mesh = build_polygon(&rosette(4, 2)).mesh;
        let colors = mesh.colors.as_ref().unwrap();

        assert_eq!(colors[0], Rgba::rgb(1.0, 0.0, 0.0));
        // Ring 1 of 2 is halfway between center and perimeter.
        assert!((colors[1].r - 0.5).abs() < 1e-6);
        assert!((colors[1].b - 0.5).abs() < 1e-6);
        assert_eq!(colors[8], Rgba::rgb(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_ring_radii() {
        let mesh = build_polygon(&rosette(4, 2)).mesh;
        assert!((mesh.positions[1].length() - 1.0).abs() < 1e-5);
        assert!((mesh.positions[5].length() - 2.0).abs() < 1e-5);
        assert!(mesh.positions.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_fans_face_opposite_ways() {
        let mesh = build_polygon(&rosette(6, 3)).mesh;
        let face_z = |tri: &[u32]| {
            let [p0, p1, p2] = [0, 1, 2].map(|i| mesh.positions[tri[i] as usize]);
            (p1 - p0).cross(p2 - p0).z
        };

        let triangles: Vec<&[u32]> = mesh.indices.chunks_exact(3).collect();
        let (front, back) = triangles.split_at(triangles.len() - 6);
        assert!(front.iter().all(|t| face_z(t) > 0.0));
        assert!(back.iter().all(|t| face_z(t) < 0.0));
    }
}
