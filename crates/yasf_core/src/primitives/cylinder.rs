use glam::{Vec2, Vec3};

use super::{grid_indices, Shape};
use crate::mesh::Mesh;
use crate::node::CylinderGeometry;

/// Parameters of a cylinder or cone frustum along the Y axis, angles in radians.
#[derive(Clone, Copy, Debug)]
pub struct CylinderParams {
    pub radius_top: f32,
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    pub open_ended: bool,
    pub theta_start: f32,
    pub theta_length: f32,
}

/// Cylinder node: `base`/`top` radii, centered on the origin along Y.
pub fn build_cylinder(g: &CylinderGeometry) -> Shape {
    Shape::at_origin(cylinder_mesh(&CylinderParams {
        radius_top: g.top,
        radius_bottom: g.base,
        height: g.height,
        radial_segments: g.slices,
        height_segments: g.stacks,
        open_ended: g.open_ended(),
        theta_start: g.thetastart.to_radians(),
        theta_length: g.thetalength.to_radians(),
    }))
}

/// Build the side wall and, unless open-ended, a cap for each non-zero radius.
///
/// The wall's UV `v` runs from 1 at the top to 0 at the bottom.
pub fn cylinder_mesh(p: &CylinderParams) -> Mesh {
    let radial = p.radial_segments.max(3);
    let rows = p.height_segments.max(1);
    let half_height = p.height * 0.5;
    let slope = if p.height != 0.0 {
        (p.radius_bottom - p.radius_top) / p.height
    } else {
        0.0
    };

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();
    let mut indices = Vec::new();

    // Wall: rows go top to bottom, columns sweep theta.
    for y in 0..=rows {
        let v = y as f32 / rows as f32;
        let radius = v * (p.radius_bottom - p.radius_top) + p.radius_top;

        for x in 0..=radial {
            let u = x as f32 / radial as f32;
            let theta = u * p.theta_length + p.theta_start;
            let (sin, cos) = theta.sin_cos();

            positions.push(Vec3::new(radius * sin, -v * p.height + half_height, radius * cos));
            normals.push(Vec3::new(sin, slope, cos).normalize_or_zero());
            uvs.push(Vec2::new(u, 1.0 - v));
        }
    }
    grid_indices(0, radial, rows, &mut indices);

    if !p.open_ended {
        if p.radius_top > 0.0 {
            push_cap(p, radial, true, &mut positions, &mut normals, &mut uvs, &mut indices);
        }
        if p.radius_bottom > 0.0 {
            push_cap(p, radial, false, &mut positions, &mut normals, &mut uvs, &mut indices);
        }
    }

    Mesh::new(positions, indices, Some(normals)).with_uvs(uvs)
}

fn push_cap(
    p: &CylinderParams,
    radial: u32,
    top: bool,
    positions: &mut Vec<Vec3>,
    normals: &mut Vec<Vec3>,
    uvs: &mut Vec<Vec2>,
    indices: &mut Vec<u32>,
) {
    let radius = if top { p.radius_top } else { p.radius_bottom };
    let sign = if top { 1.0 } else { -1.0 };
    let y = p.height * 0.5 * sign;
    let normal = Vec3::new(0.0, sign, 0.0);

    let center = positions.len() as u32;
    positions.push(Vec3::new(0.0, y, 0.0));
    normals.push(normal);
    uvs.push(Vec2::splat(0.5));

    let rim = positions.len() as u32;
    for x in 0..=radial {
        let u = x as f32 / radial as f32;
        let theta = u * p.theta_length + p.theta_start;
        let (sin, cos) = theta.sin_cos();

        positions.push(Vec3::new(radius * sin, y, radius * cos));
        normals.push(normal);
        uvs.push(Vec2::new(cos * 0.5 + 0.5, sin * 0.5 * sign + 0.5));
    }

    for x in 0..radial {
        let i = rim + x;
        if top {
            indices.extend_from_slice(&[i, i + 1, center]);
        } else {
            indices.extend_from_slice(&[i + 1, i, center]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cylinder(capsclose: bool) -> CylinderGeometry {
        CylinderGeometry {
            base: 1.0,
            top: 0.5,
            height: 2.0,
            slices: 8,
            stacks: 2,
            capsclose,
            thetastart: 0.0,
            thetalength: 360.0,
        }
    }

    #[test]
    fn test_closed_cylinder_counts() {
        let mesh = build_cylinder(&cylinder(false)).mesh;

        // Wall 9x3 grid, plus center + 9 rim vertices per cap.
        assert_eq!(mesh.vertex_count(), 27 + 2 * 10);
        assert_eq!(mesh.triangle_count(), 8 * 2 * 2 + 2 * 8);
    }

    #[test]
    fn test_capsclose_true_gives_open_cylinder() {
        let mesh = build_cylinder(&cylinder(true)).mesh;
        assert_eq!(mesh.vertex_count(), 27);
        assert_eq!(mesh.triangle_count(), 32);
    }

    #[test]
    fn test_radii_and_height() {
        let mesh = build_cylinder(&cylinder(true)).mesh;

        let top = mesh.positions[0];
        assert!((top.y - 1.0).abs() < 1e-5);
        assert!((Vec2::new(top.x, top.z).length() - 0.5).abs() < 1e-5);

        let bottom = mesh.positions[26];
        assert!((bottom.y + 1.0).abs() < 1e-5);
        assert!((Vec2::new(bottom.x, bottom.z).length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_faces_point_outward() {
        let mesh = build_cylinder(&cylinder(false)).mesh;
        for tri in mesh.indices.chunks_exact(3) {
            let [p0, p1, p2] = [0, 1, 2].map(|i| mesh.positions[tri[i] as usize]);
            let face_normal = (p1 - p0).cross(p2 - p0);
            let centroid = (p0 + p1 + p2) / 3.0;
            assert!(face_normal.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_cone_has_single_cap() {
        let mut g = cylinder(false);
        g.top = 0.0;
        let mesh = build_cylinder(&g).mesh;
        assert_eq!(mesh.vertex_count(), 27 + 10);
    }
}
