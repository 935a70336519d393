use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use super::Shape;
use crate::mesh::Mesh;
use crate::node::SphereGeometry;

/// UV sphere (or sphere section) around the origin.
///
/// `phi` sweeps around the Y axis over `slices`, `theta` runs from the +Y
/// pole downward over `stacks`. Degenerate pole triangles are skipped.
pub fn build_sphere(g: &SphereGeometry) -> Shape {
    let slices = g.slices.max(3);
    let stacks = g.stacks.max(2);
    let phi_start = g.phistart.to_radians();
    let phi_length = g.philength.to_radians();
    let theta_start = g.thetastart.to_radians();
    let theta_length = g.thetalength.to_radians();
    let theta_end = (theta_start + theta_length).min(PI);

    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut uvs = Vec::new();

    for iy in 0..=stacks {
        let v = iy as f32 / stacks as f32;

        // Center the texture seam on pole vertices.
        let u_offset = if iy == 0 && theta_start == 0.0 {
            0.5 / slices as f32
        } else if iy == stacks && theta_end >= PI {
            -0.5 / slices as f32
        } else {
            0.0
        };

        let theta = theta_start + v * theta_length;
        for ix in 0..=slices {
            let u = ix as f32 / slices as f32;
            let phi = phi_start + u * phi_length;

            let p = Vec3::new(
                -g.radius * phi.cos() * theta.sin(),
                g.radius * theta.cos(),
                g.radius * phi.sin() * theta.sin(),
            );
            positions.push(p);
            normals.push(p.try_normalize().unwrap_or(Vec3::Y));
            uvs.push(Vec2::new(u + u_offset, 1.0 - v));
        }
    }

    let stride = slices + 1;
    let mut indices = Vec::new();
    for iy in 0..stacks {
        for ix in 0..slices {
            let a = iy * stride + ix + 1;
            let b = iy * stride + ix;
            let c = (iy + 1) * stride + ix;
            let d = (iy + 1) * stride + ix + 1;

            if iy != 0 || theta_start > 0.0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != stacks - 1 || theta_end < PI {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    Shape::at_origin(Mesh::new(positions, indices, Some(normals)).with_uvs(uvs))
}
