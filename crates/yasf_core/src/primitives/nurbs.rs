use glam::{Vec2, Vec3};

use super::{grid_indices, Shape};
use crate::error::GeometryError;
use crate::mesh::Mesh;
use crate::node::NurbsGeometry;
use crate::nurbs::NurbsSurface;

/// Reshape the flat control point list into a `(degree_u + 1) x (degree_v + 1)`
/// row-major grid.
pub fn control_grid(g: &NurbsGeometry) -> Result<Vec<Vec<Vec3>>, GeometryError> {
    let rows = g.degree_u as usize + 1;
    let cols = g.degree_v as usize + 1;
    let expected = rows * cols;

    if g.controlpoints.len() != expected {
        return Err(GeometryError::ControlPointCount {
            degree_u: g.degree_u as usize,
            degree_v: g.degree_v as usize,
            expected,
            actual: g.controlpoints.len(),
        });
    }

    Ok(g.controlpoints.chunks_exact(cols).map(<[Vec3]>::to_vec).collect())
}

/// Sample a single-patch surface on a `(parts_u + 1) x (parts_v + 1)` grid.
///
/// Columns of the vertex grid follow `u`, rows follow `v`.
pub fn build_nurbs(g: &NurbsGeometry) -> Result<Shape, GeometryError> {
    if g.parts_u == 0 {
        return Err(GeometryError::NoSamples { axis: 'u' });
    }
    if g.parts_v == 0 {
        return Err(GeometryError::NoSamples { axis: 'v' });
    }

    let grid = control_grid(g)?;
    let surface = NurbsSurface::bezier_patch(g.degree_u as usize, g.degree_v as usize, grid)
        .ok_or(GeometryError::ControlPointCount {
            degree_u: g.degree_u as usize,
            degree_v: g.degree_v as usize,
            expected: (g.degree_u as usize + 1) * (g.degree_v as usize + 1),
            actual: g.controlpoints.len(),
        })?;

    let mut positions = Vec::new();
    let mut uvs = Vec::new();
    for j in 0..=g.parts_v {
        let v = j as f32 / g.parts_v as f32;
        for i in 0..=g.parts_u {
            let u = i as f32 / g.parts_u as f32;
            positions.push(surface.evaluate(u, v));
            uvs.push(Vec2::new(u, v));
        }
    }

    let mut indices = Vec::new();
    grid_indices(0, g.parts_u, g.parts_v, &mut indices);

    let mut mesh = Mesh::new(positions, indices, None).with_uvs(uvs);
    mesh.compute_normals();
    Ok(Shape::at_origin(mesh))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bilinear() -> NurbsGeometry {
        NurbsGeometry {
            degree_u: 1,
            degree_v: 1,
            parts_u: 4,
            parts_v: 2,
            controlpoints: vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
            ],
        }
    }

    #[test]
    fn test_control_grid_shape() {
        let grid = control_grid(&bilinear()).unwrap();
        assert_eq!(grid.len(), 2);
        assert!(grid.iter().all(|row| row.len() == 2));
        assert_eq!(grid[1][0], Vec3::new(1.0, -1.0, 0.0));
    }

    #[test]
    fn test_single_patch_evaluates_first_point_at_origin() {
        let g = bilinear();
        let surface = NurbsSurface::bezier_patch(1, 1, control_grid(&g).unwrap()).unwrap();

        assert_eq!(surface.knots_u(), &[0.0, 0.0, 1.0, 1.0]);
        assert_eq!(surface.knots_v(), &[0.0, 0.0, 1.0, 1.0]);
        assert!((surface.evaluate(0.0, 0.0) - g.controlpoints[0]).length() < 1e-6);
    }

    #[test]
    fn test_sample_grid() {
        let mesh = build_nurbs(&bilinear()).unwrap().mesh;
        assert_eq!(mesh.vertex_count(), 5 * 3);
        assert_eq!(mesh.triangle_count(), 4 * 2 * 2);

        // Flat patch in z = 0: every normal is along the z axis.
        let normals = mesh.normals.as_ref().unwrap();
        assert!(normals.iter().all(|n| n.z.abs() > 0.999));
    }

    #[test]
    fn test_wrong_control_point_count() {
        let mut g = bilinear();
        g.controlpoints.pop();

        let err = build_nurbs(&g).unwrap_err();
        assert_eq!(
            err,
            GeometryError::ControlPointCount {
                degree_u: 1,
                degree_v: 1,
                expected: 4,
                actual: 3,
            }
        );
    }

    #[test]
    fn test_zero_parts() {
        let mut g = bilinear();
        g.parts_v = 0;
        assert_eq!(build_nurbs(&g).unwrap_err(), GeometryError::NoSamples { axis: 'v' });
    }
}
