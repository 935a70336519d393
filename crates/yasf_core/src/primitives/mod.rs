//! Primitive constructors.
//!
//! Each constructor is a pure function of its geometry payload and returns a
//! [`Shape`]: a mesh built around its own origin plus the offset at which it
//! sits inside the owning group.

mod cuboid;
mod cylinder;
mod light;
mod nurbs;
mod polygon;
mod rectangle;
mod sphere;
mod triangle;
mod video;

pub use cuboid::build_box;
pub use cylinder::{build_cylinder, cylinder_mesh, CylinderParams};
pub use light::{build_light, Light, LightKind};
pub use nurbs::{build_nurbs, control_grid};
pub use polygon::build_polygon;
pub use rectangle::build_rectangle;
pub use sphere::build_sphere;
pub use triangle::build_triangle;
pub use video::build_video_emitter;

use glam::Vec3;

use crate::error::GeometryError;
use crate::mesh::Mesh;
use crate::node::Geometry;

/// A constructed mesh and its position in the owning group.
#[derive(Clone, Debug)]
pub struct Shape {
    pub mesh: Mesh,
    pub offset: Vec3,
}

impl Shape {
    /// A shape sitting at the group origin.
    pub fn at_origin(mesh: Mesh) -> Self {
        Self {
            mesh,
            offset: Vec3::ZERO,
        }
    }
}

/// Build the mesh for a geometry payload.
///
/// Returns `None` for lights, which are built by [`build_light`].
pub fn build_shape(geometry: &Geometry) -> Option<Result<Shape, GeometryError>> {
    let vertices = vertex_estimate(geometry)?;
    if vertices > u64::from(u32::MAX) {
        return Some(Err(GeometryError::TooManyVertices {
            tag: geometry.tag(),
            vertices,
        }));
    }

    let shape = match geometry {
        Geometry::Rectangle(g) => build_rectangle(g),
        Geometry::Triangle(g) => build_triangle(g),
        Geometry::Box(g) => build_box(g),
        Geometry::Sphere(g) => build_sphere(g),
        Geometry::Cylinder(g) => build_cylinder(g),
        Geometry::Polygon(g) => build_polygon(g),
        Geometry::VideoEmitter(g) => build_video_emitter(g),
        Geometry::Nurbs(g) => return Some(build_nurbs(g)),
        Geometry::PointLight(_) | Geometry::DirectionalLight(_) | Geometry::SpotLight(_) => {
            return None
        }
    };
    Some(Ok(shape))
}

/// Vertices a builder will emit for `geometry`, saturating on overflow.
///
/// Uses the same segment clamps as the builders.
fn vertex_estimate(geometry: &Geometry) -> Option<u64> {
    let grid = |cols: u32, rows: u32| (u64::from(cols) + 1).saturating_mul(u64::from(rows) + 1);
    let cylinder = |slices: u32, stacks: u32| {
        let radial = slices.max(3);
        grid(radial, stacks.max(1)).saturating_add(2 * (u64::from(radial) + 2))
    };

    let count = match geometry {
        Geometry::Rectangle(g) => grid(g.parts_x.max(1), g.parts_y.max(1)),
        Geometry::Triangle(_) => 3,
        Geometry::Box(g) => {
            let (sx, sy, sz) = (g.parts_x.max(1), g.parts_y.max(1), g.parts_z.max(1));
            grid(sx, sy)
                .saturating_add(grid(sz, sy))
                .saturating_add(grid(sx, sz))
                .saturating_mul(2)
        }
        Geometry::Sphere(g) => grid(g.slices.max(3), g.stacks.max(2)),
        Geometry::Cylinder(g) => cylinder(g.slices, g.stacks),
        Geometry::VideoEmitter(g) => cylinder(g.slices, g.stacks),
        Geometry::Polygon(g) => {
            u64::from(g.slices.max(3)).saturating_mul(u64::from(g.stacks.max(1))) + 1
        }
        Geometry::Nurbs(g) => grid(g.parts_u, g.parts_v),
        Geometry::PointLight(_) | Geometry::DirectionalLight(_) | Geometry::SpotLight(_) => {
            return None
        }
    };
    Some(count)
}

/// Index a regular `(cols + 1) x (rows + 1)` vertex grid as two triangles per cell.
///
/// Vertex `(col, row)` lives at `start + row * (cols + 1) + col`.
pub(crate) fn grid_indices(start: u32, cols: u32, rows: u32, indices: &mut Vec<u32>) {
    let stride = cols + 1;
    for row in 0..rows {
        for col in 0..cols {
            let a = start + row * stride + col;
            let b = start + (row + 1) * stride + col;
            let c = start + (row + 1) * stride + col + 1;
            let d = start + row * stride + col + 1;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{PolygonGeometry, RectangleGeometry};
    use yasf_math::Rgba;

    fn rosette(slices: u32, stacks: u32) -> Geometry {
        Geometry::Polygon(PolygonGeometry {
            radius: 1.0,
            stacks,
            slices,
            color_c: Rgba::WHITE,
            color_p: Rgba::WHITE,
        })
    }

    #[test]
    fn test_oversized_polygon_is_rejected() {
        let error = build_shape(&rosette(70_000, 70_000)).unwrap().unwrap_err();
        assert_eq!(
            error,
            GeometryError::TooManyVertices {
                tag: "polygon",
                vertices: 70_000 * 70_000 + 1,
            }
        );
    }

    #[test]
    fn test_estimate_matches_built_vertex_count() {
        let shape = build_shape(&rosette(5, 3)).unwrap().unwrap();
        assert_eq!(shape.mesh.vertex_count() as u64, vertex_estimate(&rosette(5, 3)).unwrap());

        let rectangle = Geometry::Rectangle(RectangleGeometry {
            xy1: glam::Vec2::ZERO,
            xy2: glam::Vec2::ONE,
            parts_x: 4,
            parts_y: 2,
        });
        let shape = build_shape(&rectangle).unwrap().unwrap();
        assert_eq!(shape.mesh.vertex_count() as u64, vertex_estimate(&rectangle).unwrap());
    }
}
