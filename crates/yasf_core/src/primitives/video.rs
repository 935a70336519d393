use glam::Vec2;
use yasf_math::Rgba;

use super::{cylinder_mesh, CylinderParams, Shape};
use crate::node::VideoEmitterGeometry;

/// Open cone with its apex on top, carrying a video texture.
///
/// UVs are flipped vertically so frames appear upright. Vertex alpha starts
/// at `fade_start` at the apex and reaches 0 at the base.
pub fn build_video_emitter(g: &VideoEmitterGeometry) -> Shape {
    let mesh = cylinder_mesh(&CylinderParams {
        radius_top: 0.0,
        radius_bottom: g.radius,
        height: g.height,
        radial_segments: g.slices,
        height_segments: g.stacks,
        open_ended: true,
        theta_start: 0.0,
        theta_length: std::f32::consts::TAU,
    });

    let uvs: Vec<Vec2> = mesh
        .uvs
        .iter()
        .flatten()
        .map(|uv| Vec2::new(uv.x, 1.0 - uv.y))
        .collect();

    // After the flip, v is 0 at the apex and 1 at the base.
    let colors = uvs
        .iter()
        .map(|uv| Rgba::WHITE.with_alpha((g.fade_start * (1.0 - uv.y)).clamp(0.0, 1.0)))
        .collect();

    Shape::at_origin(mesh.with_uvs(uvs).with_colors(colors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter() -> VideoEmitterGeometry {
        VideoEmitterGeometry {
            textureref: "screen".to_string(),
            radius: 1.5,
            height: 3.0,
            slices: 8,
            stacks: 2,
            fade_start: 1.0,
        }
    }

    #[test]
    fn test_open_cone() {
        let mesh = build_video_emitter(&emitter()).mesh;
        assert_eq!(mesh.vertex_count(), 9 * 3);

        let apex = mesh.positions[0];
        assert!(apex.x.abs() < 1e-6 && apex.z.abs() < 1e-6);
        assert!((apex.y - 1.5).abs() < 1e-6);
        assert!((mesh.bounds.max.x - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_uvs_flipped() {
        let mesh = build_video_emitter(&emitter()).mesh;
        let uvs = mesh.uvs.as_ref().unwrap();
        assert_eq!(uvs[0].y, 0.0);
        assert_eq!(uvs[26].y, 1.0);
    }

    #[test]
    fn test_alpha_fades_toward_base() {
        let mut g = emitter();
        g.fade_start = 0.8;
        let mesh = build_video_emitter(&g).mesh;
        let colors = mesh.colors.as_ref().unwrap();

        assert!((colors[0].a - 0.8).abs() < 1e-6);
        assert!((colors[9].a - 0.4).abs() < 1e-6);
        assert_eq!(colors[26].a, 0.0);
        assert!(colors.iter().all(|c| c.r == 1.0 && c.g == 1.0 && c.b == 1.0));
    }
}
