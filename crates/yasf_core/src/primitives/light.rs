use glam::Vec3;
use yasf_math::Rgba;

use crate::node::Geometry;

/// Light-specific parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum LightKind {
    Point {
        distance: f32,
        decay: f32,
    },
    Spot {
        distance: f32,
        decay: f32,
        /// Cone half-angle in radians.
        angle: f32,
        penumbra: f32,
        target: Vec3,
    },
    Directional {
        /// Orthographic shadow frustum.
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
    },
}

/// A light source positioned inside its owning group.
#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Rgba,
    pub intensity: f32,
    pub position: Vec3,
    pub enabled: bool,
    pub cast_shadow: bool,
    pub shadow_far: f32,
    pub shadow_map_size: u32,
}

impl Light {
    /// Direction from the light toward its target, for spot and directional lights.
    pub fn direction(&self) -> Option<Vec3> {
        let target = match self.kind {
            LightKind::Spot { target, .. } => target,
            LightKind::Directional { .. } => Vec3::ZERO,
            LightKind::Point { .. } => return None,
        };
        (target - self.position).try_normalize()
    }
}

/// Build a light from a light geometry payload; `None` for mesh geometry.
///
/// Disabled lights are built too, callers check [`Light::enabled`].
pub fn build_light(geometry: &Geometry) -> Option<Light> {
    let light = match geometry {
        Geometry::PointLight(d) => Light {
            kind: LightKind::Point {
                distance: d.distance,
                decay: d.decay,
            },
            color: d.color,
            intensity: d.intensity,
            position: d.position,
            enabled: d.enabled,
            cast_shadow: d.castshadow,
            shadow_far: d.shadowfar,
            shadow_map_size: d.shadowmapsize,
        },
        Geometry::SpotLight(d) => Light {
            kind: LightKind::Spot {
                distance: d.distance,
                decay: d.decay,
                angle: d.angle.to_radians(),
                penumbra: d.penumbra,
                target: d.target,
            },
            color: d.color,
            intensity: d.intensity,
            position: d.position,
            enabled: d.enabled,
            cast_shadow: d.castshadow,
            shadow_far: d.shadowfar,
            shadow_map_size: d.shadowmapsize,
        },
        Geometry::DirectionalLight(d) => Light {
            kind: LightKind::Directional {
                left: d.shadowleft,
                right: d.shadowright,
                bottom: d.shadowbottom,
                top: d.shadowtop,
            },
            color: d.color,
            intensity: d.intensity,
            position: d.position,
            enabled: d.enabled,
            cast_shadow: d.castshadow,
            shadow_far: d.shadowfar,
            shadow_map_size: d.shadowmapsize,
        },
        _ => return None,
    };
    Some(light)
}
