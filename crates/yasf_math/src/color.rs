//! Linear RGBA color.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::Vec4;

/// An RGBA color with components in [0, 1].
///
/// Deserializes from `{ "r": .., "g": .., "b": .., "a": .. }` where `a`
/// may be omitted and defaults to 1.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    #[serde(default)]
    pub r: f32,
    #[serde(default)]
    pub g: f32,
    #[serde(default)]
    pub b: f32,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::rgb(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation toward `other`; `t = 0` is `self`, `t = 1` is `other`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        Rgba::from(Vec4::from(self).lerp(Vec4::from(other), t))
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<Rgba> for Vec4 {
    fn from(c: Rgba) -> Self {
        Vec4::new(c.r, c.g, c.b, c.a)
    }
}

impl From<Vec4> for Rgba {
    fn from(v: Vec4) -> Self {
        Rgba::new(v.x, v.y, v.z, v.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        let a = Rgba::rgb(1.0, 0.0, 0.0);
        let b = Rgba::rgb(0.0, 0.0, 1.0);

        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);

        let mid = a.lerp(b, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.b - 0.5).abs() < 1e-6);
        assert_eq!(mid.a, 1.0);
    }

    #[test]
    fn test_alpha_defaults_to_opaque() {
        let c: Rgba = serde_json::from_str(r#"{"r": 0.2, "g": 0.4, "b": 0.6}"#).unwrap();
        assert_eq!(c.a, 1.0);
        assert!((c.g - 0.4).abs() < 1e-6);
    }
}
