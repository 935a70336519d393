//! Globals and camera descriptors.
//!
//! These are parsed and handed to the renderer as-is; the interpreter does
//! not place cameras or fog in the scene tree.

use glam::Vec3;
use serde::Deserialize;
use serde_json::{Map, Value};
use yasf_math::Rgba;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::document::serde_vec;

/// Scene-wide settings from the `globals` section.
#[derive(Clone, Debug, Deserialize)]
pub struct Globals {
    #[serde(default = "default_background")]
    pub background: Rgba,

    #[serde(default = "default_ambient")]
    pub ambient: Rgba,

    #[serde(default)]
    pub fog: Option<Fog>,

    #[serde(default)]
    pub skybox: Option<Skybox>,
}

fn default_background() -> Rgba {
    Rgba::BLACK
}

fn default_ambient() -> Rgba {
    Rgba::rgb(0.2, 0.2, 0.2)
}

impl Default for Globals {
    fn default() -> Self {
        Self {
            background: default_background(),
            ambient: default_ambient(),
            fog: None,
            skybox: None,
        }
    }
}

impl Globals {
    /// Parse the globals section; a malformed section falls back to defaults.
    pub fn from_section(section: &Map<String, Value>, diagnostics: &mut Diagnostics) -> Self {
        match Globals::deserialize(&Value::Object(section.clone())) {
            Ok(globals) => globals,
            Err(e) => {
                diagnostics.push(Diagnostic::Malformed {
                    section: "globals",
                    id: "globals".to_string(),
                    message: e.to_string(),
                });
                Self::default()
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Fog {
    pub color: Rgba,
    pub near: f32,
    pub far: f32,
}

/// Six-sided sky cube. Face entries are texture file paths.
#[derive(Clone, Debug, Deserialize)]
pub struct Skybox {
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub size: Vec3,
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub center: Vec3,
    #[serde(default = "default_emissive")]
    pub emissive: Rgba,
    #[serde(default = "default_one")]
    pub intensity: f32,
    pub front: String,
    pub back: String,
    pub up: String,
    pub down: String,
    pub left: String,
    pub right: String,
}

fn default_emissive() -> Rgba {
    Rgba::WHITE
}

fn default_one() -> f32 {
    1.0
}

/// A camera declaration.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Camera {
    Perspective {
        /// Vertical field of view in degrees.
        angle: f32,
        near: f32,
        far: f32,
        #[serde(deserialize_with = "serde_vec::xyz")]
        location: Vec3,
        #[serde(deserialize_with = "serde_vec::xyz")]
        target: Vec3,
    },
    Orthogonal {
        near: f32,
        far: f32,
        #[serde(deserialize_with = "serde_vec::xyz")]
        location: Vec3,
        #[serde(deserialize_with = "serde_vec::xyz")]
        target: Vec3,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
    },
}

impl Camera {
    pub fn location(&self) -> Vec3 {
        match self {
            Camera::Perspective { location, .. } | Camera::Orthogonal { location, .. } => *location,
        }
    }

    pub fn target(&self) -> Vec3 {
        match self {
            Camera::Perspective { target, .. } | Camera::Orthogonal { target, .. } => *target,
        }
    }
}

/// All cameras of a document and the id of the initial one.
#[derive(Clone, Debug, Default)]
pub struct CameraSet {
    pub initial: Option<String>,
    pub cameras: Vec<(String, Camera)>,
}

impl CameraSet {
    /// Parse the cameras section. Entries that fail to parse are skipped.
    pub fn from_section(section: &Map<String, Value>, diagnostics: &mut Diagnostics) -> Self {
        let mut set = CameraSet::default();

        for (id, value) in section {
            if id == "initial" {
                set.initial = value.as_str().map(str::to_string);
                continue;
            }
            match Camera::deserialize(value) {
                Ok(camera) => set.cameras.push((id.clone(), camera)),
                Err(e) => diagnostics.push(Diagnostic::Malformed {
                    section: "cameras",
                    id: id.clone(),
                    message: e.to_string(),
                }),
            }
        }

        if let Some(initial) = &set.initial {
            if set.get(initial).is_none() {
                log::warn!("Initial camera '{}' is not defined", initial);
            }
        }

        set
    }

    pub fn get(&self, id: &str) -> Option<&Camera> {
        self.cameras.iter().find(|(cid, _)| cid == id).map(|(_, c)| c)
    }

    /// The initial camera, or the first declared one.
    pub fn initial_camera(&self) -> Option<&Camera> {
        self.initial
            .as_deref()
            .and_then(|id| self.get(id))
            .or_else(|| self.cameras.first().map(|(_, c)| c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn section(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_globals_defaults_and_fog() {
        let mut diagnostics = Diagnostics::new();
        let globals = Globals::from_section(
            &section(json!({
                "background": { "r": 0.1, "g": 0.2, "b": 0.3 },
                "fog": { "color": { "r": 1, "g": 1, "b": 1 }, "near": 5, "far": 50 }
            })),
            &mut diagnostics,
        );

        assert!(diagnostics.is_empty());
        assert!((globals.background.b - 0.3).abs() < 1e-6);
        assert!((globals.ambient.r - 0.2).abs() < 1e-6);
        let fog = globals.fog.unwrap();
        assert_eq!(fog.far, 50.0);
    }

    #[test]
    fn test_cameras_initial_and_malformed_entry() {
        let mut diagnostics = Diagnostics::new();
        let set = CameraSet::from_section(
            &section(json!({
                "initial": "top",
                "front": {
                    "type": "perspective", "angle": 60, "near": 0.1, "far": 1000,
                    "location": { "x": 0, "y": 5, "z": 10 }, "target": { "x": 0, "y": 0, "z": 0 }
                },
                "top": {
                    "type": "orthogonal", "near": 0.1, "far": 100,
                    "location": { "x": 0, "y": 20, "z": 0 }, "target": { "x": 0, "y": 0, "z": 0 },
                    "left": -10, "right": 10, "bottom": -10, "top": 10
                },
                "broken": { "type": "fisheye" }
            })),
            &mut diagnostics,
        );

        assert_eq!(set.cameras.len(), 2);
        assert_eq!(diagnostics.len(), 1);
        let initial = set.initial_camera().unwrap();
        assert!(matches!(initial, Camera::Orthogonal { .. }));
        assert_eq!(initial.location(), Vec3::new(0.0, 20.0, 0.0));
    }
}
