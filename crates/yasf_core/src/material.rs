//! Material Table.
//!
//! Materials are resolved once from the `materials` section, with their
//! texture references bound to handles from the [`TextureTable`]. The
//! instantiator then shares them read-only as `Arc<Material>`.

use std::collections::HashMap;
use std::sync::Arc;

use glam::Vec2;
use serde::Deserialize;
use serde_json::{Map, Value};
use yasf_math::Rgba;

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::texture::{TextureHandle, TextureTable};

/// Surface shading mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shading {
    #[default]
    Smooth,
    Flat,
    /// Unlit: color only, no light response.
    None,
}

impl Shading {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "smooth" => Some(Shading::Smooth),
            "flat" => Some(Shading::Flat),
            "none" => Some(Shading::None),
            _ => None,
        }
    }
}

/// Which faces are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Side {
    #[default]
    Front,
    Double,
}

/// A texture bound to a material slot.
#[derive(Clone, Debug)]
pub struct TextureBinding {
    pub texture: TextureHandle,

    /// Texture repeat per world unit (1 / texlength on each axis).
    pub repeat: Vec2,
}

/// A fully resolved material.
#[derive(Clone, Debug)]
pub struct Material {
    /// Lowercased material id
    pub name: String,

    /// Diffuse color; alpha is the declared opacity channel
    pub color: Rgba,

    pub specular: Rgba,

    pub emissive: Rgba,

    pub shininess: f32,

    pub transparent: bool,

    /// Opacity (0=transparent, 1=opaque)
    pub opacity: f32,

    pub wireframe: bool,

    pub shading: Shading,

    pub side: Side,

    /// Diffuse/albedo texture
    pub texture: Option<TextureBinding>,

    /// Bump map texture
    pub bump_map: Option<TextureHandle>,

    pub bump_scale: f32,

    /// Specular map texture
    pub specular_map: Option<TextureHandle>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: Rgba::rgb(0.5, 0.5, 0.5), // Grey default
            specular: Rgba::BLACK,
            emissive: Rgba::BLACK,
            shininess: 30.0,
            transparent: false,
            opacity: 1.0,
            wireframe: false,
            shading: Shading::Smooth,
            side: Side::Front,
            texture: None,
            bump_map: None,
            bump_scale: 1.0,
            specular_map: None,
        }
    }
}

impl Material {
    /// Create a new material with just a name and color.
    pub fn new(name: impl Into<String>, color: Rgba) -> Self {
        Self {
            name: name.into(),
            color,
            ..Default::default()
        }
    }

    /// Check if this material uses any textures.
    pub fn has_textures(&self) -> bool {
        self.texture.is_some() || self.bump_map.is_some() || self.specular_map.is_some()
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emissive.r > 0.0 || self.emissive.g > 0.0 || self.emissive.b > 0.0
    }
}

/// A material declaration from the `materials` section.
#[derive(Clone, Debug, Deserialize)]
pub struct MaterialDecl {
    pub color: Rgba,
    #[serde(default = "black")]
    pub specular: Rgba,
    #[serde(default = "black")]
    pub emissive: Rgba,
    #[serde(default = "default_shininess")]
    pub shininess: f32,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default = "one")]
    pub opacity: f32,
    #[serde(default)]
    pub wireframe: bool,
    #[serde(default)]
    pub shading: Option<String>,
    #[serde(default)]
    pub textureref: Option<String>,
    #[serde(default = "one")]
    pub texlength_s: f32,
    #[serde(default = "one")]
    pub texlength_t: f32,
    #[serde(default)]
    pub twosided: bool,
    #[serde(default)]
    pub bumpref: Option<String>,
    #[serde(default = "one")]
    pub bumpscale: f32,
    #[serde(default)]
    pub specularref: Option<String>,
}

fn black() -> Rgba {
    Rgba::BLACK
}

fn one() -> f32 {
    1.0
}

fn default_shininess() -> f32 {
    30.0
}

/// Lowercase id to resolved material.
#[derive(Clone, Debug, Default)]
pub struct MaterialTable {
    materials: HashMap<String, Arc<Material>>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from the `materials` section.
    ///
    /// Unknown texture references leave that slot empty; malformed entries are skipped.
    pub fn from_section(
        section: &Map<String, Value>,
        textures: &TextureTable,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut table = MaterialTable::new();

        for (id, value) in section {
            match MaterialDecl::deserialize(value) {
                Ok(decl) => {
                    let material = resolve_material(id, &decl, textures, diagnostics);
                    table.insert(material);
                }
                Err(e) => diagnostics.push(Diagnostic::Malformed {
                    section: "materials",
                    id: id.clone(),
                    message: e.to_string(),
                }),
            }
        }

        log::debug!("Resolved {} materials", table.len());
        table
    }

    /// Add a material under its lowercased name.
    pub fn insert(&mut self, mut material: Material) -> Arc<Material> {
        material.name = material.name.to_lowercase();
        let material = Arc::new(material);
        self.materials
            .insert(material.name.clone(), material.clone());
        material
    }

    /// Look up a material by lowercase id.
    pub fn lookup(&self, id: &str) -> Option<Arc<Material>> {
        self.materials.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

fn resolve_material(
    id: &str,
    decl: &MaterialDecl,
    textures: &TextureTable,
    diagnostics: &mut Diagnostics,
) -> Material {
    let mut texture_ref = |reference: &Option<String>| -> Option<TextureHandle> {
        let reference = reference.as_ref()?.to_lowercase();
        let handle = textures.lookup(&reference);
        if handle.is_none() {
            diagnostics.push(Diagnostic::UnknownTexture {
                owner: id.to_string(),
                texture: reference,
            });
        }
        handle
    };

    let texture = texture_ref(&decl.textureref).map(|texture| TextureBinding {
        texture,
        repeat: Vec2::new(1.0 / decl.texlength_s, 1.0 / decl.texlength_t),
    });
    let bump_map = texture_ref(&decl.bumpref);
    let specular_map = texture_ref(&decl.specularref);

    let shading = match decl.shading.as_deref() {
        None => Shading::default(),
        Some(s) => Shading::parse(s).unwrap_or_else(|| {
            log::warn!("Material '{}': unknown shading '{}', using smooth", id, s);
            Shading::default()
        }),
    };

    Material {
        name: id.to_lowercase(),
        color: decl.color,
        specular: decl.specular,
        emissive: decl.emissive,
        shininess: decl.shininess,
        transparent: decl.transparent,
        opacity: decl.opacity,
        wireframe: decl.wireframe,
        shading,
        side: if decl.twosided { Side::Double } else { Side::Front },
        texture,
        bump_map,
        bump_scale: decl.bumpscale,
        specular_map,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::TextureSource;
    use serde_json::json;

    fn section(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_material_defaults() {
        let material = Material::default();
        assert!(!material.has_textures());
        assert!(!material.is_emissive());
        assert_eq!(material.side, Side::Front);
    }

    #[test]
    fn test_table_resolves_textures_and_lowercases_ids() {
        let mut textures = TextureTable::new();
        let wood = textures.insert("Wood", TextureSource::Video { path: "w".into() });

        let mut diagnostics = Diagnostics::new();
        let table = MaterialTable::from_section(
            &section(json!({
                "TableApp": {
                    "color": { "r": 0.8, "g": 0.6, "b": 0.4 },
                    "emissive": { "r": 0.1, "g": 0, "b": 0 },
                    "shading": "flat",
                    "textureref": "WOOD",
                    "texlength_s": 2, "texlength_t": 4,
                    "twosided": true,
                    "bumpref": "missing"
                }
            })),
            &textures,
            &mut diagnostics,
        );

        let m = table.lookup("tableapp").unwrap();
        assert_eq!(m.name, "tableapp");
        assert_eq!(m.shading, Shading::Flat);
        assert_eq!(m.side, Side::Double);
        assert!(m.is_emissive());

        let binding = m.texture.as_ref().unwrap();
        assert!(binding.texture.same_as(&wood));
        assert_eq!(binding.repeat, Vec2::new(0.5, 0.25));
        assert!(m.bump_map.is_none());

        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.iter().next(),
            Some(Diagnostic::UnknownTexture { texture, .. }) if texture == "missing"
        ));
    }

    #[test]
    fn test_malformed_material_is_skipped() {
        let mut diagnostics = Diagnostics::new();
        let table = MaterialTable::from_section(
            &section(json!({ "broken": { "shininess": 10 } })),
            &TextureTable::new(),
            &mut diagnostics,
        );

        assert!(table.is_empty());
        assert_eq!(diagnostics.len(), 1);
    }
}
