//! Normalized node records and their geometry payloads.

use glam::{Vec2, Vec3};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use yasf_math::Rgba;

use crate::document::{serde_vec, RawAmount};

/// A node of the scene description, resolved at graph-build time.
///
/// Nodes live in a [`NodeDictionary`](crate::NodeDictionary) and are never
/// mutated after the build. Children are stored by id so the same node can
/// be instantiated under several parents.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: String,

    /// Declared record type (`"node"` for structural nodes).
    pub node_type: String,

    /// Transforms in declared order.
    pub transforms: Vec<NodeTransform>,

    /// Lowercased material id; `None` inherits the ancestor's material.
    pub material_ref: Option<String>,

    /// The single primitive or light carried by this node.
    pub geometry: Option<Geometry>,

    pub cast_shadows: bool,
    pub receive_shadows: bool,

    /// Child ids in declaration order, without duplicates.
    pub children: Vec<String>,
}

impl Node {
    /// Returns true if the node only groups children.
    pub fn is_structural(&self) -> bool {
        self.geometry.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransformKind {
    Translate,
    Rotate,
    Scale,
}

impl TransformKind {
    /// Parse a transform `type` tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "translate" => Some(TransformKind::Translate),
            "rotate" => Some(TransformKind::Rotate),
            "scale" => Some(TransformKind::Scale),
            _ => None,
        }
    }

    /// Value used for an axis the document leaves out.
    pub fn default_axis(self) -> f32 {
        match self {
            TransformKind::Scale => 1.0,
            TransformKind::Translate | TransformKind::Rotate => 0.0,
        }
    }
}

/// One transform entry. Rotation amounts are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    pub kind: TransformKind,
    pub amount: Vec3,
}

impl NodeTransform {
    pub fn new(kind: TransformKind, amount: Vec3) -> Self {
        Self { kind, amount }
    }

    /// Fill omitted axes with the kind's default.
    pub fn from_raw(kind: TransformKind, amount: &RawAmount) -> Self {
        let d = kind.default_axis();
        Self {
            kind,
            amount: Vec3::new(
                amount.x.unwrap_or(d),
                amount.y.unwrap_or(d),
                amount.z.unwrap_or(d),
            ),
        }
    }
}

/// Geometry payload of a leaf node.
#[derive(Clone, Debug)]
pub enum Geometry {
    Rectangle(RectangleGeometry),
    Triangle(TriangleGeometry),
    Box(BoxGeometry),
    Sphere(SphereGeometry),
    Cylinder(CylinderGeometry),
    Polygon(PolygonGeometry),
    Nurbs(NurbsGeometry),
    PointLight(PointLightDesc),
    DirectionalLight(DirectionalLightDesc),
    SpotLight(SpotLightDesc),
    VideoEmitter(VideoEmitterGeometry),
}

/// Why an inline declaration could not become a [`Geometry`].
#[derive(Error, Debug)]
pub enum GeometryParseError {
    #[error("declaration has no 'type'")]
    MissingTag,

    #[error("unknown type '{0}'")]
    UnknownTag(String),

    #[error("invalid {tag}: {source}")]
    Invalid {
        tag: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Geometry {
    /// Parse an inline `{ "type": ..., ... }` declaration.
    pub fn from_declaration(value: &Value) -> Result<Self, GeometryParseError> {
        let tag = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or(GeometryParseError::MissingTag)?
            .to_ascii_lowercase();

        fn parse<'a, T: Deserialize<'a>>(
            value: &'a Value,
            tag: &str,
        ) -> Result<T, GeometryParseError> {
            T::deserialize(value).map_err(|source| GeometryParseError::Invalid {
                tag: tag.to_string(),
                source,
            })
        }

        let geometry = match tag.as_str() {
            "rectangle" => Geometry::Rectangle(parse(value, &tag)?),
            "triangle" => Geometry::Triangle(parse(value, &tag)?),
            "box" => Geometry::Box(parse(value, &tag)?),
            "sphere" => Geometry::Sphere(parse(value, &tag)?),
            "cylinder" => Geometry::Cylinder(parse(value, &tag)?),
            "polygon" => Geometry::Polygon(parse(value, &tag)?),
            "nurbs" => Geometry::Nurbs(parse(value, &tag)?),
            "pointlight" => Geometry::PointLight(parse(value, &tag)?),
            "directionallight" => Geometry::DirectionalLight(parse(value, &tag)?),
            "spotlight" => Geometry::SpotLight(parse(value, &tag)?),
            "video" => Geometry::VideoEmitter(parse(value, &tag)?),
            _ => return Err(GeometryParseError::UnknownTag(tag)),
        };
        Ok(geometry)
    }

    /// Document tag for this payload.
    pub fn tag(&self) -> &'static str {
        match self {
            Geometry::Rectangle(_) => "rectangle",
            Geometry::Triangle(_) => "triangle",
            Geometry::Box(_) => "box",
            Geometry::Sphere(_) => "sphere",
            Geometry::Cylinder(_) => "cylinder",
            Geometry::Polygon(_) => "polygon",
            Geometry::Nurbs(_) => "nurbs",
            Geometry::PointLight(_) => "pointlight",
            Geometry::DirectionalLight(_) => "directionallight",
            Geometry::SpotLight(_) => "spotlight",
            Geometry::VideoEmitter(_) => "video",
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(
            self,
            Geometry::PointLight(_) | Geometry::DirectionalLight(_) | Geometry::SpotLight(_)
        )
    }
}

fn one() -> u32 {
    1
}

fn one_f32() -> f32 {
    1.0
}

#[derive(Clone, Debug, Deserialize)]
pub struct RectangleGeometry {
    #[serde(deserialize_with = "serde_vec::xy")]
    pub xy1: Vec2,
    #[serde(deserialize_with = "serde_vec::xy")]
    pub xy2: Vec2,
    #[serde(default = "one")]
    pub parts_x: u32,
    #[serde(default = "one")]
    pub parts_y: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TriangleGeometry {
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub xyz1: Vec3,
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub xyz2: Vec3,
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub xyz3: Vec3,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BoxGeometry {
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub xyz1: Vec3,
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub xyz2: Vec3,
    #[serde(default = "one")]
    pub parts_x: u32,
    #[serde(default = "one")]
    pub parts_y: u32,
    #[serde(default = "one")]
    pub parts_z: u32,
}

/// Sphere; angles are in degrees.
#[derive(Clone, Debug, Deserialize)]
pub struct SphereGeometry {
    pub radius: f32,
    pub slices: u32,
    pub stacks: u32,
    #[serde(default)]
    pub thetastart: f32,
    #[serde(default = "half_turn")]
    pub thetalength: f32,
    #[serde(default)]
    pub phistart: f32,
    #[serde(default = "full_turn")]
    pub philength: f32,
}

fn half_turn() -> f32 {
    180.0
}

fn full_turn() -> f32 {
    360.0
}

/// Cylinder or cone frustum; angles are in degrees.
#[derive(Clone, Debug, Deserialize)]
pub struct CylinderGeometry {
    pub base: f32,
    pub top: f32,
    pub height: f32,
    pub slices: u32,
    pub stacks: u32,
    /// Declared as "caps closed" but `true` produces an open-ended cylinder.
    #[serde(default)]
    pub capsclose: bool,
    #[serde(default)]
    pub thetastart: f32,
    #[serde(default = "full_turn")]
    pub thetalength: f32,
}

impl CylinderGeometry {
    /// Whether the generated mesh omits its caps.
    pub fn open_ended(&self) -> bool {
        self.capsclose
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct PolygonGeometry {
    pub radius: f32,
    pub stacks: u32,
    pub slices: u32,
    pub color_c: Rgba,
    pub color_p: Rgba,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NurbsGeometry {
    pub degree_u: u32,
    pub degree_v: u32,
    pub parts_u: u32,
    pub parts_v: u32,
    /// Flat, row-major list of `(degree_u + 1) * (degree_v + 1)` points.
    #[serde(deserialize_with = "serde_vec::xyz_list")]
    pub controlpoints: Vec<Vec3>,
}

fn enabled() -> bool {
    true
}

fn default_distance() -> f32 {
    1000.0
}

fn default_decay() -> f32 {
    2.0
}

fn default_shadow_far() -> f32 {
    500.0
}

fn default_shadow_map_size() -> u32 {
    512
}

#[derive(Clone, Debug, Deserialize)]
pub struct PointLightDesc {
    #[serde(default = "enabled")]
    pub enabled: bool,
    pub color: Rgba,
    #[serde(default = "one_f32")]
    pub intensity: f32,
    #[serde(default = "default_distance")]
    pub distance: f32,
    #[serde(default = "default_decay")]
    pub decay: f32,
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub position: Vec3,
    #[serde(default)]
    pub castshadow: bool,
    #[serde(default = "default_shadow_far")]
    pub shadowfar: f32,
    #[serde(default = "default_shadow_map_size")]
    pub shadowmapsize: u32,
}

/// Spotlight; `angle` is the cone half-angle in degrees.
#[derive(Clone, Debug, Deserialize)]
pub struct SpotLightDesc {
    #[serde(default = "enabled")]
    pub enabled: bool,
    pub color: Rgba,
    #[serde(default = "one_f32")]
    pub intensity: f32,
    #[serde(default = "default_distance")]
    pub distance: f32,
    #[serde(default = "default_decay")]
    pub decay: f32,
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub position: Vec3,
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub target: Vec3,
    pub angle: f32,
    #[serde(default = "one_f32")]
    pub penumbra: f32,
    #[serde(default)]
    pub castshadow: bool,
    #[serde(default = "default_shadow_far")]
    pub shadowfar: f32,
    #[serde(default = "default_shadow_map_size")]
    pub shadowmapsize: u32,
}

fn shadow_low() -> f32 {
    -5.0
}

fn shadow_high() -> f32 {
    5.0
}

#[derive(Clone, Debug, Deserialize)]
pub struct DirectionalLightDesc {
    #[serde(default = "enabled")]
    pub enabled: bool,
    pub color: Rgba,
    #[serde(default = "one_f32")]
    pub intensity: f32,
    #[serde(deserialize_with = "serde_vec::xyz")]
    pub position: Vec3,
    #[serde(default)]
    pub castshadow: bool,
    #[serde(default = "shadow_low")]
    pub shadowleft: f32,
    #[serde(default = "shadow_high")]
    pub shadowright: f32,
    #[serde(default = "shadow_low")]
    pub shadowbottom: f32,
    #[serde(default = "shadow_high")]
    pub shadowtop: f32,
    #[serde(default = "default_shadow_far")]
    pub shadowfar: f32,
    #[serde(default = "default_shadow_map_size")]
    pub shadowmapsize: u32,
}

fn default_video_slices() -> u32 {
    32
}

/// Cone surface showing a video texture, fading out toward its base.
#[derive(Clone, Debug, Deserialize)]
pub struct VideoEmitterGeometry {
    pub textureref: String,
    pub radius: f32,
    pub height: f32,
    #[serde(default = "default_video_slices")]
    pub slices: u32,
    #[serde(default = "one")]
    pub stacks: u32,
    /// Alpha at the apex; alpha falls linearly to 0 at the base.
    #[serde(default = "one_f32")]
    pub fade_start: f32,
}
