//! Serde model of a YASF document.
//!
//! Sections that hold id-keyed entries (`textures`, `materials`, `graph`,
//! `cameras`) are kept as raw JSON maps here and converted entry by entry by
//! their owners, so one malformed entry becomes a diagnostic instead of
//! failing the whole document.
//!
//! ```json
//! { "yasf": {
//!     "globals":   { "background": {...}, "ambient": {...} },
//!     "cameras":   { "initial": "cam1", "cam1": { "type": "perspective", ... } },
//!     "textures":  { "floor": { "filepath": "floor.png" } },
//!     "materials": { "floorApp": { "color": {...}, "textureref": "floor", ... } },
//!     "graph":     { "rootid": "scene", "scene": { "type": "node", ... } }
//! } }
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{LoadError, LoadResult};

/// Key holding the list of referenced child ids inside a node's `children`.
pub const NODES_LIST_KEY: &str = "nodesList";

/// Key naming the root node inside the `graph` section.
pub const ROOT_ID_KEY: &str = "rootid";

/// A parsed YASF document, before any table or graph is built.
#[derive(Clone, Debug, Default)]
pub struct YasfDocument {
    pub globals: Map<String, Value>,
    pub cameras: Map<String, Value>,
    pub textures: Map<String, Value>,
    pub materials: Map<String, Value>,
    pub graph: RawGraph,
}

impl YasfDocument {
    /// Parse a document from JSON text.
    ///
    /// Accepts both the bare section object and the `{ "yasf": { ... } }` wrapper.
    pub fn parse(content: &str) -> LoadResult<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Build a document from an already parsed JSON value.
    pub fn from_value(value: Value) -> LoadResult<Self> {
        let mut root = match value {
            Value::Object(map) => map,
            _ => return Err(LoadError::NotAnObject("document")),
        };

        if root.len() == 1 {
            if let Some(Value::Object(inner)) = root.remove("yasf") {
                root = inner;
            }
        }

        let graph = match root.remove("graph") {
            Some(Value::Object(map)) => RawGraph::from_map(map)?,
            Some(_) => return Err(LoadError::NotAnObject("graph")),
            None => return Err(LoadError::MissingSection("graph")),
        };

        Ok(Self {
            globals: take_section(&mut root, "globals")?,
            cameras: take_section(&mut root, "cameras")?,
            textures: take_section(&mut root, "textures")?,
            materials: take_section(&mut root, "materials")?,
            graph,
        })
    }
}

fn take_section(root: &mut Map<String, Value>, name: &'static str) -> LoadResult<Map<String, Value>> {
    match root.remove(name) {
        Some(Value::Object(map)) => Ok(map),
        Some(Value::Null) | None => Ok(Map::new()),
        Some(_) => Err(LoadError::NotAnObject(name)),
    }
}

/// The `graph` section: a root id plus a flat dictionary of raw node records.
#[derive(Clone, Debug, Default)]
pub struct RawGraph {
    pub root_id: String,
    records: Map<String, Value>,
}

impl RawGraph {
    fn from_map(mut map: Map<String, Value>) -> LoadResult<Self> {
        let root_id = match map.remove(ROOT_ID_KEY) {
            Some(Value::String(id)) => id,
            _ => return Err(LoadError::MissingRootId),
        };

        Ok(Self {
            root_id,
            records: map,
        })
    }

    /// Raw JSON record for a node id.
    pub fn record(&self, id: &str) -> Option<&Value> {
        self.records.get(id)
    }

    /// Number of declared node records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A node record as written in the document.
#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
    #[serde(rename = "type", default = "default_node_type")]
    pub node_type: String,

    #[serde(default)]
    pub transforms: Vec<RawTransform>,

    #[serde(default)]
    pub materialref: Option<RawMaterialRef>,

    #[serde(default)]
    pub castshadows: Option<bool>,

    #[serde(default)]
    pub receiveshadows: Option<bool>,

    /// `nodesList` plus inline primitive/light declarations, in document order.
    #[serde(default)]
    pub children: Map<String, Value>,
}

fn default_node_type() -> String {
    "node".to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawMaterialRef {
    #[serde(rename = "materialId")]
    pub material_id: String,
}

/// A transform entry; `amount` axes may be omitted.
#[derive(Clone, Debug, Deserialize)]
pub struct RawTransform {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub amount: RawAmount,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawAmount {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

/// Serde helpers for `{x, y, z}` / `{x, y}` objects mapped onto glam vectors.
pub(crate) mod serde_vec {
    use glam::{Vec2, Vec3};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    struct Xyz {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default)]
        z: f32,
    }

    #[derive(Deserialize)]
    struct Xy {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
    }

    pub fn xyz<'de, D: Deserializer<'de>>(d: D) -> Result<Vec3, D::Error> {
        let v = Xyz::deserialize(d)?;
        Ok(Vec3::new(v.x, v.y, v.z))
    }

    pub fn xyz_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Vec3>, D::Error> {
        let list = Vec::<Xyz>::deserialize(d)?;
        Ok(list.into_iter().map(|v| Vec3::new(v.x, v.y, v.z)).collect())
    }

    pub fn xy<'de, D: Deserializer<'de>>(d: D) -> Result<Vec2, D::Error> {
        let v = Xy::deserialize(d)?;
        Ok(Vec2::new(v.x, v.y))
    }
}
