//! Texture Table.
//!
//! Textures are declared in the document and bound to materials before their
//! pixels exist. Each entry is a [`TextureHandle`] whose data is filled in
//! later by a background load; the scene can be built and rendered before
//! that happens.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::diagnostics::{Diagnostic, Diagnostics};

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type TextureResult<T> = Result<T, TextureError>;

/// Decoded image data in linear RGBA float format.
#[derive(Clone, Debug)]
pub struct Texture {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data, [R, G, B, A] per pixel, row-major order
    pub pixels: Vec<[f32; 4]>,
}

impl Texture {
    pub fn new(width: u32, height: u32, pixels: Vec<[f32; 4]>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<[f32; 4]>()
    }
}

/// A texture declaration from the `textures` section.
#[derive(Clone, Debug, Deserialize)]
pub struct TextureDecl {
    pub filepath: String,

    #[serde(rename = "isVideo", default)]
    pub is_video: bool,

    #[serde(default = "default_mipmaps")]
    pub mipmaps: bool,
}

fn default_mipmaps() -> bool {
    true
}

/// Where a texture's pixels come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureSource {
    /// A still image decoded once.
    Image { path: PathBuf, mipmaps: bool },

    /// A video stream decoded by the renderer's media backend.
    Video { path: PathBuf },
}

#[derive(Debug)]
struct TextureSlot {
    id: String,
    source: TextureSource,
    data: RwLock<Option<Arc<Texture>>>,
}

/// Shared handle to a texture whose pixels may not be loaded yet.
///
/// Cloning is cheap; all clones observe the same data once it is populated.
#[derive(Clone, Debug)]
pub struct TextureHandle {
    slot: Arc<TextureSlot>,
}

impl TextureHandle {
    pub fn new(id: impl Into<String>, source: TextureSource) -> Self {
        Self {
            slot: Arc::new(TextureSlot {
                id: id.into(),
                source,
                data: RwLock::new(None),
            }),
        }
    }

    /// Lowercased texture id.
    pub fn id(&self) -> &str {
        &self.slot.id
    }

    pub fn source(&self) -> &TextureSource {
        &self.slot.source
    }

    pub fn is_video(&self) -> bool {
        matches!(self.slot.source, TextureSource::Video { .. })
    }

    /// Returns true once pixel data has been populated.
    pub fn is_ready(&self) -> bool {
        self.get().is_some()
    }

    /// The loaded pixels, if available yet.
    pub fn get(&self) -> Option<Arc<Texture>> {
        match self.slot.data.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Fill in the pixel data. Later calls replace earlier data.
    pub fn populate(&self, texture: Texture) {
        let texture = Arc::new(texture);
        match self.slot.data.write() {
            Ok(mut guard) => *guard = Some(texture),
            Err(poisoned) => *poisoned.into_inner() = Some(texture),
        }
    }

    /// Returns true if both handles refer to the same texture slot.
    pub fn same_as(&self, other: &TextureHandle) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

/// Lowercase id to texture handle.
#[derive(Clone, Debug, Default)]
pub struct TextureTable {
    textures: HashMap<String, TextureHandle>,
}

impl TextureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from the `textures` section.
    ///
    /// Relative file paths are resolved against `base_dir`.
    pub fn from_section(
        section: &Map<String, Value>,
        base_dir: Option<&Path>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut table = TextureTable::new();

        for (id, value) in section {
            let decl = match TextureDecl::deserialize(value) {
                Ok(decl) => decl,
                Err(e) => {
                    diagnostics.push(Diagnostic::Malformed {
                        section: "textures",
                        id: id.clone(),
                        message: e.to_string(),
                    });
                    continue;
                }
            };

            let path = resolve_path(base_dir, &decl.filepath);
            let source = if decl.is_video {
                TextureSource::Video { path }
            } else {
                TextureSource::Image {
                    path,
                    mipmaps: decl.mipmaps,
                }
            };
            table.insert(id, source);
        }

        table
    }

    /// Register a texture under its lowercased id and return the handle.
    pub fn insert(&mut self, id: &str, source: TextureSource) -> TextureHandle {
        let id = id.to_lowercase();
        let handle = TextureHandle::new(id.clone(), source);
        self.textures.insert(id, handle.clone());
        handle
    }

    /// Look up a texture by lowercase id.
    pub fn lookup(&self, id: &str) -> Option<TextureHandle> {
        self.textures.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextureHandle> {
        self.textures.values()
    }

    /// Start background loads for every image texture not loaded yet.
    ///
    /// Returns immediately; each handle is populated when its decode finishes.
    /// Video sources are left to the renderer. Failures are only logged,
    /// the handle simply stays empty.
    pub fn load_pending(&self) -> usize {
        let mut started = 0;

        for handle in self.textures.values() {
            let TextureSource::Image { path, .. } = handle.source() else {
                continue;
            };
            if handle.is_ready() {
                continue;
            }

            let handle = handle.clone();
            let path = path.clone();
            started += 1;

            rayon::spawn(move || match load_texture_file(&path) {
                Ok(texture) => {
                    log::debug!(
                        "Loaded texture '{}': {} ({}x{}, {:.1} KB)",
                        handle.id(),
                        path.display(),
                        texture.width,
                        texture.height,
                        texture.size_bytes() as f32 / 1024.0
                    );
                    handle.populate(texture);
                }
                Err(e) => {
                    log::warn!("{}", Diagnostic::TextureLoad {
                        texture: handle.id().to_string(),
                        message: e.to_string(),
                    });
                }
            });
        }

        started
    }
}

/// Resolve a path relative to the base directory.
fn resolve_path(base_dir: Option<&Path>, path: &str) -> PathBuf {
    let path = Path::new(path);

    match base_dir {
        Some(base) if !path.is_absolute() => base.join(path),
        _ => path.to_path_buf(),
    }
}

/// Load a texture from a file path.
pub fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path)?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixels: Vec<[f32; 4]> = rgba
        .pixels()
        .map(|p| {
            [
                srgb_to_linear(p[0]),
                srgb_to_linear(p[1]),
                srgb_to_linear(p[2]),
                p[3] as f32 / 255.0, // Alpha is linear
            ]
        })
        .collect();

    Ok(Texture::new(width, height, pixels))
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::{Duration, Instant};

    fn section(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_table_from_section() {
        let mut diagnostics = Diagnostics::new();
        let table = TextureTable::from_section(
            &section(json!({
                "Floor": { "filepath": "img/floor.png" },
                "tv": { "filepath": "video/clip.mp4", "isVideo": true },
                "bad": { "mipmaps": false }
            })),
            Some(Path::new("/scenes")),
            &mut diagnostics,
        );

        assert_eq!(table.len(), 2);
        assert_eq!(diagnostics.len(), 1);

        let floor = table.lookup("floor").unwrap();
        assert_eq!(
            floor.source(),
            &TextureSource::Image {
                path: PathBuf::from("/scenes/img/floor.png"),
                mipmaps: true
            }
        );
        assert!(!floor.is_ready());
        assert!(table.lookup("Floor").is_none());
        assert!(table.lookup("tv").unwrap().is_video());
    }

    #[test]
    fn test_populate_is_visible_through_clones() {
        let handle = TextureHandle::new("t", TextureSource::Video { path: "v.mp4".into() });
        let other = handle.clone();
        assert!(!other.is_ready());

        handle.populate(Texture::new(1, 1, vec![[1.0, 0.0, 0.0, 1.0]]));
        assert!(other.is_ready());
        assert_eq!(other.get().unwrap().width, 1);
        assert!(other.same_as(&handle));
    }

    #[test]
    fn test_load_pending_populates_in_background() {
        let dir = std::env::temp_dir().join(format!("yasf_texture_test_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("checker.png");
        image::RgbaImage::from_pixel(2, 3, image::Rgba([255, 255, 255, 128]))
            .save(&path)
            .unwrap();

        let mut table = TextureTable::new();
        let handle = table.insert(
            "Checker",
            TextureSource::Image {
                path: path.clone(),
                mipmaps: false,
            },
        );
        table.insert("clip", TextureSource::Video { path: dir.join("clip.mp4") });

        assert_eq!(table.load_pending(), 1);

        let deadline = Instant::now() + Duration::from_secs(10);
        while !handle.is_ready() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }

        let texture = handle.get().expect("texture should load");
        assert_eq!((texture.width, texture.height), (2, 3));
        assert!((texture.pixels[0][0] - 1.0).abs() < 0.001);
        assert!((texture.pixels[0][3] - 128.0 / 255.0).abs() < 0.001);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_image_error() {
        let result = load_texture_file(Path::new("/nonexistent/yasf/floor.png"));
        assert!(matches!(result, Err(TextureError::ImageError(_))));
    }

    #[test]
    fn test_srgb_to_linear() {
        // Black stays black
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);

        // White stays white
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }
}
