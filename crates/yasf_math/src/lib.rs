// Re-export glam for convenience
pub use glam::*;

// YASF math types
mod aabb;
mod color;
mod transform;

pub use aabb::Aabb;
pub use color::Rgba;
pub use transform::{euler_degrees_to_quat, Mat4Ext};
