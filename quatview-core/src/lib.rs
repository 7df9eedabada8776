/// Quatview Core Library - Quaternion rotation engine and overlay geometry
///
/// This library provides the stateless core of the viewer: vector and
/// quaternion algebra, axis-angle rotation of meshes, scene scaling, and the
/// procedural overlay geometry that shows the current rotation.

pub mod config;
pub mod error;
pub mod mesh;
pub mod overlay;
pub mod quaternion;
pub mod render;
pub mod rotation;
pub mod scale;
pub mod session;
pub mod vector;

// Re-export commonly used types
pub use config::{OverlayConfig, RotationConfig, ViewerConfig, Visibility};
pub use error::{Error, Result};
pub use mesh::{Bounds, Face, Mesh};
pub use overlay::{generate_overlay, Batch, Layer, Overlay, OverlayGenerator, Primitive, Rgb};
pub use quaternion::Quaternion;
pub use render::{draw_frame, draw_mesh, RenderSink};
pub use rotation::{apply_rotation, RotationEngine, RotationParams};
pub use scale::compute_scale;
pub use session::{reset_session, Session, SessionDefaults};
pub use vector::Vec3;
