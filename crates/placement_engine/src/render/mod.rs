//! Rendering-facing types
//!
//! The engine never draws anything itself. This module holds what it hands
//! to the external renderer each frame: the camera pose, the light rig, the
//! per-object renderable description, and the [`RenderBackend`] seam through
//! which GPU resources are uploaded, drawn and released.

pub mod backend;
pub mod camera;
pub mod geometry;
pub mod lighting;

pub use backend::{
    FrameSnapshot, GeometryHandle, HeadlessRenderer, MaterialHandle, RenderBackend, RenderResources,
};
pub use camera::{CameraPose, CameraRig};
pub use geometry::{Geometry, MaterialDesc, PrimitiveShape, RenderPart, Renderable, Shading};
pub use lighting::{Light, LightKind, LightRig, LightingMode};
