//! # Placement Engine
//!
//! Engine core for camera-overlay scenes: taps become world positions,
//! placed objects bounce under point-mass physics, and every object grows
//! in and fades out with deterministic cleanup of its renderer resources.
//!
//! ## Features
//!
//! - **Placement raycasting**: screen taps unprojected through the camera
//! - **Bouncer physics**: gravity, ground restitution, friction and spin
//! - **Lifecycle**: frame-rate independent spawn/despawn animation
//! - **Asset fallback**: external models with procedural stand-ins
//! - **Headless by design**: rendering and asset decoding stay with the host
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use placement_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let mut engine = FrameScheduler::new(
//!         EngineConfig::default(),
//!         HeadlessRenderer::new(),
//!         Box::new(InMemoryLoader::new()),
//!     )?;
//!     engine.set_viewport(1280.0, 720.0);
//!     let pose = engine.context().camera_pose_at(Vec3::new(0.0, 2.0, 8.0), Vec3::zeros());
//!     engine.set_camera_pose(pose);
//!     engine.place_at(640.0, 360.0);
//!
//!     for frame in 0..120 {
//!         engine.tick(f64::from(frame) / 60.0);
//!     }
//!     engine.teardown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;

pub mod assets;
pub mod config;
pub mod effects;
pub mod events;
pub mod input;
pub mod lifecycle;
pub mod physics;
pub mod render;
pub mod scene;
pub mod scheduler;

mod error;

pub use error::{EngineError, EngineResult};

#[cfg(test)]
mod tests;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{InMemoryLoader, MeshData, ModelLoader},
        config::{Config, EngineConfig},
        events::{EngineEvent, StateChanges},
        foundation::math::{Transform, Vec3},
        lifecycle::AnimationStyle,
        render::{CameraPose, FrameSnapshot, HeadlessRenderer, LightingMode, RenderBackend},
        scene::{LifecycleState, ObjectId, ObjectKind},
        scheduler::FrameScheduler,
        EngineError, EngineResult,
    };
}
