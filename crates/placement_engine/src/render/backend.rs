//! Renderer seam
//!
//! The external renderer implements [`RenderBackend`]. The engine uploads a
//! renderable when an object is placed, hands a [`FrameSnapshot`] over once
//! per tick, and calls `dispose` exactly once for every object (or particle)
//! it releases.

use std::collections::HashSet;

use crate::effects::BurstSystem;
use crate::error::{EngineError, EngineResult};
use crate::render::{CameraPose, LightRig, Renderable};
use crate::scene::PlaceableObject;

/// Renderer-side geometry handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u64);

/// Renderer-side material handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u64);

/// Handles owned by one placed object
///
/// Not `Clone`: the engine holds exactly one copy and gives it up on
/// disposal, so a resource cannot be released twice.
#[derive(Debug, PartialEq, Eq)]
pub struct RenderResources {
    /// Geometry handle
    pub geometry: GeometryHandle,
    /// Material handle
    pub material: MaterialHandle,
}

/// Read-only view of everything the renderer draws this frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot<'a> {
    /// Placed objects in insertion order
    pub objects: &'a [PlaceableObject],
    /// Particle bursts in flight
    pub bursts: &'a BurstSystem,
    /// Camera pose for this frame
    pub camera: &'a CameraPose,
    /// Lights for this frame
    pub lights: &'a LightRig,
    /// Simulated time in seconds
    pub time: f32,
}

/// External renderer interface
pub trait RenderBackend {
    /// Create GPU resources for a renderable
    fn upload(&mut self, renderable: &Renderable) -> EngineResult<RenderResources>;

    /// Draw one frame
    fn draw(&mut self, frame: &FrameSnapshot<'_>) -> EngineResult<()>;

    /// Release the resources of one object
    fn dispose(&mut self, geometry: GeometryHandle, material: MaterialHandle) -> EngineResult<()>;
}

/// Renderer that keeps no GPU state
///
/// Allocates sequential handles, remembers which are live and counts frames.
/// Used by headless hosts (CI, simulations) and as the reference behaviour
/// for the disposal contract: releasing an unknown handle is an error.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_handle: u64,
    live: HashSet<u64>,
    disposed: Vec<(GeometryHandle, MaterialHandle)>,
    frames_drawn: u64,
    last_object_count: usize,
    fail_uploads: bool,
    fail_draws: bool,
}

impl HeadlessRenderer {
    /// Create an empty renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail
    pub fn set_fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }

    /// Make every subsequent draw fail
    pub fn set_fail_draws(&mut self, fail: bool) {
        self.fail_draws = fail;
    }

    /// Number of resource sets currently alive
    pub fn live_resources(&self) -> usize {
        self.live.len()
    }

    /// Every dispose call received, in order
    pub fn disposed(&self) -> &[(GeometryHandle, MaterialHandle)] {
        &self.disposed
    }

    /// Frames successfully drawn
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Object count seen in the last drawn frame
    pub fn last_object_count(&self) -> usize {
        self.last_object_count
    }
}

impl RenderBackend for HeadlessRenderer {
    fn upload(&mut self, renderable: &Renderable) -> EngineResult<RenderResources> {
        if self.fail_uploads {
            return Err(EngineError::Render(format!("upload of '{}' refused", renderable.label())));
        }
        let id = self.next_handle;
        self.next_handle += 1;
        self.live.insert(id);
        log::trace!("Uploaded '{}' as handle {}", renderable.label(), id);
        Ok(RenderResources {
            geometry: GeometryHandle(id),
            material: MaterialHandle(id),
        })
    }

    fn draw(&mut self, frame: &FrameSnapshot<'_>) -> EngineResult<()> {
        if self.fail_draws {
            return Err(EngineError::Render("draw refused".to_string()));
        }
        self.frames_drawn += 1;
        self.last_object_count = frame.objects.len();
        Ok(())
    }

    fn dispose(&mut self, geometry: GeometryHandle, material: MaterialHandle) -> EngineResult<()> {
        self.disposed.push((geometry, material));
        if self.live.remove(&geometry.0) {
            Ok(())
        } else {
            Err(EngineError::Render(format!("handle {} is not live", geometry.0)))
        }
    }
}
