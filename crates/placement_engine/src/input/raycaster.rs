//! Placement raycaster
//!
//! A tap places the new object a fixed distance along the camera ray through
//! the tapped pixel. Nothing is intersected; the target is a pure function of
//! the tap, the viewport and the camera pose.

use crate::config::PlacementConfig;
use crate::error::{EngineError, EngineResult};
use crate::foundation::math::Vec3;
use crate::input::Viewport;
use crate::physics::Ray;
use crate::render::CameraPose;

/// Default distance from the camera at which tapped objects appear
pub const DEFAULT_PLACEMENT_DISTANCE: f32 = 4.0;

/// Converts taps into world-space placement targets
#[derive(Debug, Clone, Copy)]
pub struct PlacementRaycaster {
    distance: f32,
}

impl PlacementRaycaster {
    /// Place at `distance` units along the tap ray
    pub fn new(distance: f32) -> Self {
        Self { distance }
    }

    /// Build from the placement section of the configuration
    pub fn from_config(config: &PlacementConfig) -> Self {
        Self::new(config.distance)
    }

    /// Distance along the ray
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// World-space ray through a tapped pixel
    ///
    /// # Errors
    /// [`EngineError::NotReady`] without a camera pose or usable viewport,
    /// or when the pose cannot be unprojected; [`EngineError::InvalidInput`]
    /// for non-finite coordinates.
    pub fn ray(
        &self,
        screen_x: f32,
        screen_y: f32,
        viewport: &Viewport,
        camera: Option<&CameraPose>,
    ) -> EngineResult<Ray> {
        let camera =
            camera.ok_or_else(|| EngineError::NotReady("no camera pose yet".to_string()))?;
        let (ndc_x, ndc_y) = viewport.screen_to_ndc(screen_x, screen_y)?;
        camera.screen_to_world_ray(ndc_x, ndc_y)
    }

    /// Placement target for a tap: `camera.position + direction * distance`
    ///
    /// # Errors
    /// Same as [`PlacementRaycaster::ray`].
    pub fn target(
        &self,
        screen_x: f32,
        screen_y: f32,
        viewport: &Viewport,
        camera: Option<&CameraPose>,
    ) -> EngineResult<Vec3> {
        let ray = self.ray(screen_x, screen_y, viewport, camera)?;
        Ok(ray.point_at(self.distance))
    }
}

impl Default for PlacementRaycaster {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEMENT_DISTANCE)
    }
}
