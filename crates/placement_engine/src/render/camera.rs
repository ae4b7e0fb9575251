//! # Camera pose and screen-space unprojection
//!
//! The host owns the real camera (device tracking or a virtual camera) and
//! hands its pose to the engine once per frame. The engine only needs the
//! pose to turn taps into rays and, in dynamic lighting mode, to apply a
//! gentle orbit on top of the host pose.
//!
//! ## Coordinate System
//! Right-handed, Y-up world space. Normalized device coordinates follow the
//! OpenGL convention: X and Y in `[-1, 1]` with +Y up, depth in `[-1, 1]`.

use crate::error::{EngineError, EngineResult};
use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3, Vec4};
use crate::physics::Ray;

/// Camera position, orientation and projection parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPose {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Vertical field of view in radians
    pub fov: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Distance to near clipping plane
    pub near: f32,

    /// Distance to far clipping plane
    pub far: f32,
}

impl CameraPose {
    /// Create a perspective pose looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Builder pattern: Set the look-at target
    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Update camera aspect ratio for viewport changes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Unit vector from the camera towards its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// World-to-camera transformation
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.target, self.up)
    }

    /// Camera-to-clip transformation
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Combined `P × V`
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Whether the pose can produce an invertible view-projection
    pub fn is_valid(&self) -> bool {
        let finite = self.position.iter().chain(self.target.iter()).chain(self.up.iter()).all(|c| c.is_finite())
            && self.fov.is_finite()
            && self.aspect.is_finite()
            && self.near.is_finite()
            && self.far.is_finite();

        finite
            && self.fov > 0.0
            && self.fov < std::f32::consts::PI
            && self.aspect > 0.0
            && self.near > 0.0
            && self.far > self.near
            && (self.target - self.position).norm() > f32::EPSILON
            && (self.target - self.position).cross(&self.up).norm() > f32::EPSILON
    }

    /// Convert normalized device coordinates to a world-space ray
    ///
    /// Unprojects the NDC point on the near and far planes through
    /// `(P × V)⁻¹`; the ray starts at the camera position and points through
    /// the tapped location.
    ///
    /// # Arguments
    /// * `ndc_x` - X in `[-1, 1]`, left to right
    /// * `ndc_y` - Y in `[-1, 1]`, bottom to top
    ///
    /// # Errors
    /// [`EngineError::NotReady`] when the pose is degenerate (zero-length
    /// view direction, bad clip planes) and the matrix cannot be inverted.
    pub fn screen_to_world_ray(&self, ndc_x: f32, ndc_y: f32) -> EngineResult<Ray> {
        if !self.is_valid() {
            return Err(EngineError::NotReady("camera pose is degenerate".to_string()));
        }

        let inv_view_proj = self
            .view_projection_matrix()
            .try_inverse()
            .ok_or_else(|| EngineError::NotReady("view-projection is not invertible".to_string()))?;

        let world_near_h = inv_view_proj * Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let world_far_h = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let world_near = world_near_h.xyz() / world_near_h.w;
        let world_far = world_far_h.xyz() / world_far_h.w;

        let direction = world_far - world_near;
        if !direction.iter().all(|c| c.is_finite()) || direction.norm() <= f32::EPSILON {
            return Err(EngineError::NotReady("unprojected ray is degenerate".to_string()));
        }

        Ok(Ray::new(self.position, direction))
    }
}

impl Default for CameraPose {
    /// Two units up and eight back, looking at the origin, 75° FOV
    fn default() -> Self {
        Self::perspective(Vec3::new(0.0, 2.0, 8.0), 75.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

/// Horizontal orbit amplitude applied in dynamic lighting mode
const ORBIT_AMPLITUDE_X: f32 = 0.5;
/// Vertical bob amplitude applied in dynamic lighting mode
const ORBIT_AMPLITUDE_Y: f32 = 0.3;

/// Host-supplied camera pose plus the animated pose handed to the renderer
#[derive(Debug, Clone, Default)]
pub struct CameraRig {
    base: Option<CameraPose>,
    current: Option<CameraPose>,
}

impl CameraRig {
    /// Create an empty rig (no pose yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the host pose; the animated pose resets to it
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.current = Some(pose.clone());
        self.base = Some(pose);
    }

    /// Pose for the current frame, if the host supplied one
    pub fn pose(&self) -> Option<&CameraPose> {
        self.current.as_ref()
    }

    /// Host pose without animation
    pub fn base_pose(&self) -> Option<&CameraPose> {
        self.base.as_ref()
    }

    /// Propagate a viewport change to both poses
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if let Some(base) = self.base.as_mut() {
            base.set_aspect_ratio(aspect);
        }
        if let Some(current) = self.current.as_mut() {
            current.set_aspect_ratio(aspect);
        }
    }

    /// Sinusoidal orbit around the host pose, still looking at its target
    pub fn animate_orbit(&mut self, time: f32) {
        let Some(base) = self.base.as_ref() else {
            return;
        };
        let mut pose = base.clone();
        pose.position.x += (time * 0.3).sin() * ORBIT_AMPLITUDE_X;
        pose.position.y += (time * 0.2).cos() * ORBIT_AMPLITUDE_Y;
        self.current = Some(pose);
    }

    /// Drop the orbit offset (simple lighting mode)
    pub fn reset_to_base(&mut self) {
        self.current = self.base.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_center_ray_points_forward() {
        let pose = CameraPose::perspective(Vec3::new(0.0, 0.0, 5.0), 75.0, 1.0, 0.1, 100.0);
        let ray = pose.screen_to_world_ray(0.0, 0.0).unwrap();

        assert_relative_eq!(ray.origin, Vec3::new(0.0, 0.0, 5.0), epsilon = 1e-6);
        assert_relative_eq!(ray.direction, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-4);
    }

    #[test]
    fn test_corner_ray_matches_field_of_view() {
        let pose = CameraPose::perspective(Vec3::new(0.0, 0.0, 5.0), 90.0, 1.0, 0.1, 100.0);
        let ray = pose.screen_to_world_ray(0.0, 1.0).unwrap();

        // 90° vertical FOV: top edge is 45° above forward
        assert_relative_eq!(ray.direction.y, -ray.direction.z, epsilon = 1e-3);
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn test_degenerate_pose_is_not_ready() {
        let mut pose = CameraPose::default();
        pose.target = pose.position;
        assert!(matches!(
            pose.screen_to_world_ray(0.0, 0.0),
            Err(EngineError::NotReady(_))
        ));
    }

    #[test]
    fn test_orbit_keeps_target_and_resets() {
        let mut rig = CameraRig::new();
        rig.animate_orbit(1.0);
        assert!(rig.pose().is_none());

        rig.set_pose(CameraPose::default());
        rig.animate_orbit(2.0);
        let pose = rig.pose().unwrap();
        assert_relative_eq!(pose.position.x, (0.6f32).sin() * 0.5, epsilon = 1e-6);
        assert_eq!(pose.target, Vec3::zeros());

        rig.reset_to_base();
        assert_eq!(rig.pose(), rig.base_pose());
    }
}
