//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the object transform used by the scene.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Position, Euler rotation and scale of a placed object
///
/// Rotation is kept as per-axis angles because objects spin with an
/// independent angular velocity on each axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,

    /// Rotation angles in radians (roll, pitch, yaw about X, Y, Z)
    pub rotation: Vec3,

    /// Scale factors, kept uniform by the lifecycle code
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: Set a uniform scale
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.set_uniform_scale(scale);
        self
    }

    /// Set all three scale axes to the same value
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vec3::new(scale, scale, scale);
    }

    /// Uniform scale factor (the X component)
    pub fn uniform_scale(&self) -> f32 {
        self.scale.x
    }

    /// Rotation as a quaternion
    pub fn orientation(&self) -> Quat {
        Quat::from_euler_angles(self.rotation.x, self.rotation.y, self.rotation.z)
    }

    /// Convert to a transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.orientation().to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Whether every component is a finite number
    pub fn is_finite(&self) -> bool {
        is_finite_vec(&self.position) && is_finite_vec(&self.rotation) && is_finite_vec(&self.scale)
    }
}

/// Whether all components of a vector are finite
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Math utility functions
pub mod utils {
    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees.to_radians()
    }

    /// Fraction to apply over `delta_time` so that `per_tick` is applied
    /// once per reference tick.
    ///
    /// `1 - (1 - per_tick)^(delta_time * tick_rate)`; equals `per_tick` when
    /// `delta_time` is exactly one reference tick.
    pub fn rate_fraction(per_tick: f32, delta_time: f32, tick_rate: f32) -> f32 {
        1.0 - (1.0 - per_tick).powf(delta_time * tick_rate)
    }

    /// Multiplicative decay over `delta_time` for a per-tick factor
    pub fn decay_factor(per_tick: f32, delta_time: f32, tick_rate: f32) -> f32 {
        per_tick.powf(delta_time * tick_rate)
    }
}

/// Extension trait for Mat4 with camera matrix constructors
pub trait Mat4Ext {
    /// Right-handed perspective projection with a [-1, 1] depth range
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed look-at view matrix
    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new_perspective(aspect, fov_y, near, far)
    }

    fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(eye), &Point3::from(target), &up)
    }
}
