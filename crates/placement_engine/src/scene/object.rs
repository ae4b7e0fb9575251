//! Placeable object data

use std::fmt;

use crate::error::{EngineError, EngineResult};
use crate::foundation::math::{is_finite_vec, Transform, Vec3};
use crate::render::{RenderResources, Renderable};
use crate::scene::ObjectKind;

/// Stable object identifier, unique for the lifetime of a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Current state of an object's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// Growing from zero to full scale
    Spawning,
    /// Full scale, driven by physics or the idle animation
    Active,
    /// Shrinking and fading out
    Despawning,
    /// Finished; resources released on the next purge
    Removed,
}

/// Point-mass physics parameters
///
/// Coefficients are kept in `[0, 1]`; use [`PhysicsProfile::new`] to reject
/// bad input or [`PhysicsProfile::clamped`] to coerce it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsProfile {
    mass: f32,
    bounce: f32,
    friction: f32,
}

impl PhysicsProfile {
    /// Create a profile, rejecting out-of-range or non-finite values
    pub fn new(mass: f32, bounce: f32, friction: f32) -> EngineResult<Self> {
        let unit = |v: f32| v.is_finite() && (0.0..=1.0).contains(&v);
        if !(mass.is_finite() && mass > 0.0) {
            return Err(EngineError::InvalidInput(format!("mass {mass} must be positive")));
        }
        if !unit(bounce) {
            return Err(EngineError::InvalidInput(format!("bounce {bounce} is not within [0, 1]")));
        }
        if !unit(friction) {
            return Err(EngineError::InvalidInput(format!(
                "friction {friction} is not within [0, 1]"
            )));
        }
        Ok(Self { mass, bounce, friction })
    }

    /// Create a profile, clamping coefficients into `[0, 1]`
    pub fn clamped(mass: f32, bounce: f32, friction: f32) -> Self {
        let unit = |v: f32| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            mass: if mass.is_finite() && mass > 0.0 { mass } else { 1.0 },
            bounce: unit(bounce),
            friction: unit(friction),
        }
    }

    /// Mass (informational; the bouncer ignores it)
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Fraction of vertical speed kept after a ground contact
    pub fn bounce(&self) -> f32 {
        self.bounce
    }

    /// Fraction of horizontal speed kept after a ground contact
    pub fn friction(&self) -> f32 {
        self.friction
    }
}

impl Default for PhysicsProfile {
    fn default() -> Self {
        Self {
            mass: 1.0,
            bounce: 0.8,
            friction: 0.95,
        }
    }
}

/// Everything needed to place a new object
#[derive(Debug)]
pub struct PlacementRequest {
    /// Catalog kind
    pub kind: ObjectKind,
    /// World-space position
    pub position: Vec3,
    /// Initial linear velocity (units/s)
    pub velocity: Vec3,
    /// Spin rate per axis (rad/s)
    pub angular_velocity: Vec3,
    /// Physics parameters
    pub physics: PhysicsProfile,
    /// Geometry description
    pub renderable: Renderable,
    /// Renderer handles, `None` if the upload failed
    pub resources: Option<RenderResources>,
}

impl PlacementRequest {
    /// Reject non-finite vectors
    pub fn validate(&self) -> EngineResult<()> {
        for (name, v) in [
            ("position", &self.position),
            ("velocity", &self.velocity),
            ("angular velocity", &self.angular_velocity),
        ] {
            if !is_finite_vec(v) {
                return Err(EngineError::InvalidInput(format!("{name} {v:?} is not finite")));
            }
        }
        Ok(())
    }
}

/// A simulated, rendered object owned by the scene registry
#[derive(Debug)]
pub struct PlaceableObject {
    pub(crate) id: ObjectId,
    pub(crate) kind: ObjectKind,
    pub(crate) transform: Transform,
    pub(crate) velocity: Vec3,
    pub(crate) angular_velocity: Vec3,
    pub(crate) physics: PhysicsProfile,
    pub(crate) state: LifecycleState,
    pub(crate) opacity: f32,
    pub(crate) origin_y: f32,
    pub(crate) phase: f32,
    pub(crate) despawn_delay: f32,
    pub(crate) resting: bool,
    pub(crate) renderable: Renderable,
    pub(crate) resources: Option<RenderResources>,
}

impl PlaceableObject {
    pub(crate) fn from_request(id: ObjectId, phase: f32, request: PlacementRequest) -> Self {
        let transform = Transform::from_position(request.position).with_uniform_scale(0.0);
        Self {
            id,
            kind: request.kind,
            origin_y: request.position.y,
            transform,
            velocity: request.velocity,
            angular_velocity: request.angular_velocity,
            physics: request.physics,
            state: LifecycleState::Spawning,
            opacity: 0.0,
            phase,
            despawn_delay: 0.0,
            resting: false,
            renderable: request.renderable,
            resources: request.resources,
        }
    }

    /// Object identifier
    pub fn id(&self) -> ObjectId {
        self.id
    }

    /// Catalog kind
    pub fn kind(&self) -> &ObjectKind {
        &self.kind
    }

    /// Current transform
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Linear velocity (units/s)
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Spin rate per axis (rad/s)
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    /// Physics parameters
    pub fn physics(&self) -> &PhysicsProfile {
        &self.physics
    }

    /// Lifecycle state
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Opacity driven by the lifecycle, `[0, 1]`
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Uniform scale
    pub fn scale(&self) -> f32 {
        self.transform.uniform_scale()
    }

    /// Whether physics has settled this object on the ground
    pub fn is_resting(&self) -> bool {
        self.resting
    }

    /// Geometry description
    pub fn renderable(&self) -> &Renderable {
        &self.renderable
    }

    /// Renderer handles, `None` once released (or if upload failed)
    pub fn resources(&self) -> Option<&RenderResources> {
        self.resources.as_ref()
    }

    /// Spawning or active
    pub fn is_live(&self) -> bool {
        matches!(self.state, LifecycleState::Spawning | LifecycleState::Active)
    }

    /// Replace the linear velocity, rejecting non-finite input
    pub fn set_velocity(&mut self, velocity: Vec3) -> EngineResult<()> {
        if !is_finite_vec(&velocity) {
            return Err(EngineError::InvalidInput(format!("velocity {velocity:?} is not finite")));
        }
        self.velocity = velocity;
        self.resting = false;
        Ok(())
    }

    /// Move the object, rejecting non-finite input
    pub fn set_position(&mut self, position: Vec3) -> EngineResult<()> {
        if !is_finite_vec(&position) {
            return Err(EngineError::InvalidInput(format!("position {position:?} is not finite")));
        }
        self.transform.position = position;
        self.origin_y = position.y;
        self.resting = false;
        Ok(())
    }

    /// Replace the physics profile
    pub fn set_physics(&mut self, physics: PhysicsProfile) {
        self.physics = physics;
    }

    /// Give up the renderer handles; a second call yields `None`
    pub(crate) fn take_resources(&mut self) -> Option<RenderResources> {
        self.resources.take()
    }
}
