//! Deferred user intents

use crate::foundation::math::Vec3;
use crate::input::Viewport;
use crate::lifecycle::AnimationStyle;
use crate::render::{CameraPose, LightingMode};
use crate::scene::{ObjectId, ObjectKind};

/// A user intent, applied at the start of the next tick
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Place the selected kind along the ray through a tapped pixel
    PlaceAt {
        /// Pixels from the left edge
        screen_x: f32,
        /// Pixels from the top edge
        screen_y: f32,
    },
    /// Drop an object at a random spot above the ground; `None` uses the
    /// selected kind
    AddRandom(Option<ObjectKind>),
    /// Despawn every object with a staggered fade
    ClearAll,
    /// Despawn one object
    Remove(ObjectId),
    /// Despawn the newest live object (undo the last placement)
    RemoveLast,
    /// Toggle physics for active objects
    SetPhysicsEnabled(bool),
    /// Switch between the animated and the static light rig
    SetLightingMode(LightingMode),
    /// Kind used by subsequent placements
    SelectKind(ObjectKind),
    /// Idle motion used while physics is off
    SetAnimationStyle(AnimationStyle),
    /// Idle motion speed multiplier, clamped to `[0.5, 3]`
    SetAnimationSpeed(f32),
    /// Toggle mutual repulsion between active objects
    SetInteractive(bool),
    /// Emit a particle burst around a point
    Burst {
        /// Burst centre
        origin: Vec3,
    },
    /// Host view resized
    SetViewport(Viewport),
    /// Host camera moved
    SetCameraPose(CameraPose),
}

impl Command {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::PlaceAt { .. } => "place_at",
            Self::AddRandom(_) => "add_random",
            Self::ClearAll => "clear_all",
            Self::Remove(_) => "remove",
            Self::RemoveLast => "remove_last",
            Self::SetPhysicsEnabled(_) => "set_physics_enabled",
            Self::SetLightingMode(_) => "set_lighting_mode",
            Self::SelectKind(_) => "select_kind",
            Self::SetAnimationStyle(_) => "set_animation_style",
            Self::SetAnimationSpeed(_) => "set_animation_speed",
            Self::SetInteractive(_) => "set_interactive",
            Self::Burst { .. } => "burst",
            Self::SetViewport(_) => "set_viewport",
            Self::SetCameraPose(_) => "set_camera_pose",
        }
    }
}
