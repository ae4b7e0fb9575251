//! Idle animation styles for objects with physics turned off

use serde::{Deserialize, Serialize};

use crate::scene::PlaceableObject;

/// Float style: bob amplitude (units)
const FLOAT_AMPLITUDE: f32 = 0.3;
/// Float style: spin around X and Y (rad/s)
const FLOAT_SPIN_X: f32 = 0.6;
const FLOAT_SPIN_Y: f32 = 0.9;

/// Breathe style: slower, deeper bob
const BREATHE_FREQUENCY: f32 = 0.8;
const BREATHE_AMPLITUDE: f32 = 0.4;
/// Breathe style: scale pulse
const PULSE_FREQUENCY: f32 = 2.0;
const PULSE_AMPLITUDE: f32 = 0.05;
const BREATHE_SPIN_Y: f32 = 0.48;

/// Orbit style: circle radius around the world origin (units)
const ORBIT_RADIUS: f32 = 2.0;

/// Pulse style: scale oscillation
const THROB_FREQUENCY: f32 = 3.0;
const THROB_AMPLITUDE: f32 = 0.2;

/// Slowest idle animation speed multiplier
pub const MIN_ANIMATION_SPEED: f32 = 0.5;
/// Fastest idle animation speed multiplier
pub const MAX_ANIMATION_SPEED: f32 = 3.0;

/// How active objects move while physics is disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AnimationStyle {
    /// Bob around the placement height while tumbling slowly
    #[default]
    Float,
    /// Deeper bob with a gentle scale pulse, spinning on Y only
    Breathe,
    /// Circle the world origin at the placement height
    Orbit,
    /// Throb in place
    Pulse,
    /// No idle motion
    Still,
}

impl AnimationStyle {
    /// Every style, in display order
    pub const ALL: [AnimationStyle; 5] = [
        Self::Float,
        Self::Breathe,
        Self::Orbit,
        Self::Pulse,
        Self::Still,
    ];

    /// Lower-case name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Breathe => "breathe",
            Self::Orbit => "orbit",
            Self::Pulse => "pulse",
            Self::Still => "still",
        }
    }

    /// Apply one tick of idle motion
    ///
    /// Positions and scale are absolute (functions of `time`), spin is
    /// integrated. Callers scale both arguments by the speed multiplier.
    pub(crate) fn animate(&self, object: &mut PlaceableObject, delta_time: f32, time: f32) {
        let phase = object.phase;
        let transform = &mut object.transform;
        match self {
            Self::Float => {
                transform.position.y = object.origin_y + (time + phase).sin() * FLOAT_AMPLITUDE;
                transform.rotation.x += FLOAT_SPIN_X * delta_time;
                transform.rotation.y += FLOAT_SPIN_Y * delta_time;
                transform.set_uniform_scale(1.0);
            }
            Self::Breathe => {
                transform.position.y =
                    object.origin_y + (BREATHE_FREQUENCY * time + phase).sin() * BREATHE_AMPLITUDE;
                transform.rotation.y += BREATHE_SPIN_Y * delta_time;
                let pulse = (PULSE_FREQUENCY * time + 0.5 * phase).sin() * PULSE_AMPLITUDE;
                transform.set_uniform_scale(1.0 + pulse);
            }
            Self::Orbit => {
                let angle = time + phase;
                transform.position.x = angle.cos() * ORBIT_RADIUS;
                transform.position.y = object.origin_y;
                transform.position.z = angle.sin() * ORBIT_RADIUS;
                transform.set_uniform_scale(1.0);
            }
            Self::Pulse => {
                let throb = (THROB_FREQUENCY * time + phase).sin() * THROB_AMPLITUDE;
                transform.set_uniform_scale(1.0 + throb);
            }
            Self::Still => transform.set_uniform_scale(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::{MaterialDesc, PrimitiveShape, Renderable};
    use crate::scene::{ObjectId, ObjectKind, PhysicsProfile, PlacementRequest};
    use approx::assert_relative_eq;

    fn object(phase: f32) -> PlaceableObject {
        let request = PlacementRequest {
            kind: ObjectKind::Torus,
            position: Vec3::new(1.0, 2.0, -3.0),
            velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            physics: PhysicsProfile::default(),
            renderable: Renderable::primitive(
                "torus",
                PrimitiveShape::Torus {
                    radius: 0.4,
                    tube: 0.15,
                },
                MaterialDesc::phong(0),
            ),
            resources: None,
        };
        let mut object = PlaceableObject::from_request(ObjectId(1), phase, request);
        object.transform.set_uniform_scale(1.0);
        object
    }

    #[test]
    fn test_float_bobs_around_origin() {
        let mut obj = object(1.0);
        AnimationStyle::Float.animate(&mut obj, 0.5, 2.0);

        assert_relative_eq!(obj.transform.position.y, 2.0 + 3.0_f32.sin() * 0.3);
        assert_relative_eq!(obj.transform.rotation, Vec3::new(0.3, 0.45, 0.0));
        assert_relative_eq!(obj.scale(), 1.0);
    }

    #[test]
    fn test_breathe_pulses_scale() {
        let mut obj = object(2.0);
        AnimationStyle::Breathe.animate(&mut obj, 1.0, 0.5);

        assert_relative_eq!(obj.transform.position.y, 2.0 + 2.4_f32.sin() * 0.4, epsilon = 1e-6);
        assert_relative_eq!(obj.scale(), 1.0 + 2.0_f32.sin() * 0.05, epsilon = 1e-6);
        assert_relative_eq!(obj.transform.rotation.y, 0.48);
        assert_eq!(obj.transform.rotation.x, 0.0);
    }

    #[test]
    fn test_orbit_circles_origin_at_placement_height() {
        let mut obj = object(0.5);
        AnimationStyle::Orbit.animate(&mut obj, 0.1, 1.0);

        let p = obj.transform.position;
        assert_relative_eq!(p.x, 1.5f32.cos() * 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, 1.5f32.sin() * 2.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(Vec3::new(p.x, 0.0, p.z).norm(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_pulse_throbs_in_place() {
        let mut obj = object(1.0);
        AnimationStyle::Pulse.animate(&mut obj, 0.1, 0.25);

        assert_relative_eq!(obj.scale(), 1.0 + 1.75f32.sin() * 0.2, epsilon = 1e-6);
        assert_eq!(obj.transform.position, Vec3::new(1.0, 2.0, -3.0));
    }

    #[test]
    fn test_still_does_not_move() {
        let mut obj = object(0.0);
        AnimationStyle::Still.animate(&mut obj, 1.0, 10.0);

        assert_eq!(obj.transform.position, Vec3::new(1.0, 2.0, -3.0));
        assert_eq!(obj.transform.rotation, Vec3::zeros());
    }
}
