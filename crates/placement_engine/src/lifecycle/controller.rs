//! Lifecycle state machine

use rand::Rng;

use crate::config::LifecycleConfig;
use crate::error::EngineResult;
use crate::foundation::math::utils;
use crate::lifecycle::AnimationStyle;
use crate::physics::PhysicsIntegrator;
use crate::scene::{LifecycleState, PlaceableObject};

/// Per-tick inputs shared by every object
#[derive(Debug, Clone, Copy)]
pub struct LifecycleFrame {
    /// Seconds since the previous tick
    pub delta_time: f32,
    /// Idle animation clock: simulated seconds scaled by the speed
    /// multiplier in effect at each tick
    pub time: f32,
    /// Idle animation speed multiplier
    pub animation_speed: f32,
    /// Whether active objects are driven by physics
    pub physics_enabled: bool,
    /// Idle motion used when physics is disabled
    pub animation_style: AnimationStyle,
    /// Ground plane height
    pub ground_y: f32,
}

/// Advances spawn growth, active behaviour and despawn fade
#[derive(Debug, Clone)]
pub struct LifecycleController {
    config: LifecycleConfig,
}

impl LifecycleController {
    /// Create a controller from configuration
    pub fn new(config: LifecycleConfig) -> Self {
        Self { config }
    }

    /// Stagger between consecutive despawns of a clear-all, in seconds
    pub fn despawn_stagger(&self) -> f32 {
        self.config.despawn_stagger_ms / 1000.0
    }

    /// Advance one object by one tick
    ///
    /// Returns the new state when the object changed state this tick.
    ///
    /// # Errors
    /// Propagates physics failures; the object is left as it was before
    /// the failing step.
    pub fn update<R: Rng + ?Sized>(
        &self,
        object: &mut PlaceableObject,
        frame: &LifecycleFrame,
        physics: &PhysicsIntegrator,
        rng: &mut R,
    ) -> EngineResult<Option<LifecycleState>> {
        let dt = frame.delta_time;
        match object.state {
            LifecycleState::Spawning => Ok(self.grow(object, dt)),
            LifecycleState::Active => {
                Self::active(object, frame, physics, rng)?;
                Ok(None)
            }
            LifecycleState::Despawning => {
                if object.despawn_delay > 0.0 {
                    object.despawn_delay = (object.despawn_delay - dt).max(0.0);
                    // objects cleared mid-spawn hold still until their fade starts
                    if object.opacity >= 1.0 {
                        Self::active(object, frame, physics, rng)?;
                    }
                    return Ok(None);
                }
                Ok(self.shrink(object, dt))
            }
            LifecycleState::Removed => Ok(None),
        }
    }

    fn grow(&self, object: &mut PlaceableObject, dt: f32) -> Option<LifecycleState> {
        let scale = object.scale();
        let step = utils::rate_fraction(self.config.spawn_rate, dt, self.config.tick_rate);
        let mut next = scale + (1.0 - scale) * step;

        let activated = 1.0 - next < self.config.spawn_epsilon;
        if activated {
            next = 1.0;
            object.state = LifecycleState::Active;
        }
        object.transform.set_uniform_scale(next);
        object.opacity = next;

        activated.then_some(LifecycleState::Active)
    }

    fn active<R: Rng + ?Sized>(
        object: &mut PlaceableObject,
        frame: &LifecycleFrame,
        physics: &PhysicsIntegrator,
        rng: &mut R,
    ) -> EngineResult<()> {
        if frame.physics_enabled {
            physics.step(object, frame.delta_time, frame.ground_y, rng)
        } else {
            frame.animation_style.animate(
                object,
                frame.delta_time * frame.animation_speed,
                frame.time,
            );
            Ok(())
        }
    }

    fn shrink(&self, object: &mut PlaceableObject, dt: f32) -> Option<LifecycleState> {
        let ticks = dt * self.config.tick_rate;
        let decay = utils::decay_factor(self.config.despawn_scale_decay, dt, self.config.tick_rate);
        let scale = object.scale() * decay;
        let opacity = (object.opacity - self.config.despawn_fade_step * ticks).max(0.0);

        object.transform.set_uniform_scale(scale);
        object.opacity = opacity;

        if scale < self.config.despawn_min_scale || opacity <= 0.0 {
            object.state = LifecycleState::Removed;
            Some(LifecycleState::Removed)
        } else {
            None
        }
    }
}

impl Default for LifecycleController {
    fn default() -> Self {
        Self::new(LifecycleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::foundation::math::Vec3;
    use crate::render::{MaterialDesc, PrimitiveShape, Renderable};
    use crate::scene::{ObjectId, ObjectKind, PhysicsProfile, PlacementRequest};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    fn object() -> PlaceableObject {
        let request = PlacementRequest {
            kind: ObjectKind::Cube,
            position: Vec3::new(0.0, 1.0, 0.0),
            velocity: Vec3::zeros(),
            angular_velocity: Vec3::zeros(),
            physics: PhysicsProfile::default(),
            renderable: Renderable::primitive(
                "cube",
                PrimitiveShape::Box {
                    width: 1.0,
                    height: 1.0,
                    depth: 1.0,
                },
                MaterialDesc::phong(0),
            ),
            resources: None,
        };
        PlaceableObject::from_request(ObjectId(1), 0.0, request)
    }

    fn frame(physics_enabled: bool, time: f32) -> LifecycleFrame {
        LifecycleFrame {
            delta_time: DT,
            time,
            animation_speed: 1.0,
            physics_enabled,
            animation_style: AnimationStyle::Still,
            ground_y: -2.5,
        }
    }

    fn physics() -> PhysicsIntegrator {
        PhysicsIntegrator::new(&PhysicsConfig::default(), 60.0)
    }

    fn run_until_active(controller: &LifecycleController, obj: &mut PlaceableObject) -> usize {
        let physics = physics();
        let mut rng = StdRng::seed_from_u64(0);
        let mut ticks = 0;
        while obj.state() == LifecycleState::Spawning {
            controller
                .update(obj, &frame(false, 0.0), &physics, &mut rng)
                .unwrap();
            ticks += 1;
            assert!(ticks < 1000);
        }
        ticks
    }

    #[test]
    fn test_spawn_converges_monotonically() {
        let controller = LifecycleController::default();
        let physics = physics();
        let mut rng = StdRng::seed_from_u64(0);
        let mut obj = object();

        let mut previous = obj.scale();
        let mut ticks = 0;
        while obj.state() == LifecycleState::Spawning {
            controller
                .update(&mut obj, &frame(false, 0.0), &physics, &mut rng)
                .unwrap();
            assert!(obj.scale() >= previous);
            assert!(obj.scale() <= 1.0);
            assert_eq!(obj.opacity(), obj.scale());
            previous = obj.scale();
            ticks += 1;
        }

        // (1 - 0.15)^n < 0.01 first holds at n = 29
        assert_eq!(ticks, 29);
        assert_eq!(obj.scale(), 1.0);
        assert_eq!(obj.state(), LifecycleState::Active);
    }

    #[test]
    fn test_spawn_is_frame_rate_independent() {
        let controller = LifecycleController::default();
        let physics = physics();
        let mut rng = StdRng::seed_from_u64(0);
        let mut fast = object();
        let mut slow = object();

        for _ in 0..6 {
            controller
                .update(&mut fast, &frame(false, 0.0), &physics, &mut rng)
                .unwrap();
        }
        let mut slow_frame = frame(false, 0.0);
        slow_frame.delta_time = 3.0 * DT;
        for _ in 0..2 {
            controller
                .update(&mut slow, &slow_frame, &physics, &mut rng)
                .unwrap();
        }

        assert_relative_eq!(fast.scale(), slow.scale(), epsilon = 1e-5);
    }

    #[test]
    fn test_zero_delta_does_not_advance_spawn() {
        let controller = LifecycleController::default();
        let physics = physics();
        let mut rng = StdRng::seed_from_u64(0);
        let mut obj = object();

        let mut still = frame(false, 0.0);
        still.delta_time = 0.0;
        controller.update(&mut obj, &still, &physics, &mut rng).unwrap();
        assert_eq!(obj.scale(), 0.0);
        assert_eq!(obj.state(), LifecycleState::Spawning);
    }

    #[test]
    fn test_despawn_terminates() {
        let controller = LifecycleController::default();
        let physics = physics();
        let mut rng = StdRng::seed_from_u64(0);
        let mut obj = object();
        run_until_active(&controller, &mut obj);

        obj.state = LifecycleState::Despawning;
        let mut ticks = 0;
        let mut removed = None;
        while obj.state() != LifecycleState::Removed {
            removed = controller
                .update(&mut obj, &frame(false, 0.0), &physics, &mut rng)
                .unwrap();
            assert!(obj.opacity() >= 0.0);
            assert!(obj.scale() >= 0.0);
            ticks += 1;
            assert!(ticks <= 13, "despawn took {ticks} ticks");
        }
        assert_eq!(removed, Some(LifecycleState::Removed));

        // terminal
        let again = controller
            .update(&mut obj, &frame(false, 0.0), &physics, &mut rng)
            .unwrap();
        assert_eq!(again, None);
        assert_eq!(obj.state(), LifecycleState::Removed);
    }

    #[test]
    fn test_despawn_waits_for_stagger_delay() {
        let controller = LifecycleController::default();
        let physics = physics();
        let mut rng = StdRng::seed_from_u64(0);
        let mut obj = object();
        run_until_active(&controller, &mut obj);

        obj.state = LifecycleState::Despawning;
        obj.despawn_delay = 0.08;
        for _ in 0..4 {
            controller
                .update(&mut obj, &frame(false, 0.0), &physics, &mut rng)
                .unwrap();
            assert_eq!(obj.scale(), 1.0);
        }
        for _ in 0..2 {
            controller
                .update(&mut obj, &frame(false, 0.0), &physics, &mut rng)
                .unwrap();
        }
        assert!(obj.scale() < 1.0);
    }

    #[test]
    fn test_animation_speed_scales_idle_spin() {
        let controller = LifecycleController::default();
        let physics = physics();
        let mut rng = StdRng::seed_from_u64(0);
        let mut normal = object();
        let mut fast = object();
        run_until_active(&controller, &mut normal);
        run_until_active(&controller, &mut fast);

        let mut float = frame(false, 0.0);
        float.animation_style = AnimationStyle::Float;
        controller.update(&mut normal, &float, &physics, &mut rng).unwrap();
        float.animation_speed = 2.0;
        controller.update(&mut fast, &float, &physics, &mut rng).unwrap();

        assert_relative_eq!(fast.transform().rotation.y, 2.0 * normal.transform().rotation.y);
        assert_relative_eq!(normal.transform().rotation.y, 0.9 * DT);
    }

    #[test]
    fn test_active_object_falls_with_physics() {
        let controller = LifecycleController::default();
        let physics = physics();
        let mut rng = StdRng::seed_from_u64(0);
        let mut obj = object();
        run_until_active(&controller, &mut obj);

        controller
            .update(&mut obj, &frame(true, 0.0), &physics, &mut rng)
            .unwrap();
        assert!(obj.transform().position.y < 1.0);
        assert!(obj.velocity().y < 0.0);
    }

    #[test]
    fn test_spawning_object_ignores_physics() {
        let controller = LifecycleController::default();
        let physics = physics();
        let mut rng = StdRng::seed_from_u64(0);
        let mut obj = object();

        controller
            .update(&mut obj, &frame(true, 0.0), &physics, &mut rng)
            .unwrap();
        assert_eq!(obj.transform().position.y, 1.0);
    }
}
