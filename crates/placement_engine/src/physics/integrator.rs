//! Semi-implicit Euler integration with ground bounce
//!
//! One call to [`PhysicsIntegrator::step`] advances a single object by `dt`
//! seconds:
//!
//! 1. `v.y -= gravity * dt`
//! 2. `p += v * dt`
//! 3. below the ground: clamp, reflect `v.y` scaled by the bounce
//!    coefficient, scale horizontal velocity by friction. If the rebound is
//!    slower than the rest threshold the object settles: `v.y = 0` and, the
//!    first time only, a small random horizontal nudge is applied. The
//!    threshold never drops below `gravity * dt`, one step's worth of fall.
//! 4. `rotation += angular_velocity * dt`
//!
//! A settled object skips gravity entirely and slides on the ground while
//! friction bleeds off its horizontal speed, so it never jitters between
//! tiny bounces.

use rand::Rng;

use crate::config::PhysicsConfig;
use crate::error::{EngineError, EngineResult};
use crate::foundation::math::{is_finite_vec, utils, Vec3};
use crate::scene::PlaceableObject;

/// Height above the ground (world units) at which a settled object wakes up
const WAKE_HEIGHT: f32 = 1e-4;

/// Integrates the bouncer model for placed objects
#[derive(Debug, Clone)]
pub struct PhysicsIntegrator {
    gravity: f32,
    rest_threshold: f32,
    rest_impulse: f32,
    tick_rate: f32,
}

impl PhysicsIntegrator {
    /// Build from configuration; `tick_rate` is the reference rate friction
    /// is expressed against while sliding
    pub fn new(config: &PhysicsConfig, tick_rate: f32) -> Self {
        Self {
            gravity: config.gravity,
            rest_threshold: config.rest_threshold,
            rest_impulse: config.rest_impulse,
            tick_rate,
        }
    }

    /// Downward acceleration in units/s²
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Advance one object by `dt` seconds
    ///
    /// # Errors
    /// [`EngineError::InvalidInput`] for a negative or non-finite `dt`, or
    /// when the step would produce non-finite state. The object is left
    /// untouched in both cases.
    pub fn step<R: Rng + ?Sized>(
        &self,
        object: &mut PlaceableObject,
        dt: f32,
        ground_y: f32,
        rng: &mut R,
    ) -> EngineResult<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(EngineError::InvalidInput(format!("delta time {dt} is not usable")));
        }

        let mut position = object.transform.position;
        let mut velocity = object.velocity;
        let mut resting = object.resting;
        let friction = object.physics.friction();

        if resting && (velocity.y > 0.0 || position.y > ground_y + WAKE_HEIGHT) {
            resting = false;
        }

        if resting {
            let slide = utils::decay_factor(friction, dt, self.tick_rate);
            velocity.x *= slide;
            velocity.z *= slide;
            velocity.y = 0.0;
            position += velocity * dt;
            position.y = ground_y;
        } else {
            velocity.y -= self.gravity * dt;
            position += velocity * dt;

            if position.y < ground_y {
                position.y = ground_y;
                velocity.y = -velocity.y * object.physics.bounce();
                velocity.x *= friction;
                velocity.z *= friction;

                if velocity.y.abs() < self.rest_threshold.max(self.gravity * dt) {
                    velocity.y = 0.0;
                    resting = true;
                    velocity += self.rest_nudge(rng);
                }
            }
        }

        let rotation = object.transform.rotation + object.angular_velocity * dt;

        if !(is_finite_vec(&position) && is_finite_vec(&velocity) && is_finite_vec(&rotation)) {
            return Err(EngineError::InvalidInput(format!(
                "integrating {} produced non-finite state",
                object.id
            )));
        }

        if resting && !object.resting {
            log::trace!("{} settled at {:?}", object.id, position);
        }
        object.transform.position = position;
        object.transform.rotation = rotation;
        object.velocity = velocity;
        object.resting = resting;
        Ok(())
    }

    fn rest_nudge<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let mut jitter = || (rng.gen::<f32>() * 2.0 - 1.0) * self.rest_impulse;
        Vec3::new(jitter(), 0.0, jitter())
    }
}
