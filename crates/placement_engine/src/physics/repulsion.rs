//! Interactive mode: active objects that come close push each other apart
//!
//! Every active object moves away from each active neighbour closer than
//! the repulsion radius by `step` units per reference tick. Displacements
//! are computed from one snapshot of positions, so the result does not
//! depend on iteration order. The push is horizontal: heights belong to
//! the integrator and the idle animations.

use crate::config::PhysicsConfig;
use crate::foundation::math::Vec3;
use crate::scene::{LifecycleState, PlaceableObject};

/// Horizontal separation below which two objects count as stacked
const MIN_SEPARATION: f32 = 1e-6;

/// Pairwise repulsion between active objects
#[derive(Debug, Clone)]
pub struct Repulsion {
    radius: f32,
    step: f32,
    tick_rate: f32,
}

impl Repulsion {
    /// Build from configuration; `step` is expressed per reference tick
    pub fn new(config: &PhysicsConfig, tick_rate: f32) -> Self {
        Self {
            radius: config.repulsion_radius,
            step: config.repulsion_step,
            tick_rate,
        }
    }

    /// Push close active objects apart for `dt` seconds
    ///
    /// Returns the number of close pairs found.
    pub fn apply(&self, objects: &mut [PlaceableObject], dt: f32) -> usize {
        if !(dt.is_finite() && dt > 0.0) {
            return 0;
        }

        let active: Vec<(usize, Vec3)> = objects
            .iter()
            .enumerate()
            .filter(|(_, o)| o.state == LifecycleState::Active)
            .map(|(index, o)| (index, o.transform.position))
            .collect();

        let distance = self.step * dt * self.tick_rate;
        let mut offsets = vec![Vec3::zeros(); active.len()];
        let mut pairs = 0;

        for a in 0..active.len() {
            for b in (a + 1)..active.len() {
                let delta = active[a].1 - active[b].1;
                if delta.norm() >= self.radius {
                    continue;
                }
                pairs += 1;

                let flat = Vec3::new(delta.x, 0.0, delta.z);
                let separation = flat.norm();
                if separation < MIN_SEPARATION {
                    continue;
                }
                let push = flat / separation * distance;
                offsets[a] += push;
                offsets[b] -= push;
            }
        }

        for ((index, _), offset) in active.iter().zip(offsets) {
            objects[*index].transform.position += offset;
        }
        pairs
    }
}
