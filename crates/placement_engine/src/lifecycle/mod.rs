//! Spawn / despawn lifecycle and idle animation
//!
//! Every object walks `Spawning → Active → Despawning → Removed` exactly
//! once. The controller advances that state machine by delta time; rates
//! are calibrated per reference tick so behaviour does not depend on the
//! host refresh rate.

pub mod animation;
pub mod controller;

pub use animation::{AnimationStyle, MAX_ANIMATION_SPEED, MIN_ANIMATION_SPEED};
pub use controller::{LifecycleController, LifecycleFrame};
