//! Visual effects that live outside the scene registry

pub mod burst;

pub use burst::{BurstSystem, Particle, ParticleKey};
