//! Particle bursts
//!
//! A burst scatters small unlit spheres around a point. Each particle waits
//! for its stagger delay, then drifts while its speed and opacity decay
//! geometrically; once it is nearly invisible its renderer resources are
//! released and it leaves the pool.

use rand::Rng;
use slotmap::{new_key_type, SlotMap};

use crate::config::EffectsConfig;
use crate::foundation::math::{utils, Vec3};
use crate::render::{MaterialDesc, PrimitiveShape, RenderBackend, RenderResources, Renderable};

new_key_type! {
    /// Stable handle to a live particle
    pub struct ParticleKey;
}

const PARTICLE_RADIUS: f32 = 0.05;
const INITIAL_OPACITY: f32 = 0.8;
/// Scatter box around the burst origin (half-width, height)
const SCATTER_HALF_WIDTH: f32 = 1.0;
const SCATTER_HEIGHT: f32 = 2.0;
/// Per-tick launch speeds at the reference rate
const LAUNCH_HORIZONTAL: f32 = 0.25;
const LAUNCH_VERTICAL: f32 = 0.3;

/// One burst particle
#[derive(Debug)]
pub struct Particle {
    /// World position
    pub position: Vec3,
    /// Units per second
    pub velocity: Vec3,
    /// RGB colour as 0xRRGGBB
    pub color: u32,
    /// Current opacity
    pub opacity: f32,
    /// Seconds left before the particle starts moving
    pub delay: f32,
    resources: Option<RenderResources>,
}

impl Particle {
    /// Renderer handles, if the upload succeeded
    pub fn resources(&self) -> Option<&RenderResources> {
        self.resources.as_ref()
    }
}

/// Pool of in-flight burst particles
#[derive(Debug)]
pub struct BurstSystem {
    particles: SlotMap<ParticleKey, Particle>,
    config: EffectsConfig,
    tick_rate: f32,
}

impl BurstSystem {
    /// Create an empty pool
    pub fn new(config: EffectsConfig, tick_rate: f32) -> Self {
        Self {
            particles: SlotMap::with_key(),
            config,
            tick_rate,
        }
    }

    /// Emit a burst around `origin`, returning how many particles were spawned
    ///
    /// A particle whose upload fails is skipped.
    pub fn burst<R: Rng + ?Sized>(
        &mut self,
        origin: Vec3,
        renderer: &mut dyn RenderBackend,
        rng: &mut R,
    ) -> usize {
        let stagger = self.config.burst_stagger_ms / 1000.0;
        let mut spawned = 0;

        for i in 0..self.config.burst_particles {
            let color = rng.gen_range(0..=0xFF_FFFF_u32);
            let renderable = Renderable::primitive(
                "particle",
                PrimitiveShape::Sphere {
                    radius: PARTICLE_RADIUS,
                    segments: 8,
                },
                MaterialDesc::unlit(color, INITIAL_OPACITY),
            );
            let resources = match renderer.upload(&renderable) {
                Ok(resources) => resources,
                Err(e) => {
                    log::warn!("Skipping burst particle {}: {}", i, e);
                    continue;
                }
            };

            let offset = Vec3::new(
                rng.gen_range(-SCATTER_HALF_WIDTH..SCATTER_HALF_WIDTH),
                rng.gen_range(0.0..SCATTER_HEIGHT),
                rng.gen_range(-SCATTER_HALF_WIDTH..SCATTER_HALF_WIDTH),
            );
            let velocity = Vec3::new(
                rng.gen_range(-LAUNCH_HORIZONTAL..LAUNCH_HORIZONTAL),
                rng.gen_range(0.0..LAUNCH_VERTICAL),
                rng.gen_range(-LAUNCH_HORIZONTAL..LAUNCH_HORIZONTAL),
            ) * self.tick_rate;

            self.particles.insert(Particle {
                position: origin + offset,
                velocity,
                color,
                opacity: INITIAL_OPACITY,
                delay: i as f32 * stagger,
                resources: Some(resources),
            });
            spawned += 1;
        }

        log::debug!("Burst at {:?}: {} particles", origin, spawned);
        spawned
    }

    /// Advance every particle; returns how many were released
    pub fn update(&mut self, delta_time: f32, renderer: &mut dyn RenderBackend) -> usize {
        let decay = utils::decay_factor(self.config.particle_decay, delta_time, self.tick_rate);
        let min_opacity = self.config.particle_min_opacity;
        let mut expired = Vec::new();

        for (key, particle) in self.particles.iter_mut() {
            if particle.delay > 0.0 {
                particle.delay -= delta_time;
                continue;
            }
            particle.position += particle.velocity * delta_time;
            particle.velocity *= decay;
            particle.opacity *= decay;
            if particle.opacity <= min_opacity {
                expired.push(key);
            }
        }

        for &key in &expired {
            self.release(key, renderer);
        }
        expired.len()
    }

    /// Release every particle immediately
    pub fn teardown(&mut self, renderer: &mut dyn RenderBackend) -> usize {
        let keys: Vec<_> = self.particles.keys().collect();
        for &key in &keys {
            self.release(key, renderer);
        }
        keys.len()
    }

    fn release(&mut self, key: ParticleKey, renderer: &mut dyn RenderBackend) {
        let Some(mut particle) = self.particles.remove(key) else {
            return;
        };
        if let Some(resources) = particle.resources.take() {
            if let Err(e) = renderer.dispose(resources.geometry, resources.material) {
                log::error!("Failed to release burst particle: {}", e);
            }
        }
    }

    /// Live particles
    pub fn particles(&self) -> impl Iterator<Item = (ParticleKey, &Particle)> {
        self.particles.iter()
    }

    /// Look up a particle
    pub fn get(&self, key: ParticleKey) -> Option<&Particle> {
        self.particles.get(key)
    }

    /// Number of live particles
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether no particle is live
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
