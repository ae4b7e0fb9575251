//! Configuration system
//!
//! Every tunable of the engine lives in [`EngineConfig`]. Files are loaded
//! as TOML or RON depending on the extension; missing fields fall back to
//! the defaults below, which reproduce the reference behaviour at 60 Hz.

pub use serde::{Deserialize, Serialize};

use crate::lifecycle::{AnimationStyle, MAX_ANIMATION_SPEED, MIN_ANIMATION_SPEED};
use crate::render::LightingMode;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid value for {field}: {reason}")]
    Invalid {
        /// Dotted field path
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Runtime-switchable behaviour modes
    pub modes: EngineModes,
    /// Point-mass physics tunables
    pub physics: PhysicsConfig,
    /// Spawn/despawn animation tunables
    pub lifecycle: LifecycleConfig,
    /// Tap placement and random spawn tunables
    pub placement: PlacementConfig,
    /// Scene-wide settings
    pub scene: SceneConfig,
    /// Particle burst tunables
    pub effects: EffectsConfig,
}

impl Config for EngineConfig {}

/// The switches that select engine behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineModes {
    /// Active objects run the physics integrator instead of idling
    pub physics_enabled: bool,
    /// Animate camera and point lights each tick
    pub lighting_mode: LightingMode,
    /// Idle animation used while physics is disabled
    pub animation_style: AnimationStyle,
    /// Active objects that come close push each other apart
    pub interactive: bool,
}

impl Default for EngineModes {
    fn default() -> Self {
        Self {
            physics_enabled: true,
            lighting_mode: LightingMode::Dynamic,
            animation_style: AnimationStyle::Float,
            interactive: false,
        }
    }
}

/// Physics configuration
///
/// Velocities are in world units per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Horizontal velocity retained per ground contact, `[0, 1]`
    pub friction: f32,
    /// Vertical speed below which a grounded object is considered at rest
    pub rest_threshold: f32,
    /// Max horizontal impulse added once when an object comes to rest
    pub rest_impulse: f32,
    /// Interactive mode: distance below which two objects repel
    pub repulsion_radius: f32,
    /// Interactive mode: separation per reference tick for each close neighbour
    pub repulsion_step: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 36.0,
            friction: 0.95,
            rest_threshold: 0.6,
            rest_impulse: 0.6,
            repulsion_radius: 2.0,
            repulsion_step: 0.01,
        }
    }
}

/// Lifecycle animation configuration
///
/// Rates are expressed per reference tick and scaled by delta time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifecycleConfig {
    /// Reference ticks per second the per-tick rates are calibrated for
    pub tick_rate: f32,
    /// Fraction of the remaining distance to full scale covered per tick
    pub spawn_rate: f32,
    /// Remaining distance below which spawn snaps to full scale
    pub spawn_epsilon: f32,
    /// Scale multiplier per tick while despawning
    pub despawn_scale_decay: f32,
    /// Opacity removed per tick while despawning
    pub despawn_fade_step: f32,
    /// Scale below which a despawning object is removed
    pub despawn_min_scale: f32,
    /// Delay between consecutive despawns of a clear-all, in milliseconds
    pub despawn_stagger_ms: f32,
    /// Initial idle animation speed multiplier
    pub animation_speed: f32,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            spawn_rate: 0.15,
            spawn_epsilon: 0.01,
            despawn_scale_decay: 0.92,
            despawn_fade_step: 0.08,
            despawn_min_scale: 0.1,
            despawn_stagger_ms: 80.0,
            animation_speed: 1.0,
        }
    }
}

/// Placement configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Distance along the tap ray at which objects are placed
    pub distance: f32,
    /// Largest dimension of a normalised external model
    pub model_target_size: f32,
    /// Random spawn volume half extent on X
    pub random_half_width: f32,
    /// Random spawn volume half extent on Z
    pub random_half_depth: f32,
    /// Random spawn height range, lower bound
    pub random_min_y: f32,
    /// Random spawn height range, upper bound
    pub random_max_y: f32,
    /// Max horizontal launch speed of randomly added objects
    pub random_speed: f32,
    /// Max horizontal launch speed of tap-placed objects
    pub tap_speed: f32,
    /// Max upward launch speed of tap-placed objects
    pub tap_lift: f32,
    /// Max spin rate of randomly added objects (rad/s per axis)
    pub random_spin: f32,
    /// Max spin rate of tap-placed objects (rad/s per axis)
    pub tap_spin: f32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            distance: 4.0,
            model_target_size: 1.2,
            random_half_width: 3.0,
            random_half_depth: 2.0,
            random_min_y: 2.0,
            random_max_y: 5.0,
            random_speed: 3.0,
            tap_speed: 6.0,
            tap_lift: 6.0,
            random_spin: 0.9,
            tap_spin: 1.2,
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Height of the ground plane objects bounce on
    pub ground_y: f32,
    /// Seed for placement and impulse randomness
    pub seed: u64,
    /// Vertical field of view of the default camera, in degrees
    pub default_fov_degrees: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            ground_y: -2.5,
            seed: 0x5EED,
            default_fov_degrees: 75.0,
        }
    }
}

/// Particle burst configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Particles emitted per burst
    pub burst_particles: usize,
    /// Delay between consecutive particle launches, in milliseconds
    pub burst_stagger_ms: f32,
    /// Velocity and opacity multiplier per tick
    pub particle_decay: f32,
    /// Opacity at which a particle is released
    pub particle_min_opacity: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            burst_particles: 20,
            burst_stagger_ms: 50.0,
            particle_decay: 0.98,
            particle_min_opacity: 0.01,
        }
    }
}

fn check_unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is not within [0, 1]"),
        })
    }
}

fn check_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a finite, non-negative number"),
        })
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be a finite, positive number"),
        })
    }
}

impl EngineConfig {
    /// Check every value against its allowed range
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        check_non_negative("physics.gravity", p.gravity)?;
        check_unit("physics.friction", p.friction)?;
        check_non_negative("physics.rest_threshold", p.rest_threshold)?;
        check_non_negative("physics.rest_impulse", p.rest_impulse)?;
        check_non_negative("physics.repulsion_radius", p.repulsion_radius)?;
        check_non_negative("physics.repulsion_step", p.repulsion_step)?;

        let l = &self.lifecycle;
        check_positive("lifecycle.tick_rate", l.tick_rate)?;
        check_positive("lifecycle.spawn_rate", l.spawn_rate)?;
        check_unit("lifecycle.spawn_rate", l.spawn_rate)?;
        check_positive("lifecycle.spawn_epsilon", l.spawn_epsilon)?;
        check_unit("lifecycle.despawn_scale_decay", l.despawn_scale_decay)?;
        check_positive("lifecycle.despawn_fade_step", l.despawn_fade_step)?;
        check_unit("lifecycle.despawn_min_scale", l.despawn_min_scale)?;
        check_non_negative("lifecycle.despawn_stagger_ms", l.despawn_stagger_ms)?;
        if !(MIN_ANIMATION_SPEED..=MAX_ANIMATION_SPEED).contains(&l.animation_speed) {
            return Err(ConfigError::Invalid {
                field: "lifecycle.animation_speed",
                reason: format!(
                    "{} is not within [{MIN_ANIMATION_SPEED}, {MAX_ANIMATION_SPEED}]",
                    l.animation_speed
                ),
            });
        }

        let pl = &self.placement;
        check_positive("placement.distance", pl.distance)?;
        check_positive("placement.model_target_size", pl.model_target_size)?;
        check_non_negative("placement.random_half_width", pl.random_half_width)?;
        check_non_negative("placement.random_half_depth", pl.random_half_depth)?;
        check_non_negative("placement.random_speed", pl.random_speed)?;
        check_non_negative("placement.tap_speed", pl.tap_speed)?;
        check_non_negative("placement.tap_lift", pl.tap_lift)?;
        check_non_negative("placement.random_spin", pl.random_spin)?;
        check_non_negative("placement.tap_spin", pl.tap_spin)?;
        if !(pl.random_min_y.is_finite() && pl.random_max_y.is_finite())
            || pl.random_min_y > pl.random_max_y
        {
            return Err(ConfigError::Invalid {
                field: "placement.random_min_y",
                reason: format!(
                    "range [{}, {}] is empty or not finite",
                    pl.random_min_y, pl.random_max_y
                ),
            });
        }

        if !self.scene.ground_y.is_finite() {
            return Err(ConfigError::Invalid {
                field: "scene.ground_y",
                reason: "must be finite".to_string(),
            });
        }
        check_positive("scene.default_fov_degrees", self.scene.default_fov_degrees)?;

        let e = &self.effects;
        check_non_negative("effects.burst_stagger_ms", e.burst_stagger_ms)?;
        check_unit("effects.particle_decay", e.particle_decay)?;
        check_positive("effects.particle_min_opacity", e.particle_min_opacity)?;

        Ok(())
    }
}
