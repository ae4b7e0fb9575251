//! Owned simulation state
//!
//! Everything a tick reads or writes lives in one [`SimulationContext`]:
//! the registry, camera and lights, the active modes, the model cache,
//! particles, the event queue and the seeded random source. Renderer and
//! loader are passed in per call so the context stays free of host types.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::assets::{ModelCache, ModelLoader};
use crate::config::{EngineConfig, EngineModes};
use crate::effects::BurstSystem;
use crate::error::{EngineError, EngineResult};
use crate::events::{EngineEvent, EventQueue};
use crate::foundation::math::Vec3;
use crate::foundation::time::{FrameClock, DEFAULT_MAX_DELTA};
use crate::input::{PlacementRaycaster, Viewport};
use crate::lifecycle::{
    AnimationStyle, LifecycleController, LifecycleFrame, MAX_ANIMATION_SPEED, MIN_ANIMATION_SPEED,
};
use crate::physics::{PhysicsIntegrator, Repulsion};
use crate::render::{
    CameraPose, CameraRig, FrameSnapshot, LightRig, LightingMode, RenderBackend,
};
use crate::scene::{LifecycleState, ObjectId, ObjectKind, PlacementRequest, SceneRegistry};
use crate::scheduler::Command;

const DEFAULT_NEAR: f32 = 0.1;
const DEFAULT_FAR: f32 = 1000.0;
const DEFAULT_ASPECT: f32 = 16.0 / 9.0;

/// Initial velocity and spin of a new object
struct Launch {
    velocity: Vec3,
    spin: Vec3,
}

/// State shared by every stage of a tick
#[derive(Debug)]
pub struct SimulationContext {
    config: EngineConfig,
    registry: SceneRegistry,
    camera: CameraRig,
    lights: LightRig,
    viewport: Viewport,
    modes: EngineModes,
    selected: ObjectKind,
    models: ModelCache,
    bursts: BurstSystem,
    events: EventQueue,
    clock: FrameClock,
    raycaster: PlacementRaycaster,
    physics: PhysicsIntegrator,
    repulsion: Repulsion,
    lifecycle: LifecycleController,
    animation_speed: f32,
    animation_time: f32,
    rng: StdRng,
    published_count: usize,
}

impl SimulationContext {
    /// Build an empty scene from configuration
    pub fn new(config: EngineConfig) -> Self {
        let modes = config.modes;
        let tick_rate = config.lifecycle.tick_rate;
        Self {
            registry: SceneRegistry::new(config.scene.ground_y, modes.lighting_mode),
            camera: CameraRig::new(),
            lights: LightRig::for_mode(modes.lighting_mode),
            viewport: Viewport::default(),
            modes,
            selected: ObjectKind::default(),
            models: ModelCache::new(config.placement.model_target_size),
            bursts: BurstSystem::new(config.effects.clone(), tick_rate),
            events: EventQueue::new(),
            clock: FrameClock::new(DEFAULT_MAX_DELTA),
            raycaster: PlacementRaycaster::from_config(&config.placement),
            physics: PhysicsIntegrator::new(&config.physics, tick_rate),
            repulsion: Repulsion::new(&config.physics, tick_rate),
            lifecycle: LifecycleController::new(config.lifecycle.clone()),
            animation_speed: config.lifecycle.animation_speed,
            animation_time: 0.0,
            rng: StdRng::seed_from_u64(config.scene.seed),
            published_count: 0,
            config,
        }
    }

    /// Apply one queued command
    ///
    /// Failures are logged and leave the scene unchanged.
    pub fn apply(
        &mut self,
        command: Command,
        renderer: &mut dyn RenderBackend,
        loader: &mut dyn ModelLoader,
    ) {
        log::trace!("Applying {}", command.name());
        match command {
            Command::PlaceAt { screen_x, screen_y } => {
                if let Err(e) = self.place_at(screen_x, screen_y, renderer, loader) {
                    match e {
                        EngineError::NotReady(_) => log::debug!("Tap ignored: {}", e),
                        _ => log::warn!("Tap ignored: {}", e),
                    }
                }
            }
            Command::AddRandom(kind) => {
                let kind = kind.unwrap_or_else(|| self.selected.clone());
                if let Err(e) = self.add_random(kind, renderer, loader) {
                    log::warn!("Random placement failed: {}", e);
                }
            }
            Command::ClearAll => {
                let count = self.registry.clear_all(self.lifecycle.despawn_stagger());
                log::info!("Clearing {} objects", count);
            }
            Command::Remove(id) => {
                if !self.registry.remove(id) {
                    log::debug!("Remove of {} ignored: unknown or already despawning", id);
                }
            }
            Command::RemoveLast => match self.registry.last_live_id() {
                Some(id) => {
                    self.registry.remove(id);
                    log::info!("Removing last placed {}", id);
                }
                None => log::debug!("Remove last ignored: nothing placed"),
            },
            Command::SetPhysicsEnabled(enabled) => self.set_physics_enabled(enabled),
            Command::SetLightingMode(mode) => self.set_lighting_mode(mode),
            Command::SelectKind(kind) => self.select_kind(kind, loader),
            Command::SetAnimationStyle(style) => self.set_animation_style(style),
            Command::SetAnimationSpeed(speed) => self.set_animation_speed(speed),
            Command::SetInteractive(enabled) => self.set_interactive(enabled),
            Command::Burst { origin } => {
                let particles = self.bursts.burst(origin, renderer, &mut self.rng);
                self.events.send(EngineEvent::BurstEmitted { particles });
            }
            Command::SetViewport(viewport) => self.set_viewport(viewport),
            Command::SetCameraPose(pose) => {
                if pose.is_valid() {
                    self.camera.set_pose(pose);
                } else {
                    log::warn!("Ignoring degenerate camera pose {:?}", pose);
                }
            }
        }
    }

    fn place_at(
        &mut self,
        screen_x: f32,
        screen_y: f32,
        renderer: &mut dyn RenderBackend,
        loader: &mut dyn ModelLoader,
    ) -> EngineResult<ObjectId> {
        let target = self
            .raycaster
            .target(screen_x, screen_y, &self.viewport, self.camera.pose())?;

        let p = &self.config.placement;
        let rng = &mut self.rng;
        let launch = Launch {
            velocity: Vec3::new(
                symmetric(rng, p.tap_speed),
                uniform(rng, 0.0, p.tap_lift),
                symmetric(rng, p.tap_speed),
            ),
            spin: Vec3::new(
                symmetric(rng, p.tap_spin),
                symmetric(rng, p.tap_spin),
                symmetric(rng, p.tap_spin),
            ),
        };
        let kind = self.selected.clone();
        self.spawn(kind, target, launch, renderer, loader)
    }

    fn add_random(
        &mut self,
        kind: ObjectKind,
        renderer: &mut dyn RenderBackend,
        loader: &mut dyn ModelLoader,
    ) -> EngineResult<ObjectId> {
        let p = &self.config.placement;
        let rng = &mut self.rng;
        let position = Vec3::new(
            symmetric(rng, p.random_half_width),
            uniform(rng, p.random_min_y, p.random_max_y),
            symmetric(rng, p.random_half_depth),
        );
        let launch = Launch {
            velocity: Vec3::new(symmetric(rng, p.random_speed), 0.0, symmetric(rng, p.random_speed)),
            spin: Vec3::new(
                symmetric(rng, p.random_spin),
                symmetric(rng, p.random_spin),
                symmetric(rng, p.random_spin),
            ),
        };
        self.spawn(kind, position, launch, renderer, loader)
    }

    fn spawn(
        &mut self,
        kind: ObjectKind,
        position: Vec3,
        launch: Launch,
        renderer: &mut dyn RenderBackend,
        loader: &mut dyn ModelLoader,
    ) -> EngineResult<ObjectId> {
        if let ObjectKind::Model(name) = &kind {
            self.models.request(name, loader);
        }

        let renderable = kind.renderable(&self.models);
        let mut request = PlacementRequest {
            physics: kind.physics_profile(self.config.physics.friction),
            kind,
            position,
            velocity: launch.velocity,
            angular_velocity: launch.spin,
            renderable,
            resources: None,
        };
        request.validate()?;
        request.resources = Some(renderer.upload(&request.renderable)?);

        let kind = request.kind.clone();
        let id = self.registry.add(request)?;
        log::info!("Placed {} {} at {:?}", kind, id, position);
        self.events.send(EngineEvent::ObjectPlaced { id, kind });
        Ok(id)
    }

    fn set_physics_enabled(&mut self, enabled: bool) {
        if self.modes.physics_enabled == enabled {
            return;
        }
        log::info!("Physics {}", if enabled { "enabled" } else { "disabled" });
        self.modes.physics_enabled = enabled;
        self.events.send(EngineEvent::PhysicsToggled { enabled });
    }

    fn set_lighting_mode(&mut self, mode: LightingMode) {
        if self.registry.lighting_mode() == mode {
            return;
        }
        log::info!("Lighting mode {:?}", mode);
        self.registry.set_lighting_mode(mode);
        self.modes.lighting_mode = mode;
        self.lights = LightRig::for_mode(mode);
        if mode == LightingMode::Simple {
            self.camera.reset_to_base();
        }
        self.events.send(EngineEvent::LightingModeChanged { mode });
    }

    fn select_kind(&mut self, kind: ObjectKind, loader: &mut dyn ModelLoader) {
        if let ObjectKind::Model(name) = &kind {
            self.models.request(name, loader);
        }
        if self.selected == kind {
            return;
        }
        log::debug!("Selected {}", kind);
        self.selected = kind.clone();
        self.events.send(EngineEvent::SelectedKindChanged { kind });
    }

    fn set_animation_style(&mut self, style: AnimationStyle) {
        if self.modes.animation_style == style {
            return;
        }
        log::debug!("Animation style {}", style.name());
        self.modes.animation_style = style;
        self.events.send(EngineEvent::AnimationStyleChanged { style });
    }

    fn set_animation_speed(&mut self, speed: f32) {
        if !speed.is_finite() {
            log::warn!("Ignoring non-finite animation speed {}", speed);
            return;
        }
        let speed = speed.clamp(MIN_ANIMATION_SPEED, MAX_ANIMATION_SPEED);
        if (self.animation_speed - speed).abs() < f32::EPSILON {
            return;
        }
        log::debug!("Animation speed {}x", speed);
        self.animation_speed = speed;
        self.events.send(EngineEvent::AnimationSpeedChanged { speed });
    }

    fn set_interactive(&mut self, enabled: bool) {
        if self.modes.interactive == enabled {
            return;
        }
        log::info!("Interactive mode {}", if enabled { "on" } else { "off" });
        self.modes.interactive = enabled;
        self.events.send(EngineEvent::InteractiveToggled { enabled });
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        match viewport.aspect_ratio() {
            Some(aspect) => self.camera.set_aspect_ratio(aspect),
            None => log::warn!(
                "Viewport {}x{} is unusable; taps are ignored until it changes",
                viewport.width,
                viewport.height
            ),
        }
    }

    /// Camera pose at `position` looking at `target`, using the configured
    /// field of view and the current viewport aspect
    pub fn camera_pose_at(&self, position: Vec3, target: Vec3) -> CameraPose {
        let aspect = self.viewport.aspect_ratio().unwrap_or(DEFAULT_ASPECT);
        CameraPose::perspective(
            position,
            self.config.scene.default_fov_degrees,
            aspect,
            DEFAULT_NEAR,
            DEFAULT_FAR,
        )
        .looking_at(target)
    }

    pub(crate) fn advance_clock(&mut self, timestamp: f64) -> Option<f32> {
        self.clock.advance(timestamp)
    }

    pub(crate) fn poll_models(&mut self, loader: &mut dyn ModelLoader) {
        for outcome in self.models.poll(loader) {
            let event = match outcome {
                Ok(model) => EngineEvent::ModelLoaded { model },
                Err(EngineError::AssetLoadFailure { model, reason }) => {
                    EngineEvent::ModelFailed { model, reason }
                }
                Err(other) => {
                    log::warn!("Unexpected model poll outcome: {}", other);
                    continue;
                }
            };
            self.events.send(event);
        }
    }

    pub(crate) fn purge(&mut self, renderer: &mut dyn RenderBackend) {
        let report = self.registry.purge_removed(renderer);
        for id in report.removed {
            self.events.send(EngineEvent::ObjectRemoved { id });
        }
    }

    pub(crate) fn advance_objects(&mut self, delta_time: f32) {
        self.animation_time += delta_time * self.animation_speed;
        let frame = LifecycleFrame {
            delta_time,
            time: self.animation_time,
            animation_speed: self.animation_speed,
            physics_enabled: self.modes.physics_enabled,
            animation_style: self.modes.animation_style,
            ground_y: self.registry.ground_y(),
        };
        let lifecycle = &self.lifecycle;
        let physics = &self.physics;
        let rng = &mut self.rng;
        let events = &mut self.events;

        self.registry.for_each_mut(|object| {
            match lifecycle.update(object, &frame, physics, rng) {
                Ok(Some(LifecycleState::Active)) => {
                    events.send(EngineEvent::ObjectActivated { id: object.id() });
                }
                Ok(_) => {}
                Err(e) => log::warn!("Skipping update of {}: {}", object.id(), e),
            }
        });

        if self.modes.interactive {
            let pairs = self.repulsion.apply(self.registry.objects_mut(), delta_time);
            if pairs > 0 {
                log::trace!("Repelled {} close pairs", pairs);
            }
        }
    }

    pub(crate) fn advance_effects(&mut self, delta_time: f32, renderer: &mut dyn RenderBackend) {
        let released = self.bursts.update(delta_time, renderer);
        if released > 0 {
            log::trace!("Released {} burst particles", released);
        }
    }

    pub(crate) fn animate_lighting(&mut self) {
        if self.registry.lighting_mode() != LightingMode::Dynamic {
            return;
        }
        let time = self.clock.total_time();
        self.camera.animate_orbit(time);
        self.lights.animate(time);
    }

    pub(crate) fn publish_count(&mut self) {
        let count = self.registry.live_count();
        if count != self.published_count {
            self.published_count = count;
            self.events.send(EngineEvent::ObjectCountChanged { count });
        }
    }

    pub(crate) fn draw(&self, renderer: &mut dyn RenderBackend) {
        let Some(camera) = self.camera.pose() else {
            log::trace!("No camera pose yet, skipping draw");
            return;
        };
        let frame = FrameSnapshot {
            objects: self.registry.objects(),
            bursts: &self.bursts,
            camera,
            lights: &self.lights,
            time: self.clock.total_time(),
        };
        if let Err(e) = renderer.draw(&frame) {
            log::error!("Frame {} skipped: {}", self.clock.frame_count(), e);
        }
    }

    pub(crate) fn teardown(&mut self, renderer: &mut dyn RenderBackend) {
        let report = self.registry.drain_all(renderer);
        let particles = self.bursts.teardown(renderer);
        log::info!(
            "Teardown released {} objects and {} particles ({} disposal failures)",
            report.removed.len(),
            particles,
            report.failures.len()
        );
        self.publish_count();
        self.events.send(EngineEvent::TornDown);
    }

    /// Event queue
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub(crate) fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Scene registry
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// Camera pose handed to the renderer this frame
    pub fn camera_pose(&self) -> Option<&CameraPose> {
        self.camera.pose()
    }

    /// Camera rig (host pose plus orbit)
    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    /// Light rig
    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// Current viewport
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Physics, lighting, animation and interactive switches
    pub fn modes(&self) -> EngineModes {
        self.modes
    }

    /// Idle animation speed multiplier
    pub fn animation_speed(&self) -> f32 {
        self.animation_speed
    }

    /// Kind used by the next placement
    pub fn selected_kind(&self) -> &ObjectKind {
        &self.selected
    }

    /// Model cache
    pub fn models(&self) -> &ModelCache {
        &self.models
    }

    /// Particle pool
    pub fn bursts(&self) -> &BurstSystem {
        &self.bursts
    }

    /// Configuration the context was built from
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Frame clock
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}

/// Uniform sample in `[-half, half]`
fn symmetric<R: Rng + ?Sized>(rng: &mut R, half: f32) -> f32 {
    (rng.gen::<f32>() * 2.0 - 1.0) * half
}

/// Uniform sample in `[low, high)`; `low` for an empty range
fn uniform<R: Rng + ?Sized>(rng: &mut R, low: f32, high: f32) -> f32 {
    low + rng.gen::<f32>() * (high - low)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::InMemoryLoader;
    use crate::render::HeadlessRenderer;
    use approx::assert_relative_eq;

    fn context() -> SimulationContext {
        SimulationContext::new(EngineConfig::default())
    }

    #[test]
    fn test_random_placement_stays_in_configured_box() {
        let mut ctx = context();
        let mut renderer = HeadlessRenderer::new();
        let mut loader = InMemoryLoader::new();

        for _ in 0..50 {
            ctx.apply(Command::AddRandom(None), &mut renderer, &mut loader);
        }

        assert_eq!(ctx.registry().len(), 50);
        for object in ctx.registry().objects() {
            let p = object.transform().position;
            assert!(p.x.abs() <= 3.0 && p.z.abs() <= 2.0);
            assert!((2.0..=5.0).contains(&p.y));
            assert_eq!(object.velocity().y, 0.0);
        }
    }

    #[test]
    fn test_tap_without_camera_is_a_no_op() {
        let mut ctx = context();
        let mut renderer = HeadlessRenderer::new();
        let mut loader = InMemoryLoader::new();

        ctx.apply(
            Command::SetViewport(Viewport::new(800.0, 600.0)),
            &mut renderer,
            &mut loader,
        );
        ctx.apply(
            Command::PlaceAt {
                screen_x: 400.0,
                screen_y: 300.0,
            },
            &mut renderer,
            &mut loader,
        );

        assert!(ctx.registry().is_empty());
        assert_eq!(renderer.live_resources(), 0);
    }

    #[test]
    fn test_failed_upload_places_nothing() {
        let mut ctx = context();
        let mut renderer = HeadlessRenderer::new();
        renderer.set_fail_uploads(true);
        let mut loader = InMemoryLoader::new();

        ctx.apply(Command::AddRandom(None), &mut renderer, &mut loader);
        assert!(ctx.registry().is_empty());
    }

    #[test]
    fn test_unchanged_modes_emit_nothing() {
        let mut ctx = context();
        let mut renderer = HeadlessRenderer::new();
        let mut loader = InMemoryLoader::new();

        ctx.apply(Command::SetPhysicsEnabled(true), &mut renderer, &mut loader);
        ctx.apply(
            Command::SetLightingMode(LightingMode::Dynamic),
            &mut renderer,
            &mut loader,
        );
        ctx.apply(Command::SelectKind(ObjectKind::Cube), &mut renderer, &mut loader);
        assert!(ctx.events_mut().is_empty());

        ctx.apply(
            Command::SetLightingMode(LightingMode::Simple),
            &mut renderer,
            &mut loader,
        );
        assert_eq!(ctx.lights().mode(), LightingMode::Simple);
        assert_eq!(ctx.registry().lighting_mode(), LightingMode::Simple);
        assert_eq!(ctx.events_mut().len(), 1);
    }

    #[test]
    fn test_viewport_updates_camera_aspect() {
        let mut ctx = context();
        let mut renderer = HeadlessRenderer::new();
        let mut loader = InMemoryLoader::new();

        let pose = ctx.camera_pose_at(Vec3::new(0.0, 2.0, 8.0), Vec3::zeros());
        ctx.apply(Command::SetCameraPose(pose), &mut renderer, &mut loader);
        ctx.apply(
            Command::SetViewport(Viewport::new(600.0, 800.0)),
            &mut renderer,
            &mut loader,
        );

        assert_relative_eq!(ctx.camera_pose().unwrap().aspect, 0.75);
    }

    #[test]
    fn test_degenerate_camera_pose_is_ignored() {
        let mut ctx = context();
        let mut renderer = HeadlessRenderer::new();
        let mut loader = InMemoryLoader::new();

        let pose = ctx.camera_pose_at(Vec3::zeros(), Vec3::zeros());
        ctx.apply(Command::SetCameraPose(pose), &mut renderer, &mut loader);
        assert!(ctx.camera_pose().is_none());
    }
}
