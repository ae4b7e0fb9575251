//! The per-refresh frame loop

use std::collections::VecDeque;

use crate::assets::ModelLoader;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::events::{EngineEvent, StateChanges};
use crate::foundation::math::Vec3;
use crate::input::Viewport;
use crate::lifecycle::AnimationStyle;
use crate::render::{CameraPose, LightingMode, RenderBackend};
use crate::scene::{ObjectId, ObjectKind};
use crate::scheduler::{Command, SimulationContext};

/// Drives the simulation once per display refresh
///
/// Tick order:
/// 1. apply queued commands
/// 2. collect finished model loads
/// 3. purge objects that finished despawning (releasing their resources)
/// 4. advance every object's lifecycle; active objects run physics or idle,
///    then repel each other in interactive mode
/// 5. advance particle bursts
/// 6. orbit camera and point lights in dynamic lighting mode
/// 7. hand the frame snapshot to the renderer
///
/// Dropping the scheduler tears it down.
pub struct FrameScheduler<R: RenderBackend> {
    context: SimulationContext,
    renderer: R,
    loader: Box<dyn ModelLoader>,
    commands: VecDeque<Command>,
    torn_down: bool,
}

impl<R: RenderBackend> FrameScheduler<R> {
    /// Create a scheduler with an empty scene
    ///
    /// # Errors
    /// [`crate::EngineError::Config`] if the configuration fails validation.
    pub fn new(config: EngineConfig, renderer: R, loader: Box<dyn ModelLoader>) -> EngineResult<Self> {
        config.validate()?;
        log::info!(
            "Frame scheduler ready (physics {}, lighting {:?}, style {})",
            config.modes.physics_enabled,
            config.modes.lighting_mode,
            config.modes.animation_style.name()
        );
        Ok(Self {
            context: SimulationContext::new(config),
            renderer,
            loader,
            commands: VecDeque::new(),
            torn_down: false,
        })
    }

    /// Queue a command for the next tick
    pub fn submit(&mut self, command: Command) {
        if self.torn_down {
            log::debug!("Dropping {} after teardown", command.name());
            return;
        }
        self.commands.push_back(command);
    }

    /// Place the selected kind along the ray through a tapped pixel
    pub fn place_at(&mut self, screen_x: f32, screen_y: f32) {
        self.submit(Command::PlaceAt { screen_x, screen_y });
    }

    /// Drop the selected kind at a random spot
    pub fn add_random(&mut self) {
        self.submit(Command::AddRandom(None));
    }

    /// Drop `kind` at a random spot without changing the selection
    pub fn add_random_kind(&mut self, kind: ObjectKind) {
        self.submit(Command::AddRandom(Some(kind)));
    }

    /// Despawn everything with a staggered fade
    pub fn clear_all(&mut self) {
        self.submit(Command::ClearAll);
    }

    /// Despawn one object
    pub fn remove(&mut self, id: ObjectId) {
        self.submit(Command::Remove(id));
    }

    /// Despawn the most recently placed live object
    pub fn remove_last(&mut self) {
        self.submit(Command::RemoveLast);
    }

    /// Toggle physics
    pub fn set_physics_enabled(&mut self, enabled: bool) {
        self.submit(Command::SetPhysicsEnabled(enabled));
    }

    /// Switch lighting mode
    pub fn set_lighting_mode(&mut self, mode: LightingMode) {
        self.submit(Command::SetLightingMode(mode));
    }

    /// Select the kind used by subsequent placements
    pub fn select_kind(&mut self, kind: ObjectKind) {
        self.submit(Command::SelectKind(kind));
    }

    /// Select by catalog name; unknown names select a cube
    pub fn select_kind_by_name(&mut self, name: &str) {
        self.select_kind(ObjectKind::resolve(name));
    }

    /// Choose the idle animation
    pub fn set_animation_style(&mut self, style: AnimationStyle) {
        self.submit(Command::SetAnimationStyle(style));
    }

    /// Set the idle animation speed multiplier (clamped to `[0.5, 3]`)
    pub fn set_animation_speed(&mut self, speed: f32) {
        self.submit(Command::SetAnimationSpeed(speed));
    }

    /// Toggle mutual repulsion between active objects
    pub fn set_interactive(&mut self, enabled: bool) {
        self.submit(Command::SetInteractive(enabled));
    }

    /// Emit a particle burst around `origin`
    pub fn burst(&mut self, origin: Vec3) {
        self.submit(Command::Burst { origin });
    }

    /// Report a host view resize
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.submit(Command::SetViewport(Viewport::new(width, height)));
    }

    /// Report the host camera pose
    pub fn set_camera_pose(&mut self, pose: CameraPose) {
        self.submit(Command::SetCameraPose(pose));
    }

    /// Run one frame at host time `timestamp` (seconds)
    ///
    /// Returns what observable state changed during the tick. A non-finite
    /// timestamp skips the tick; after teardown this does nothing.
    pub fn tick(&mut self, timestamp: f64) -> StateChanges {
        if self.torn_down {
            log::trace!("Tick after teardown ignored");
            return StateChanges::empty();
        }
        let Some(delta_time) = self.context.advance_clock(timestamp) else {
            log::warn!("Skipping tick with non-finite timestamp {}", timestamp);
            return StateChanges::empty();
        };

        while let Some(command) = self.commands.pop_front() {
            self.context
                .apply(command, &mut self.renderer, self.loader.as_mut());
        }
        self.context.poll_models(self.loader.as_mut());
        self.context.purge(&mut self.renderer);
        self.context.advance_objects(delta_time);
        self.context.advance_effects(delta_time, &mut self.renderer);
        self.context.animate_lighting();
        self.context.publish_count();
        self.context.draw(&mut self.renderer);

        self.context.events_mut().take_changes()
    }

    /// Stop the loop and release every object and particle
    ///
    /// Pending commands are discarded. Calling it again does nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if !self.commands.is_empty() {
            log::debug!("Discarding {} pending commands", self.commands.len());
            self.commands.clear();
        }
        self.context.teardown(&mut self.renderer);
    }

    /// Whether teardown has run
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Take every event recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.context.events_mut().drain()
    }

    /// Events recorded since the last drain (bounded)
    pub fn pending_events(&self) -> usize {
        self.context.events().len()
    }

    /// Commands waiting for the next tick
    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Spawning or active objects
    pub fn object_count(&self) -> usize {
        self.context.registry().live_count()
    }

    /// Kind used by the next placement
    pub fn selected_kind(&self) -> &ObjectKind {
        self.context.selected_kind()
    }

    /// Physics flag
    pub fn physics_enabled(&self) -> bool {
        self.context.modes().physics_enabled
    }

    /// Lighting mode
    pub fn lighting_mode(&self) -> LightingMode {
        self.context.registry().lighting_mode()
    }

    /// Idle animation style
    pub fn animation_style(&self) -> AnimationStyle {
        self.context.modes().animation_style
    }

    /// Idle animation speed multiplier
    pub fn animation_speed(&self) -> f32 {
        self.context.animation_speed()
    }

    /// Interactive mode flag
    pub fn interactive(&self) -> bool {
        self.context.modes().interactive
    }

    /// Simulation state
    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// The renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The renderer, mutably (e.g. to inject failures in tests)
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: RenderBackend> Drop for FrameScheduler<R> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::InMemoryLoader;
    use crate::render::HeadlessRenderer;

    fn scheduler() -> FrameScheduler<HeadlessRenderer> {
        FrameScheduler::new(
            EngineConfig::default(),
            HeadlessRenderer::new(),
            Box::new(InMemoryLoader::new()),
        )
        .unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = EngineConfig::default();
        config.physics.friction = 2.0;
        let result = FrameScheduler::new(
            config,
            HeadlessRenderer::new(),
            Box::new(InMemoryLoader::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_commands_wait_for_next_tick() {
        let mut engine = scheduler();
        engine.add_random();
        engine.set_physics_enabled(false);

        assert_eq!(engine.object_count(), 0);
        assert!(engine.physics_enabled());
        assert_eq!(engine.pending_commands(), 2);

        let changes = engine.tick(0.0);
        assert_eq!(engine.object_count(), 1);
        assert!(!engine.physics_enabled());
        assert!(changes.contains(StateChanges::OBJECT_COUNT | StateChanges::PHYSICS));
    }

    #[test]
    fn test_nan_timestamp_skips_tick() {
        let mut engine = scheduler();
        engine.add_random();

        assert!(engine.tick(f64::NAN).is_empty());
        assert_eq!(engine.pending_commands(), 1);
        assert_eq!(engine.context().clock().frame_count(), 0);
    }

    #[test]
    fn test_draws_once_camera_is_known() {
        let mut engine = scheduler();
        engine.tick(0.0);
        assert_eq!(engine.renderer().frames_drawn(), 0);

        let pose = engine
            .context()
            .camera_pose_at(Vec3::new(0.0, 2.0, 8.0), Vec3::zeros());
        engine.set_camera_pose(pose);
        engine.tick(0.016);
        assert_eq!(engine.renderer().frames_drawn(), 1);
    }

    #[test]
    fn test_draw_failure_does_not_stop_the_loop() {
        let mut engine = scheduler();
        let pose = engine
            .context()
            .camera_pose_at(Vec3::new(0.0, 2.0, 8.0), Vec3::zeros());
        engine.set_camera_pose(pose);
        engine.renderer_mut().set_fail_draws(true);
        engine.tick(0.0);
        engine.tick(0.016);
        assert_eq!(engine.renderer().frames_drawn(), 0);

        engine.renderer_mut().set_fail_draws(false);
        engine.tick(0.032);
        assert_eq!(engine.renderer().frames_drawn(), 1);
        assert_eq!(engine.context().clock().frame_count(), 3);
    }

    #[test]
    fn test_select_kind_by_name_falls_back_to_cube() {
        let mut engine = scheduler();
        engine.select_kind_by_name("sphere");
        engine.tick(0.0);
        assert_eq!(engine.selected_kind(), &ObjectKind::Sphere);

        engine.select_kind_by_name("teapot");
        engine.tick(0.016);
        assert_eq!(engine.selected_kind(), &ObjectKind::Cube);
    }
}
