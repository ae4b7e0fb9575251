//! Shared fixtures for scenario tests

use std::collections::HashMap;

use crate::assets::{AssetError, LoadResult, MeshData, ModelLoader};
use crate::config::EngineConfig;
use crate::events::{EngineEvent, StateChanges};
use crate::foundation::math::Vec3;
use crate::render::{CameraPose, HeadlessRenderer};
use crate::scheduler::FrameScheduler;

pub const FRAME: f64 = 1.0 / 60.0;

/// Loader whose results arrive after a scripted number of polls
#[derive(Default)]
pub struct ScriptedLoader {
    script: HashMap<String, (u32, Result<MeshData, AssetError>)>,
    in_flight: Vec<(String, u32)>,
}

impl ScriptedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// `model` resolves to `result` on the `polls`-th poll after its request
    pub fn script(
        mut self,
        model: &str,
        polls: u32,
        result: Result<MeshData, AssetError>,
    ) -> Self {
        self.script.insert(model.to_string(), (polls, result));
        self
    }
}

impl ModelLoader for ScriptedLoader {
    fn request(&mut self, model: &str) {
        let polls = self.script.get(model).map_or(1, |(polls, _)| *polls);
        self.in_flight.push((model.to_string(), polls));
    }

    fn poll(&mut self) -> Vec<LoadResult> {
        let mut done = Vec::new();
        for (model, remaining) in &mut self.in_flight {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                let result = match self.script.get(model.as_str()) {
                    Some((_, result)) => result.clone(),
                    None => Err(AssetError::NotFound(model.clone())),
                };
                done.push((model.clone(), result));
            }
        }
        self.in_flight.retain(|(_, remaining)| *remaining > 0);
        done
    }
}

/// A 2 × 1 × 1 box as a mesh
pub fn box_mesh() -> MeshData {
    let mut positions = Vec::new();
    for x in [0.0, 2.0] {
        for y in [1.0, 2.0] {
            for z in [0.0, 1.0] {
                positions.push(Vec3::new(x, y, z));
            }
        }
    }
    MeshData::new(positions, vec![0, 1, 2, 1, 3, 2])
}

/// Camera at `(0, 0, 5)` looking at the origin through an 800 × 600 view
pub fn test_camera() -> CameraPose {
    CameraPose::perspective(Vec3::new(0.0, 0.0, 5.0), 75.0, 800.0 / 600.0, 0.1, 1000.0)
}

/// A scheduler plus a host clock advancing at 60 Hz
pub struct Session {
    pub engine: FrameScheduler<HeadlessRenderer>,
    time: f64,
}

impl Session {
    pub fn new() -> Self {
        Self::with(EngineConfig::default(), Box::new(ScriptedLoader::new()))
    }

    pub fn with(config: EngineConfig, loader: Box<dyn ModelLoader>) -> Self {
        crate::foundation::logging::init_for_tests();
        let mut engine = FrameScheduler::new(config, HeadlessRenderer::new(), loader).unwrap();
        engine.set_viewport(800.0, 600.0);
        engine.set_camera_pose(test_camera());
        Self { engine, time: 0.0 }
    }

    pub fn tick(&mut self) -> StateChanges {
        let changes = self.engine.tick(self.time);
        self.time += FRAME;
        changes
    }

    pub fn run_for(&mut self, seconds: f64) {
        let frames = (seconds / FRAME).ceil() as usize;
        for _ in 0..frames {
            self.tick();
        }
    }

    pub fn renderer(&self) -> &HeadlessRenderer {
        self.engine.renderer()
    }

    pub fn events(&mut self) -> Vec<EngineEvent> {
        self.engine.drain_events()
    }
}
