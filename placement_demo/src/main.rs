//! Headless placement demo
//!
//! Drives the engine through a scripted ten second session at 60 Hz: taps
//! at random pixels, random drops of every catalog kind, an external model,
//! an undo, a particle burst, a physics toggle with interactive idling at
//! double speed and a clear-all, then tears down.
//!
//! Usage: `placement_demo [config.toml|config.ron]`

use placement_engine::prelude::*;
use placement_engine::render::{GeometryHandle, MaterialHandle, RenderResources, Renderable};
use rand::prelude::*;

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 720.0;
const FRAME: f64 = 1.0 / 60.0;
const SESSION_FRAMES: u32 = 600;

/// Headless renderer that logs a frame summary once per second
struct ConsoleRenderer {
    inner: HeadlessRenderer,
}

impl RenderBackend for ConsoleRenderer {
    fn upload(&mut self, renderable: &Renderable) -> EngineResult<RenderResources> {
        self.inner.upload(renderable)
    }

    fn draw(&mut self, frame: &FrameSnapshot<'_>) -> EngineResult<()> {
        self.inner.draw(frame)?;
        if self.inner.frames_drawn() % 60 == 0 {
            let resting = frame.objects.iter().filter(|o| o.is_resting()).count();
            log::info!(
                "t={:.1}s objects={} resting={} particles={} camera={:?}",
                frame.time,
                frame.objects.len(),
                resting,
                frame.bursts.len(),
                frame.camera.position
            );
        }
        Ok(())
    }

    fn dispose(&mut self, geometry: GeometryHandle, material: MaterialHandle) -> EngineResult<()> {
        self.inner.dispose(geometry, material)
    }
}

/// Unit-ish crate mesh standing in for a decoded model file
fn crate_mesh() -> MeshData {
    let mut positions = Vec::new();
    for x in [-1.0, 1.0] {
        for y in [0.0, 1.5] {
            for z in [-1.0, 1.0] {
                positions.push(Vec3::new(x, y, z));
            }
        }
    }
    let indices = vec![
        0, 1, 3, 0, 3, 2, 4, 6, 7, 4, 7, 5, 0, 4, 5, 0, 5, 1, 2, 3, 7, 2, 7, 6, 0, 2, 6, 0, 6, 4,
        1, 5, 7, 1, 7, 3,
    ];
    MeshData::new(positions, indices)
}

fn load_config() -> Result<EngineConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            Ok(EngineConfig::load_from_file(&path)?)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    let seed = config.scene.seed;
    let loader = InMemoryLoader::new().with_mesh("crate", crate_mesh());
    let renderer = ConsoleRenderer {
        inner: HeadlessRenderer::new(),
    };
    let mut engine = FrameScheduler::new(config, renderer, Box::new(loader))?;
    let mut rng = StdRng::seed_from_u64(seed);

    engine.set_viewport(WIDTH, HEIGHT);
    let pose = engine
        .context()
        .camera_pose_at(Vec3::new(0.0, 2.0, 8.0), Vec3::zeros());
    engine.set_camera_pose(pose);

    let kinds: Vec<ObjectKind> = ObjectKind::BUILTIN
        .iter()
        .cloned()
        .chain(std::iter::once(ObjectKind::Model("crate".to_string())))
        .collect();

    for frame in 0..SESSION_FRAMES {
        match frame {
            f if f < 180 && f % 30 == 0 => {
                engine.select_kind(kinds[(f / 30) as usize % kinds.len()].clone());
                engine.place_at(rng.gen_range(0.0..WIDTH), rng.gen_range(0.0..HEIGHT));
                engine.add_random();
            }
            200 => engine.remove_last(),
            240 => engine.select_kind_by_name("crate"),
            250 => engine.add_random_kind(ObjectKind::Model("crate".to_string())),
            300 => {
                engine.set_physics_enabled(false);
                engine.set_animation_style(AnimationStyle::Breathe);
                engine.set_animation_speed(2.0);
                engine.set_interactive(true);
            }
            390 => engine.set_animation_style(AnimationStyle::Pulse),
            360 => engine.burst(Vec3::new(0.0, -1.0, 0.0)),
            420 => engine.set_lighting_mode(LightingMode::Simple),
            480 => engine.clear_all(),
            _ => {}
        }

        engine.tick(f64::from(frame) * FRAME);

        for event in engine.drain_events() {
            log::debug!("{:?}", event);
        }
    }

    log::info!(
        "Session finished with {} live objects, {} frames drawn",
        engine.object_count(),
        engine.renderer().inner.frames_drawn()
    );
    engine.teardown();
    log::info!(
        "Released {} resource sets, {} still live",
        engine.renderer().inner.disposed().len(),
        engine.renderer().inner.live_resources()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    placement_engine::foundation::logging::init();
    log::info!("Starting placement demo");

    match run() {
        Ok(()) => {
            log::info!("Placement demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Placement demo failed: {}", e);
            Err(e)
        }
    }
}
