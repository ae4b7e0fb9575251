//! Scene registry
//!
//! Owns every placed object in insertion order. Objects are never removed
//! mid-tick: `remove` and `clear_all` only start the despawn animation, and
//! the physical drop happens in [`SceneRegistry::purge_removed`] at the start
//! of the following tick, which is also where renderer resources are
//! released.

use crate::error::EngineError;
use crate::render::{LightingMode, RenderBackend};
use crate::scene::{LifecycleState, ObjectId, PlaceableObject, PlacementRequest};

/// Outcome of a purge or drain
#[derive(Debug, Default)]
pub struct PurgeReport {
    /// Objects dropped from the registry
    pub removed: Vec<ObjectId>,
    /// Dispose calls issued to the renderer
    pub disposed: usize,
    /// Disposal failures (logged, not retried)
    pub failures: Vec<EngineError>,
}

/// Registry of placeable objects plus ground and lighting settings
#[derive(Debug)]
pub struct SceneRegistry {
    objects: Vec<PlaceableObject>,
    next_id: u64,
    next_phase: u32,
    ground_y: f32,
    lighting_mode: LightingMode,
}

impl SceneRegistry {
    /// Create an empty scene
    pub fn new(ground_y: f32, lighting_mode: LightingMode) -> Self {
        Self {
            objects: Vec::new(),
            next_id: 1,
            next_phase: 0,
            ground_y,
            lighting_mode,
        }
    }

    /// Insert a new object in the `Spawning` state
    ///
    /// # Errors
    /// [`EngineError::InvalidInput`] if the request carries non-finite
    /// vectors; nothing is inserted in that case.
    pub fn add(&mut self, request: PlacementRequest) -> Result<ObjectId, EngineError> {
        request.validate()?;

        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let phase = self.next_phase as f32;
        self.next_phase = self.next_phase.wrapping_add(1);

        log::debug!("Adding {} {} at {:?}", request.kind, id, request.position);
        self.objects.push(PlaceableObject::from_request(id, phase, request));
        Ok(id)
    }

    /// Start despawning an object
    ///
    /// Returns `false` if the id is unknown or already despawning/removed.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        match self.get_mut(id) {
            Some(object) if object.is_live() => {
                object.state = LifecycleState::Despawning;
                object.despawn_delay = 0.0;
                true
            }
            _ => false,
        }
    }

    /// Start despawning every live object, staggering starts by `stagger` seconds
    ///
    /// Returns the number of objects affected.
    pub fn clear_all(&mut self, stagger: f32) -> usize {
        let mut count = 0;
        for object in self.objects.iter_mut().filter(|o| o.is_live()) {
            object.state = LifecycleState::Despawning;
            object.despawn_delay = count as f32 * stagger;
            count += 1;
        }
        count
    }

    /// Newest object that is still spawning or active
    pub fn last_live_id(&self) -> Option<ObjectId> {
        self.objects.iter().rev().find(|o| o.is_live()).map(|o| o.id)
    }

    /// Look up an object
    pub fn get(&self, id: ObjectId) -> Option<&PlaceableObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Look up an object mutably
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut PlaceableObject> {
        self.objects.iter_mut().find(|o| o.id == id)
    }

    /// Snapshot of current ids in insertion order
    pub fn ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|o| o.id).collect()
    }

    /// Visit every object in insertion order
    ///
    /// The registry is borrowed for the whole pass, so the set cannot change
    /// while it runs.
    pub fn for_each(&self, f: impl FnMut(&PlaceableObject)) {
        self.objects.iter().for_each(f);
    }

    /// Visit every object mutably in insertion order
    pub fn for_each_mut(&mut self, f: impl FnMut(&mut PlaceableObject)) {
        self.objects.iter_mut().for_each(f);
    }

    /// All objects in insertion order, mutably
    pub(crate) fn objects_mut(&mut self) -> &mut [PlaceableObject] {
        &mut self.objects
    }

    /// All objects in insertion order
    pub fn objects(&self) -> &[PlaceableObject] {
        &self.objects
    }

    /// Objects held, including despawning and removed ones awaiting purge
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the registry holds nothing
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects that are spawning or active (what the user sees as placed)
    pub fn live_count(&self) -> usize {
        self.objects.iter().filter(|o| o.is_live()).count()
    }

    /// Objects in a given state
    pub fn count_in(&self, state: LifecycleState) -> usize {
        self.objects.iter().filter(|o| o.state == state).count()
    }

    /// Drop `Removed` objects, releasing their renderer resources
    pub fn purge_removed(&mut self, renderer: &mut dyn RenderBackend) -> PurgeReport {
        let mut report = PurgeReport::default();
        for object in self.objects.iter_mut().filter(|o| o.state == LifecycleState::Removed) {
            release(object, renderer, &mut report);
        }

        report.removed = self
            .objects
            .iter()
            .filter(|o| o.state == LifecycleState::Removed)
            .map(|o| o.id)
            .collect();
        self.objects.retain(|o| o.state != LifecycleState::Removed);
        report
    }

    /// Release and drop every object regardless of state (teardown)
    pub fn drain_all(&mut self, renderer: &mut dyn RenderBackend) -> PurgeReport {
        let mut report = PurgeReport::default();
        for mut object in self.objects.drain(..) {
            object.state = LifecycleState::Removed;
            release(&mut object, renderer, &mut report);
            report.removed.push(object.id);
        }
        report
    }

    /// Ground plane height
    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    /// Move the ground plane
    pub fn set_ground_y(&mut self, ground_y: f32) {
        if ground_y.is_finite() {
            self.ground_y = ground_y;
        } else {
            log::warn!("Ignoring non-finite ground height {}", ground_y);
        }
    }

    /// Lighting mode flag
    pub fn lighting_mode(&self) -> LightingMode {
        self.lighting_mode
    }

    /// Switch lighting mode
    pub fn set_lighting_mode(&mut self, mode: LightingMode) {
        self.lighting_mode = mode;
    }
}

fn release(object: &mut PlaceableObject, renderer: &mut dyn RenderBackend, report: &mut PurgeReport) {
    let Some(resources) = object.take_resources() else {
        log::trace!("{} has no live resources, nothing to dispose", object.id);
        return;
    };

    report.disposed += 1;
    if let Err(error) = renderer.dispose(resources.geometry, resources.material) {
        let failure = EngineError::DisposalFailure {
            id: object.id,
            reason: error.to_string(),
        };
        log::error!("{}", failure);
        report.failures.push(failure);
    }
}
