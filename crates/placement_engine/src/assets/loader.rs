//! Model loading and caching

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use thiserror::Error;

use crate::assets::MeshData;
use crate::error::EngineError;

/// Asset loading errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AssetError {
    /// No model with that identifier
    #[error("Model not found: {0}")]
    NotFound(String),

    /// Loader or decoder failure
    #[error("Load failed: {0}")]
    LoadFailed(String),

    /// Mesh without vertices
    #[error("Mesh is empty")]
    EmptyMesh,

    /// Mesh with non-finite vertices or out-of-range indices
    #[error("Mesh is malformed")]
    Malformed,
}

/// A finished load: model identifier and outcome
pub type LoadResult = (String, Result<MeshData, AssetError>);

/// External model loader
///
/// Loads are asynchronous from the engine's point of view: `request` starts
/// one and a later `poll` reports it finished. Retrying is the loader's
/// business; the engine treats every reported result as final.
pub trait ModelLoader {
    /// Begin loading a model
    fn request(&mut self, model: &str);

    /// Return loads that finished since the last poll
    fn poll(&mut self) -> Vec<LoadResult>;
}

/// Loader backed by meshes registered up front
///
/// Each request completes on the next poll; unknown identifiers fail with
/// [`AssetError::NotFound`].
#[derive(Debug, Default)]
pub struct InMemoryLoader {
    meshes: HashMap<String, MeshData>,
    queued: VecDeque<String>,
}

impl InMemoryLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: register a mesh under a model identifier
    pub fn with_mesh(mut self, model: impl Into<String>, mesh: MeshData) -> Self {
        self.meshes.insert(model.into(), mesh);
        self
    }
}

impl ModelLoader for InMemoryLoader {
    fn request(&mut self, model: &str) {
        self.queued.push_back(model.to_string());
    }

    fn poll(&mut self) -> Vec<LoadResult> {
        self.queued
            .drain(..)
            .map(|model| {
                let result = self
                    .meshes
                    .get(&model)
                    .cloned()
                    .ok_or_else(|| AssetError::NotFound(model.clone()));
                (model, result)
            })
            .collect()
    }
}

/// Load status of a model
#[derive(Debug, Clone, PartialEq)]
pub enum ModelStatus {
    /// Requested, not finished
    Pending,
    /// Normalised and ready to place
    Ready(Arc<MeshData>),
    /// Failed; placements use the procedural fallback
    Failed(AssetError),
}

/// Normalised models by identifier
#[derive(Debug, Default)]
pub struct ModelCache {
    entries: HashMap<String, ModelStatus>,
    target_size: f32,
}

impl ModelCache {
    /// Create a cache that normalises meshes to `target_size`
    pub fn new(target_size: f32) -> Self {
        Self {
            entries: HashMap::new(),
            target_size,
        }
    }

    /// Ask the loader for a model unless it is already known
    ///
    /// Returns `true` when a new request was issued.
    pub fn request(&mut self, model: &str, loader: &mut dyn ModelLoader) -> bool {
        if self.entries.contains_key(model) {
            return false;
        }
        log::debug!("Requesting model '{}'", model);
        self.entries.insert(model.to_string(), ModelStatus::Pending);
        loader.request(model);
        true
    }

    /// Collect finished loads
    ///
    /// Returns one entry per finished model: its name when it is ready, or
    /// an [`EngineError::AssetLoadFailure`] the caller can report. The cache
    /// has already recorded either outcome.
    pub fn poll(&mut self, loader: &mut dyn ModelLoader) -> Vec<Result<String, EngineError>> {
        let mut outcomes = Vec::new();
        for (model, result) in loader.poll() {
            let status = match result.and_then(|mesh| self.prepare(mesh)) {
                Ok(mesh) => {
                    log::info!(
                        "Model '{}' ready ({} vertices)",
                        model,
                        mesh.positions.len()
                    );
                    outcomes.push(Ok(model.clone()));
                    ModelStatus::Ready(Arc::new(mesh))
                }
                Err(error) => {
                    log::warn!("Model '{}' failed to load, using fallback: {}", model, error);
                    outcomes.push(Err(EngineError::AssetLoadFailure {
                        model: model.clone(),
                        reason: error.to_string(),
                    }));
                    ModelStatus::Failed(error)
                }
            };
            self.entries.insert(model, status);
        }
        outcomes
    }

    fn prepare(&self, mesh: MeshData) -> Result<MeshData, AssetError> {
        if !mesh.is_well_formed() {
            return Err(AssetError::Malformed);
        }
        mesh.normalized(self.target_size).ok_or(AssetError::EmptyMesh)
    }

    /// Status of a model, `None` if never requested
    pub fn status(&self, model: &str) -> Option<&ModelStatus> {
        self.entries.get(model)
    }

    /// The normalised mesh, if ready
    pub fn get(&self, model: &str) -> Option<Arc<MeshData>> {
        match self.entries.get(model) {
            Some(ModelStatus::Ready(mesh)) => Some(Arc::clone(mesh)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn triangle() -> MeshData {
        MeshData::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(0.0, 4.0, 0.0),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_load_becomes_ready_after_poll() {
        let mut loader = InMemoryLoader::new().with_mesh("chair", triangle());
        let mut cache = ModelCache::new(1.2);

        assert!(cache.request("chair", &mut loader));
        assert!(!cache.request("chair", &mut loader));
        assert_eq!(cache.status("chair"), Some(&ModelStatus::Pending));
        assert!(cache.get("chair").is_none());

        let outcomes = cache.poll(&mut loader);
        assert!(matches!(outcomes.as_slice(), [Ok(model)] if model == "chair"));
        let mesh = cache.get("chair").unwrap();
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.max_dimension() - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_missing_model_is_recorded_as_failure() {
        let mut loader = InMemoryLoader::new();
        let mut cache = ModelCache::new(1.2);
        cache.request("lamp", &mut loader);

        let outcomes = cache.poll(&mut loader);
        assert_eq!(outcomes.len(), 1);
        assert!(matches!(&outcomes[0], Err(EngineError::AssetLoadFailure { model, .. }) if model == "lamp"));
        assert!(matches!(cache.status("lamp"), Some(ModelStatus::Failed(AssetError::NotFound(_)))));
    }

    #[test]
    fn test_malformed_mesh_fails() {
        let mut bad = triangle();
        bad.positions[1].x = f32::INFINITY;
        let mut loader = InMemoryLoader::new().with_mesh("bad", bad);
        let mut cache = ModelCache::new(1.2);
        cache.request("bad", &mut loader);

        assert!(cache.poll(&mut loader)[0].is_err());
        assert_eq!(cache.status("bad"), Some(&ModelStatus::Failed(AssetError::Malformed)));
    }
}
