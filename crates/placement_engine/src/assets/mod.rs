//! Asset handling
//!
//! External models arrive through a [`ModelLoader`] owned by the host. The
//! engine polls it once per tick, normalises finished meshes and keeps them
//! in a [`ModelCache`]. Placement never waits on a load: a model that is not
//! ready (or failed) is placed as its procedural fallback.

pub mod loader;
pub mod mesh;

pub use loader::{AssetError, InMemoryLoader, LoadResult, ModelCache, ModelLoader, ModelStatus};
pub use mesh::{Bounds, MeshData};
