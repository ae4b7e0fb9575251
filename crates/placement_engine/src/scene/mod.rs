//! Scene data: placeable objects, the kind catalog and the registry owning them

pub mod kind;
pub mod object;
pub mod registry;

pub use kind::ObjectKind;
pub use object::{LifecycleState, ObjectId, PhysicsProfile, PlaceableObject, PlacementRequest};
pub use registry::{PurgeReport, SceneRegistry};
