//! Tap input: screen coordinates to world-space placement targets

pub mod raycaster;
pub mod viewport;

pub use raycaster::PlacementRaycaster;
pub use viewport::Viewport;
