//! Point-mass physics
//!
//! Placed objects are bouncers, not rigid bodies: gravity, a single ground
//! plane, restitution, friction and free spin. The only object-object
//! interaction is the soft repulsion of interactive mode.

pub mod integrator;
pub mod ray;
pub mod repulsion;

pub use integrator::PhysicsIntegrator;
pub use ray::Ray;
pub use repulsion::Repulsion;
