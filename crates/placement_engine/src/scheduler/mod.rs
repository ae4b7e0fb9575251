//! Frame scheduling
//!
//! The host calls [`FrameScheduler::tick`] once per display refresh. Every
//! command issued between ticks is queued and applied at the start of the
//! next one, so the object set never changes in the middle of a pass.

pub mod command;
pub mod context;
pub mod frame;

pub use command::Command;
pub use context::SimulationContext;
pub use frame::FrameScheduler;
