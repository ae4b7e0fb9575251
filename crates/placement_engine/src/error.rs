//! Engine error taxonomy
//!
//! No error in this crate is fatal to the frame loop. Each variant maps to a
//! degraded outcome: a no-op command, a fallback shape or a skipped frame.

use crate::config::ConfigError;
use crate::scene::ObjectId;
use thiserror::Error;

/// Errors reported by engine operations
#[derive(Error, Debug)]
pub enum EngineError {
    /// Camera, viewport or scene not initialized yet
    #[error("Not ready: {0}")]
    NotReady(String),

    /// A model could not be loaded; a procedural shape is used instead
    #[error("Asset load failure for '{model}': {reason}")]
    AssetLoadFailure {
        /// Model identifier
        model: String,
        /// Loader-provided reason
        reason: String,
    },

    /// Unknown catalog entry
    #[error("Invalid object kind: {0}")]
    InvalidKind(String),

    /// Renderer could not release an object's resources
    #[error("Disposal failure for object {id}: {reason}")]
    DisposalFailure {
        /// Object whose resources failed to release
        id: ObjectId,
        /// Renderer-provided reason
        reason: String,
    },

    /// Malformed numeric input (NaN, infinity, out of range)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Renderer failed to upload or draw
    #[error("Render error: {0}")]
    Render(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
