//! # Map Error Types
//!
//! Failures of the orchestrator. Everything here is recoverable: a failed
//! call leaves the generator in the state it was in before.

use delve_procedural::ConfigError;
use thiserror::Error;

use crate::assets::AssetError;
use crate::generator::MapState;

/// Errors that can occur while initializing or driving a map generator.
#[derive(Error, Debug)]
pub enum MapError {
    /// No display surface carries the expected tag.
    #[error("no tile surface tagged `{tag}`")]
    MissingCollaborator {
        /// Tag that was looked up.
        tag: String,
    },

    /// A feature asset could not be loaded.
    #[error("failed to load asset `{name}`: {source}")]
    AssetLoadFailure {
        /// Asset name that was requested.
        name: String,
        /// Loader error.
        #[source]
        source: AssetError,
    },

    /// The generation parameters are invalid.
    #[error("invalid map configuration: {0}")]
    PreconditionViolation(#[from] ConfigError),

    /// The operation is not allowed in the current state.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        /// Operation that was refused.
        operation: &'static str,
        /// State the generator was in.
        state: MapState,
    },

    /// Initialization was cancelled before every asset loaded.
    #[error("initialization cancelled")]
    Cancelled,
}

/// Result type for map operations.
pub type MapResult<T> = Result<T, MapError>;
