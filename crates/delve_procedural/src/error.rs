//! # Procedural Error Types
//!
//! Everything that can go wrong before the pipeline runs. The pipeline itself
//! cannot fail once a [`MapConfig`](crate::config::MapConfig) and the
//! [`GenerationPlan`](crate::layout::GenerationPlan) fed to it have validated.

use thiserror::Error;

use crate::grid::Coordinate;

/// Errors raised while loading or validating a map configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The endpoint annulus is inverted.
    #[error("min_distance {min} is greater than max_distance {max}")]
    InvertedDistanceRange {
        /// Configured minimum distance.
        min: f64,
        /// Configured maximum distance.
        max: f64,
    },

    /// The endpoint annulus is too thin to contain a whole tile.
    #[error("distance annulus [{min}, {max}] must be at least one tile wide")]
    AnnulusTooNarrow {
        /// Configured minimum distance.
        min: f64,
        /// Configured maximum distance.
        max: f64,
    },

    /// A numeric parameter is NaN, infinite, or outside its allowed range.
    #[error("parameter `{name}` = {value} is out of range ({expected})")]
    OutOfRange {
        /// Parameter name as it appears in the config file.
        name: &'static str,
        /// Offending value.
        value: f64,
        /// Human readable allowed range.
        expected: &'static str,
    },

    /// The rectangular extent has no cells.
    #[error("rectangular region {width}x{height} has no cells")]
    EmptyRegion {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The rectangle's far corner does not fit in tile coordinates.
    #[error("rectangular region {width}x{height} at {origin} leaves the coordinate range")]
    RegionOutOfRange {
        /// Requested minimum corner.
        origin: Coordinate,
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A plan's endpoint does not match the generation mode.
    #[error("generation plan does not fit the mode: {expected}")]
    PlanModeMismatch {
        /// What the mode requires of the plan.
        expected: &'static str,
    },

    /// A plan's endpoint lies outside the distance annulus.
    #[error("endpoint {endpoint} is {distance} tiles from the origin, outside [{min}, {max}]")]
    EndpointOutOfRange {
        /// Planned endpoint.
        endpoint: Coordinate,
        /// Its distance from the origin.
        distance: f64,
        /// Configured minimum distance.
        min: f64,
        /// Configured maximum distance.
        max: f64,
    },

    /// The worst-case bounding region would be unreasonably large.
    #[error("bounding region of {cells} cells exceeds the limit of {limit}")]
    RegionTooLarge {
        /// Worst-case cell count.
        cells: u64,
        /// Maximum allowed cell count.
        limit: u64,
    },

    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`MapConfig`](crate::config::MapConfig).
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
