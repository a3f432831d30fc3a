//! # DELVE Procedural Generation
//!
//! Pure, deterministic map generation for DELVE's 2D tile maps.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: Same seed and same plan always produce the same map
//! 2. **Pure**: No display surface, no assets, no I/O in the pipeline
//! 3. **Enclosed**: Irregular maps are always surrounded by solid ground
//!
//! ## Core Components
//!
//! - `WorldSeed` / `SimplexNoise`: Seeded coherent noise
//! - `AnchorPair`: Origin plus a random endpoint in a distance annulus
//! - `classify_anchored` / `classify_uniform`: Noise to presence grid
//! - `prune`: Small component removal via explicit-stack flood fill
//! - `LayoutBuilder`: The whole pipeline, split into plan and build
//!
//! ## Example
//!
//! ```rust
//! use delve_procedural::{Cell, LayoutBuilder, MapConfig, WorldSeed};
//!
//! let builder = LayoutBuilder::new(MapConfig::default(), WorldSeed::new(12345)).unwrap();
//! let layout = builder.generate(&mut WorldSeed::new(1).rng());
//!
//! let anchors = layout.anchors.unwrap();
//! assert!(layout.bounds.contains(anchors.endpoint));
//! assert!(layout.grid.count(Cell::Present) > 0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod anchor;
pub mod classify;
pub mod config;
pub mod error;
pub mod grid;
pub mod layout;
pub mod noise;
pub mod prune;

pub use anchor::{place_endpoint, AnchorPair};
pub use classify::{carve_zone_contains, classify_anchored, classify_uniform};
pub use config::{GenerationMode, MapConfig, MAX_REGION_CELLS};
pub use error::{ConfigError, ConfigResult};
pub use grid::{Bounds, Cell, CellGrid, Coordinate};
pub use layout::{GenerationPlan, LayoutBuilder, MapLayout};
pub use noise::{sample_field, NoiseField, SimplexNoise, WorldSeed};
pub use prune::{find_components, prune, prune_where, Component, PruneStats};
