//! # DELVE Map Orchestrator
//!
//! Connects the pure generator in `delve_procedural` to the outside world.
//!
//! ## Lifecycle
//!
//! 1. `MapGenerator::new` validates the config and seeds the RNG
//! 2. `initialize` finds the ground surface and loads feature assets (async)
//! 3. `generate_map` builds a layout and commits it to the surface
//! 4. `clear_map` empties the surface again
//!
//! ## Example
//!
//! ```rust
//! use delve_map::{MapGenerator, MemorySurface, MemorySurfaceHost, StaticAssetLoader, GROUND_SURFACE_TAG};
//! use delve_procedural::{MapConfig, WorldSeed};
//! use tokio_util::sync::CancellationToken;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let surface = MemorySurface::new();
//! let host = MemorySurfaceHost::new().with_surface(GROUND_SURFACE_TAG, surface.clone());
//!
//! let mut generator = MapGenerator::new(MapConfig::default(), WorldSeed::new(7)).unwrap();
//! let registry = generator
//!     .initialize(&host, &StaticAssetLoader::standard(), &CancellationToken::new())
//!     .await
//!     .unwrap();
//!
//! let report = generator.generate_map(&registry).unwrap();
//! assert_eq!(surface.len(), report.cells_written);
//! # });
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod assets;
pub mod error;
pub mod generator;
pub mod logging;
pub mod surface;

pub use assets::{
    load_registry, AssetError, AssetHandle, AssetLoader, FeatureRegistry, MapFeature, StaticAssetLoader,
    ENTRANCE_ASSET, EXIT_ASSET, GROUND_TILE_ASSET,
};
pub use error::{MapError, MapResult};
pub use generator::{
    AnchorSlot, GenerationReport, MapGenerator, MapState, SharedMapGenerator, GROUND_SURFACE_TAG,
};
pub use logging::init_logging;
pub use surface::{MemorySurface, MemorySurfaceHost, SurfaceHost, TileSurface};
