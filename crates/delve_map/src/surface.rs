//! # Display Surfaces
//!
//! The generator never draws anything itself. It writes tiles through a
//! [`TileSurface`] located by tag on a [`SurfaceHost`].
//!
//! ```text
//! delve_map defines:    a front end implements:
//! ┌────────────────┐    ┌────────────────────┐
//! │ TileSurface    │ ←─ │ impl TileSurface   │
//! │ SurfaceHost    │ ←─ │ impl SurfaceHost   │
//! └────────────────┘    └────────────────────┘
//! ```
//!
//! `MemorySurface` and `MemorySurfaceHost` are the built-in implementations
//! used by the preview binary and the tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use delve_procedural::{Bounds, Coordinate};
use parking_lot::RwLock;

use crate::assets::AssetHandle;

/// A grid display surface that accepts one asset per tile.
pub trait TileSurface: Send {
    /// Paints `asset` at `coord`, replacing whatever was there.
    fn set_cell(&mut self, coord: Coordinate, asset: &AssetHandle);

    /// Removes every tile.
    fn clear_all(&mut self);
}

/// Something that owns tagged surfaces.
pub trait SurfaceHost {
    /// Surface type handed out.
    type Surface: TileSurface;

    /// Finds the surface carrying `tag`.
    fn find_surface(&self, tag: &str) -> Option<Self::Surface>;
}

/// Tile surface backed by an in-memory map.
///
/// Clones share the same tiles, so a test can keep one clone and inspect what
/// the generator wrote through another.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    tiles: Arc<RwLock<BTreeMap<Coordinate, AssetHandle>>>,
}

impl MemorySurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of painted tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.read().len()
    }

    /// Returns true if nothing is painted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.read().is_empty()
    }

    /// Asset at `coord`, if any.
    #[must_use]
    pub fn get(&self, coord: Coordinate) -> Option<AssetHandle> {
        self.tiles.read().get(&coord).cloned()
    }

    /// Sorted coordinates of every painted tile.
    #[must_use]
    pub fn occupied(&self) -> Vec<Coordinate> {
        self.tiles.read().keys().copied().collect()
    }

    /// Renders `bounds` as ASCII rows (`#` painted, `.` empty).
    #[must_use]
    pub fn to_ascii(&self, bounds: Bounds) -> String {
        let tiles = self.tiles.read();
        let mut out = String::with_capacity((bounds.width as usize + 1) * bounds.height as usize);
        for j in 0..bounds.height as usize {
            for i in 0..bounds.width as usize {
                let coord = bounds.to_world(i, j);
                out.push(if tiles.contains_key(&coord) { '#' } else { '.' });
            }
            out.push('\n');
        }
        out
    }
}

impl TileSurface for MemorySurface {
    fn set_cell(&mut self, coord: Coordinate, asset: &AssetHandle) {
        self.tiles.write().insert(coord, asset.clone());
    }

    fn clear_all(&mut self) {
        self.tiles.write().clear();
    }
}

/// Host holding tagged [`MemorySurface`]s.
#[derive(Clone, Debug, Default)]
pub struct MemorySurfaceHost {
    surfaces: HashMap<String, MemorySurface>,
}

impl MemorySurfaceHost {
    /// Creates a host without surfaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `surface` under `tag`.
    #[must_use]
    pub fn with_surface(mut self, tag: impl Into<String>, surface: MemorySurface) -> Self {
        self.surfaces.insert(tag.into(), surface);
        self
    }
}

impl SurfaceHost for MemorySurfaceHost {
    type Surface = MemorySurface;

    fn find_surface(&self, tag: &str) -> Option<MemorySurface> {
        self.surfaces.get(tag).cloned()
    }
}
