//! # Map Configuration
//!
//! All generation parameters, loadable from TOML.
//!
//! ```toml
//! min_distance = 40.0
//! max_distance = 60.0
//! radius = 60.0
//! scale = 0.15
//! empty_probability = 0.4
//! cave_size_threshold = 100
//! border = 2
//!
//! [mode]
//! kind = "irregular"
//! ```
//!
//! A rectangular map replaces the `[mode]` table:
//!
//! ```toml
//! [mode]
//! kind = "rectangular"
//! origin = { x = -20, y = -10 }
//! width = 40
//! height = 20
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::grid::{Cell, Coordinate};

/// Upper limit on tiles in one bounding region.
pub const MAX_REGION_CELLS: u64 = 16 * 1024 * 1024;

/// Range the per-generation noise offset is drawn from.
pub const OFFSET_RANGE: std::ops::Range<i32> = -10_000..10_000;

/// How the map shape is produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationMode {
    /// Two noise-eroded carve zones around the origin and a random endpoint,
    /// enclosed by solid ground, followed by small hole pruning.
    #[default]
    Irregular,
    /// Independent per-tile thresholding over a fixed rectangle.
    Rectangular {
        /// Minimum corner of the rectangle.
        origin: Coordinate,
        /// Width in tiles.
        width: u32,
        /// Height in tiles.
        height: u32,
    },
}

/// Generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Shape strategy.
    pub mode: GenerationMode,
    /// Minimum origin-to-endpoint distance (tiles).
    pub min_distance: f64,
    /// Maximum origin-to-endpoint distance (tiles).
    pub max_distance: f64,
    /// Carve zone radius around each anchor (tiles).
    pub radius: f64,
    /// Noise step per tile. Smaller values give larger blobs.
    pub scale: f64,
    /// Noise threshold at or below which a carve-zone tile becomes a hole.
    pub empty_probability: f64,
    /// Components of `prune_status` with this many tiles or fewer are filled.
    pub cave_size_threshold: usize,
    /// Solid frame thickness around the bounding region (tiles).
    pub border: u32,
    /// Fractal noise layers. `1` is plain single-layer noise.
    pub octaves: u32,
    /// Status whose small components get pruned.
    pub prune_status: Cell,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Irregular,
            min_distance: 40.0,
            max_distance: 60.0,
            radius: 60.0,
            scale: 0.15,
            empty_probability: 0.4,
            cave_size_threshold: 100,
            border: 2,
            octaves: 1,
            prune_status: Cell::Absent,
        }
    }
}

impl MapConfig {
    /// Rectangular map over `width x height` tiles starting at `origin`.
    #[must_use]
    pub fn rectangular(origin: Coordinate, width: u32, height: u32) -> Self {
        Self {
            mode: GenerationMode::Rectangular { origin, width, height },
            scale: 0.1,
            ..Self::default()
        }
    }

    /// Parses a config from TOML text and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML and any validation
    /// error from [`validate`](Self::validate).
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// same errors as [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Checks every precondition the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns the first violated precondition.
    pub fn validate(&self) -> ConfigResult<()> {
        check_range("scale", self.scale, 0.0, f64::MAX, "finite, > 0")?;
        if self.scale <= 0.0 {
            return Err(out_of_range("scale", self.scale, "finite, > 0"));
        }
        check_range("empty_probability", self.empty_probability, 0.0, 1.0, "0.0 ..= 1.0")?;
        if self.octaves == 0 || self.octaves > 16 {
            return Err(out_of_range("octaves", f64::from(self.octaves), "1 ..= 16"));
        }

        match self.mode {
            GenerationMode::Irregular => self.validate_irregular(),
            GenerationMode::Rectangular { origin, width, height } => {
                if width == 0 || height == 0 {
                    return Err(ConfigError::EmptyRegion { width, height });
                }
                check_cell_count(u64::from(width) * u64::from(height))?;
                if far_corner(origin, width, height).is_none() {
                    return Err(ConfigError::RegionOutOfRange { origin, width, height });
                }
                Ok(())
            }
        }
    }

    fn validate_irregular(&self) -> ConfigResult<()> {
        check_range("min_distance", self.min_distance, 0.0, f64::MAX, "finite, >= 0")?;
        check_range("max_distance", self.max_distance, 0.0, f64::MAX, "finite, >= 0")?;
        check_range("radius", self.radius, 0.0, f64::MAX, "finite, >= 0")?;

        if self.min_distance > self.max_distance {
            return Err(ConfigError::InvertedDistanceRange {
                min: self.min_distance,
                max: self.max_distance,
            });
        }
        if self.max_distance - self.min_distance < 1.0 {
            return Err(ConfigError::AnnulusTooNarrow {
                min: self.min_distance,
                max: self.max_distance,
            });
        }

        // Either side of the region is at most this long.
        let reach = self.radius.ceil() + f64::from(self.border);
        let span = self.max_distance.ceil() + 2.0 * reach + 1.0;
        if span > MAX_REGION_CELLS as f64 {
            return Err(ConfigError::RegionTooLarge {
                cells: u64::MAX,
                limit: MAX_REGION_CELLS,
            });
        }
        let side = span as u64;
        check_cell_count(side.saturating_mul(side))
    }
}

fn out_of_range(name: &'static str, value: f64, expected: &'static str) -> ConfigError {
    ConfigError::OutOfRange { name, value, expected }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64, expected: &'static str) -> ConfigResult<()> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(out_of_range(name, value, expected))
    }
}

/// Last tile of a non-empty rectangle, if it is addressable.
fn far_corner(origin: Coordinate, width: u32, height: u32) -> Option<Coordinate> {
    let x = i32::try_from(width - 1).ok().and_then(|w| origin.x.checked_add(w))?;
    let y = i32::try_from(height - 1).ok().and_then(|h| origin.y.checked_add(h))?;
    Some(Coordinate::new(x, y))
}

fn check_cell_count(cells: u64) -> ConfigResult<()> {
    if cells > MAX_REGION_CELLS {
        Err(ConfigError::RegionTooLarge {
            cells,
            limit: MAX_REGION_CELLS,
        })
    } else {
        Ok(())
    }
}
