//! # Region Classifier
//!
//! Turns a noise field into a presence grid.
//!
//! Irregular maps: tiles within `radius` of either anchor form the carve zone.
//! A carve-zone tile is present only when its noise value is above
//! `empty_probability`; every tile outside the zone is present. The result is
//! a noise-eroded cave enclosed by solid ground.
//!
//! Rectangular maps skip the carve zone and threshold every tile.

use tracing::debug;

use crate::anchor::AnchorPair;
use crate::grid::{Bounds, Cell, CellGrid, Coordinate};
use crate::noise::NoiseField;

/// Returns true if `coord` lies within `radius` of either anchor.
///
/// A zero radius carves nothing.
#[inline]
#[must_use]
pub fn carve_zone_contains(anchors: &AnchorPair, radius: f64, coord: Coordinate) -> bool {
    radius > 0.0
        && anchors
            .as_array()
            .iter()
            .any(|anchor| anchor.distance_to(coord) <= radius)
}

/// Presence rule for a single noise sample.
#[inline]
fn threshold(value: f64, empty_probability: f64) -> Cell {
    if value > empty_probability {
        Cell::Present
    } else {
        Cell::Absent
    }
}

/// Classifies every tile of `bounds` around the anchors.
///
/// `field` must cover `bounds` with local `(i, j)` matching the grid's;
/// tiles the field doesn't reach are treated as noise `0.0`.
#[must_use]
pub fn classify_anchored(
    field: &NoiseField,
    bounds: Bounds,
    anchors: &AnchorPair,
    radius: f64,
    empty_probability: f64,
) -> CellGrid {
    debug_assert_eq!(field.width(), bounds.width as usize);
    debug_assert_eq!(field.height(), bounds.height as usize);

    let mut grid = CellGrid::filled(bounds, Cell::Present);
    let mut carved = 0usize;

    for j in 0..grid.height() {
        for i in 0..grid.width() {
            let coord = bounds.to_world(i, j);
            if !carve_zone_contains(anchors, radius, coord) {
                continue;
            }
            let cell = threshold(field.get(i, j).unwrap_or(0.0), empty_probability);
            if !cell.is_present() {
                grid.set(i, j, cell);
                carved += 1;
            }
        }
    }

    debug!(
        width = bounds.width,
        height = bounds.height,
        carved,
        "classified anchored region"
    );
    grid
}

/// Thresholds every tile of `bounds` independently.
#[must_use]
pub fn classify_uniform(field: &NoiseField, bounds: Bounds, empty_probability: f64) -> CellGrid {
    debug_assert_eq!(field.width(), bounds.width as usize);
    debug_assert_eq!(field.height(), bounds.height as usize);

    let mut grid = CellGrid::filled(bounds, Cell::Absent);
    for j in 0..grid.height() {
        for i in 0..grid.width() {
            grid.set(i, j, threshold(field.get(i, j).unwrap_or(0.0), empty_probability));
        }
    }

    debug!(
        width = bounds.width,
        height = bounds.height,
        present = grid.count(Cell::Present),
        "classified uniform region"
    );
    grid
}
