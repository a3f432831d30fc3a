//! # Connectivity Pruner
//!
//! Finds 4-connected components of one status and flips the small ones.
//!
//! The default target is `Absent`: tiny holes inside the cave are filled so
//! the map has no specks. Components are discovered in row-major order of
//! their first tile, with an explicit stack so region size never touches the
//! call stack.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::grid::{Cell, CellGrid, Coordinate};

/// A maximal 4-connected set of same-status tiles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    /// Status shared by every tile.
    pub status: Cell,
    /// World coordinates, in discovery order.
    pub cells: Vec<Coordinate>,
}

impl Component {
    /// Number of tiles.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false for components returned by [`find_components`].
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// What a prune pass changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneStats {
    /// Components of the target status before pruning.
    pub components_found: usize,
    /// Components flipped.
    pub components_removed: usize,
    /// Tiles flipped.
    pub cells_flipped: usize,
}

/// Lists every component of `target`, ordered by first tile in row-major scan.
#[must_use]
pub fn find_components(grid: &CellGrid, target: Cell) -> Vec<Component> {
    let width = grid.width();
    let height = grid.height();
    let bounds = grid.bounds();
    let cells = grid.as_slice();

    let mut visited = vec![false; cells.len()];
    let mut stack: Vec<usize> = Vec::new();
    let mut components = Vec::new();

    for (start, &cell) in cells.iter().enumerate() {
        if visited[start] || cell != target {
            continue;
        }

        let mut members = Vec::new();
        visited[start] = true;
        stack.push(start);

        while let Some(idx) = stack.pop() {
            let (i, j) = (idx % width, idx / width);
            members.push(bounds.to_world(i, j));

            let mut visit = |n: usize| {
                if !visited[n] && cells[n] == target {
                    visited[n] = true;
                    stack.push(n);
                }
            };
            if i > 0 {
                visit(idx - 1);
            }
            if i + 1 < width {
                visit(idx + 1);
            }
            if j > 0 {
                visit(idx - width);
            }
            if j + 1 < height {
                visit(idx + width);
            }
        }

        components.push(Component {
            status: target,
            cells: members,
        });
    }

    components
}

/// Flips every `target` component with `threshold` tiles or fewer.
///
/// Running it a second time with the same arguments changes nothing:
/// flipping a component merges it into the surrounding opposite status, so no
/// new small `target` components can appear.
pub fn prune(grid: &mut CellGrid, target: Cell, threshold: usize) -> PruneStats {
    prune_where(grid, target, threshold, |_| true)
}

/// Like [`prune`], but only flips components whose every tile is `eligible`.
///
/// Components that touch an ineligible tile are counted but left alone.
pub fn prune_where<F>(grid: &mut CellGrid, target: Cell, threshold: usize, eligible: F) -> PruneStats
where
    F: Fn(Coordinate) -> bool,
{
    let components = find_components(grid, target);
    let mut stats = PruneStats {
        components_found: components.len(),
        ..PruneStats::default()
    };

    let removable = components
        .iter()
        .filter(|c| c.len() <= threshold && c.cells.iter().all(|&coord| eligible(coord)));
    for component in removable {
        for &coord in &component.cells {
            grid.set_world(coord, target.flipped());
        }
        stats.components_removed += 1;
        stats.cells_flipped += component.len();
    }

    debug!(
        ?target,
        threshold,
        found = stats.components_found,
        removed = stats.components_removed,
        flipped = stats.cells_flipped,
        "pruned small components"
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&str]) -> CellGrid {
        CellGrid::from_ascii(Coordinate::ORIGIN, rows).unwrap()
    }

    #[test]
    fn test_components_are_four_connected() {
        // Diagonal holes are separate components.
        let g = grid(&["#.#", ".#.", "#.#"]);
        let holes = find_components(&g, Cell::Absent);
        assert_eq!(holes.len(), 4);
        assert!(holes.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn test_components_in_row_major_order() {
        let g = grid(&["##.", "...", ".##"]);
        let solids = find_components(&g, Cell::Present);
        assert_eq!(solids.len(), 2);
        assert_eq!(solids[0].cells[0], Coordinate::new(0, 0));
        assert_eq!(solids[1].cells[0], Coordinate::new(1, 2));
    }

    #[test]
    fn test_prune_removes_only_small_holes() {
        let mut g = grid(&["######", "#.##..", "####..", "######"]);
        let stats = prune(&mut g, Cell::Absent, 1);

        assert_eq!(stats.components_found, 2);
        assert_eq!(stats.components_removed, 1);
        assert_eq!(stats.cells_flipped, 1);
        assert_eq!(g.get(1, 1), Cell::Present);
        assert_eq!(g.count(Cell::Absent), 4);
    }

    #[test]
    fn test_prune_zero_threshold_is_noop() {
        let mut g = grid(&["#.", ".#"]);
        let before = g.clone();
        let stats = prune(&mut g, Cell::Absent, 0);
        assert_eq!(stats.components_removed, 0);
        assert_eq!(g, before);
    }

    #[test]
    fn test_prune_present_islands() {
        let mut g = grid(&["#....", "...##", "...##"]);
        prune(&mut g, Cell::Present, 1);
        assert_eq!(g.get(0, 0), Cell::Absent);
        assert_eq!(g.count(Cell::Present), 4);
    }

    #[test]
    fn test_prune_where_skips_ineligible_components() {
        // The left island touches column 0, which is off limits.
        let mut g = grid(&["#...#", ".....", "..#.."]);
        let stats = prune_where(&mut g, Cell::Present, 1, |coord| coord.x > 0);

        assert_eq!(stats.components_found, 3);
        assert_eq!(stats.components_removed, 2);
        assert_eq!(g.get(0, 0), Cell::Present);
        assert_eq!(g.get(4, 0), Cell::Absent);
        assert_eq!(g.get(2, 2), Cell::Absent);
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut g = grid(&["#.#..#", "..#.##", "###...", "#.#.#."]);
        prune(&mut g, Cell::Absent, 2);
        let once = g.clone();
        let stats = prune(&mut g, Cell::Absent, 2);
        assert_eq!(stats.components_removed, 0);
        assert_eq!(g, once);
    }

    #[test]
    fn test_large_region_does_not_overflow_stack() {
        let bounds = crate::grid::Bounds::new(Coordinate::ORIGIN, 1024, 1024);
        let g = CellGrid::filled(bounds, Cell::Absent);
        let holes = find_components(&g, Cell::Absent);
        assert_eq!(holes.len(), 1);
        assert_eq!(holes[0].len(), 1024 * 1024);
    }
}
