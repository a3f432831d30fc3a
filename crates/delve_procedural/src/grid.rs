//! # Grid System
//!
//! Generated maps are staged in a dense buffer before anything reaches the
//! display surface:
//! - `Coordinate` is a world-space tile address
//! - `Bounds` is the rectangle one generation pass may write into
//! - `CellGrid` holds one `Cell` per tile of that rectangle
//!
//! ## Addressing
//!
//! Local indices `(i, j)` map to world coordinates by a fixed translation:
//! `world = (bounds.min.x + i, bounds.min.y + j)`. Storage is row-major
//! (`j * width + i`), which is also the scan and commit order.

use serde::{Deserialize, Serialize};

/// World-space tile coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    /// X coordinate (in tiles).
    pub x: i32,
    /// Y coordinate (in tiles).
    pub y: i32,
}

impl Coordinate {
    /// The world origin. Every irregular map is anchored here.
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    /// Creates a new coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another coordinate.
    #[inline]
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        dx.hypot(dy)
    }

    /// Returns this coordinate shifted by `(dx, dy)`.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Axis-aligned rectangle of tiles, anchored at its minimum corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum (top-left) corner in world space.
    pub min: Coordinate,
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
}

impl Bounds {
    /// Creates bounds from a corner and a size.
    #[inline]
    #[must_use]
    pub const fn new(min: Coordinate, width: u32, height: u32) -> Self {
        Self { min, width, height }
    }

    /// Smallest rectangle holding disks of `radius` around both anchors,
    /// grown by `border` tiles on every side.
    ///
    /// The radius is rounded up so that every tile within `radius` of either
    /// anchor falls inside the rectangle.
    #[must_use]
    pub fn around_anchors(origin: Coordinate, endpoint: Coordinate, radius: f64, border: u32) -> Self {
        let reach = radius.max(0.0).ceil() as i32 + border as i32;

        let min_x = origin.x.min(endpoint.x) - reach;
        let min_y = origin.y.min(endpoint.y) - reach;
        let max_x = origin.x.max(endpoint.x) + reach;
        let max_y = origin.y.max(endpoint.y) + reach;

        Self {
            min: Coordinate::new(min_x, min_y),
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        }
    }

    /// Inclusive maximum (bottom-right) corner.
    ///
    /// Meaningless for empty bounds.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> Coordinate {
        Coordinate {
            x: self.min.x + self.width as i32 - 1,
            y: self.min.y + self.height as i32 - 1,
        }
    }

    /// Number of tiles covered.
    #[inline]
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns true if the bounds cover no tiles.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Returns true if the world coordinate lies inside.
    #[inline]
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.to_local(coord).is_some()
    }

    /// Converts a world coordinate to a local `(i, j)` index.
    #[must_use]
    pub fn to_local(&self, coord: Coordinate) -> Option<(usize, usize)> {
        let i = i64::from(coord.x) - i64::from(self.min.x);
        let j = i64::from(coord.y) - i64::from(self.min.y);
        if i < 0 || j < 0 || i >= i64::from(self.width) || j >= i64::from(self.height) {
            return None;
        }
        Some((i as usize, j as usize))
    }

    /// Converts a local `(i, j)` index to a world coordinate.
    #[inline]
    #[must_use]
    pub const fn to_world(&self, i: usize, j: usize) -> Coordinate {
        Coordinate {
            x: self.min.x + i as i32,
            y: self.min.y + j as i32,
        }
    }

    /// Iterates all world coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Coordinate> + '_ {
        (0..self.height as usize)
            .flat_map(move |j| (0..self.width as usize).map(move |i| self.to_world(i, j)))
    }
}

/// Presence status of a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Cell {
    /// No tile (a hole).
    #[default]
    Absent = 0,
    /// Solid ground.
    Present = 1,
}

impl Cell {
    /// Returns the opposite status.
    #[inline]
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Absent => Self::Present,
            Self::Present => Self::Absent,
        }
    }

    /// Returns true for solid ground.
    #[inline]
    #[must_use]
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }

    /// ASCII glyph used by [`CellGrid::to_ascii`].
    #[inline]
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Absent => '.',
            Self::Present => '#',
        }
    }
}

/// Dense status buffer covering one [`Bounds`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    /// Region covered by this grid.
    bounds: Bounds,
    /// Status data (indexed as `j * width + i`).
    cells: Vec<Cell>,
}

impl CellGrid {
    /// Creates a grid with every tile set to `fill`.
    #[must_use]
    pub fn filled(bounds: Bounds, fill: Cell) -> Self {
        Self {
            bounds,
            cells: vec![fill; bounds.cell_count()],
        }
    }

    /// Builds a grid from ASCII rows (`#` present, anything else absent).
    ///
    /// Row `j` of the input becomes local row `j`. Returns `None` if rows
    /// have different lengths.
    #[must_use]
    pub fn from_ascii(min: Coordinate, rows: &[&str]) -> Option<Self> {
        let width = rows.first().map_or(0, |row| row.chars().count());
        let mut cells = Vec::with_capacity(width * rows.len());

        for row in rows {
            if row.chars().count() != width {
                return None;
            }
            cells.extend(row.chars().map(|c| if c == '#' { Cell::Present } else { Cell::Absent }));
        }

        Some(Self {
            bounds: Bounds::new(min, width as u32, rows.len() as u32),
            cells,
        })
    }

    /// Region covered by this grid.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Grid width in tiles.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.bounds.width as usize
    }

    /// Grid height in tiles.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.bounds.height as usize
    }

    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        j * self.width() + i
    }

    /// Gets a cell at local coordinates. Out of range reads are absent.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Cell {
        if i < self.width() && j < self.height() {
            self.cells[self.index(i, j)]
        } else {
            Cell::Absent
        }
    }

    /// Sets a cell at local coordinates. Out of range writes are ignored.
    #[inline]
    pub fn set(&mut self, i: usize, j: usize, cell: Cell) {
        if i < self.width() && j < self.height() {
            let idx = self.index(i, j);
            self.cells[idx] = cell;
        }
    }

    /// Gets a cell at a world coordinate. Outside the bounds reads absent.
    #[inline]
    #[must_use]
    pub fn get_world(&self, coord: Coordinate) -> Cell {
        self.bounds
            .to_local(coord)
            .map_or(Cell::Absent, |(i, j)| self.get(i, j))
    }

    /// Sets a cell at a world coordinate. Outside the bounds is ignored.
    #[inline]
    pub fn set_world(&mut self, coord: Coordinate, cell: Cell) {
        if let Some((i, j)) = self.bounds.to_local(coord) {
            self.set(i, j, cell);
        }
    }

    /// Number of tiles with the given status.
    #[must_use]
    pub fn count(&self, status: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == status).count()
    }

    /// World coordinates of all present tiles, row-major.
    pub fn present_cells(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_present())
            .map(|(idx, _)| self.bounds.to_world(idx % self.width(), idx / self.width()))
    }

    /// Raw row-major status slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[Cell] {
        &self.cells
    }

    /// Renders the grid as ASCII rows, one line per local row.
    #[must_use]
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width() + 1) * self.height());
        for row in self.cells.chunks(self.width().max(1)) {
            out.extend(row.iter().map(|c| c.glyph()));
            out.push('\n');
        }
        out
    }
}
