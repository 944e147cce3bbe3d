// Released under MIT License.
// Copyright (c) 2024 Ladislav Bartos

//! Contains the grid of tiles covering the membrane plane and the storage for per-tile data.

use std::ops::Add;

use getset::CopyGetters;

use crate::{errors::GridError, PANIC_MESSAGE};

/// Convert a coordinate to the index of a tile.
/// The coordinate is expected to lie inside the span of the grid.
#[inline(always)]
pub(crate) fn coord_to_index(x: f32, min: f32, tiles_per_nm: usize) -> usize {
    ((x - min) * tiles_per_nm as f32).round() as usize
}

/// Convert the index of a tile to the coordinate of the tile.
#[inline(always)]
pub(crate) fn index_to_coord(index: usize, min: f32, tiles_per_nm: usize) -> f32 {
    index as f32 / tiles_per_nm as f32 + min
}

/// Number of tiles covering the span along one axis.
fn n_tiles(min: f32, max: f32, tiles_per_nm: usize) -> Option<usize> {
    let n = ((max - min) * tiles_per_nm as f32).round();

    // rejects NaN and infinity as well
    if n >= 0.0 && n < (usize::MAX / 2) as f32 {
        Some(n as usize + 1)
    } else {
        None
    }
}

/// Index of a tile which is guaranteed to be inside the grid that constructed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CopyGetters)]
pub(crate) struct TileIndex {
    #[getset(get_copy = "pub(crate)")]
    row: usize,
    #[getset(get_copy = "pub(crate)")]
    col: usize,
}

/// Immutable grid of tiles covering a rectangular area of the membrane plane.
#[derive(Debug, Clone, PartialEq, CopyGetters)]
pub(crate) struct Grid {
    /// Span of the grid along its first axis.
    #[getset(get_copy = "pub(crate)")]
    span_x: (f32, f32),
    /// Span of the grid along its second axis.
    #[getset(get_copy = "pub(crate)")]
    span_y: (f32, f32),
    #[getset(get_copy = "pub(crate)")]
    n_cols: usize,
    #[getset(get_copy = "pub(crate)")]
    n_rows: usize,
    #[getset(get_copy = "pub(crate)")]
    tiles_per_nm: usize,
}

impl Grid {
    /// Construct a new grid with the given spans.
    ///
    /// ## Errors
    /// - `GridError::InvalidSpan` if minimum of any span is not lower than its maximum.
    /// - `GridError::TooLarge` if the number of tiles can not be represented.
    pub(crate) fn new(
        span_x: (f32, f32),
        span_y: (f32, f32),
        tiles_per_nm: usize,
    ) -> Result<Grid, GridError> {
        for (min, max) in [span_x, span_y] {
            if min >= max || min.is_nan() || max.is_nan() {
                return Err(GridError::InvalidSpan(min, max));
            }
        }

        let n_cols = n_tiles(span_x.0, span_x.1, tiles_per_nm)
            .ok_or(GridError::TooLarge(usize::MAX, usize::MAX))?;
        let n_rows = n_tiles(span_y.0, span_y.1, tiles_per_nm)
            .ok_or(GridError::TooLarge(n_cols, usize::MAX))?;

        if n_cols.checked_mul(n_rows).is_none() {
            return Err(GridError::TooLarge(n_cols, n_rows));
        }

        Ok(Grid {
            span_x,
            span_y,
            n_cols,
            n_rows,
            tiles_per_nm,
        })
    }

    /// Total number of tiles in the grid.
    #[inline(always)]
    pub(crate) fn n_tiles(&self) -> usize {
        self.n_cols * self.n_rows
    }

    /// Get the tile in which the point is located.
    /// Returns `None` if the point is outside the grid.
    /// Points located exactly at the edge of the grid are inside.
    #[inline]
    pub(crate) fn tile_at(&self, x: f32, y: f32) -> Option<TileIndex> {
        let inside = |value: f32, (min, max): (f32, f32)| value >= min && value <= max;
        if !inside(x, self.span_x) || !inside(y, self.span_y) {
            return None;
        }

        let col = coord_to_index(x, self.span_x.0, self.tiles_per_nm);
        let row = coord_to_index(y, self.span_y.0, self.tiles_per_nm);

        if col < self.n_cols && row < self.n_rows {
            Some(TileIndex { row, col })
        } else {
            None
        }
    }

    /// Get coordinates of the tile.
    #[inline(always)]
    pub(crate) fn tile_coordinates(&self, tile: TileIndex) -> (f32, f32) {
        (
            index_to_coord(tile.col, self.span_x.0, self.tiles_per_nm),
            index_to_coord(tile.row, self.span_y.0, self.tiles_per_nm),
        )
    }

    /// Iterate over all tiles of the grid. Rows are the outer loop.
    pub(crate) fn tiles(&self) -> impl Iterator<Item = TileIndex> + '_ {
        (0..self.n_rows).flat_map(move |row| (0..self.n_cols).map(move |col| TileIndex { row, col }))
    }
}

/// Values stored for each tile of a grid.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TileGrid<T> {
    n_cols: usize,
    n_rows: usize,
    values: Vec<T>,
}

impl<T: Clone + Default> TileGrid<T> {
    /// Allocate default values for every tile of the grid.
    ///
    /// ## Errors
    /// Returns `GridError::TooLarge` if the memory could not be allocated.
    pub(crate) fn new(grid: &Grid) -> Result<TileGrid<T>, GridError> {
        let too_large = || GridError::TooLarge(grid.n_cols(), grid.n_rows());

        let n_tiles = grid
            .n_cols()
            .checked_mul(grid.n_rows())
            .ok_or_else(too_large)?;

        let mut values = Vec::new();
        values.try_reserve_exact(n_tiles).map_err(|_| too_large())?;
        values.resize(n_tiles, T::default());

        Ok(TileGrid {
            n_cols: grid.n_cols(),
            n_rows: grid.n_rows(),
            values,
        })
    }
}

impl<T> TileGrid<T> {
    #[inline(always)]
    fn flat(&self, tile: TileIndex) -> usize {
        tile.row * self.n_cols + tile.col
    }

    #[inline(always)]
    pub(crate) fn get(&self, tile: TileIndex) -> &T {
        let index = self.flat(tile);
        self.values.get(index).unwrap_or_else(|| {
            panic!(
                "FATAL MEMGRID ERROR | TileGrid::get | Tile '{:?}' is outside of the grid ({} x {}). {}",
                tile, self.n_cols, self.n_rows, PANIC_MESSAGE
            )
        })
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self, tile: TileIndex) -> &mut T {
        let index = self.flat(tile);
        let (n_cols, n_rows) = (self.n_cols, self.n_rows);
        self.values.get_mut(index).unwrap_or_else(|| {
            panic!(
                "FATAL MEMGRID ERROR | TileGrid::get_mut | Tile '{:?}' is outside of the grid ({} x {}). {}",
                tile, n_cols, n_rows, PANIC_MESSAGE
            )
        })
    }
}

impl<T: Add<Output = T>> Add for TileGrid<T> {
    type Output = TileGrid<T>;

    /// Merge two grids of the same size tile by tile.
    fn add(self, rhs: Self) -> Self::Output {
        if self.n_cols != rhs.n_cols || self.n_rows != rhs.n_rows {
            panic!(
                "FATAL MEMGRID ERROR | TileGrid::add | Grids of different sizes can not be merged ({} x {} vs {} x {}). {}",
                self.n_cols, self.n_rows, rhs.n_cols, rhs.n_rows, PANIC_MESSAGE
            );
        }

        TileGrid {
            n_cols: self.n_cols,
            n_rows: self.n_rows,
            values: self
                .values
                .into_iter()
                .zip(rhs.values)
                .map(|(a, b)| a + b)
                .collect(),
        }
    }
}
