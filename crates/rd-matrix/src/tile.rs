//! Partition of an N×N matrix into square-ish tiles.

use std::ops::Range;

/// One sources × targets sub-request.  Ranges index the input point list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub row: usize,
    pub col: usize,
    pub src: Range<usize>,
    pub dst: Range<usize>,
}

impl Tile {
    /// Number of cells this tile covers.
    #[inline]
    pub fn cells(&self) -> usize {
        self.src.len() * self.dst.len()
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tile ({}, {}) [{}×{}]", self.row, self.col, self.src.len(), self.dst.len())
    }
}

/// `ceil(n / tile_size)` slices per axis; the last slice may be short.
#[derive(Clone, Debug)]
pub struct TileGrid {
    n:         usize,
    tile_size: usize,
}

impl TileGrid {
    /// `tile_size` of 0 is treated as 1.
    pub fn new(n: usize, tile_size: usize) -> Self {
        Self { n, tile_size: tile_size.max(1) }
    }

    /// Slices per axis.
    #[inline]
    pub fn side(&self) -> usize {
        self.n.div_ceil(self.tile_size)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.side() * self.side()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    fn slice(&self, k: usize) -> Range<usize> {
        let start = k * self.tile_size;
        start..(start + self.tile_size).min(self.n)
    }

    /// Tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Tile> + '_ {
        let side = self.side();
        (0..side).flat_map(move |row| {
            (0..side).map(move |col| Tile { row, col, src: self.slice(row), dst: self.slice(col) })
        })
    }
}
