//! Progress callbacks for matrix acquisition.

use crate::Tile;

/// Callbacks invoked by [`MatrixBatcher`][crate::MatrixBatcher] as tiles are
/// stitched.  With the `parallel` feature, calls still arrive sequentially in
/// row-major tile order, after all requests have returned.
pub trait TileObserver {
    /// `ok` is `false` when the tile was filled with nulls.
    fn on_tile(&mut self, _tile: &Tile, _ok: bool) {}

    fn on_batch_end(&mut self, _tiles: usize, _failed: usize) {}
}

/// A [`TileObserver`] that does nothing.
pub struct NoopObserver;

impl TileObserver for NoopObserver {}
