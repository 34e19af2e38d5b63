//! Tiled matrix acquisition.
//!
//! Every cell of the N×N result is pre-filled with nulls in row-major input
//! order.  Each tile request writes its successful cells back through the
//! tile's source/target offsets, so the stitched layout is independent of the
//! tile size and of the order in which tiles complete.  A tile that fails for
//! any per-call reason simply keeps its nulls.

use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use rd_core::{BatchConfig, GeoPoint, Point};
use rd_service::{CostGrid, MatrixService, ServiceError};

use crate::{LongMatrix, MatrixCell, MatrixError, MatrixResult, NoopObserver, Tile, TileGrid, TileObserver};

/// A tile left as nulls, with the reason.
#[derive(Clone, Debug)]
pub struct TileFailure {
    pub tile:   Tile,
    pub reason: String,
}

/// Full result of one snapshot's acquisition.
#[derive(Debug)]
pub struct BatchOutcome {
    pub matrix: LongMatrix,
    pub tiles:  usize,
    pub failed: Vec<TileFailure>,
}

pub struct MatrixBatcher<'s, S: MatrixService + ?Sized> {
    service: &'s S,
    config:  BatchConfig,
}

/// Why a single tile produced no cells.
enum TileError {
    Fatal(ServiceError),
    Failed(String),
}

impl<'s, S: MatrixService + ?Sized> MatrixBatcher<'s, S> {
    pub fn new(service: &'s S, config: BatchConfig) -> MatrixResult<Self> {
        config.validate()?;
        Ok(Self { service, config })
    }

    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Acquire the full `points × points` matrix.
    ///
    /// Produces exactly N² cells, self-pairs included.  Only a missing
    /// endpoint is an error; per-tile failures become nulls.
    pub fn compute(&self, points: &[Point]) -> MatrixResult<LongMatrix> {
        self.compute_detailed(points, &mut NoopObserver).map(|o| o.matrix)
    }

    /// [`compute`](Self::compute), also reporting which tiles failed.
    pub fn compute_detailed(
        &self,
        points:   &[Point],
        observer: &mut dyn TileObserver,
    ) -> MatrixResult<BatchOutcome> {
        let n = points.len();
        let grid = TileGrid::new(n, self.config.tile_size);
        let locations: Vec<GeoPoint> = points.iter().map(Point::location).collect();

        let mut cells: Vec<MatrixCell> = points
            .iter()
            .flat_map(|s| points.iter().map(move |d| MatrixCell::null(s.id, d.id)))
            .collect();

        let tiles: Vec<Tile> = grid.iter().collect();
        info!("requesting {n}×{n} matrix as {} tiles of up to {}", tiles.len(), self.config.tile_size);

        let results = self.fetch_all(&tiles, &locations)?;

        let mut failed = Vec::new();
        for (tile, result) in tiles.into_iter().zip(results) {
            match result {
                Ok(grid) => {
                    for (a, row) in grid.into_iter().enumerate() {
                        let base = (tile.src.start + a) * n + tile.dst.start;
                        for (b, cost) in row.into_iter().enumerate() {
                            let cell = &mut cells[base + b];
                            cell.time_s = cost.time_s;
                            cell.distance_km = cost.distance_km;
                        }
                    }
                    observer.on_tile(&tile, true);
                }
                Err(TileError::Failed(reason)) => {
                    warn!(
                        "{tile}: sources {}..{}, targets {}..{} left as nulls: {reason}",
                        tile.src.start, tile.src.end, tile.dst.start, tile.dst.end
                    );
                    observer.on_tile(&tile, false);
                    failed.push(TileFailure { tile, reason });
                }
                Err(TileError::Fatal(e)) => return Err(MatrixError::Unavailable(e)),
            }
        }

        let tiles = grid.len();
        observer.on_batch_end(tiles, failed.len());
        if !failed.is_empty() {
            warn!("{} of {tiles} tiles failed", failed.len());
        }

        Ok(BatchOutcome { matrix: LongMatrix::from_cells(cells)?, tiles, failed })
    }

    /// Request one tile and check the answer has the requested dimensions.
    fn fetch(&self, tile: &Tile, locations: &[GeoPoint]) -> Result<CostGrid, TileError> {
        let sources = &locations[tile.src.clone()];
        let targets = &locations[tile.dst.clone()];

        let result = self.service.matrix(sources, targets);
        self.pause();

        let grid = match result {
            Ok(grid) => grid,
            Err(e) if e.is_fatal() => return Err(TileError::Fatal(e)),
            Err(e) => return Err(TileError::Failed(e.to_string())),
        };

        if grid.len() != sources.len() || grid.iter().any(|row| row.len() != targets.len()) {
            let got_cols = grid.first().map_or(0, Vec::len);
            return Err(TileError::Failed(format!(
                "expected {}×{} cells, got {}×{got_cols}",
                sources.len(),
                targets.len(),
                grid.len()
            )));
        }

        debug!("{tile} ok");
        Ok(grid)
    }

    fn pause(&self) {
        let delay = self.config.tile_delay();
        if delay > Duration::ZERO {
            thread::sleep(delay);
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn fetch_all(&self, tiles: &[Tile], locations: &[GeoPoint]) -> MatrixResult<Vec<Result<CostGrid, TileError>>> {
        let mut results = Vec::with_capacity(tiles.len());
        for tile in tiles {
            let result = self.fetch(tile, locations);
            // Stop issuing requests once the endpoint is known to be missing.
            let fatal = matches!(result, Err(TileError::Fatal(_)));
            results.push(result);
            if fatal {
                break;
            }
        }
        Ok(results)
    }

    #[cfg(feature = "parallel")]
    fn fetch_all(&self, tiles: &[Tile], locations: &[GeoPoint]) -> MatrixResult<Vec<Result<CostGrid, TileError>>> {
        use rayon::prelude::*;

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(threads) = self.config.num_threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build().map_err(|e| MatrixError::ThreadPool(e.to_string()))?;

        Ok(pool.install(|| tiles.par_iter().map(|tile| self.fetch(tile, locations)).collect()))
    }
}
