//! Long-form matrix storage.

use rd_core::PointId;
use rd_service::Cost;

use crate::{MatrixError, MatrixResult, PairMap};

/// Cost of one OD pair in one snapshot.  `None` = no route, never zero.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixCell {
    pub src:         PointId,
    pub dst:         PointId,
    pub time_s:      Option<f64>,
    pub distance_km: Option<f64>,
}

impl MatrixCell {
    pub fn new(src: PointId, dst: PointId, cost: Cost) -> Self {
        Self { src, dst, time_s: cost.time_s, distance_km: cost.distance_km }
    }

    pub fn null(src: PointId, dst: PointId) -> Self {
        Self::new(src, dst, Cost::NONE)
    }

    #[inline]
    pub fn key(&self) -> (PointId, PointId) {
        (self.src, self.dst)
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.time_s.is_none() && self.distance_km.is_none()
    }
}

/// One snapshot's matrix as an ordered list of cells with a unique
/// `(src, dst)` key.
#[derive(Clone, Debug, Default)]
pub struct LongMatrix {
    cells: Vec<MatrixCell>,
    index: PairMap<usize>,
}

impl LongMatrix {
    /// Build from cells in their existing order.  Fails on the first repeated key.
    pub fn from_cells(cells: Vec<MatrixCell>) -> MatrixResult<Self> {
        let mut index = PairMap::with_capacity_and_hasher(cells.len(), Default::default());
        for (i, cell) in cells.iter().enumerate() {
            if index.insert(cell.key(), i).is_some() {
                return Err(MatrixError::DuplicateCell { src: cell.src, dst: cell.dst });
            }
        }
        Ok(Self { cells, index })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatrixCell> {
        self.cells.iter()
    }

    pub fn cells(&self) -> &[MatrixCell] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<MatrixCell> {
        self.cells
    }

    pub fn get(&self, src: PointId, dst: PointId) -> Option<&MatrixCell> {
        self.index.get(&(src, dst)).map(|&i| &self.cells[i])
    }

    /// Cells with neither time nor distance.
    pub fn null_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_null()).count()
    }
}

impl<'a> IntoIterator for &'a LongMatrix {
    type Item = &'a MatrixCell;
    type IntoIter = std::slice::Iter<'a, MatrixCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
