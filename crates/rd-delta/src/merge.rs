//! Inner join of two snapshots on `(src, dst)`.
//!
//! Both snapshots are expected to cover the same point set.  A key present
//! on one side only is excluded from the table and counted in
//! [`StructuralMismatch`]; it never produces a half-null row.

use log::{info, warn};
use rd_core::PointId;
use rd_matrix::{LongMatrix, PairMap};

use crate::{DeltaError, DeltaResult, DeltaRow};

/// Keys that were present in only one snapshot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StructuralMismatch {
    pub only_in_old: usize,
    pub only_in_new: usize,
}

impl StructuralMismatch {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    #[inline]
    pub fn total(&self) -> usize {
        self.only_in_old + self.only_in_new
    }
}

/// Derived delta rows in the old snapshot's cell order.
#[derive(Clone, Debug, Default)]
pub struct DeltaTable {
    rows:     Vec<DeltaRow>,
    index:    PairMap<usize>,
    mismatch: StructuralMismatch,
}

/// Join `old` and `new`; rows follow `old`'s order.
pub fn merge(old: &LongMatrix, new: &LongMatrix) -> DeltaTable {
    let mut rows = Vec::with_capacity(old.len().min(new.len()));
    let mut only_in_old = 0;

    for cell in old {
        match new.get(cell.src, cell.dst) {
            Some(other) => rows.push(DeltaRow::from_cells(cell, other)),
            None => only_in_old += 1,
        }
    }

    let mismatch = StructuralMismatch { only_in_old, only_in_new: new.len() - rows.len() };
    if !mismatch.is_empty() {
        warn!(
            "snapshots disagree on OD pairs: {} only in old, {} only in new; excluded from delta",
            mismatch.only_in_old, mismatch.only_in_new
        );
    }
    info!("merged {} OD pairs", rows.len());

    let index = rows.iter().enumerate().map(|(i, r)| (r.key(), i)).collect();
    DeltaTable { rows, index, mismatch }
}

impl DeltaTable {
    /// Rebuild a table from stored rows (e.g. a delta CSV).
    pub fn from_rows(rows: Vec<DeltaRow>) -> DeltaResult<Self> {
        let mut index = PairMap::default();
        for (i, row) in rows.iter().enumerate() {
            if index.insert(row.key(), i).is_some() {
                return Err(DeltaError::DuplicateRow { src: row.src, dst: row.dst });
            }
        }
        Ok(Self { rows, index, mismatch: StructuralMismatch::default() })
    }

    pub fn rows(&self) -> &[DeltaRow] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<DeltaRow> {
        self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeltaRow> {
        self.rows.iter()
    }

    pub fn mismatch(&self) -> StructuralMismatch {
        self.mismatch
    }

    pub fn get(&self, src: PointId, dst: PointId) -> Option<&DeltaRow> {
        self.index.get(&(src, dst)).map(|&i| &self.rows[i])
    }
}

impl<'a> IntoIterator for &'a DeltaTable {
    type Item = &'a DeltaRow;
    type IntoIter = std::slice::Iter<'a, DeltaRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
