//! CSR and dense boolean-matrix interop.

use super::OneToMany;
use crate::error::{RelationError, Result};
use serde::{Deserialize, Serialize};

/// Compressed Sparse Row export of a relation.
///
/// `row_ptr` has one entry per element plus a trailing total;
/// `col` concatenates the rows in element order, values preserved
/// in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsrMatrix {
    pub row_ptr: Vec<usize>,
    pub col: Vec<usize>,
}

impl CsrMatrix {
    /// Number of relation rows the matrix describes.
    pub fn row_count(&self) -> usize {
        self.row_ptr.len().saturating_sub(1)
    }

    /// Check the structural CSR invariants: `row_ptr` starts at zero,
    /// never decreases, and ends at `col.len()`.
    pub fn validate(&self) -> Result<()> {
        let Some(&first) = self.row_ptr.first() else {
            return Err(RelationError::MalformedInput(
                "row_ptr must hold at least one entry".to_string(),
            ));
        };
        if first != 0 {
            return Err(RelationError::MalformedInput(format!(
                "row_ptr must start at 0, found {first}"
            )));
        }
        if self.row_ptr.windows(2).any(|w| w[1] < w[0]) {
            return Err(RelationError::MalformedInput(
                "row_ptr must be non-decreasing".to_string(),
            ));
        }
        let total = self.row_ptr[self.row_ptr.len() - 1];
        if total != self.col.len() {
            return Err(RelationError::MalformedInput(format!(
                "row_ptr ends at {total} but col holds {} entries",
                self.col.len()
            )));
        }
        Ok(())
    }
}

impl OneToMany {
    /// Export to CSR. Row order and within-row order are preserved.
    pub fn to_csr(&self) -> CsrMatrix {
        let mut row_ptr = Vec::with_capacity(self.count() + 1);
        row_ptr.push(0);
        let mut col = Vec::with_capacity(self.entry_count());
        for row in self.rows() {
            col.extend_from_slice(row);
            row_ptr.push(col.len());
        }
        CsrMatrix { row_ptr, col }
    }

    /// Rebuild a relation from CSR, validating the shape first.
    pub fn from_csr(csr: &CsrMatrix) -> Result<Self> {
        csr.validate()?;
        let rows = (0..csr.row_count())
            .map(|i| csr.col[csr.row_ptr[i]..csr.row_ptr[i + 1]].to_vec())
            .collect();
        Ok(OneToMany::from_rows(rows))
    }

    /// Dense membership matrix of shape `count × node_space`, one byte
    /// per cell.
    pub fn to_boolean_matrix(&self) -> Vec<Vec<u8>> {
        let width = self.node_space();
        self.rows()
            .iter()
            .map(|row| {
                let mut dense = vec![0u8; width];
                for &n in row {
                    dense[n] = 1;
                }
                dense
            })
            .collect()
    }

    /// Rebuild a relation from a dense byte matrix; every truthy cell
    /// becomes an entry, columns emitted in ascending order.
    pub fn from_boolean_matrix(matrix: &[Vec<u8>]) -> Self {
        let rows = matrix
            .iter()
            .map(|dense| {
                dense
                    .iter()
                    .enumerate()
                    .filter(|&(_, &cell)| cell != 0)
                    .map(|(j, _)| j)
                    .collect()
            })
            .collect();
        OneToMany::from_rows(rows)
    }
}
