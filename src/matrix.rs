//! Dense, validated cost matrix.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::traits::{DistanceMatrixProvider, Location};

/// A square matrix of non-negative arc costs stored in row-major order.
///
/// Entry `(i, j)` is the cost of travelling from node `i` to node `j`. The
/// matrix may be asymmetric; the diagonal is always zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceMatrix {
    data: Vec<i64>,
    size: usize,
}

impl DistanceMatrix {
    /// Builds a matrix from explicit rows, rejecting ragged, negative or
    /// non-zero-diagonal input.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, RoutingError> {
        let size = rows.len();
        if size == 0 {
            return Err(RoutingError::MatrixMismatch("matrix has no rows".to_string()));
        }

        let mut data = Vec::with_capacity(size * size);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(RoutingError::MatrixMismatch(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            for (j, value) in row.into_iter().enumerate() {
                if value < 0 {
                    return Err(RoutingError::MatrixMismatch(format!(
                        "negative cost {} at ({}, {})",
                        value, i, j
                    )));
                }
                if i == j && value != 0 {
                    return Err(RoutingError::MatrixMismatch(format!(
                        "diagonal entry ({}, {}) is {}, expected 0",
                        i, j, value
                    )));
                }
                data.push(value);
            }
        }

        Ok(Self { data, size })
    }

    /// Cost of the directed arc `from -> to`.
    ///
    /// # Panics
    ///
    /// Panics if either node is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.size).all(|i| (i + 1..self.size).all(|j| self.get(i, j) == self.get(j, i)))
    }

    /// The matrix with every arc reversed.
    pub fn transposed(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for i in 0..self.size {
            for j in 0..self.size {
                data.push(self.get(j, i));
            }
        }
        Self { data, size: self.size }
    }

    pub fn to_rows(&self) -> Vec<Vec<i64>> {
        self.data.chunks(self.size).map(|row| row.to_vec()).collect()
    }
}

/// A precomputed matrix acts as its own provider when the caller already
/// holds costs for exactly the requested locations.
impl DistanceMatrixProvider for DistanceMatrix {
    fn matrix_for(&self, locations: &[Location]) -> Result<Vec<Vec<i64>>, RoutingError> {
        if locations.len() != self.size {
            return Err(RoutingError::MatrixMismatch(format!(
                "{} locations requested from a {}x{} matrix",
                locations.len(),
                self.size,
                self.size
            )));
        }
        Ok(self.to_rows())
    }
}
