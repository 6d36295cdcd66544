//! Cost of directed arcs between internal solver indices.

use crate::error::RoutingError;
use crate::index::NodeIndexMapper;
use crate::matrix::DistanceMatrix;

/// Resolves internal indices to node ids and reads the matrix.
///
/// Nothing is cached beyond the matrix itself.
#[derive(Debug, Clone, Copy)]
pub struct ArcCostEvaluator<'a> {
    matrix: &'a DistanceMatrix,
    mapper: &'a NodeIndexMapper,
}

impl<'a> ArcCostEvaluator<'a> {
    pub fn new(matrix: &'a DistanceMatrix, mapper: &'a NodeIndexMapper) -> Result<Self, RoutingError> {
        if matrix.size() != mapper.num_nodes() {
            return Err(RoutingError::MatrixMismatch(format!(
                "matrix is {}x{} but the problem has {} nodes",
                matrix.size(),
                matrix.size(),
                mapper.num_nodes()
            )));
        }
        Ok(Self::from_parts(matrix, mapper))
    }

    pub(crate) fn from_parts(matrix: &'a DistanceMatrix, mapper: &'a NodeIndexMapper) -> Self {
        Self { matrix, mapper }
    }

    pub fn mapper(&self) -> &'a NodeIndexMapper {
        self.mapper
    }

    /// Cost of travelling from internal index `from` to internal index `to`.
    pub fn cost(&self, from: usize, to: usize) -> i64 {
        self.matrix
            .get(self.mapper.index_to_node(from), self.mapper.index_to_node(to))
    }

    /// Cost of `start -> path... -> end` for `vehicle`, where `path` holds
    /// delivery indices only.
    pub fn route_cost(&self, vehicle: usize, path: &[usize]) -> i64 {
        let mut previous = self.mapper.start(vehicle);
        let mut total = 0;
        for &index in path {
            total += self.cost(previous, index);
            previous = index;
        }
        total + self.cost(previous, self.mapper.end(vehicle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (DistanceMatrix, NodeIndexMapper) {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0, 2, 9],
            vec![4, 0, 3],
            vec![7, 5, 0],
        ])
        .unwrap();
        let mapper = NodeIndexMapper::new(3, 2, 0).unwrap();
        (matrix, mapper)
    }

    #[test]
    fn test_cost_resolves_sentinels_to_depot() {
        let (matrix, mapper) = fixture();
        let arcs = ArcCostEvaluator::new(&matrix, &mapper).unwrap();
        // index 0 is node 1, index 1 is node 2
        assert_eq!(arcs.cost(mapper.start(1), 0), 2);
        assert_eq!(arcs.cost(1, mapper.end(0)), 7);
        assert_eq!(arcs.cost(0, 1), 3);
        assert_eq!(arcs.cost(1, 0), 5);
    }

    #[test]
    fn test_route_cost() {
        let (matrix, mapper) = fixture();
        let arcs = ArcCostEvaluator::new(&matrix, &mapper).unwrap();
        assert_eq!(arcs.route_cost(0, &[0, 1]), 2 + 3 + 7);
        assert_eq!(arcs.route_cost(0, &[1, 0]), 9 + 5 + 4);
        assert_eq!(arcs.route_cost(1, &[]), 0);
    }

    #[test]
    fn test_rejects_size_mismatch() {
        let (matrix, _) = fixture();
        let mapper = NodeIndexMapper::new(4, 1, 0).unwrap();
        let err = ArcCostEvaluator::new(&matrix, &mapper).unwrap_err();
        assert!(matches!(err, RoutingError::MatrixMismatch(_)));
    }
}
