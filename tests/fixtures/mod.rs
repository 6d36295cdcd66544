//! Test fixtures for depot-router.
//!
//! Provides:
//! - The classic 12-node distance matrix (depot = node 0)
//! - Real Dhaka locations for provider-backed tests
//! - Assertions shared by the solver test suites

#![allow(dead_code)]

pub mod dhaka_locations;

pub use dhaka_locations::*;

use depot_router::{DistanceMatrix, Solution, SolveStatus};

pub fn benchmark_rows() -> Vec<Vec<i64>> {
    vec![
        vec![0, 11, 6, 6, 9, 17, 9, 11, 8, 14, 18, 28],
        vec![11, 0, 10, 12, 13, 17, 9, 17, 12, 13, 18, 16],
        vec![6, 10, 0, 4, 4, 21, 11, 9, 3, 16, 20, 24],
        vec![6, 12, 4, 0, 5, 21, 12, 6, 5, 18, 22, 29],
        vec![9, 13, 4, 5, 0, 23, 15, 6, 1, 20, 24, 28],
        vec![17, 17, 21, 21, 23, 0, 10, 25, 23, 8, 6, 16],
        vec![9, 9, 11, 12, 15, 10, 0, 17, 14, 8, 12, 33],
        vec![11, 17, 9, 5, 6, 25, 17, 0, 6, 22, 26, 32],
        vec![8, 12, 3, 5, 1, 23, 14, 6, 0, 19, 24, 27],
        vec![14, 13, 16, 18, 20, 8, 8, 22, 19, 0, 11, 23],
        vec![18, 18, 20, 22, 24, 6, 12, 26, 24, 11, 0, 20],
        vec![28, 16, 24, 29, 28, 16, 33, 32, 27, 23, 20, 0],
    ]
}

pub fn benchmark_matrix() -> DistanceMatrix {
    DistanceMatrix::from_rows(benchmark_rows()).expect("benchmark matrix is valid")
}

/// Sum of consecutive arc costs along `nodes`.
pub fn path_cost(matrix: &DistanceMatrix, nodes: &[usize]) -> i64 {
    nodes.windows(2).map(|arc| matrix.get(arc[0], arc[1])).sum()
}

/// Checks the invariants every feasible solution must hold.
pub fn assert_valid_solution(solution: &Solution, matrix: &DistanceMatrix, depot: usize, budget: i64) {
    assert!(solution.status.is_feasible(), "expected routes, got {:?}", solution.status);

    let mut seen = vec![0usize; matrix.size()];
    for route in &solution.routes {
        assert_eq!(route.nodes.first(), Some(&depot), "route must start at the depot");
        assert_eq!(route.nodes.last(), Some(&depot), "route must end at the depot");
        assert_eq!(route.distance, path_cost(matrix, &route.nodes), "reported distance drifted");
        assert!(route.distance <= budget, "route exceeds budget: {}", route.distance);
        for &node in route.deliveries() {
            seen[node] += 1;
        }
    }

    for node in (0..matrix.size()).filter(|&node| node != depot) {
        assert_eq!(seen[node], 1, "node {} visited {} times", node, seen[node]);
    }
}

/// Objective recomputed from route distances.
pub fn expected_objective(solution: &Solution, span_cost_coefficient: i64) -> i64 {
    let distances: Vec<i64> = solution.routes.iter().map(|route| route.distance).collect();
    let longest = distances.iter().copied().max().unwrap_or(0);
    let shortest = distances.iter().copied().min().unwrap_or(0);
    distances.iter().sum::<i64>() + span_cost_coefficient * (longest - shortest)
}

pub fn assert_status(solution: &Solution, status: SolveStatus) {
    assert_eq!(solution.status, status, "unexpected status:\n{}", solution);
}
