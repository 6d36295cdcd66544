//! Turning a finished search state into routes the caller can use.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::problem::RoutingProblem;
use crate::search::{SearchPhase, SearchState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Local optimum reached within budget.
    Solved,
    /// Some delivery could not be placed on any vehicle.
    Infeasible,
    /// Budget ran out; routes are feasible but not locally optimal.
    TimedOut,
}

impl SolveStatus {
    /// Whether the solution carries routes that satisfy every constraint.
    pub fn is_feasible(self) -> bool {
        !matches!(self, SolveStatus::Infeasible)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleRoute {
    pub vehicle: usize,
    /// Node ids from depot to depot.
    pub nodes: Vec<usize>,
    pub distance: i64,
}

impl VehicleRoute {
    /// Delivery nodes only, without the depot at either end.
    pub fn deliveries(&self) -> &[usize] {
        match self.nodes.len() {
            0..=2 => &[],
            len => &self.nodes[1..len - 1],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub status: SolveStatus,
    pub routes: Vec<VehicleRoute>,
    /// Route distances plus the span balancing term.
    pub objective: i64,
    /// Deliveries left unplaced; only non-empty when infeasible.
    pub unassigned: Vec<usize>,
    /// Accepted local-search moves.
    pub moves: usize,
}

impl Solution {
    pub fn total_distance(&self) -> i64 {
        self.routes.iter().map(|route| route.distance).sum()
    }

    pub fn max_route_distance(&self) -> i64 {
        self.routes.iter().map(|route| route.distance).max().unwrap_or(0)
    }

    pub fn route_for(&self, vehicle: usize) -> Option<&VehicleRoute> {
        self.routes.iter().find(|route| route.vehicle == vehicle)
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.status.is_feasible() {
            let unassigned: Vec<String> = self.unassigned.iter().map(ToString::to_string).collect();
            return writeln!(f, "No solution found! Unassigned nodes: {}", unassigned.join(", "));
        }

        writeln!(f, "Objective: {}", self.objective)?;
        for route in &self.routes {
            writeln!(f, "Route for vehicle {}:", route.vehicle)?;
            let stops: Vec<String> = route.nodes.iter().map(ToString::to_string).collect();
            writeln!(f, " {}", stops.join(" -> "))?;
            writeln!(f, "Distance of the route: {}", route.distance)?;
            writeln!(f)?;
        }
        write!(f, "Maximum of the route distances: {}", self.max_route_distance())?;
        if self.status == SolveStatus::TimedOut {
            write!(f, " (search budget exhausted)")?;
        }
        Ok(())
    }
}

/// Walks each vehicle's next-hop chain from its start to its end sentinel.
///
/// Fails with [`RoutingError::EmptyResult`] unless the search has reached a
/// terminal phase.
pub fn extract(problem: &RoutingProblem, state: &SearchState) -> Result<Solution, RoutingError> {
    let mapper = problem.mapper();

    match state.phase() {
        SearchPhase::Solved | SearchPhase::TimedOut => {}
        SearchPhase::Infeasible => {
            let unassigned = state
                .unvisited()
                .into_iter()
                .map(|index| mapper.index_to_node(index))
                .collect();
            return Ok(Solution {
                status: SolveStatus::Infeasible,
                routes: Vec::new(),
                objective: 0,
                unassigned,
                moves: state.moves(),
            });
        }
        SearchPhase::Unsolved | SearchPhase::Constructing | SearchPhase::Improving => {
            return Err(RoutingError::EmptyResult);
        }
    }

    let arc_cost = problem.arc_cost();
    let mut routes = Vec::with_capacity(problem.num_vehicles());
    for vehicle in 0..problem.num_vehicles() {
        let mut index = mapper.start(vehicle);
        let mut nodes = vec![mapper.index_to_node(index)];
        let mut distance = 0;

        while !mapper.is_end(index) {
            let next = state.next(index).ok_or(RoutingError::EmptyResult)?;
            distance += arc_cost.cost(index, next);
            nodes.push(mapper.index_to_node(next));
            if nodes.len() > mapper.num_indices() {
                return Err(RoutingError::EmptyResult);
            }
            index = next;
        }

        routes.push(VehicleRoute {
            vehicle,
            nodes,
            distance,
        });
    }

    let distances: Vec<i64> = routes.iter().map(|route| route.distance).collect();
    let status = if state.phase() == SearchPhase::Solved {
        SolveStatus::Solved
    } else {
        SolveStatus::TimedOut
    };

    Ok(Solution {
        status,
        objective: problem.dimension().objective(&distances),
        routes,
        unassigned: Vec::new(),
        moves: state.moves(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::DistanceMatrix;
    use crate::search::{ConstructionOrder, SearchEngine, SearchLimits};

    fn problem() -> RoutingProblem {
        let rows = vec![vec![0, 4, 6], vec![5, 0, 2], vec![3, 7, 0]];
        RoutingProblem::builder(DistanceMatrix::from_rows(rows).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_extract_before_search_is_empty_result() {
        let problem = problem();
        let state = SearchState::new(&problem);
        let err = extract(&problem, &state).unwrap_err();
        assert!(matches!(err, RoutingError::EmptyResult));
    }

    #[test]
    fn test_extract_walks_next_hops() {
        let problem = problem();
        let mut state = SearchState::new(&problem);
        SearchEngine::new(&problem, SearchLimits::iterations(100)).run(ConstructionOrder::Sequential, &mut state);

        let solution = extract(&problem, &state).unwrap();
        assert_eq!(solution.status, SolveStatus::Solved);
        let route = solution.route_for(0).unwrap();
        // 0 -> 1 -> 2 -> 0 costs 9, the reverse direction costs 6 + 7 + 5
        assert_eq!(route.nodes, vec![0, 1, 2, 0]);
        assert_eq!(route.distance, 9);
        assert_eq!(route.deliveries(), &[1, 2]);
        assert_eq!(solution.objective, 9);
    }

    #[test]
    fn test_display_lists_routes() {
        let solution = Solution {
            status: SolveStatus::Solved,
            routes: vec![VehicleRoute {
                vehicle: 0,
                nodes: vec![0, 2, 1, 0],
                distance: 12,
            }],
            objective: 12,
            unassigned: Vec::new(),
            moves: 0,
        };
        let text = solution.to_string();
        assert!(text.contains("Objective: 12"));
        assert!(text.contains(" 0 -> 2 -> 1 -> 0"));
        assert!(text.contains("Maximum of the route distances: 12"));
    }

    #[test]
    fn test_display_infeasible() {
        let solution = Solution {
            status: SolveStatus::Infeasible,
            routes: Vec::new(),
            objective: 0,
            unassigned: vec![3, 5],
            moves: 0,
        };
        assert!(solution.to_string().contains("Unassigned nodes: 3, 5"));
        assert!(!solution.status.is_feasible());
    }
}
