//! Search engine: greedy construction followed by hill-climbing.
//!
//! A run moves through `Unsolved -> Constructing -> Improving` and ends in
//! one of `Solved`, `Infeasible` or `TimedOut`. All mutable data lives in a
//! [`SearchState`] owned by the caller; the [`RoutingProblem`] is only read.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::local_search::find_improving_move;
use crate::problem::RoutingProblem;

/// How the greedy construction grows routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstructionOrder {
    /// Fill vehicle 0 until nothing more fits, then vehicle 1, and so on.
    Sequential,
    /// Always take the cheapest feasible extension over all route ends.
    Interleaved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Unsolved,
    Constructing,
    Improving,
    Solved,
    Infeasible,
    TimedOut,
}

impl SearchPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchPhase::Solved | SearchPhase::Infeasible | SearchPhase::TimedOut)
    }
}

/// Mutable assignment for a single search attempt.
#[derive(Debug, Clone)]
pub struct SearchState {
    next: Vec<Option<usize>>,
    route_distances: Vec<i64>,
    visited: Vec<bool>,
    phase: SearchPhase,
    moves: usize,
}

impl SearchState {
    pub fn new(problem: &RoutingProblem) -> Self {
        let mapper = problem.mapper();
        Self {
            next: vec![None; mapper.num_indices()],
            route_distances: vec![0; mapper.num_vehicles()],
            visited: vec![false; mapper.num_deliveries()],
            phase: SearchPhase::Unsolved,
            moves: 0,
        }
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Successor of an internal index in the current assignment.
    pub fn next(&self, index: usize) -> Option<usize> {
        self.next.get(index).copied().flatten()
    }

    pub fn route_distances(&self) -> &[i64] {
        &self.route_distances
    }

    pub fn is_visited(&self, index: usize) -> bool {
        self.visited.get(index).copied().unwrap_or(false)
    }

    /// Delivery indices not placed on any route.
    pub fn unvisited(&self) -> Vec<usize> {
        self.visited
            .iter()
            .enumerate()
            .filter(|(_, visited)| !**visited)
            .map(|(index, _)| index)
            .collect()
    }

    /// Accepted local-search moves so far.
    pub fn moves(&self) -> usize {
        self.moves
    }

    /// Delivery indices of `vehicle`'s route, in visiting order.
    pub(crate) fn route(&self, problem: &RoutingProblem, vehicle: usize) -> Vec<usize> {
        let mapper = problem.mapper();
        let mut path = Vec::new();
        let mut index = mapper.start(vehicle);
        while let Some(next) = self.next(index) {
            if mapper.is_end(next) || path.len() > mapper.num_deliveries() {
                break;
            }
            path.push(next);
            index = next;
        }
        path
    }

    /// Rewrites the next-hop chain of `vehicle` to `start -> path... -> end`.
    pub(crate) fn set_route(&mut self, problem: &RoutingProblem, vehicle: usize, path: &[usize], distance: i64) {
        let mapper = problem.mapper();
        let mut previous = mapper.start(vehicle);
        for &index in path {
            self.next[previous] = Some(index);
            self.visited[index] = true;
            previous = index;
        }
        self.next[previous] = Some(mapper.end(vehicle));
        self.route_distances[vehicle] = distance;
    }
}

/// Bounds on the improvement phase.
#[derive(Debug, Clone)]
pub struct SearchLimits {
    pub max_iterations: usize,
    pub deadline: Option<Instant>,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl SearchLimits {
    pub fn iterations(max_iterations: usize) -> Self {
        Self {
            max_iterations,
            deadline: None,
            cancel: None,
        }
    }

    fn stop_requested(&self) -> bool {
        let cancelled = self
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        cancelled || self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }
}

pub struct SearchEngine<'a> {
    problem: &'a RoutingProblem,
    limits: SearchLimits,
}

impl<'a> SearchEngine<'a> {
    pub fn new(problem: &'a RoutingProblem, limits: SearchLimits) -> Self {
        Self { problem, limits }
    }

    /// Runs construction then improvement, leaving `state` in a terminal phase.
    pub fn run(&self, order: ConstructionOrder, state: &mut SearchState) {
        if self.construct(order, state) {
            self.improve(state);
        }
        info!(
            ?order,
            phase = ?state.phase,
            moves = state.moves,
            distances = ?state.route_distances,
            "search finished"
        );
    }

    /// Greedy cheapest-next-arc construction. Returns false and marks the
    /// state `Infeasible` when some delivery fits on no vehicle.
    pub fn construct(&self, order: ConstructionOrder, state: &mut SearchState) -> bool {
        state.phase = SearchPhase::Constructing;

        let paths = match order {
            ConstructionOrder::Sequential => self.construct_sequential(state),
            ConstructionOrder::Interleaved => self.construct_interleaved(state),
        };

        let arc_cost = self.problem.arc_cost();
        for (vehicle, path) in paths.iter().enumerate() {
            state.set_route(self.problem, vehicle, path, arc_cost.route_cost(vehicle, path));
        }

        let unvisited = state.unvisited();
        if !unvisited.is_empty() {
            debug!(?order, unplaced = unvisited.len(), "construction left deliveries unplaced");
            state.phase = SearchPhase::Infeasible;
            return false;
        }

        debug!(?order, distances = ?state.route_distances, "initial solution constructed");
        true
    }

    fn construct_sequential(&self, state: &mut SearchState) -> Vec<Vec<usize>> {
        let mapper = self.problem.mapper();
        let mut paths = vec![Vec::new(); mapper.num_vehicles()];

        for (vehicle, path) in paths.iter_mut().enumerate() {
            let mut current = mapper.start(vehicle);
            let mut cumul = 0;
            while let Some((index, arrival)) = self.cheapest_extension(state, vehicle, current, cumul) {
                path.push(index);
                state.visited[index] = true;
                current = index;
                cumul = arrival;
            }
        }

        paths
    }

    fn construct_interleaved(&self, state: &mut SearchState) -> Vec<Vec<usize>> {
        let mapper = self.problem.mapper();
        let arc_cost = self.problem.arc_cost();
        let mut paths = vec![Vec::new(); mapper.num_vehicles()];
        let mut ends: Vec<usize> = (0..mapper.num_vehicles()).map(|v| mapper.start(v)).collect();
        let mut cumuls = vec![0; mapper.num_vehicles()];

        loop {
            let mut best: Option<(i64, usize, usize, i64)> = None;
            for vehicle in 0..mapper.num_vehicles() {
                if let Some((index, arrival)) = self.cheapest_extension(state, vehicle, ends[vehicle], cumuls[vehicle]) {
                    let cost = arc_cost.cost(ends[vehicle], index);
                    if best.is_none_or(|(best_cost, ..)| cost < best_cost) {
                        best = Some((cost, vehicle, index, arrival));
                    }
                }
            }

            let Some((_, vehicle, index, arrival)) = best else {
                break;
            };
            paths[vehicle].push(index);
            state.visited[index] = true;
            ends[vehicle] = index;
            cumuls[vehicle] = arrival;
        }

        paths
    }

    /// Cheapest unvisited delivery reachable from `from` that still lets the
    /// vehicle return within budget. Ties go to the lowest index.
    fn cheapest_extension(&self, state: &SearchState, vehicle: usize, from: usize, cumul: i64) -> Option<(usize, i64)> {
        let mapper = self.problem.mapper();
        let arc_cost = self.problem.arc_cost();
        let dimension = self.problem.dimension();

        let mut best: Option<(i64, usize, i64)> = None;
        for index in mapper.delivery_indices() {
            if state.visited[index] {
                continue;
            }
            let Some(arrival) = dimension.can_extend(vehicle, cumul, from, index) else {
                continue;
            };
            let cost = arc_cost.cost(from, index);
            if best.is_none_or(|(best_cost, ..)| cost < best_cost) {
                best = Some((cost, index, arrival));
            }
        }

        best.map(|(_, index, arrival)| (index, arrival))
    }

    /// First-improvement hill climbing until a local optimum or the budget
    /// runs out.
    pub fn improve(&self, state: &mut SearchState) {
        state.phase = SearchPhase::Improving;

        let num_vehicles = self.problem.num_vehicles();
        let mut paths: Vec<Vec<usize>> = (0..num_vehicles).map(|v| state.route(self.problem, v)).collect();

        loop {
            if self.limits.stop_requested() {
                debug!(moves = state.moves, "search stopped before reaching a local optimum");
                state.phase = SearchPhase::TimedOut;
                return;
            }

            let Some(improving) = find_improving_move(self.problem, &paths, &state.route_distances) else {
                state.phase = SearchPhase::Solved;
                return;
            };

            if state.moves >= self.limits.max_iterations {
                debug!(moves = state.moves, "iteration budget exhausted");
                state.phase = SearchPhase::TimedOut;
                return;
            }

            trace!(kind = ?improving.kind, objective = improving.objective, "accepting move");
            for change in improving.routes {
                state.set_route(self.problem, change.vehicle, &change.path, change.distance);
                paths[change.vehicle] = change.path;
            }
            state.moves += 1;
        }
    }
}
