//! Routing planner entry points.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::dimension::SpanMode;
use crate::error::RoutingError;
use crate::matrix::DistanceMatrix;
use crate::problem::{DEFAULT_MAX_ROUTE_DISTANCE, DEFAULT_SPAN_COST_COEFFICIENT, RoutingProblem};
use crate::search::{ConstructionOrder, SearchEngine, SearchLimits, SearchState};
use crate::solution::{Solution, extract};
use crate::traits::{DistanceMatrixProvider, Location};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOptions {
    /// Number of vehicles leaving the depot.
    pub vehicles: usize,
    /// Travel budget of every vehicle, in matrix units.
    pub max_route_distance: i64,
    /// Weight of `longest route - shortest route` in the objective.
    pub span_cost_coefficient: i64,
    /// What the balancing term measures.
    #[serde(default)]
    pub span_mode: SpanMode,
    /// Maximum accepted moves during local search.
    pub max_iterations: usize,
    /// Wall-clock limit for local search. Results are only reproducible
    /// when this is `None`.
    pub time_limit: Option<Duration>,
    /// Construction orders to explore, one search per entry, in parallel.
    pub construction_orders: Vec<ConstructionOrder>,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            vehicles: 1,
            max_route_distance: DEFAULT_MAX_ROUTE_DISTANCE,
            span_cost_coefficient: DEFAULT_SPAN_COST_COEFFICIENT,
            span_mode: SpanMode::Spread,
            max_iterations: 1000,
            time_limit: None,
            construction_orders: vec![ConstructionOrder::Sequential],
        }
    }
}

impl SolveOptions {
    fn limits(&self, cancel: Option<Arc<AtomicBool>>) -> SearchLimits {
        SearchLimits {
            max_iterations: self.max_iterations,
            deadline: self.time_limit.map(|limit| Instant::now() + limit),
            cancel,
        }
    }
}

/// Builds a problem with the depot at node 0 from a matrix and options.
pub fn build_problem(matrix: DistanceMatrix, options: &SolveOptions) -> Result<RoutingProblem, RoutingError> {
    RoutingProblem::builder(matrix)
        .vehicles(options.vehicles)
        .max_distance(options.max_route_distance)
        .span_cost_coefficient(options.span_cost_coefficient)
        .span_mode(options.span_mode)
        .build()
}

pub fn solve(problem: &RoutingProblem, options: &SolveOptions) -> Result<Solution, RoutingError> {
    solve_with_cancel(problem, options, None)
}

/// Runs one search per configured construction order and keeps the best.
///
/// The cancel flag is polled between local-search moves; a cancelled search
/// still returns its best feasible routes, flagged as timed out.
pub fn solve_with_cancel(
    problem: &RoutingProblem,
    options: &SolveOptions,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<Solution, RoutingError> {
    if options.construction_orders.is_empty() {
        return Err(RoutingError::InvalidInput("no construction order configured".to_string()));
    }

    let limits = options.limits(cancel);
    let outcomes: Vec<Result<Solution, RoutingError>> = options
        .construction_orders
        .par_iter()
        .map(|&order| {
            let mut state = SearchState::new(problem);
            SearchEngine::new(problem, limits.clone()).run(order, &mut state);
            extract(problem, &state)
        })
        .collect();

    let mut best: Option<Solution> = None;
    for outcome in outcomes {
        let candidate = outcome?;
        if best.as_ref().is_none_or(|current| is_better(&candidate, current)) {
            best = Some(candidate);
        }
    }

    let best = best.ok_or(RoutingError::EmptyResult)?;
    info!(
        status = ?best.status,
        objective = best.objective,
        routes = best.routes.len(),
        "route calculation finished"
    );
    Ok(best)
}

fn is_better(candidate: &Solution, current: &Solution) -> bool {
    match (candidate.status.is_feasible(), current.status.is_feasible()) {
        (true, false) => true,
        (false, true) => false,
        (true, true) => candidate.objective < current.objective,
        (false, false) => candidate.unassigned.len() < current.unassigned.len(),
    }
}

/// Plans routes for a depot and delivery locations, using `provider` for
/// travel costs. Node 0 is the depot, node `i` is `deliveries[i - 1]`.
pub fn plan_routes<M>(
    depot: Location,
    deliveries: &[Location],
    provider: &M,
    options: &SolveOptions,
) -> Result<Solution, RoutingError>
where
    M: DistanceMatrixProvider + ?Sized,
{
    plan_routes_with_cancel(depot, deliveries, provider, options, None)
}

pub fn plan_routes_with_cancel<M>(
    depot: Location,
    deliveries: &[Location],
    provider: &M,
    options: &SolveOptions,
    cancel: Option<Arc<AtomicBool>>,
) -> Result<Solution, RoutingError>
where
    M: DistanceMatrixProvider + ?Sized,
{
    if deliveries.is_empty() {
        return Err(RoutingError::InvalidInput("delivery list is empty".to_string()));
    }

    let mut locations = Vec::with_capacity(deliveries.len() + 1);
    locations.push(depot);
    locations.extend_from_slice(deliveries);

    let rows = provider.matrix_for(&locations).inspect_err(|err| {
        warn!(locations = locations.len(), error = %err, "cost matrix request failed");
    })?;
    debug!(locations = locations.len(), "cost matrix received");

    let problem = RoutingProblem::builder(DistanceMatrix::from_rows(rows)?)
        .nodes(locations.len())
        .vehicles(options.vehicles)
        .max_distance(options.max_route_distance)
        .span_cost_coefficient(options.span_cost_coefficient)
        .span_mode(options.span_mode)
        .build()?;

    solve_with_cancel(&problem, options, cancel)
}
