//! Immutable routing problem and the builder that validates it.

use tracing::debug;

use crate::arc_cost::ArcCostEvaluator;
use crate::dimension::{DistanceDimension, SpanMode};
use crate::error::RoutingError;
use crate::index::NodeIndexMapper;
use crate::matrix::DistanceMatrix;

/// Default per-vehicle travel budget.
pub const DEFAULT_MAX_ROUTE_DISTANCE: i64 = 3000;

/// Default weight of the longest-minus-shortest route penalty.
pub const DEFAULT_SPAN_COST_COEFFICIENT: i64 = 100;

/// Everything a search needs, fixed for the lifetime of the search.
#[derive(Debug, Clone)]
pub struct RoutingProblem {
    matrix: DistanceMatrix,
    mapper: NodeIndexMapper,
    max_distances: Vec<i64>,
    span_cost_coefficient: i64,
    span_mode: SpanMode,
}

impl RoutingProblem {
    pub fn builder(matrix: DistanceMatrix) -> RoutingProblemBuilder {
        RoutingProblemBuilder::new(matrix)
    }

    pub fn matrix(&self) -> &DistanceMatrix {
        &self.matrix
    }

    pub fn mapper(&self) -> &NodeIndexMapper {
        &self.mapper
    }

    pub fn num_vehicles(&self) -> usize {
        self.mapper.num_vehicles()
    }

    pub fn depot(&self) -> usize {
        self.mapper.depot()
    }

    pub fn max_distance(&self, vehicle: usize) -> i64 {
        self.max_distances[vehicle]
    }

    pub fn span_cost_coefficient(&self) -> i64 {
        self.span_cost_coefficient
    }

    pub fn span_mode(&self) -> SpanMode {
        self.span_mode
    }

    pub fn arc_cost(&self) -> ArcCostEvaluator<'_> {
        // sizes checked in build()
        ArcCostEvaluator::from_parts(&self.matrix, &self.mapper)
    }

    pub fn dimension(&self) -> DistanceDimension<'_> {
        DistanceDimension::new(self.arc_cost(), &self.max_distances, self.span_cost_coefficient)
            .with_span_mode(self.span_mode)
    }
}

/// Assembles a [`RoutingProblem`] from a matrix plus vehicle settings.
#[derive(Debug, Clone)]
pub struct RoutingProblemBuilder {
    matrix: DistanceMatrix,
    expected_nodes: Option<usize>,
    num_vehicles: usize,
    depot: usize,
    max_distance: i64,
    vehicle_max_distances: Vec<(usize, i64)>,
    span_cost_coefficient: i64,
    span_mode: SpanMode,
}

impl RoutingProblemBuilder {
    pub fn new(matrix: DistanceMatrix) -> Self {
        Self {
            matrix,
            expected_nodes: None,
            num_vehicles: 1,
            depot: 0,
            max_distance: DEFAULT_MAX_ROUTE_DISTANCE,
            vehicle_max_distances: Vec::new(),
            span_cost_coefficient: DEFAULT_SPAN_COST_COEFFICIENT,
            span_mode: SpanMode::default(),
        }
    }

    /// Number of nodes (depot plus deliveries) the caller asked to route.
    /// When set, the matrix must have exactly this size.
    pub fn nodes(mut self, count: usize) -> Self {
        self.expected_nodes = Some(count);
        self
    }

    pub fn vehicles(mut self, count: usize) -> Self {
        self.num_vehicles = count;
        self
    }

    pub fn depot(mut self, node: usize) -> Self {
        self.depot = node;
        self
    }

    /// Budget shared by every vehicle without an override.
    pub fn max_distance(mut self, distance: i64) -> Self {
        self.max_distance = distance;
        self
    }

    pub fn vehicle_max_distance(mut self, vehicle: usize, distance: i64) -> Self {
        self.vehicle_max_distances.push((vehicle, distance));
        self
    }

    pub fn span_cost_coefficient(mut self, coefficient: i64) -> Self {
        self.span_cost_coefficient = coefficient;
        self
    }

    pub fn span_mode(mut self, mode: SpanMode) -> Self {
        self.span_mode = mode;
        self
    }

    pub fn build(self) -> Result<RoutingProblem, RoutingError> {
        let num_nodes = self.expected_nodes.unwrap_or(self.matrix.size());
        let mapper = NodeIndexMapper::new(num_nodes, self.num_vehicles, self.depot)?;

        let mut max_distances = vec![self.max_distance; self.num_vehicles];
        for (vehicle, distance) in self.vehicle_max_distances {
            let slot = max_distances.get_mut(vehicle).ok_or_else(|| {
                RoutingError::InvalidInput(format!(
                    "budget override for vehicle {} but only {} vehicles",
                    vehicle, self.num_vehicles
                ))
            })?;
            *slot = distance;
        }
        if let Some(budget) = max_distances.iter().find(|&&budget| budget < 0) {
            return Err(RoutingError::InvalidInput(format!("negative travel budget {}", budget)));
        }
        if self.span_cost_coefficient < 0 {
            return Err(RoutingError::InvalidInput(format!(
                "negative span cost coefficient {}",
                self.span_cost_coefficient
            )));
        }

        ArcCostEvaluator::new(&self.matrix, &mapper)?;

        debug!(
            nodes = num_nodes,
            vehicles = self.num_vehicles,
            depot = self.depot,
            "routing problem built"
        );

        Ok(RoutingProblem {
            matrix: self.matrix,
            mapper,
            max_distances,
            span_cost_coefficient: self.span_cost_coefficient,
            span_mode: self.span_mode,
        })
    }
}
