//! depot-router: single-depot vehicle routing.
//!
//! Given a depot, delivery points and a cost matrix, builds one route per
//! vehicle that starts and ends at the depot, stays within a travel budget,
//! and keeps total and longest-minus-shortest route cost low.

pub mod error;
pub mod traits;
pub mod matrix;
pub mod index;
pub mod arc_cost;
pub mod dimension;
pub mod problem;
pub mod search;
pub mod local_search;
pub mod solution;
pub mod solver;
pub mod worker;
pub mod osrm;
pub mod haversine;

pub use dimension::SpanMode;
pub use error::RoutingError;
pub use matrix::DistanceMatrix;
pub use problem::{RoutingProblem, RoutingProblemBuilder};
pub use search::ConstructionOrder;
pub use solution::{Solution, SolveStatus, VehicleRoute};
pub use solver::{SolveOptions, plan_routes, solve};
