//! Boundary traits for the routing optimizer.
//!
//! The optimizer never computes travel costs itself; an application plugs in
//! whatever road-network or geometric source it has.

use crate::error::RoutingError;

/// A (latitude, longitude) pair.
pub type Location = (f64, f64);

/// Provides a distance/time matrix for a set of locations.
///
/// The matrix is indexed by the provided location order and must be square,
/// with non-negative entries and a zero diagonal.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[Location]) -> Result<Vec<Vec<i64>>, RoutingError>;
}

impl<P> DistanceMatrixProvider for &P
where
    P: DistanceMatrixProvider + ?Sized,
{
    fn matrix_for(&self, locations: &[Location]) -> Result<Vec<Vec<i64>>, RoutingError> {
        (**self).matrix_for(locations)
    }
}
