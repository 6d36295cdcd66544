//! Haversine cost matrix provider (fallback when OSRM is unavailable).
//!
//! Uses great-circle distance, either directly in meters or converted to
//! travel time. Less accurate than OSRM (ignores roads) but always available.

use serde::{Deserialize, Serialize};

use crate::error::RoutingError;
use crate::traits::{DistanceMatrixProvider, Location};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostUnit {
    Meters,
    Seconds,
}

/// Straight-line cost matrix provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h, used for [`CostUnit::Seconds`].
    pub speed_kmh: f64,
    pub unit: CostUnit,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
            unit: CostUnit::Meters,
        }
    }
}

impl HaversineMatrix {
    /// Travel-time matrix at the given speed.
    pub fn travel_time(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            unit: CostUnit::Seconds,
        }
    }

    /// Calculate haversine distance between two points in kilometers.
    fn haversine_km(from: Location, to: Location) -> f64 {
        let (lat1, lng1) = from;
        let (lat2, lng2) = to;

        let lat1_rad = lat1.to_radians();
        let lat2_rad = lat2.to_radians();
        let delta_lat = (lat2 - lat1).to_radians();
        let delta_lng = (lng2 - lng1).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }

    fn cost(&self, km: f64) -> i64 {
        match self.unit {
            CostUnit::Meters => (km * 1000.0).round() as i64,
            CostUnit::Seconds => (km / self.speed_kmh * 3600.0).round() as i64,
        }
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[Location]) -> Result<Vec<Vec<i64>>, RoutingError> {
        if self.unit == CostUnit::Seconds && (self.speed_kmh.is_nan() || self.speed_kmh <= 0.0) {
            return Err(RoutingError::Provider(format!("speed must be positive, got {}", self.speed_kmh)));
        }
        if let Some(bad) = locations
            .iter()
            .find(|(lat, lng)| !lat.is_finite() || !lng.is_finite() || lat.abs() > 90.0 || lng.abs() > 180.0)
        {
            return Err(RoutingError::Provider(format!("invalid coordinate {:?}", bad)));
        }

        let n = locations.len();
        let mut matrix = vec![vec![0; n]; n];

        for (i, from) in locations.iter().enumerate() {
            for (j, to) in locations.iter().enumerate() {
                if i != j {
                    matrix[i][j] = self.cost(Self::haversine_km(*from, *to));
                }
            }
        }

        Ok(matrix)
    }
}
