//! OSRM HTTP adapter for cost matrices.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RoutingError;
use crate::traits::{DistanceMatrixProvider, Location};

/// Which OSRM table annotation becomes the arc cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableAnnotation {
    /// Travel time in seconds.
    Duration,
    /// Road distance in meters.
    Distance,
}

impl TableAnnotation {
    fn as_query(self) -> &'static str {
        match self {
            TableAnnotation::Duration => "duration",
            TableAnnotation::Distance => "distance",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
    pub annotation: TableAnnotation,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
            annotation: TableAnnotation::Distance,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, RoutingError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// `table` service URL for `locations`, coordinates in OSRM's lng,lat order.
    pub fn table_url(&self, locations: &[Location]) -> String {
        let coords = locations
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords,
            self.config.annotation.as_query()
        )
    }
}

impl DistanceMatrixProvider for OsrmClient {
    fn matrix_for(&self, locations: &[Location]) -> Result<Vec<Vec<i64>>, RoutingError> {
        if locations.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.table_url(locations);
        debug!(%url, "requesting OSRM table");

        let body = self
            .client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.json::<OsrmTableResponse>())?;

        body.into_matrix(self.config.annotation, locations.len())
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: String,
    message: Option<String>,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

impl OsrmTableResponse {
    fn into_matrix(self, annotation: TableAnnotation, size: usize) -> Result<Vec<Vec<i64>>, RoutingError> {
        if self.code != "Ok" {
            return Err(RoutingError::Provider(format!(
                "OSRM returned {}: {}",
                self.code,
                self.message.unwrap_or_default()
            )));
        }

        let table = match annotation {
            TableAnnotation::Duration => self.durations,
            TableAnnotation::Distance => self.distances,
        }
        .ok_or_else(|| {
            RoutingError::Provider(format!("OSRM response has no {} table", annotation.as_query()))
        })?;

        if table.len() != size || table.iter().any(|row| row.len() != size) {
            return Err(RoutingError::Provider(format!("OSRM table is not {}x{}", size, size)));
        }

        table
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, value)| {
                        value.map(|value| value.round() as i64).ok_or_else(|| {
                            RoutingError::Provider(format!("no route between locations {} and {}", i, j))
                        })
                    })
                    .collect::<Result<Vec<i64>, RoutingError>>()
            })
            .collect()
    }
}
