use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::profile::Profile;

/// Bounds for a recommendation request. The API layer parses the raw query
/// parameters; inverted bounds are still rejected here.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RecommendationQuery {
    pub min_age: u32,
    pub max_age: u32,
    pub min_distance_km: f64,
    pub max_distance_km: f64,
}

impl RecommendationQuery {
    pub fn validate(&self) -> Result<()> {
        if self.min_age > self.max_age {
            return Err(Error::InvalidAgeBounds {
                min: self.min_age,
                max: self.max_age,
            });
        }
        if self.min_distance_km > self.max_distance_km {
            return Err(Error::InvalidDistanceBounds {
                min: self.min_distance_km,
                max: self.max_distance_km,
            });
        }
        Ok(())
    }
}

/// A candidate annotated with ranking data. `distance_km` is absent when the
/// requester has no coordinates yet and the degraded listing was served.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedProfile {
    pub profile: Profile,
    pub distance_km: Option<f64>,
    pub match_percentage: f64,
}
