use serde::{Deserialize, Serialize};

/// A fixed ground observer, used by the pass predictor.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ObserverLocation {
    pub latitude_deg: f64,
    pub longitude_deg: f64,

    /// Height above the ellipsoid, [m]. Defaults to sea level.
    #[serde(default)]
    pub elevation_m: f64,
}

impl ObserverLocation {
    pub fn from_degrees(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            elevation_m: 0.0,
        }
    }
}
