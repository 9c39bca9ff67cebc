use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Latitude/longitude/altitude on the WGS84 reference ellipsoid.
///
/// Latitude is in [-90, 90] degrees, longitude in (-180, 180] degrees,
/// altitude in kilometers above the ellipsoid surface.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Display, Serialize, Deserialize)]
#[display(
    fmt = "{{lat: {}°, lon: {}°, alt: {} km}}",
    "latitude_deg",
    "longitude_deg",
    "altitude_km"
)]
pub struct GeodeticPosition {
    #[serde(rename = "lat")]
    pub latitude_deg: f64,
    #[serde(rename = "lon")]
    pub longitude_deg: f64,
    #[serde(rename = "alt")]
    pub altitude_km: f64,
}

impl GeodeticPosition {
    pub fn is_finite(&self) -> bool {
        self.latitude_deg.is_finite()
            && self.longitude_deg.is_finite()
            && self.altitude_km.is_finite()
    }
}
