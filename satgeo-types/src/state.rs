use chrono::{DateTime, Utc};
use derive_more::Display;

/// Position/velocity state in the Earth-centered inertial (TEME) frame,
/// tagged with the instant it was computed for.
///
/// Recomputed per query, never persisted.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Display)]
#[display(fmt = "{{pos_km: {}, vel_km_s: {}, instant: {}}}", "position_km", "velocity_km_s", "instant")]
pub struct StateVector {
    /// Position, [km], expressed in TEME
    pub position_km: na::Vector3<f64>,

    /// Velocity, [km/s], expressed in TEME
    pub velocity_km_s: na::Vector3<f64>,

    /// The instant this state was propagated to
    pub instant: DateTime<Utc>,
}

impl StateVector {
    /// Geocentric radius, [km]
    pub fn radius_km(&self) -> f64 {
        self.position_km.norm()
    }

    pub fn is_finite(&self) -> bool {
        self.position_km.iter().all(|c| c.is_finite())
            && self.velocity_km_s.iter().all(|c| c.is_finite())
    }
}
