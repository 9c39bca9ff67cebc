//! SGP4/SDP4 propagation of parsed element sets to inertial state vectors.
//!
//! The perturbation theory itself is delegated to the `sgp4` crate; this
//! module owns the contract around it: parsing raw element lines into an
//! immutable [`ElementSet`], rejecting degenerate or decayed results, and
//! running skip-and-continue batches.

use chrono::{DateTime, TimeZone, Utc};
use na::Vector3;
use satgeo_types::prelude::{RawElementSet, StateVector};
use tracing::debug;

use crate::{BatchOutcome, SkipReason};

#[derive(Debug, Clone, thiserror::Error)]
pub enum PropagationError {
    /// The element lines could not be parsed at all
    #[error("malformed element lines: {0}")]
    Malformed(String),

    /// The theory cannot handle this orbit (near-singular eccentricity
    /// or inclination, epoch out of range, ...)
    #[error("propagation rejected the orbit: {0}")]
    Degenerate(String),

    /// The propagated radius is at or below the ellipsoid surface
    #[error("orbit has decayed (geocentric radius {radius_km:.1} km)")]
    Decayed { radius_km: f64 },
}

/// A parsed, immutable two-line element record plus the precomputed
/// propagation constants for it.
pub struct ElementSet {
    raw: RawElementSet,
    elements: sgp4::Elements,
    constants: sgp4::Constants,
}

impl std::fmt::Debug for ElementSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementSet")
            .field("name", &self.raw.name)
            .field("norad_id", &self.elements.norad_id)
            .finish()
    }
}

impl ElementSet {
    /// Parse one raw record. Near-Earth vs deep-space (SGP4 vs SDP4)
    /// regime selection happens inside the theory, keyed off the orbital
    /// period.
    pub fn from_raw(raw: &RawElementSet) -> Result<Self, PropagationError> {
        let elements = sgp4::Elements::from_tle(
            Some(raw.name.clone()),
            raw.line1.as_bytes(),
            raw.line2.as_bytes(),
        )
        .map_err(|e| PropagationError::Malformed(e.to_string()))?;
        let constants = sgp4::Constants::from_elements(&elements)
            .map_err(|e| PropagationError::Degenerate(e.to_string()))?;
        Ok(Self {
            raw: raw.clone(),
            elements,
            constants,
        })
    }

    pub fn name(&self) -> &str {
        &self.raw.name
    }

    pub fn raw(&self) -> &RawElementSet {
        &self.raw
    }

    pub fn norad_id(&self) -> u64 {
        self.elements.norad_id
    }

    /// Element epoch as a UTC instant
    pub fn epoch(&self) -> DateTime<Utc> {
        Utc.from_utc_datetime(&self.elements.datetime)
    }

    /// Mean motion, [rev/day]
    pub fn mean_motion(&self) -> f64 {
        self.elements.mean_motion
    }

    pub fn eccentricity(&self) -> f64 {
        self.elements.eccentricity
    }

    /// Inclination, [deg]
    pub fn inclination_deg(&self) -> f64 {
        self.elements.inclination
    }

    /// Propagate to `instant`, yielding a TEME state vector in km and
    /// km/s.
    pub fn propagate(&self, instant: DateTime<Utc>) -> Result<StateVector, PropagationError> {
        let minutes = self
            .elements
            .datetime_to_minutes_since_epoch(&instant.naive_utc())
            .map_err(|e| PropagationError::Degenerate(e.to_string()))?;
        let prediction = self
            .constants
            .propagate(minutes)
            .map_err(|e| PropagationError::Degenerate(e.to_string()))?;

        let state = StateVector {
            position_km: Vector3::from(prediction.position),
            velocity_km_s: Vector3::from(prediction.velocity),
            instant,
        };
        if !state.is_finite() {
            return Err(PropagationError::Degenerate(
                "non-finite state vector".to_string(),
            ));
        }
        let radius_km = state.radius_km();
        if radius_km <= sgp4::WGS84.ae {
            return Err(PropagationError::Decayed { radius_km });
        }
        Ok(state)
    }
}

/// Parse every raw record, skipping the ones the theory rejects
pub fn parse_batch(raws: &[RawElementSet]) -> BatchOutcome<ElementSet, PropagationError> {
    let mut outcome = BatchOutcome::default();
    for raw in raws {
        match ElementSet::from_raw(raw) {
            Ok(set) => outcome.successes.push(set),
            Err(error) => {
                debug!(name = %raw.name, %error, "skipping unparsable element set");
                outcome.skipped.push(SkipReason {
                    name: raw.name.clone(),
                    error,
                });
            }
        }
    }
    outcome
}

/// Propagate a whole collection at one instant, skip-and-continue
pub fn propagate_batch(
    raws: &[RawElementSet],
    instant: DateTime<Utc>,
) -> BatchOutcome<(String, StateVector), PropagationError> {
    let mut outcome = BatchOutcome::default();
    for raw in raws {
        let result = ElementSet::from_raw(raw).and_then(|set| set.propagate(instant));
        match result {
            Ok(state) => outcome.successes.push((raw.name.clone(), state)),
            Err(error) => {
                debug!(name = %raw.name, %error, "skipping element set");
                outcome.skipped.push(SkipReason {
                    name: raw.name.clone(),
                    error,
                });
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodetic::test_support::{iss_raw, vanguard_raw};
    use approx::assert_relative_eq;
    use chrono::Duration;

    #[test]
    fn parses_and_propagates_near_epoch() {
        let set = ElementSet::from_raw(&iss_raw()).unwrap();
        assert_eq!(set.norad_id(), 25544);
        assert_relative_eq!(set.inclination_deg(), 51.6416, epsilon = 1e-4);

        let instant = set.epoch() + Duration::minutes(10);
        let state = set.propagate(instant).unwrap();
        assert!(state.is_finite());
        // LEO geocentric radius
        assert!(state.radius_km() > 6500.0 && state.radius_km() < 7100.0);
        assert_eq!(state.instant, instant);
    }

    #[test]
    fn truncated_line_is_a_per_record_error() {
        let mut raw = iss_raw();
        raw.line2.truncate(40);
        assert!(matches!(
            ElementSet::from_raw(&raw),
            Err(PropagationError::Malformed(_))
        ));
    }

    #[test]
    fn batch_skips_bad_records_and_keeps_good_ones() {
        let mut bad = iss_raw();
        bad.line2.truncate(40);
        bad.name = "TRUNCATED".to_string();
        let raws = vec![iss_raw(), bad, vanguard_raw()];

        let set = ElementSet::from_raw(&iss_raw()).unwrap();
        let outcome = propagate_batch(&raws, set.epoch());
        assert_eq!(outcome.successes.len(), 2);
        assert_eq!(outcome.skip_count(), 1);
        assert_eq!(outcome.skipped[0].name, "TRUNCATED");
    }

    #[test]
    fn propagation_is_deterministic() {
        let set = ElementSet::from_raw(&iss_raw()).unwrap();
        let instant = set.epoch() + Duration::hours(3);
        let a = set.propagate(instant).unwrap();
        let b = set.propagate(instant).unwrap();
        assert_eq!(a.position_km, b.position_km);
        assert_eq!(a.velocity_km_s, b.velocity_km_s);
    }
}
