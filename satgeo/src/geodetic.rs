//! TEME-to-geodetic transformation on the WGS84 ellipsoid.
//!
//! Earth orientation is Greenwich mean sidereal time at the state's
//! instant; the geodetic latitude iteration follows the usual
//! closed-loop refinement and converges in a handful of rounds for any
//! orbital altitude.

use chrono::{DateTime, Utc};
use satgeo_types::prelude::{GeodeticPosition, RawElementSet, StateVector};
use std::f64::consts::{PI, TAU};
use tracing::debug;

use crate::{
    propagator::{ElementSet, PropagationError},
    BatchOutcome, SkipReason,
};

/// WGS84 flattening
const FLATTENING: f64 = 1.0 / 298.257223563;

const LATITUDE_CONVERGENCE_RAD: f64 = 1e-10;
const MAX_LATITUDE_ITERATIONS: u32 = 10;

#[derive(Debug, Clone, thiserror::Error)]
pub enum TransformError {
    /// NaN/∞ leaked out of the transform; consumers treat this exactly
    /// like a propagation failure and skip the record
    #[error("non-finite geodetic result for state at {instant}")]
    NonFinite { instant: DateTime<Utc> },

    #[error("geodetic result out of range: lat {latitude_deg}°, lon {longitude_deg}°")]
    OutOfRange {
        latitude_deg: f64,
        longitude_deg: f64,
    },
}

/// A per-record failure anywhere along parse → propagate → transform
#[derive(Debug, Clone, thiserror::Error)]
pub enum DeriveError {
    #[error(transparent)]
    Propagation(#[from] PropagationError),
    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Greenwich mean sidereal time, [rad]
pub fn gmst(instant: DateTime<Utc>) -> f64 {
    sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&instant.naive_utc()))
}

/// Transform a TEME state vector to latitude/longitude/altitude.
///
/// Latitude lands in [-90, 90], longitude in (-180, 180], altitude in
/// km above the ellipsoid.
pub fn to_geodetic(state: &StateVector) -> Result<GeodeticPosition, TransformError> {
    let ae = sgp4::WGS84.ae;
    let e2 = FLATTENING * (2.0 - FLATTENING);

    let x = state.position_km.x;
    let y = state.position_km.y;
    let z = state.position_km.z;

    let theta = y.atan2(x);
    let mut lon = (theta - gmst(state.instant)).rem_euclid(TAU);
    if lon > PI {
        lon -= TAU;
    }

    let r = (x * x + y * y).sqrt();
    let mut lat = z.atan2(r);
    let mut c = 1.0;
    for _ in 0..MAX_LATITUDE_ITERATIONS {
        let phi = lat;
        c = 1.0 / (1.0 - e2 * phi.sin() * phi.sin()).sqrt();
        lat = (z + ae * c * e2 * phi.sin()).atan2(r);
        if (lat - phi).abs() < LATITUDE_CONVERGENCE_RAD {
            break;
        }
    }
    // r/cos(lat) is ill-conditioned near the poles; switch to the
    // z-based form there
    let alt = if lat.abs() < 85.0_f64.to_radians() {
        r / lat.cos() - ae * c
    } else {
        z / lat.sin() - ae * c * (1.0 - e2)
    };

    let position = GeodeticPosition {
        latitude_deg: lat.to_degrees(),
        longitude_deg: lon.to_degrees(),
        altitude_km: alt,
    };
    if !position.is_finite() {
        return Err(TransformError::NonFinite {
            instant: state.instant,
        });
    }
    if position.latitude_deg.abs() > 90.0
        || position.longitude_deg <= -180.0
        || position.longitude_deg > 180.0
    {
        return Err(TransformError::OutOfRange {
            latitude_deg: position.latitude_deg,
            longitude_deg: position.longitude_deg,
        });
    }
    Ok(position)
}

/// Parse, propagate and transform a single record at `instant`
pub fn derive_one(
    raw: &RawElementSet,
    instant: DateTime<Utc>,
) -> Result<GeodeticPosition, DeriveError> {
    let set = ElementSet::from_raw(raw)?;
    let state = set.propagate(instant)?;
    Ok(to_geodetic(&state)?)
}

/// The shared front half of the clusterer, graph assembler and pass
/// predictor: derive a geodetic position for every record that survives
/// parse → propagate → transform, skipping the rest.
pub fn derive_batch(
    raws: &[RawElementSet],
    instant: DateTime<Utc>,
) -> BatchOutcome<(String, GeodeticPosition), DeriveError> {
    let mut outcome = BatchOutcome::default();
    for raw in raws {
        match derive_one(raw, instant) {
            Ok(position) => outcome.successes.push((raw.name.clone(), position)),
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
