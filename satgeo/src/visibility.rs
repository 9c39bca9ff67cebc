//! Ground-observer visibility search over a discretized time horizon.
//!
//! Two equivalent threshold formulations are supported: elevation-angle
//! rise detection and straight-line proximity detection. The scan is
//! time-major, so the returned event is the earliest qualifying instant
//! across every scanned candidate, not merely the first candidate's
//! first hit.

use chrono::{DateTime, Duration, Utc};
use na::Vector3;
use nav_types::{ECEF, WGS84};
use ordered_float::OrderedFloat;
use satgeo_types::prelude::{
    GeodeticPosition, ObserverLocation, VisibilityEvent, VisibilityEventKind,
};
use tracing::{debug, warn};

use crate::{
    geodetic,
    propagator::ElementSet,
    store::AlertCache,
    units::{Angle, Length},
};

/// The visibility condition an object must satisfy
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum Threshold {
    /// Object's elevation as seen from the observer crosses this angle
    Elevation(Angle),
    /// Straight-line observer distance falls below this length
    Proximity(Length),
}

/// All scan inputs are explicit, named parameters; production and demo
/// profiles differ only in configuration.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct PassScan {
    pub horizon: Duration,
    pub step: Duration,
    pub threshold: Threshold,

    /// Scan at most this many candidates, taken as a prefix in catalog
    /// order so results stay reproducible
    pub candidate_cap: Option<usize>,

    /// Wall-clock cutoff for the scan itself; exceeding it yields the
    /// normal "no event" outcome
    pub deadline: Option<DateTime<Utc>>,
}

/// Observer-relative geometry for one propagated subpoint
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct LookGeometry {
    pub range: Length,
    pub elevation: Angle,
}

fn ecef_of(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> ECEF<f64> {
    WGS84::from_degrees_and_meters(latitude_deg, longitude_deg, altitude_m).into()
}

/// Range and elevation of `target` as seen from `observer`
pub fn look_geometry(observer: &ObserverLocation, target: &GeodeticPosition) -> LookGeometry {
    let obs = ecef_of(
        observer.latitude_deg,
        observer.longitude_deg,
        observer.elevation_m,
    );
    let sat = ecef_of(
        target.latitude_deg,
        target.longitude_deg,
        target.altitude_km * 1000.0,
    );

    let range_m = obs.distance(&sat);
    let delta = Vector3::new(sat.x() - obs.x(), sat.y() - obs.y(), sat.z() - obs.z());

    // Geodetic up at the observer
    let lat = observer.latitude_deg.to_radians();
    let lon = observer.longitude_deg.to_radians();
    let up = Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin());

    let elevation = (delta.dot(&up) / range_m).asin();
    LookGeometry {
        range: Length::from_meters(range_m),
        elevation: Angle::from_radians(elevation),
    }
}

impl Threshold {
    pub fn is_satisfied(&self, geometry: &LookGeometry) -> bool {
        match self {
            Threshold::Elevation(min) => geometry.elevation >= *min,
            Threshold::Proximity(max) => geometry.range <= *max,
        }
    }

    /// Higher is better; used to pick the culmination sample
    fn figure_of_merit(&self, geometry: &LookGeometry) -> f64 {
        match self {
            Threshold::Elevation(_) => geometry.elevation.as_radians(),
            Threshold::Proximity(_) => -geometry.range.as_meters(),
        }
    }
}

fn capped<'a>(candidates: &'a [ElementSet], cap: Option<usize>) -> &'a [ElementSet] {
    match cap {
        Some(cap) => &candidates[..candidates.len().min(cap)],
        None => candidates,
    }
}

fn subpoint_at(set: &ElementSet, instant: DateTime<Utc>) -> Option<GeodeticPosition> {
    let state = match set.propagate(instant) {
        Ok(state) => state,
        Err(error) => {
            debug!(name = %set.name(), %error, "candidate skipped at step");
            return None;
        }
    };
    geodetic::to_geodetic(&state).ok()
}

/// Find the earliest instant within the horizon at which any scanned
/// candidate satisfies the threshold. `None` is the normal outcome for
/// a horizon without qualifying geometry.
pub fn find_next_pass(
    candidates: &[ElementSet],
    observer: &ObserverLocation,
    scan: &PassScan,
    start: DateTime<Utc>,
) -> Option<VisibilityEvent> {
    let candidates = capped(candidates, scan.candidate_cap);
    let step_secs = scan.step.num_seconds().max(1);
    let steps = scan.horizon.num_seconds() / step_secs;

    for i in 0..=steps {
        if let Some(deadline) = scan.deadline {
            if Utc::now() >= deadline {
                debug!("pass scan deadline elapsed");
                return None;
            }
        }
        let instant = start + Duration::seconds(i * step_secs);
        for set in candidates {
            let Some(subpoint) = subpoint_at(set, instant) else {
                continue;
            };
            let geometry = look_geometry(observer, &subpoint);
            if scan.threshold.is_satisfied(&geometry) {
                return Some(VisibilityEvent {
                    instant,
                    subject: set.name().to_string(),
                    kind: VisibilityEventKind::Rise,
                });
            }
        }
    }
    None
}

/// Scan one object over the horizon, reporting rise, culmination and
/// set for each pass. A pass still open when the horizon ends gets its
/// culmination flushed without a set event.
pub fn scan_object_events(
    set: &ElementSet,
    observer: &ObserverLocation,
    scan: &PassScan,
    start: DateTime<Utc>,
) -> Vec<VisibilityEvent> {
    let step_secs = scan.step.num_seconds().max(1);
    let steps = scan.horizon.num_seconds() / step_secs;

    let mut events = Vec::new();
    let mut samples: Vec<(DateTime<Utc>, f64)> = Vec::new();
    let mut in_pass = false;

    let flush_culmination = |samples: &mut Vec<(DateTime<Utc>, f64)>,
                             events: &mut Vec<VisibilityEvent>| {
        if let Some((instant, _)) = samples
            .iter()
            .max_by_key(|(_, merit)| OrderedFloat(*merit))
        {
            events.push(VisibilityEvent {
                instant: *instant,
                subject: set.name().to_string(),
                kind: VisibilityEventKind::Culmination,
            });
        }
        samples.clear();
    };

    for i in 0..=steps {
        let instant = start + Duration::seconds(i * step_secs);
        let Some(subpoint) = subpoint_at(set, instant) else {
            continue;
        };
        let geometry = look_geometry(observer, &subpoint);
        let satisfied = scan.threshold.is_satisfied(&geometry);

        match (in_pass, satisfied) {
            (false, true) => {
                in_pass = true;
                events.push(VisibilityEvent {
                    instant,
                    subject: set.name().to_string(),
                    kind: VisibilityEventKind::Rise,
                });
                samples.push((instant, scan.threshold.figure_of_merit(&geometry)));
            }
            (true, true) => {
                samples.push((instant, scan.threshold.figure_of_merit(&geometry)));
            }
            (true, false) => {
                in_pass = false;
                flush_culmination(&mut samples, &mut events);
                events.push(VisibilityEvent {
                    instant,
                    subject: set.name().to_string(),
                    kind: VisibilityEventKind::Set,
                });
            }
            (false, false) => {}
        }
    }
    if in_pass {
        flush_culmination(&mut samples, &mut events);
    }
    events
}

/// Store a single "next event" message for this user, with a TTL equal
/// to the seconds remaining until the event. Nothing is persisted when
/// the event is not in the future.
pub fn schedule_alert(
    cache: &dyn AlertCache,
    user_id: &str,
    event: &VisibilityEvent,
    now: DateTime<Utc>,
) -> Option<Duration> {
    let ttl = event.instant - now;
    if ttl <= Duration::zero() {
        return None;
    }
    let message = format!(
        "{} visible at {} from your location",
        event.subject,
        event.instant.format("%H:%M")
    );
    if let Err(error) = cache.put(&format!("alert:{user_id}"), &message, ttl) {
        warn!(%error, user_id, "failed to store visibility alert");
    }
    Some(ttl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodetic::test_support::{iss_raw, vanguard_raw};
    use crate::store::MemoryAlertCache;
    use chrono::TimeZone;

    fn iss() -> ElementSet {
        ElementSet::from_raw(&iss_raw()).unwrap()
    }

    fn vanguard() -> ElementSet {
        ElementSet::from_raw(&vanguard_raw()).unwrap()
    }

    /// Observer placed directly below the ISS thirty minutes after
    /// epoch; the zenith range there is just the orbital altitude.
    fn observer_under_iss(at: DateTime<Utc>) -> ObserverLocation {
        let set = iss();
        let state = set.propagate(at).unwrap();
        let subpoint = geodetic::to_geodetic(&state).unwrap();
        ObserverLocation::from_degrees(subpoint.latitude_deg, subpoint.longitude_deg)
    }

    fn proximity_scan() -> PassScan {
        PassScan {
            horizon: Duration::hours(1),
            step: Duration::minutes(30),
            threshold: Threshold::Proximity(Length::from_kilometers(450.0)),
            candidate_cap: None,
            deadline: None,
        }
    }

    #[test]
    fn zenith_geometry_is_straight_up() {
        let set = iss();
        let at = set.epoch() + Duration::minutes(30);
        let observer = observer_under_iss(at);
        let subpoint = {
            let state = set.propagate(at).unwrap();
            geodetic::to_geodetic(&state).unwrap()
        };
        let geometry = look_geometry(&observer, &subpoint);
        assert!(geometry.elevation.as_degrees() > 89.0);
        let range_km = geometry.range.as_kilometers();
        assert!((range_km - subpoint.altitude_km).abs() < 5.0);
    }

    #[test]
    fn returns_the_single_qualifying_step() {
        let set = iss();
        let start = set.epoch();
        let overhead_at = start + Duration::minutes(30);
        let observer = observer_under_iss(overhead_at);

        // The ISS covers hundreds of km per scan step, so only the
        // overhead step can fall inside a 450 km radius
        let event = find_next_pass(&[vanguard(), set], &observer, &proximity_scan(), start)
            .expect("expected a qualifying step");
        assert_eq!(event.instant, overhead_at);
        assert_eq!(event.subject, "ISS (ZARYA)");
        assert_eq!(event.kind, VisibilityEventKind::Rise);
    }

    #[test]
    fn no_qualifying_geometry_returns_none() {
        let set = iss();
        let start = set.epoch();
        let observer = observer_under_iss(start + Duration::minutes(30));
        let scan = PassScan {
            threshold: Threshold::Proximity(Length::from_kilometers(1.0)),
            ..proximity_scan()
        };
        assert!(find_next_pass(&[set], &observer, &scan, start).is_none());
    }

    #[test]
    fn candidate_cap_is_a_deterministic_prefix() {
        let set = iss();
        let start = set.epoch();
        let observer = observer_under_iss(start + Duration::minutes(30));
        let scan = PassScan {
            candidate_cap: Some(1),
            ..proximity_scan()
        };
        // Only VANGUARD 1 is scanned under the cap and it never comes
        // within 450 km of the ground
        assert!(find_next_pass(&[vanguard(), iss()], &observer, &scan, start).is_none());
    }

    #[test]
    fn elapsed_deadline_yields_no_event() {
        let set = iss();
        let start = set.epoch();
        let observer = observer_under_iss(start + Duration::minutes(30));
        let scan = PassScan {
            deadline: Some(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()),
            ..proximity_scan()
        };
        assert!(find_next_pass(&[set], &observer, &scan, start).is_none());
    }

    #[test]
    fn overhead_pass_produces_rise_culmination_set() {
        let set = iss();
        let start = set.epoch();
        let observer = observer_under_iss(start + Duration::minutes(30));
        let scan = PassScan {
            horizon: Duration::minutes(60),
            step: Duration::minutes(1),
            threshold: Threshold::Elevation(Angle::from_degrees(10.0)),
            candidate_cap: None,
            deadline: None,
        };
        let events = scan_object_events(&set, &observer, &scan, start);

        let kinds: Vec<VisibilityEventKind> = events.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                VisibilityEventKind::Rise,
                VisibilityEventKind::Culmination,
                VisibilityEventKind::Set,
            ]
        );
        assert!(events[0].instant < events[1].instant);
        assert!(events[1].instant < events[2].instant);
    }

    #[test]
    fn alert_is_cached_with_remaining_seconds() {
        let cache = MemoryAlertCache::default();
        let now = Utc.with_ymd_and_hms(2008, 9, 20, 12, 0, 0).unwrap();
        let event = VisibilityEvent {
            instant: now + Duration::minutes(90),
            subject: "ISS (ZARYA)".to_string(),
            kind: VisibilityEventKind::Rise,
        };
        let ttl = schedule_alert(&cache, "user-1", &event, now).unwrap();
        assert_eq!(ttl, Duration::minutes(90));

        let (message, stored_ttl) = cache.get("alert:user-1").unwrap();
        assert!(message.contains("ISS (ZARYA)"));
        assert_eq!(stored_ttl, Duration::minutes(90));
    }

    #[test]
    fn past_event_is_not_persisted() {
        let cache = MemoryAlertCache::default();
        let now = Utc.with_ymd_and_hms(2008, 9, 20, 12, 0, 0).unwrap();
        let event = VisibilityEvent {
            instant: now - Duration::minutes(1),
            subject: "ISS (ZARYA)".to_string(),
            kind: VisibilityEventKind::Rise,
        };
        assert!(schedule_alert(&cache, "user-1", &event, now).is_none());
        assert!(cache.get("alert:user-1").is_none());
    }
}
