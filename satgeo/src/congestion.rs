//! Altitude-band classification and per-regime congestion density.

use chrono::{DateTime, Utc};
use satgeo_types::prelude::{
    BandMember, BandOccupancy, CongestionLevel, CongestionSnapshot, GeodeticPosition,
    RawElementSet, RegimeBand,
};
use std::collections::BTreeMap;
use tracing::{info, warn};

use crate::{
    geodetic::{self, DeriveError},
    store::SnapshotSink,
    SkipReason,
};

/// Collection name used by the snapshot sink
pub const CONGESTION_COLLECTION: &str = "congestion_data";

/// The band table used in practice: three low-orbit sub-bands, a broad
/// mid-orbit band, geostationary and high orbit. Half-open `[floor,
/// ceiling)` intervals, [km].
pub fn default_bands() -> Vec<RegimeBand> {
    vec![
        RegimeBand::new("LEO (160-600 km)", 160.0, 600.0),
        RegimeBand::new("LEO (600-1200 km)", 600.0, 1200.0),
        RegimeBand::new("LEO (1200-2000 km)", 1200.0, 2000.0),
        RegimeBand::new("MEO", 2000.0, 35_786.0),
        RegimeBand::new("GEO", 35_786.0, 36_000.0),
        RegimeBand::new("HEO", 36_000.0, 100_000.0),
    ]
}

/// Bucket objects into every band containing their altitude, evaluating
/// bands in declared order, and classify each band by member count.
///
/// Bands with no members are omitted from the snapshot, matching the
/// sink's document shape.
pub fn cluster(
    positions: &[(String, GeodeticPosition)],
    bands: &[RegimeBand],
    generated_at: DateTime<Utc>,
) -> CongestionSnapshot {
    let mut buckets: BTreeMap<String, Vec<BandMember>> = BTreeMap::new();
    for (name, position) in positions {
        for band in bands {
            if band.contains(position.altitude_km) {
                buckets.entry(band.name.clone()).or_default().push(BandMember {
                    name: name.clone(),
                    altitude_km: position.altitude_km,
                });
            }
        }
    }

    let bands = buckets
        .into_iter()
        .map(|(band, members)| {
            let occupancy = BandOccupancy {
                count: members.len(),
                level: CongestionLevel::from_count(members.len()),
                members,
            };
            (band, occupancy)
        })
        .collect();
    CongestionSnapshot {
        generated_at,
        bands,
    }
}

/// Derive positions for a raw element batch, cluster them, and publish
/// the snapshot. The returned snapshot is unaffected by sink failure;
/// per-record skips come back for diagnostics.
pub fn run_congestion(
    raws: &[RawElementSet],
    bands: &[RegimeBand],
    instant: DateTime<Utc>,
    sink: &dyn SnapshotSink,
) -> (CongestionSnapshot, Vec<SkipReason<DeriveError>>) {
    let derived = geodetic::derive_batch(raws, instant);
    let snapshot = cluster(&derived.successes, bands, instant);
    info!(
        objects = derived.successes.len(),
        skipped = derived.skip_count(),
        bands = snapshot.bands.len(),
        "congestion snapshot computed"
    );
    publish(&snapshot, sink);
    (snapshot, derived.skipped)
}

/// Atomic replace into the sink; degrades to log-and-continue
pub fn publish(snapshot: &CongestionSnapshot, sink: &dyn SnapshotSink) {
    match serde_json::to_value(snapshot) {
        Ok(document) => {
            if let Err(error) = sink.replace(CONGESTION_COLLECTION, document) {
                warn!(%error, "failed to store congestion snapshot");
            }
        }
        Err(error) => warn!(%error, "failed to serialize congestion snapshot"),
    }
}
