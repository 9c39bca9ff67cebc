use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named half-open altitude interval `[floor, ceiling)`, [km].
///
/// Bands are evaluated in declared order; an object joins every band
/// whose interval contains its altitude, so overlapping declarations
/// legitimately produce multi-band membership.
#[derive(Clone, PartialEq, PartialOrd, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegimeBand {
    pub name: String,
    pub floor_km: f64,
    pub ceiling_km: f64,
}

impl RegimeBand {
    pub fn new<N: Into<String>>(name: N, floor_km: f64, ceiling_km: f64) -> Self {
        Self {
            name: name.into(),
            floor_km,
            ceiling_km,
        }
    }

    /// Half-open containment: floor inclusive, ceiling exclusive
    pub fn contains(&self, altitude_km: f64) -> bool {
        altitude_km >= self.floor_km && altitude_km < self.ceiling_km
    }

    pub fn overlaps(&self, other: &RegimeBand) -> bool {
        self.floor_km < other.ceiling_km && other.floor_km < self.ceiling_km
    }
}

/// Density classification of a band, purely a function of member count
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    pub fn from_count(count: usize) -> Self {
        if count < 100 {
            CongestionLevel::Low
        } else if count < 300 {
            CongestionLevel::Medium
        } else {
            CongestionLevel::High
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CongestionLevel::Low => "Low",
            CongestionLevel::Medium => "Medium",
            CongestionLevel::High => "High",
        }
    }
}

/// One object assigned to a band
#[derive(Clone, PartialEq, PartialOrd, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BandMember {
    pub name: String,
    pub altitude_km: f64,
}

/// Per-band occupancy within a snapshot
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BandOccupancy {
    pub count: usize,
    #[serde(rename = "classification")]
    pub level: CongestionLevel,
    pub members: Vec<BandMember>,
}

/// Mapping from band name to occupancy, produced atomically as a whole.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CongestionSnapshot {
    pub generated_at: DateTime<Utc>,
    pub bands: BTreeMap<String, BandOccupancy>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn occupancy_serializes_count_classification_members() {
        let occupancy = BandOccupancy {
            count: 1,
            level: CongestionLevel::Low,
            members: vec![BandMember {
                name: "ISS (ZARYA)".to_string(),
                altitude_km: 400.0,
            }],
        };
        let value = serde_json::to_value(&occupancy).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["classification"], "Low");
        assert_eq!(value["members"][0]["name"], "ISS (ZARYA)");
        assert!(value.get("level").is_none());
    }
}
