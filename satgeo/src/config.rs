//! Scenario configuration: band tables, category keyword tables and
//! pass-scan profiles loaded from TOML. Missing sections fall back to
//! the built-in defaults so a scenario file only names what it changes.

use chrono::{DateTime, Duration, Utc};
use satgeo_types::prelude::RegimeBand;
use serde::Deserialize;
use std::{collections::HashSet, fs, path::Path};
use tracing::warn;

use crate::{
    congestion,
    taxonomy::{self, Category, CategoryTable},
    units::{Angle, Length},
    visibility::{PassScan, Threshold},
};

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub name: Option<String>,
    #[serde(alias = "band")]
    pub bands: Vec<Band>,
    #[serde(alias = "category")]
    pub categories: Vec<Category>,
    pub pass_scan: Option<PassScanConfig>,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Band {
    pub name: String,
    pub floor_km: f64,
    pub ceiling_km: f64,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PassScanConfig {
    pub horizon_minutes: Option<i64>,
    pub step_seconds: Option<i64>,
    pub elevation_threshold_deg: Option<f64>,
    pub proximity_threshold_km: Option<f64>,
    pub candidate_cap: Option<usize>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let content = fs::read_to_string(path).expect("Failed to read config file");
        Self::from_str_checked(&content)
    }

    pub fn from_str_checked(s: &str) -> Self {
        let cfg: Config = toml::from_str(s).expect("Failed to parse config file");

        let mut names = HashSet::new();
        for band in cfg.bands.iter() {
            if !names.insert(&band.name) {
                panic!("Duplicate configuration entry for band '{}'", band.name);
            }
            if band.floor_km >= band.ceiling_km {
                panic!(
                    "Configuration entry for band '{}' has floor {} >= ceiling {}",
                    band.name, band.floor_km, band.ceiling_km
                );
            }
        }

        names.clear();
        for category in cfg.categories.iter() {
            if !names.insert(&category.name) {
                panic!(
                    "Duplicate configuration entry for category '{}'",
                    category.name
                );
            }
        }

        if let Some(scan) = cfg.pass_scan.as_ref() {
            if scan.elevation_threshold_deg.is_some() && scan.proximity_threshold_km.is_some() {
                panic!("Pass-scan configuration sets both elevation and proximity thresholds");
            }
            if let Some(step) = scan.step_seconds {
                if step <= 0 {
                    panic!("Pass-scan configuration has a non-positive step of {step} seconds");
                }
            }
            if let Some(horizon) = scan.horizon_minutes {
                if horizon <= 0 {
                    panic!(
                        "Pass-scan configuration has a non-positive horizon of {horizon} minutes"
                    );
                }
            }
        }

        // Overlaps are legal but worth surfacing
        let bands = cfg.regime_bands();
        for (i, a) in bands.iter().enumerate() {
            for b in &bands[i + 1..] {
                if a.overlaps(b) {
                    warn!(first = %a.name, second = %b.name, "altitude bands overlap");
                }
            }
        }
        cfg.category_table().validate();

        cfg
    }

    /// The configured band table, or the built-in regime table when the
    /// scenario names none
    pub fn regime_bands(&self) -> Vec<RegimeBand> {
        if self.bands.is_empty() {
            return congestion::default_bands();
        }
        self.bands
            .iter()
            .map(|b| RegimeBand::new(&b.name, b.floor_km, b.ceiling_km))
            .collect()
    }

    /// The configured keyword table, or the built-in one
    pub fn category_table(&self) -> CategoryTable {
        if self.categories.is_empty() {
            return taxonomy::default_table();
        }
        CategoryTable::new(self.categories.clone())
    }

    /// Build the scan profile, filling unset fields from the defaults:
    /// a 24 h horizon sampled every 5 minutes against a 30 degree
    /// elevation threshold, unbounded candidates.
    pub fn pass_scan(&self, deadline: Option<DateTime<Utc>>) -> PassScan {
        let scan = self.pass_scan.clone().unwrap_or_default();
        let threshold = match (scan.elevation_threshold_deg, scan.proximity_threshold_km) {
            (_, Some(km)) => Threshold::Proximity(Length::from_kilometers(km)),
            (Some(deg), None) => Threshold::Elevation(Angle::from_degrees(deg)),
            (None, None) => Threshold::Elevation(Angle::from_degrees(30.0)),
        };
        PassScan {
            horizon: Duration::minutes(scan.horizon_minutes.unwrap_or(24 * 60)),
            step: Duration::seconds(scan.step_seconds.unwrap_or(300)),
            threshold,
            candidate_cap: scan.candidate_cap,
            deadline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn empty_config_uses_the_builtin_tables() {
        let cfg = Config::from_str_checked("");
        assert_eq!(cfg.regime_bands(), congestion::default_bands());
        assert_eq!(cfg.category_table(), taxonomy::default_table());

        let scan = cfg.pass_scan(None);
        assert_eq!(scan.horizon, Duration::hours(24));
        assert_eq!(scan.step, Duration::minutes(5));
        assert_eq!(
            scan.threshold,
            Threshold::Elevation(Angle::from_degrees(30.0))
        );
        assert_eq!(scan.candidate_cap, None);
    }

    #[test]
    fn scenario_overrides_are_applied() {
        let cfg = Config::from_str_checked(indoc! {r#"
            name = "demo"

            [[band]]
            name = "low"
            floor-km = 160.0
            ceiling-km = 2000.0

            [[category]]
            name = "navigation"
            keywords = ["GPS"]

            [pass-scan]
            horizon-minutes = 120
            step-seconds = 60
            proximity-threshold-km = 500.0
            candidate-cap = 25
        "#});

        assert_eq!(cfg.name.as_deref(), Some("demo"));
        let bands = cfg.regime_bands();
        assert_eq!(bands, vec![RegimeBand::new("low", 160.0, 2000.0)]);
        assert_eq!(cfg.category_table().classify("GPS BIIR-2"), "navigation");

        let scan = cfg.pass_scan(None);
        assert_eq!(scan.horizon, Duration::hours(2));
        assert_eq!(scan.step, Duration::minutes(1));
        assert_eq!(
            scan.threshold,
            Threshold::Proximity(Length::from_kilometers(500.0))
        );
        assert_eq!(scan.candidate_cap, Some(25));
    }

    #[test]
    #[should_panic(expected = "Duplicate configuration entry for band")]
    fn duplicate_band_names_are_rejected() {
        Config::from_str_checked(indoc! {r#"
            [[band]]
            name = "low"
            floor-km = 160.0
            ceiling-km = 600.0

            [[band]]
            name = "low"
            floor-km = 600.0
            ceiling-km = 1200.0
        "#});
    }

    #[test]
    #[should_panic(expected = "floor")]
    fn inverted_band_bounds_are_rejected() {
        Config::from_str_checked(indoc! {r#"
            [[band]]
            name = "inverted"
            floor-km = 600.0
            ceiling-km = 160.0
        "#});
    }

    #[test]
    #[should_panic(expected = "both elevation and proximity")]
    fn conflicting_thresholds_are_rejected() {
        Config::from_str_checked(indoc! {r#"
            [pass-scan]
            elevation-threshold-deg = 30.0
            proximity-threshold-km = 500.0
        "#});
    }

    #[test]
    #[should_panic(expected = "non-positive step")]
    fn zero_step_is_rejected() {
        Config::from_str_checked(indoc! {r#"
            [pass-scan]
            step-seconds = 0
        "#});
    }
}
