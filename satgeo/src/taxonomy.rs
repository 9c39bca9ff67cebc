//! Keyword-based object-type inference from catalog names.
//!
//! Categories are evaluated in declared order and the first category
//! with a matching keyword wins. Keyword lists have grown across
//! catalog generations and the same token can legitimately appear in
//! more than one category (a station-module name also reads as a
//! science payload); such overlaps are reported as configuration
//! diagnostics, not resolved silently.

use serde::Deserialize;
use tracing::warn;

pub const UNKNOWN_CATEGORY: &str = "unknown";

#[derive(Clone, PartialEq, Eq, Debug, Deserialize)]
pub struct Category {
    pub name: String,
    pub keywords: Vec<String>,
}

/// An ordered keyword table
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

/// Two categories claim the same keyword; first-match-wins applies
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KeywordOverlap {
    pub keyword: String,
    pub first_category: String,
    pub second_category: String,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Substring match against the upper-cased object name, first match
    /// in declared category order wins
    pub fn classify(&self, name: &str) -> &str {
        let name_upper = name.to_uppercase();
        for category in &self.categories {
            if category
                .keywords
                .iter()
                .any(|keyword| name_upper.contains(keyword.to_uppercase().as_str()))
            {
                return &category.name;
            }
        }
        UNKNOWN_CATEGORY
    }

    /// Report every keyword claimed by more than one category. Emits a
    /// `warn!` per overlap so a misconfigured table is visible without
    /// changing classification results.
    pub fn validate(&self) -> Vec<KeywordOverlap> {
        let mut overlaps = Vec::new();
        for (i, first) in self.categories.iter().enumerate() {
            for second in &self.categories[i + 1..] {
                for keyword in &first.keywords {
                    if second
                        .keywords
                        .iter()
                        .any(|k| k.eq_ignore_ascii_case(keyword))
                    {
                        warn!(
                            keyword = %keyword,
                            first = %first.name,
                            second = %second.name,
                            "keyword appears in more than one category; first match wins"
                        );
                        overlaps.push(KeywordOverlap {
                            keyword: keyword.clone(),
                            first_category: first.name.clone(),
                            second_category: second.name.clone(),
                        });
                    }
                }
            }
        }
        overlaps
    }
}

fn category(name: &str, keywords: &[&str]) -> Category {
    Category {
        name: name.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// The keyword table used in practice. "ZARYA" is claimed by both the
/// scientific and space-station lists; the declared order keeps it
/// scientific and `validate` reports the overlap.
pub fn default_table() -> CategoryTable {
    CategoryTable::new(vec![
        category("communication", &["COM", "SATCOM", "TEL", "INTELSAT"]),
        category("earth_observation", &["LANDSAT", "EOS", "RESURS", "EROS"]),
        category("navigation", &["GPS", "GLONASS", "GALILEO", "BEIDOU"]),
        category(
            "scientific",
            &["SCI", "EXPLORER", "OBSERVATORY", "ASTRO", "ZARYA"],
        ),
        category("military", &["MIL", "USA", "NROL", "KH"]),
        category("cubesat", &["CUBESAT", "1U", "2U", "3U", "NANOSAT"]),
        category("space_station", &["ISS", "ZARYA", "TIANGONG", "STATION"]),
    ])
}
