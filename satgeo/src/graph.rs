//! Assembly of the filtered relationship graph, annotated with freshly
//! derived positions.

use chrono::{DateTime, Utc};
use satgeo_types::prelude::{GraphEdge, GraphNode, GraphView, ObjectAttributes};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::{
    geodetic::{self, DeriveError},
    store::{MetadataStore, StoreError},
    SkipReason,
};

/// Zero or more equality constraints over object attributes. `None`
/// means "match any value, including objects missing that attribute" —
/// structurally distinct from a filter on the empty string.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct GraphFilter {
    pub manufacturer: Option<String>,
    pub orbit_class: Option<String>,
    pub constellation: Option<String>,
    pub country: Option<String>,
}

impl GraphFilter {
    /// Normalize a boundary-layer wildcard token: empty and `"All"`
    /// both mean unconstrained
    pub fn normalize_token(token: Option<String>) -> Option<String> {
        token.filter(|t| !t.trim().is_empty() && !t.trim().eq_ignore_ascii_case("all"))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.manufacturer.is_none()
            && self.orbit_class.is_none()
            && self.constellation.is_none()
            && self.country.is_none()
    }

    pub fn matches(&self, attributes: &ObjectAttributes) -> bool {
        field_matches(&self.manufacturer, &attributes.manufacturer)
            && field_matches(&self.orbit_class, &attributes.orbit_class)
            && field_matches(&self.constellation, &attributes.constellation)
            && field_matches(&self.country, &attributes.country)
    }
}

/// The value the metadata feed uses for attributes it has no data for;
/// a constraint on it selects objects with the attribute absent
const ABSENT_ATTRIBUTE: &str = "Unknown";

fn field_matches(constraint: &Option<String>, value: &Option<String>) -> bool {
    match (constraint, value) {
        (None, _) => true,
        (Some(wanted), None) => wanted.eq_ignore_ascii_case(ABSENT_ATTRIBUTE),
        (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
    }
}

/// The assembled view plus per-record derivation skips
#[derive(Debug, Default)]
pub struct GraphAssembly {
    pub view: GraphView,
    pub skipped: Vec<SkipReason<DeriveError>>,
}

/// Fetch every object matching `filter`, derive a position for each one
/// that carries element lines, and build the node/edge view.
///
/// Nodes deduplicate by id with first occurrence winning; a later
/// duplicate never clears an already-computed position. Every edge
/// target is guaranteed a node: targets outside the fetch come back as
/// metadata-only placeholders rather than being silently dropped.
pub fn assemble(
    store: &dyn MetadataStore,
    filter: &GraphFilter,
    instant: DateTime<Utc>,
) -> Result<GraphAssembly, StoreError> {
    let records = store.fetch(filter)?;
    debug!(records = records.len(), "fetched metadata records");

    let mut nodes: BTreeMap<String, GraphNode> = BTreeMap::new();
    let mut edges = Vec::new();
    let mut skipped = Vec::new();

    for record in &records {
        if nodes.contains_key(&record.name) {
            // First occurrence wins
            continue;
        }

        let position = match &record.element_lines {
            Some(raw) => match geodetic::derive_one(raw, instant) {
                Ok(position) => Some(position),
                Err(error) => {
                    debug!(name = %record.name, %error, "graph node kept without position");
                    skipped.push(SkipReason {
                        name: record.name.clone(),
                        error,
                    });
                    None
                }
            },
            None => None,
        };

        nodes.insert(
            record.name.clone(),
            GraphNode {
                id: record.name.clone(),
                position,
                attributes: record.attributes.clone(),
            },
        );

        for relation in &record.relations {
            edges.push(GraphEdge {
                source: record.name.clone(),
                target: relation.target.clone(),
                kind: relation.kind.clone(),
            });
        }
    }

    // Relationship targets outside the fetched set still appear as
    // nodes so no edge dangles
    for edge in &edges {
        nodes.entry(edge.target.clone()).or_insert_with(|| GraphNode {
            id: edge.target.clone(),
            position: None,
            attributes: ObjectAttributes::default(),
        });
    }

    info!(
        nodes = nodes.len(),
        edges = edges.len(),
        skipped = skipped.len(),
        "graph assembled"
    );
    Ok(GraphAssembly {
        view: GraphView {
            nodes: nodes.into_values().collect(),
            edges,
        },
        skipped,
    })
}
