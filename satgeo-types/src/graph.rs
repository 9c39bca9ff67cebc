use crate::{elements::RawElementSet, geodetic::GeodeticPosition};
use serde::{Deserialize, Serialize};

/// Catalog attributes attached to an object by the metadata store.
///
/// Absent attributes are represented as `None`; they match
/// unconstrained filter fields and an explicit "Unknown" constraint.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ObjectAttributes {
    pub manufacturer: Option<String>,
    pub orbit_class: Option<String>,
    pub constellation: Option<String>,
    pub country: Option<String>,
}

/// A typed outgoing relationship to another named object
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Relation {
    pub kind: String,
    pub target: String,
}

/// One object as fetched from the metadata store
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ObjectRecord {
    pub name: String,
    #[serde(default)]
    pub attributes: ObjectAttributes,
    /// Element lines, when the store has them; objects without element
    /// lines still appear in the graph as metadata-only nodes
    #[serde(default)]
    pub element_lines: Option<RawElementSet>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

/// Node shape: `{id, lat?, lon?, alt?, attributes...}`
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(flatten)]
    pub position: Option<GeodeticPosition>,
    #[serde(flatten)]
    pub attributes: ObjectAttributes,
}

/// Edge shape: `{source, target, type}`
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A filtered node/edge view over the metadata store
#[derive(Clone, Default, PartialEq, Debug, Serialize)]
pub struct GraphView {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}
