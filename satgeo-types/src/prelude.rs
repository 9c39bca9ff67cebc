pub use crate::congestion::{
    BandMember, BandOccupancy, CongestionLevel, CongestionSnapshot, RegimeBand,
};
pub use crate::elements::RawElementSet;
pub use crate::geodetic::GeodeticPosition;
pub use crate::graph::{
    GraphEdge, GraphNode, GraphView, ObjectAttributes, ObjectRecord, Relation,
};
pub use crate::observer::ObserverLocation;
pub use crate::state::StateVector;
pub use crate::visibility::{VisibilityEvent, VisibilityEventKind};
