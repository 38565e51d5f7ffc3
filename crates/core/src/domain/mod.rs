//! The structural Domain graph (spec §3, §4.2).
//!
//! The Domain owns nodes, groups, and edges — hierarchy only, no
//! geometry. Geometry lives in [`crate::viewstate`].

mod error;
mod graph;
mod ids;

pub use error::DomainError;
pub use graph::{Domain, DomainEdgeRecord, DomainNode, EdgeData, NodeData};
pub use ids::{EdgeId, Kind, NodeId};
