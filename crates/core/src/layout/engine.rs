//! The trait seam standing in for "the hierarchical layout library"
//! (spec §4.5, §6 "External interfaces"). A real integration would hand
//! this off to an out-of-process or WASM layout engine; [`super::default::DefaultLayoutEngine`]
//! is a small deterministic stand-in so the crate runs standalone.

use indexmap::IndexMap;

use crate::coord::Point;
use crate::domain::{EdgeId, NodeId};

use super::error::LayoutError;

/// A direct child of the scope being laid out, sized in the engine's own
/// integer-ish units (pixels already divided by the grid size).
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub id: NodeId,
    pub w: f64,
    pub h: f64,
}

/// An edge between two of the scope's direct children, used only to bias
/// the layout engine's ordering/routing; edges crossing outside the
/// scope are never passed in.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutEdgeRef {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
}

/// Engine-wide knobs that affect a single layout run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Container padding, in the engine's own units.
    pub padding: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInput {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdgeRef>,
    pub options: LayoutOptions,
}

/// What the engine hands back: each direct child's position relative to
/// the container's origin, and routing waypoints per edge, all in the
/// same units as the input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutOutput {
    pub positions: IndexMap<NodeId, Point>,
    pub routing: IndexMap<EdgeId, Vec<Point>>,
}

pub trait LayoutEngine {
    fn layout(&self, input: LayoutInput) -> Result<LayoutOutput, LayoutError>;
}
