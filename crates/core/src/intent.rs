//! Edit intents: the closed set of mutations the orchestrator accepts
//! (spec §3 "EditIntent", §9 redesign flag replacing string-tagged
//! actions with a typed sum).

use serde::{Deserialize, Serialize};

use crate::coord::Point;
use crate::domain::{EdgeData, EdgeId, NodeData, NodeId};
use crate::policy::IntentOrigin;
use crate::viewstate::LayoutMode;

/// Geometry-only edits: they never touch the Domain and never trigger
/// hierarchical layout (spec §4.4, §9 `GeoOnly`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GeoOnlyIntent {
    MoveNode { id: NodeId, to: Point },
    ResizeNode { id: NodeId, w: f64, h: f64 },
    SetEdgeWaypoints { id: EdgeId, waypoints: Vec<Point> },
    SetEdgeHandles {
        id: EdgeId,
        source_handle: Option<String>,
        target_handle: Option<String>,
    },
}

/// Structural edits that are free to run hierarchical layout or not,
/// depending on [`crate::policy::decide_layout`] (spec §9 `FreeStructural`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FreeStructuralIntent {
    /// `at` is required: spec §4.11 "validate position is supplied (else fail)".
    AddNode { id: NodeId, parent: NodeId, at: Point, data: NodeData },
    AddEdge { id: EdgeId, source: NodeId, target: NodeId, data: EdgeData },
    DeleteNode { id: NodeId },
    DeleteEdge { id: EdgeId },
    MoveNodeTree { id: NodeId, new_parent: NodeId },
    GroupNodes { ids: Vec<NodeId>, parent: NodeId, new_group_id: NodeId },
    UngroupNode { group_id: NodeId },
    SetLayoutMode { scope: NodeId, mode: LayoutMode },
}

/// Structural edits issued on behalf of an AI agent: these always run
/// layout regardless of lock state (spec §4.4 `origin === "agent"`,
/// §9 `AiLockStructural`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AiLockStructuralIntent {
    /// `at` seeds ViewState before layout runs and overwrites it; unlike
    /// the free-structural variant it may be absent (hierarchical layout
    /// always resolves a final position).
    AddNode { id: NodeId, parent: NodeId, at: Option<Point>, data: NodeData },
    AddEdge { id: EdgeId, source: NodeId, target: NodeId, data: EdgeData },
    DeleteNode { id: NodeId },
    MoveNodeTree { id: NodeId, new_parent: NodeId },
    GroupNodes { ids: Vec<NodeId>, parent: NodeId, new_group_id: NodeId },
    UngroupNode { group_id: NodeId },
}

/// The full edit-intent sum type the orchestrator dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditIntent {
    GeoOnly(GeoOnlyIntent),
    FreeStructural(FreeStructuralIntent),
    AiLockStructural(AiLockStructuralIntent),
}

impl EditIntent {
    /// The intent's origin, for [`crate::policy::decide_layout`]. Geometry
    /// edits never run layout, so their origin is moot but reported as
    /// `User` for uniformity.
    pub fn origin(&self) -> IntentOrigin {
        match self {
            EditIntent::GeoOnly(_) => IntentOrigin::User,
            EditIntent::FreeStructural(_) => IntentOrigin::User,
            EditIntent::AiLockStructural(_) => IntentOrigin::Agent,
        }
    }

    /// The group scope a structural edit should run layout against, if
    /// any (spec §4.4's `scope` argument to `classifyEdit`).
    pub fn scope(&self, domain: &crate::domain::Domain) -> Option<NodeId> {
        let resolve = |id: &NodeId| domain.find_parent(id).cloned().unwrap_or_else(NodeId::root);
        match self {
            EditIntent::GeoOnly(_) => None,
            EditIntent::FreeStructural(s) => Some(match s {
                FreeStructuralIntent::AddNode { parent, .. } => parent.clone(),
                FreeStructuralIntent::AddEdge { source, target, .. } => domain.find_lcg(&[source.clone(), target.clone()]),
                FreeStructuralIntent::DeleteNode { id } => resolve(id),
                FreeStructuralIntent::DeleteEdge { .. } => NodeId::root(),
                FreeStructuralIntent::MoveNodeTree { new_parent, .. } => new_parent.clone(),
                FreeStructuralIntent::GroupNodes { parent, .. } => parent.clone(),
                FreeStructuralIntent::UngroupNode { group_id } => resolve(group_id),
                FreeStructuralIntent::SetLayoutMode { scope, .. } => scope.clone(),
            }),
            EditIntent::AiLockStructural(s) => Some(match s {
                AiLockStructuralIntent::AddNode { parent, .. } => parent.clone(),
                AiLockStructuralIntent::AddEdge { source, target, .. } => domain.find_lcg(&[source.clone(), target.clone()]),
                AiLockStructuralIntent::DeleteNode { id } => resolve(id),
                AiLockStructuralIntent::MoveNodeTree { new_parent, .. } => new_parent.clone(),
                AiLockStructuralIntent::GroupNodes { parent, .. } => parent.clone(),
                AiLockStructuralIntent::UngroupNode { group_id } => resolve(group_id),
            }),
        }
    }
}
