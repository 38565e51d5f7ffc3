//! ViewState: the authoritative geometry store (spec §3, §4.3).
//!
//! Keyed by the same ids as the Domain. Owns absolute world positions,
//! sizes, waypoints, handle assignments, and per-group layout mode.
//! Provides the single mechanism ([`ViewState::clean`]) that enforces the
//! no-ghost / no-invisible layer-sync invariant after any structural
//! Domain change.

mod error;
mod types;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::coord::Rect;
use crate::domain::{Domain, EdgeId, NodeId};

pub use error::ViewStateError;
pub use types::{EdgeGeometry, GroupGeometry, LayoutMode, NodeGeometry, Side};

/// A group's layout discipline entry (spec §3 `layout[groupId] = {mode}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutEntry {
    pub mode: LayoutMode,
}

/// The process-wide authoritative geometry store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(with = "indexmap::map::serde_seq")]
    pub node: IndexMap<NodeId, NodeGeometry>,
    #[serde(with = "indexmap::map::serde_seq")]
    pub group: IndexMap<NodeId, GroupGeometry>,
    #[serde(with = "indexmap::map::serde_seq")]
    pub edge: IndexMap<EdgeId, EdgeGeometry>,
    #[serde(with = "indexmap::map::serde_seq")]
    pub layout: IndexMap<NodeId, LayoutEntry>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new ViewState containing only entries whose id exists in
    /// `domain` — the single mechanism enforcing the no-ghost invariant
    /// (spec §4.3).
    pub fn clean(&self, domain: &Domain) -> ViewState {
        ViewState {
            node: self
                .node
                .iter()
                .filter(|(id, _)| domain.contains_node(id))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            group: self
                .group
                .iter()
                .filter(|(id, _)| domain.contains_node(id))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            edge: self
                .edge
                .iter()
                .filter(|(id, _)| domain.contains_edge(id))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            layout: self
                .layout
                .iter()
                .filter(|(id, _)| domain.contains_node(id))
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }

    /// Preserves the world position of a moved node across a reparent.
    ///
    /// ViewState stores **absolute world coordinates** (spec §3 "Absolute
    /// coordinates"), so a node's stored geometry already encodes its
    /// world position and a reparent never needs to touch it — this is
    /// the identity transform spec §4.3 describes for consumers that
    /// don't store relative coordinates. Kept as an explicit step so
    /// `Orchestrator::apply`'s `move-node` handler reads the same as
    /// spec §4.11, and so property tests can assert the no-op directly.
    pub fn adjust_for_reparent(&mut self, _node_id: &NodeId, _old_parent: &NodeId, _new_parent: &NodeId) {}

    /// In development, a missing geometry entry is a bug; in production it
    /// is logged and papered over with a zero rect (spec §4.3, §7).
    pub fn require_geometry(&self, id: &NodeId) -> Result<Rect, ViewStateError> {
        if let Some(n) = self.node.get(id) {
            return Ok(n.rect());
        }
        if let Some(g) = self.group.get(id) {
            return Ok(g.rect());
        }
        Err(ViewStateError::MissingGeometry(id.clone()))
    }

    pub fn require_geometry_or_zero(&self, id: &NodeId) -> Rect {
        match self.require_geometry(id) {
            Ok(r) => r,
            Err(e) => {
                if cfg!(debug_assertions) {
                    panic!("{e}");
                }
                tracing::warn!(error = %e, "missing geometry; using zero rect");
                Rect::zero()
            }
        }
    }

    pub fn set_mode(&mut self, group_id: &NodeId, mode: LayoutMode) {
        self.layout.insert(group_id.clone(), LayoutEntry { mode });
    }

    pub fn get_mode(&self, group_id: &NodeId) -> LayoutMode {
        self.layout.get(group_id).map(|e| e.mode).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Point;
    use crate::domain::NodeData;
    use pretty_assertions::assert_eq;

    #[test]
    fn clean_drops_ghost_entries() {
        let domain = Domain::new().add_node("a", &NodeId::root(), NodeData::default()).unwrap();
        let mut vs = ViewState::new();
        vs.node.insert("a".into(), NodeGeometry::new(Point::new(0.0, 0.0), 96.0, 96.0));
        vs.node.insert("ghost".into(), NodeGeometry::new(Point::new(1.0, 1.0), 96.0, 96.0));

        let cleaned = vs.clean(&domain);
        assert_eq!(cleaned.node.len(), 1);
        assert!(cleaned.node.contains_key(&NodeId::from("a")));
    }

    #[test]
    fn default_mode_is_free() {
        let vs = ViewState::new();
        assert_eq!(vs.get_mode(&"g1".into()), LayoutMode::Free);
    }

    #[test]
    fn reparent_adjust_is_identity_on_absolute_coords() {
        let mut vs = ViewState::new();
        vs.node.insert("a".into(), NodeGeometry::new(Point::new(500.0, 500.0), 96.0, 96.0));
        vs.adjust_for_reparent(&"a".into(), &"old".into(), &"new".into());
        assert_eq!(vs.node.get(&NodeId::from("a")).unwrap().top_left(), Point::new(500.0, 500.0));
    }
}
