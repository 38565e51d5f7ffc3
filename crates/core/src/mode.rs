//! Mode handlers: toggling a group scope between LOCK and FREE layout
//! discipline (spec §4.7).

use std::collections::HashSet;

use crate::domain::{Domain, NodeId};
use crate::viewstate::{EdgeGeometry, LayoutMode, ViewState};

/// `unlockScopeToFree`: sets `scopeGroupId` and every descendant group's
/// mode to FREE, and clears any LOCK-inferred routing override on edges
/// touching a descendant node by setting an explicit FREE override.
/// Existing waypoints are left untouched — they're only cleared lazily
/// on the next position update, so an edge doesn't snap mid-transition.
///
/// A touched edge with no prior `ViewState` entry has its handles seeded
/// from the Domain's `EdgeData` (spec §4.7 "merging preserved handles
/// from ViewState, else from domain edge data") rather than left blank,
/// so the handle assignment survives the lock/unlock round-trip.
pub fn unlock_scope_to_free(scope_group_id: &NodeId, domain: &Domain, vs: &ViewState) -> ViewState {
    let mut out = vs.clone();
    for group in domain.descendant_groups(scope_group_id) {
        out.set_mode(&group, LayoutMode::Free);
    }

    let touched = touched_node_ids(scope_group_id, domain);
    for edge_id in domain.edges_touching(&touched) {
        let mut entry = out.edge.get(&edge_id).cloned().unwrap_or_else(|| {
            let (source_handle, target_handle) = domain
                .get_edge(&edge_id)
                .map(|e| (e.data.source_handle.clone(), e.data.target_handle.clone()))
                .unwrap_or_default();
            EdgeGeometry { source_handle, target_handle, ..Default::default() }
        });
        entry.routing_mode = Some(LayoutMode::Free);
        out.edge.insert(edge_id, entry);
    }
    out
}

/// `lockScopeAndDescendants`: sets `scopeGroupId` and every descendant
/// group's mode to LOCK, and clears any FREE override on edges touching
/// a descendant node so the owning LCG group's mode governs them again.
pub fn lock_scope_and_descendants(scope_group_id: &NodeId, domain: &Domain, vs: &ViewState) -> ViewState {
    let mut out = vs.clone();
    for group in domain.descendant_groups(scope_group_id) {
        out.set_mode(&group, LayoutMode::Lock);
    }

    let touched = touched_node_ids(scope_group_id, domain);
    for edge_id in domain.edges_touching(&touched) {
        if let Some(entry) = out.edge.get_mut(&edge_id) {
            entry.routing_mode = None;
        }
    }
    out
}

fn touched_node_ids(scope_group_id: &NodeId, domain: &Domain) -> HashSet<NodeId> {
    domain.subtree_ids(scope_group_id)
}

/// The effective routing mode for an edge at render time: an explicit
/// override wins, otherwise the mode of the LCG group that owns it
/// (spec §4.7 "Policy for an edge's effective routing mode").
pub fn effective_routing_mode(edge_container: &NodeId, vs: &ViewState, edge_override: Option<LayoutMode>) -> LayoutMode {
    edge_override.unwrap_or_else(|| vs.get_mode(edge_container))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EdgeData, NodeData};
    use pretty_assertions::assert_eq;

    fn root() -> NodeId {
        NodeId::root()
    }

    fn sample() -> (Domain, ViewState) {
        let domain = Domain::new()
            .add_node("g1", &root(), NodeData { is_group: true, ..Default::default() })
            .unwrap()
            .add_node("n1", &"g1".into(), NodeData::default())
            .unwrap()
            .add_node("n2", &"g1".into(), NodeData::default())
            .unwrap()
            .add_edge("e1", &"n1".into(), &"n2".into(), EdgeData::default())
            .unwrap();
        let mut vs = ViewState::new();
        vs.set_mode(&"g1".into(), LayoutMode::Lock);
        vs.edge.insert("e1".into(), EdgeGeometry { waypoints: Some(vec![]), ..Default::default() });
        (domain, vs)
    }

    #[test]
    fn unlock_sets_free_and_overrides_touching_edges() {
        let (domain, vs) = sample();
        let out = unlock_scope_to_free(&"g1".into(), &domain, &vs);
        assert_eq!(out.get_mode(&"g1".into()), LayoutMode::Free);
        assert_eq!(out.edge.get(&crate::domain::EdgeId::from("e1")).unwrap().routing_mode, Some(LayoutMode::Free));
        assert!(out.edge.get(&crate::domain::EdgeId::from("e1")).unwrap().waypoints.is_some());
    }

    #[test]
    fn unlock_seeds_handles_from_domain_when_no_prior_viewstate_entry() {
        let domain = Domain::new()
            .add_node("g1", &root(), NodeData { is_group: true, ..Default::default() })
            .unwrap()
            .add_node("n1", &"g1".into(), NodeData::default())
            .unwrap()
            .add_node("n2", &"g1".into(), NodeData::default())
            .unwrap()
            .add_edge(
                "e1",
                &"n1".into(),
                &"n2".into(),
                EdgeData { source_handle: Some("right".into()), target_handle: Some("left".into()) },
            )
            .unwrap();
        let mut vs = ViewState::new();
        vs.set_mode(&"g1".into(), LayoutMode::Lock);
        // No `vs.edge` entry for "e1" at all.

        let out = unlock_scope_to_free(&"g1".into(), &domain, &vs);
        let entry = out.edge.get(&crate::domain::EdgeId::from("e1")).unwrap();
        assert_eq!(entry.source_handle.as_deref(), Some("right"));
        assert_eq!(entry.target_handle.as_deref(), Some("left"));
        assert_eq!(entry.routing_mode, Some(LayoutMode::Free));
    }

    #[test]
    fn lock_clears_free_override() {
        let (domain, vs) = sample();
        let unlocked = unlock_scope_to_free(&"g1".into(), &domain, &vs);
        let relocked = lock_scope_and_descendants(&"g1".into(), &domain, &unlocked);
        assert_eq!(relocked.get_mode(&"g1".into()), LayoutMode::Lock);
        assert_eq!(relocked.edge.get(&crate::domain::EdgeId::from("e1")).unwrap().routing_mode, None);
    }
}
