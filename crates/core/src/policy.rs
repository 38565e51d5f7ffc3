//! Policy: pure decisions about when hierarchical layout runs and which
//! scope it runs on (spec §4.4).

use crate::domain::{Domain, NodeId};
use crate::viewstate::{LayoutMode, ViewState};

/// Where an intent originated (spec §3 EditIntent `origin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOrigin {
    User,
    Agent,
}

/// `decideLayout`: true iff origin is agent, or the scope (or any
/// ancestor) is LOCK.
pub fn decide_layout(origin: IntentOrigin, scope: &NodeId, domain: &Domain, vs: &ViewState) -> bool {
    if origin == IntentOrigin::Agent {
        return true;
    }
    let mut cur = Some(scope.clone());
    while let Some(id) = cur {
        if vs.get_mode(&id) == LayoutMode::Lock {
            return true;
        }
        cur = domain.find_parent(&id).cloned();
    }
    false
}

/// `findHighestLockedAncestor`: walks up from `scope` and returns the
/// closest-to-root ancestor whose mode is LOCK, else `None`.
///
/// `scope` itself is included in the walk: a LOCK scope with no locked
/// ancestors resolves to itself.
pub fn find_highest_locked_ancestor(scope: &NodeId, domain: &Domain, vs: &ViewState) -> Option<NodeId> {
    let mut highest = None;
    let mut cur = Some(scope.clone());
    while let Some(id) = cur {
        if vs.get_mode(&id) == LayoutMode::Lock {
            highest = Some(id.clone());
        }
        cur = domain.find_parent(&id).cloned();
    }
    highest
}

/// The outcome of classifying an edit intent (spec §4.4 `classifyEdit`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEdit {
    pub should_run_layout: bool,
    pub resolved_scope: NodeId,
}

/// Classify an edit: decide whether hierarchical layout runs, and resolve
/// the scope it should run on (the highest locked ancestor when layout
/// runs, otherwise the original scope).
pub fn classify_edit(origin: IntentOrigin, scope: &NodeId, domain: &Domain, vs: &ViewState) -> ClassifiedEdit {
    let should_run_layout = decide_layout(origin, scope, domain, vs);
    let resolved_scope = if should_run_layout {
        find_highest_locked_ancestor(scope, domain, vs).unwrap_or_else(|| scope.clone())
    } else {
        scope.clone()
    };
    ClassifiedEdit {
        should_run_layout,
        resolved_scope,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeData;
    use pretty_assertions::assert_eq;

    fn root() -> NodeId {
        NodeId::root()
    }

    #[test]
    fn agent_origin_always_runs_layout() {
        let domain = Domain::new().add_node("g1", &root(), NodeData::default()).unwrap();
        let vs = ViewState::new();
        assert!(decide_layout(IntentOrigin::Agent, &"g1".into(), &domain, &vs));
    }

    #[test]
    fn user_origin_runs_layout_only_when_locked() {
        let domain = Domain::new().add_node("g1", &root(), NodeData::default()).unwrap();
        let mut vs = ViewState::new();
        assert!(!decide_layout(IntentOrigin::User, &"g1".into(), &domain, &vs));
        vs.set_mode(&"g1".into(), LayoutMode::Lock);
        assert!(decide_layout(IntentOrigin::User, &"g1".into(), &domain, &vs));
    }

    #[test]
    fn resolved_scope_is_highest_locked_ancestor() {
        let domain = Domain::new()
            .add_node("outer", &root(), NodeData::default())
            .unwrap()
            .add_node("inner", &"outer".into(), NodeData::default())
            .unwrap();
        let mut vs = ViewState::new();
        vs.set_mode(&"outer".into(), LayoutMode::Lock);
        vs.set_mode(&"inner".into(), LayoutMode::Lock);

        let classified = classify_edit(IntentOrigin::User, &"inner".into(), &domain, &vs);
        assert!(classified.should_run_layout);
        assert_eq!(classified.resolved_scope, NodeId::from("outer"));
    }

    #[test]
    fn free_scope_resolves_to_itself_when_not_run() {
        let domain = Domain::new().add_node("g1", &root(), NodeData::default()).unwrap();
        let vs = ViewState::new();
        let classified = classify_edit(IntentOrigin::User, &"g1".into(), &domain, &vs);
        assert!(!classified.should_run_layout);
        assert_eq!(classified.resolved_scope, NodeId::from("g1"));
    }
}
