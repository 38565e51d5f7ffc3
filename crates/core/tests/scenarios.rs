//! End-to-end scenarios run through the `Orchestrator`, one per named
//! scenario from the canvas's testable-properties list.
//!
//! All positions below are multiples of the default grid size (16.0) so
//! the assertions check identity, not rounding.

use canvas_core::layout::DefaultLayoutEngine;
use canvas_core::router::DefaultRouterEngine;
use canvas_core::{
    CanvasConfig, Domain, EditIntent, FreeStructuralIntent, MemoryStore, NodeData, NodeId, NullRenderSink,
    Orchestrator, Point, Snapshot, SnapshotStore,
};
use pretty_assertions::assert_eq;

fn orchestrator() -> Orchestrator {
    Orchestrator::new(
        CanvasConfig::default(),
        Box::new(DefaultLayoutEngine::default()),
        Box::new(DefaultRouterEngine::new()),
        Box::new(NullRenderSink),
    )
}

fn add_node(id: &str, at: Point) -> EditIntent {
    EditIntent::FreeStructural(FreeStructuralIntent::AddNode {
        id: id.into(),
        parent: NodeId::root(),
        at,
        data: NodeData::default(),
    })
}

fn delete_node(id: &str) -> EditIntent {
    EditIntent::FreeStructural(FreeStructuralIntent::DeleteNode { id: id.into() })
}

/// S1 — layer sync under multi-add/multi-delete.
#[test]
fn s1_layer_sync_under_add_and_delete() {
    let mut orch = orchestrator();
    orch.apply(add_node("n1", Point::new(96.0, 96.0))).unwrap();
    orch.apply(add_node("n2", Point::new(192.0, 96.0))).unwrap();
    orch.apply(add_node("n3", Point::new(288.0, 96.0))).unwrap();

    assert_eq!(orch.domain().children(&NodeId::root()).len(), 3);
    assert_eq!(orch.view_state().node.len(), 3);
    let (nodes, _) = canvas_core::render::project(orch.domain(), orch.view_state());
    assert_eq!(nodes.len(), 3);

    orch.apply(delete_node("n2")).unwrap();

    let children: Vec<&str> = orch.domain().children(&NodeId::root()).iter().map(|id| id.as_str()).collect();
    assert_eq!(children, vec!["n1", "n3"]);
    assert_eq!(
        orch.view_state().node.keys().map(|id| id.as_str()).collect::<Vec<_>>(),
        vec!["n1", "n3"]
    );
    let (nodes, _) = canvas_core::render::project(orch.domain(), orch.view_state());
    assert_eq!(nodes.len(), 2);
    let n1 = orch.view_state().node.get(&NodeId::from("n1")).unwrap();
    assert_eq!((n1.x, n1.y), (96.0, 96.0));
    let n3 = orch.view_state().node.get(&NodeId::from("n3")).unwrap();
    assert_eq!((n3.x, n3.y), (288.0, 96.0));
}

/// S2 — multi-select delete invariance.
#[test]
fn s2_multi_select_delete_invariance() {
    let mut orch = orchestrator();
    for (i, id) in ["n1", "n2", "n3", "n4", "n5"].iter().enumerate() {
        orch.apply(add_node(id, Point::new(96.0 * (i as f64 + 1.0), 0.0))).unwrap();
    }
    for id in ["n2", "n3", "n4"] {
        orch.apply(delete_node(id)).unwrap();
    }

    let children: Vec<&str> = orch.domain().children(&NodeId::root()).iter().map(|id| id.as_str()).collect();
    assert_eq!(children, vec!["n1", "n5"]);
    assert_eq!(
        orch.view_state().node.keys().map(|id| id.as_str()).collect::<Vec<_>>(),
        vec!["n1", "n5"]
    );
}

/// S3 — ghost prevention on add-after-delete.
#[test]
fn s3_ghost_prevention_on_add_after_delete() {
    let mut orch = orchestrator();
    orch.apply(add_node("n1", Point::new(0.0, 0.0))).unwrap();
    orch.apply(add_node("n2", Point::new(96.0, 0.0))).unwrap();
    orch.apply(add_node("n3", Point::new(192.0, 0.0))).unwrap();
    for id in ["n1", "n2", "n3"] {
        orch.apply(delete_node(id)).unwrap();
    }
    orch.apply(add_node("fresh", Point::new(496.0, 496.0))).unwrap();

    assert_eq!(orch.domain().node_ids().count(), 1);
    assert_eq!(
        orch.view_state().node.keys().map(|id| id.as_str()).collect::<Vec<_>>(),
        vec!["fresh"]
    );
    let (nodes, _) = canvas_core::render::project(orch.domain(), orch.view_state());
    assert_eq!(nodes.len(), 1);
}

/// S4 — position stability: inserting B must not disturb A's position.
#[test]
fn s4_position_stability_across_inserts() {
    let mut orch = orchestrator();
    orch.apply(add_node("a", Point::new(128.0, 448.0))).unwrap();
    orch.apply(add_node("b", Point::new(784.0, 96.0))).unwrap();

    let a = orch.view_state().node.get(&NodeId::from("a")).unwrap();
    assert_eq!((a.x, a.y), (128.0, 448.0));
}

/// S5 — persistence round-trip; the snapshot's presence blocks a URL load.
#[test]
fn s5_persistence_round_trip() {
    let mut orch = orchestrator();
    orch.apply(add_node("n1", Point::new(160.0, 192.0))).unwrap();
    orch.apply(add_node("n2", Point::new(352.0, 304.0))).unwrap();

    let mut store = MemoryStore::new();
    let snapshot = orch.snapshot(NodeId::root(), 1_000);
    store.save(&snapshot).unwrap();

    // Simulate "clear all refs": a fresh orchestrator restored from the store.
    let mut restored = orchestrator();
    let loaded: Snapshot = store.load().unwrap().unwrap();
    let expected_domain = orch.domain().clone();
    let expected_vs = orch.view_state().clone();
    restored.restore(loaded);

    assert_eq!(restored.domain().node_ids().count(), expected_domain.node_ids().count());
    assert_eq!(restored.view_state().node.len(), expected_vs.node.len());
    let (orig_nodes, _) = canvas_core::render::project(&expected_domain, &expected_vs);
    let (restored_nodes, _) = canvas_core::render::project(restored.domain(), restored.view_state());
    assert_eq!(orig_nodes, restored_nodes);

    assert!(canvas_core::persistence::blocks_url_load(
        &store,
        std::time::Duration::from_secs(24 * 3600),
        1_010
    ));
}

/// S6 — LCG edge residence: an edge relocates to its new LCG on reparent.
#[test]
fn s6_lcg_edge_residence_relocates_on_reparent() {
    let mut orch = orchestrator();
    orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::AddNode {
        id: "g1".into(),
        parent: NodeId::root(),
        at: Point::new(0.0, 0.0),
        data: NodeData { is_group: true, ..Default::default() },
    }))
    .unwrap();
    orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::AddNode {
        id: "n1".into(),
        parent: "g1".into(),
        at: Point::new(16.0, 16.0),
        data: NodeData::default(),
    }))
    .unwrap();
    orch.apply(add_node("n2", Point::new(496.0, 496.0))).unwrap();
    orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::AddEdge {
        id: "e1".into(),
        source: "n1".into(),
        target: "n2".into(),
        data: Default::default(),
    }))
    .unwrap();

    let root_edges = &orch.domain().find_node_by_id(&NodeId::root()).unwrap().edges;
    assert!(root_edges.contains(&"e1".into()));

    orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::MoveNodeTree {
        id: "n2".into(),
        new_parent: "g1".into(),
    }))
    .unwrap();

    let root_edges = &orch.domain().find_node_by_id(&NodeId::root()).unwrap().edges;
    assert!(!root_edges.contains(&"e1".into()));
    let g1_edges = &orch.domain().find_node_by_id(&"g1".into()).unwrap().edges;
    assert!(g1_edges.contains(&"e1".into()));
}

/// Verifies the shared-namespace invariant directly: a node id cannot be
/// reused, even for what would otherwise be a distinct edge id.
#[test]
fn node_and_edge_ids_share_one_namespace() {
    let domain = Domain::new().add_node("shared", &NodeId::root(), NodeData::default()).unwrap();
    let err = domain.add_node("shared", &NodeId::root(), NodeData::default()).unwrap_err();
    assert!(matches!(err, canvas_core::domain::DomainError::DuplicateId(id) if id == "shared"));
}
