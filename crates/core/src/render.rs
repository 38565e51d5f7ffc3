//! The renderer projector: a pure `(domain, vs) → {renderNodes, renderEdges}`
//! function (spec §4.9).

use crate::coord::Rect;
use crate::domain::{Domain, EdgeId, Kind, NodeId};
use crate::viewstate::ViewState;

/// One node handed to the renderer. No parent nesting: `rect` is always
/// an absolute world rectangle, and the renderer never nests children
/// under a group's DOM element.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    pub id: NodeId,
    pub rect: Rect,
    pub is_group: bool,
}

/// An edge's routing type, mirroring the renderer's "step" edge kind
/// (spec §4.9: "type = step").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderEdgeType {
    Step,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub edge_type: RenderEdgeType,
    pub waypoints: Option<Vec<crate::coord::Point>>,
}

/// Projects the current `(domain, vs)` pair into the flat render model.
///
/// Emits one [`RenderNode`] for every domain id present in `vs.node` or
/// `vs.group`; ids lacking ViewState are skipped (invariant §3 guarantees
/// there are none right after `Orchestrator::apply`, but a defensive
/// projector costs nothing and never panics on a half-applied state).
pub fn project(domain: &Domain, vs: &ViewState) -> (Vec<RenderNode>, Vec<RenderEdge>) {
    let mut nodes = Vec::new();
    for id in domain.node_ids() {
        let has_geometry = vs.node.contains_key(id) || vs.group.contains_key(id);
        if !has_geometry {
            continue;
        }
        let rect = vs
            .node
            .get(id)
            .map(|g| g.rect())
            .or_else(|| vs.group.get(id).map(|g| g.rect()))
            .unwrap_or_else(Rect::zero);
        let domain_node = domain.find_node_by_id(id);
        let is_group = matches!(domain.kind(id), Kind::Group)
            || domain_node.map(|n| n.data.is_group).unwrap_or(false)
            || domain_node.map(|n| !n.edges.is_empty()).unwrap_or(false);
        nodes.push(RenderNode {
            id: id.clone(),
            rect,
            is_group,
        });
    }

    let mut edges = Vec::new();
    for e in domain.edges() {
        let waypoints = vs
            .edge
            .get(&e.id)
            .and_then(|g| g.waypoints.clone())
            .filter(|wps| wps.len() >= 2 && crate::coord::is_orthogonal_polyline(wps));
        edges.push(RenderEdge {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
            edge_type: RenderEdgeType::Step,
            waypoints,
        });
    }

    (nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Point;
    use crate::domain::{EdgeData, NodeData};
    use crate::viewstate::NodeGeometry;
    use pretty_assertions::assert_eq;

    #[test]
    fn skips_domain_ids_without_viewstate() {
        let domain = Domain::new()
            .add_node("a", &NodeId::root(), NodeData::default())
            .unwrap()
            .add_node("ghost", &NodeId::root(), NodeData::default())
            .unwrap();
        let mut vs = ViewState::new();
        vs.node.insert("a".into(), NodeGeometry::new(Point::new(0.0, 0.0), 96.0, 96.0));

        let (nodes, _) = project(&domain, &vs);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, NodeId::from("a"));
    }

    #[test]
    fn group_flag_derives_from_children_flag_or_edges() {
        let domain = Domain::new()
            .add_node("g1", &NodeId::root(), NodeData { is_group: true, ..Default::default() })
            .unwrap();
        let mut vs = ViewState::new();
        vs.node.insert("g1".into(), NodeGeometry::new(Point::new(0.0, 0.0), 480.0, 320.0));

        let (nodes, _) = project(&domain, &vs);
        assert!(nodes[0].is_group);
    }

    #[test]
    fn non_orthogonal_waypoints_fall_back_to_none() {
        let domain = Domain::new()
            .add_node("a", &NodeId::root(), NodeData::default())
            .unwrap()
            .add_node("b", &NodeId::root(), NodeData::default())
            .unwrap()
            .add_edge("e1", &"a".into(), &"b".into(), EdgeData::default())
            .unwrap();
        let mut vs = ViewState::new();
        vs.node.insert("a".into(), NodeGeometry::new(Point::new(0.0, 0.0), 96.0, 96.0));
        vs.node.insert("b".into(), NodeGeometry::new(Point::new(100.0, 100.0), 96.0, 96.0));
        vs.edge.insert(
            "e1".into(),
            crate::viewstate::EdgeGeometry {
                waypoints: Some(vec![Point::new(0.0, 0.0), Point::new(40.4, 40.0)]),
                ..Default::default()
            },
        );

        let (_, edges) = project(&domain, &vs);
        assert_eq!(edges[0].waypoints, None);
    }
}
