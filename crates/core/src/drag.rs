//! The drag subsystem: regular node drag, group drag with per-group
//! delta tracking, and reparent-on-drag containment detection (spec
//! §4.8).

use std::collections::HashMap;

use crate::config::CanvasConfig;
use crate::coord::{snap_point, Point, Rect};
use crate::domain::{Domain, Kind, NodeId};
use crate::viewstate::ViewState;

/// Tracks each in-progress group drag's previous-frame position, so a
/// group move can be expressed as a delta even when the renderer updates
/// `node.position` before the change callback fires.
#[derive(Default)]
pub struct DragTracker {
    previous: HashMap<NodeId, Point>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves this frame's delta and records `new_pos` as the next
    /// frame's previous position. Priority for the previous position:
    /// explicit tracker entry, then ViewState, then `new_pos` itself
    /// (delta zero on the first frame of a drag).
    fn delta_for(&mut self, group_id: &NodeId, new_pos: Point, vs: &ViewState) -> Point {
        let prev = self
            .previous
            .get(group_id)
            .copied()
            .or_else(|| vs.group.get(group_id).map(|g| g.top_left()))
            .unwrap_or(new_pos);
        self.previous.insert(group_id.clone(), new_pos);
        Point::new(new_pos.x - prev.x, new_pos.y - prev.y)
    }

    /// Called on drag end: the next drag of this group starts fresh.
    pub fn clear(&mut self, group_id: &NodeId) {
        self.previous.remove(group_id);
    }
}

pub(crate) fn geometry_rect(vs: &ViewState, id: &NodeId) -> Option<Rect> {
    vs.node
        .get(id)
        .map(|n| n.rect())
        .or_else(|| vs.group.get(id).map(|g| g.rect()))
}

/// Regular node drag: snap and overwrite `ViewState.node[id]`'s absolute
/// position. Returns the updated ViewState; the caller batches `id` into
/// a routing-update (spec §4.8 "Regular node drag").
pub fn drag_node(vs: &ViewState, config: &CanvasConfig, id: &NodeId, to: Point) -> ViewState {
    let mut out = vs.clone();
    let snapped = snap_point(to, config.grid_size);
    if let Some(n) = out.node.get_mut(id) {
        n.x = snapped.x;
        n.y = snapped.y;
    }
    out
}

/// Group drag: translates the group and every descendant with a
/// ViewState entry by the same delta. Returns the updated ViewState and
/// every id that moved (group first, then descendants in traversal
/// order) for the caller's routing-update batch.
pub fn drag_group(
    tracker: &mut DragTracker,
    domain: &Domain,
    vs: &ViewState,
    config: &CanvasConfig,
    group_id: &NodeId,
    to: Point,
) -> (ViewState, Vec<NodeId>) {
    let snapped = snap_point(to, config.grid_size);
    let delta = tracker.delta_for(group_id, snapped, vs);

    let mut out = vs.clone();
    if let Some(g) = out.group.get_mut(group_id) {
        g.x = snapped.x;
        g.y = snapped.y;
    }
    if let Some(n) = out.node.get_mut(group_id) {
        n.x = snapped.x;
        n.y = snapped.y;
    }

    let mut moved = vec![group_id.clone()];
    for child in domain.subtree_ids(group_id) {
        if &child == group_id {
            continue;
        }
        let mut touched = false;
        if let Some(n) = out.node.get_mut(&child) {
            n.x += delta.x;
            n.y += delta.y;
            touched = true;
        }
        if let Some(g) = out.group.get_mut(&child) {
            g.x += delta.x;
            g.y += delta.y;
            touched = true;
        }
        if touched {
            moved.push(child);
        }
    }

    (out, moved)
}

/// One reparent `moved` should trigger, discovered after its drag has
/// already been committed to ViewState (spec §4.8 "Reparent-on-drag").
#[derive(Debug, Clone, PartialEq)]
pub struct ReparentTarget {
    pub id: NodeId,
    pub new_parent: NodeId,
}

/// Tests full containment of every moved non-group node's world rect
/// inside each candidate group's world rect (deepest nesting wins, else
/// root), and — when `moved_root` is itself a group — additionally finds
/// every other node in `domain` now fully inside its rectangle. Only
/// returns entries whose resolved parent differs from the current domain
/// parent; "already contains" is the caller's job to swallow.
pub fn detect_reparents(domain: &Domain, vs: &ViewState, moved_root: &NodeId, moved: &[NodeId]) -> Vec<ReparentTarget> {
    let mut out = Vec::new();
    let all_groups: Vec<NodeId> = domain.descendant_groups(&NodeId::root());

    for id in moved {
        if matches!(domain.kind(id), Kind::Group) {
            continue;
        }
        let Some(rect) = geometry_rect(vs, id) else {
            continue;
        };
        let target = deepest_containing_group(domain, vs, &all_groups, id, rect);
        if domain.find_parent(id) != Some(&target) {
            out.push(ReparentTarget {
                id: id.clone(),
                new_parent: target,
            });
        }
    }

    if matches!(domain.kind(moved_root), Kind::Group) {
        if let Some(group_rect) = geometry_rect(vs, moved_root) {
            let own_subtree = domain.subtree_ids(moved_root);
            for other in domain.node_ids() {
                if own_subtree.contains(other) {
                    continue;
                }
                let Some(r) = geometry_rect(vs, other) else {
                    continue;
                };
                if group_rect.contains_rect(r) && domain.find_parent(other) != Some(moved_root) {
                    out.push(ReparentTarget {
                        id: other.clone(),
                        new_parent: moved_root.clone(),
                    });
                }
            }
        }
    }

    out
}

fn deepest_containing_group(domain: &Domain, vs: &ViewState, all_groups: &[NodeId], node_id: &NodeId, rect: Rect) -> NodeId {
    let own_subtree = domain.subtree_ids(node_id);
    let mut best: Option<(NodeId, usize)> = None;
    for group in all_groups {
        if own_subtree.contains(group) {
            continue;
        }
        let Some(grect) = geometry_rect(vs, group) else {
            continue;
        };
        if grect.contains_rect(rect) {
            let depth = domain.path_to_root(group).len();
            if best.as_ref().map(|(_, d)| depth > *d).unwrap_or(true) {
                best = Some((group.clone(), depth));
            }
        }
    }
    best.map(|(g, _)| g).unwrap_or_else(NodeId::root)
}
