//! The Orchestrator facade: the single entry point `apply(intent)` that
//! holds the current Domain, ViewState, and renderer handle, and
//! sequences every layer so no window exists in which one has an id the
//! other lacks (spec §4.11).

use std::collections::HashSet;

use crate::config::CanvasConfig;
use crate::coord::{snap_point, Point, Rect};
use crate::domain::{Domain, EdgeId, NodeId};
use crate::drag::{self, DragTracker};
use crate::error::{Harmless, Result};
use crate::intent::{AiLockStructuralIntent, EditIntent, FreeStructuralIntent, GeoOnlyIntent};
use crate::layout::{LayoutEngine, ViewStateDelta};
use crate::mode;
use crate::persistence::Snapshot;
use crate::policy::{self, IntentOrigin};
use crate::render::{self, RenderEdge, RenderNode};
use crate::router::{ObstacleUpdate, RouterEngine, RouterService, TouchedConnection};
use crate::signals::{Signal, SignalBus};
use crate::viewstate::{GroupGeometry, LayoutMode, NodeGeometry, Side, ViewState};

/// The renderer's `setNodes`/`setEdges`/`renderTrigger` surface (spec §6
/// "External interfaces"), held by the Orchestrator as `Box<dyn RenderSink>`.
pub trait RenderSink {
    fn set_nodes(&mut self, nodes: Vec<RenderNode>);
    fn set_edges(&mut self, edges: Vec<RenderEdge>);
    fn trigger(&mut self);
}

/// A `RenderSink` that drops everything, for headless `apply` callers
/// that only care about the resulting Domain/ViewState.
#[derive(Default)]
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn set_nodes(&mut self, _nodes: Vec<RenderNode>) {}
    fn set_edges(&mut self, _edges: Vec<RenderEdge>) {}
    fn trigger(&mut self) {}
}

pub struct Orchestrator {
    domain: Domain,
    vs: ViewState,
    config: CanvasConfig,
    layout_engine: Box<dyn LayoutEngine>,
    router_engine: Box<dyn RouterEngine>,
    router_service: RouterService,
    drag_tracker: DragTracker,
    render_sink: Box<dyn RenderSink>,
    signals: SignalBus,
    dragging: bool,
}

impl Orchestrator {
    pub fn new(
        config: CanvasConfig,
        layout_engine: Box<dyn LayoutEngine>,
        router_engine: Box<dyn RouterEngine>,
        render_sink: Box<dyn RenderSink>,
    ) -> Self {
        Self {
            domain: Domain::new(),
            vs: ViewState::new(),
            config,
            layout_engine,
            router_engine,
            router_service: RouterService::new(),
            drag_tracker: DragTracker::new(),
            render_sink,
            signals: SignalBus::new(),
            dragging: false,
        }
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn view_state(&self) -> &ViewState {
        &self.vs
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Signal) + Send + Sync + 'static) {
        self.signals.subscribe(listener);
    }

    /// Restores `{domain, viewState}` from a snapshot (spec §4.10): runs
    /// `cleanViewState`, then re-projects once.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.domain = snapshot.domain;
        self.vs = snapshot.view_state.clean(&self.domain);
        self.re_project();
    }

    pub fn snapshot(&self, scope_id: NodeId, timestamp_unix_secs: u64) -> Snapshot {
        Snapshot::new(self.domain.clone(), self.vs.clone(), scope_id, timestamp_unix_secs)
    }

    // -----------------------------------------------------------------
    // apply
    // -----------------------------------------------------------------

    pub fn apply(&mut self, intent: EditIntent) -> Result<()> {
        match intent {
            EditIntent::GeoOnly(g) => self.apply_geo_only(g),
            EditIntent::FreeStructural(s) => {
                let scope = EditIntent::FreeStructural(s.clone()).scope(&self.domain);
                self.apply_free_structural(s, scope)
            }
            EditIntent::AiLockStructural(s) => {
                let scope = EditIntent::AiLockStructural(s.clone()).scope(&self.domain);
                self.apply_ai_lock_structural(s, scope)
            }
        }
    }

    fn apply_geo_only(&mut self, intent: GeoOnlyIntent) -> Result<()> {
        let node_ids = match &intent {
            GeoOnlyIntent::MoveNode { id, .. } | GeoOnlyIntent::ResizeNode { id, .. } => vec![id.clone()],
            GeoOnlyIntent::SetEdgeWaypoints { id, .. } | GeoOnlyIntent::SetEdgeHandles { id, .. } => self
                .domain
                .get_edge(id)
                .map(|e| vec![e.source.clone(), e.target.clone()])
                .unwrap_or_default(),
        };
        match intent {
            GeoOnlyIntent::MoveNode { id, to } => {
                self.vs = drag::drag_node(&self.vs, &self.config, &id, to);
            }
            GeoOnlyIntent::ResizeNode { id, w, h } => {
                if let Some(n) = self.vs.node.get_mut(&id) {
                    n.w = w;
                    n.h = h;
                }
                if let Some(g) = self.vs.group.get_mut(&id) {
                    g.w = w;
                    g.h = h;
                }
            }
            GeoOnlyIntent::SetEdgeWaypoints { id, waypoints } => {
                self.vs.edge.entry(id).or_default().waypoints = Some(waypoints);
            }
            GeoOnlyIntent::SetEdgeHandles { id, source_handle, target_handle } => {
                let entry = self.vs.edge.entry(id).or_default();
                entry.source_handle = source_handle;
                entry.target_handle = target_handle;
            }
        }
        self.re_project();
        self.signals.emit(Signal::ViewstateUpdated(node_ids));
        Ok(())
    }

    fn apply_free_structural(&mut self, intent: FreeStructuralIntent, scope: Option<NodeId>) -> Result<()> {
        match intent {
            FreeStructuralIntent::AddNode { id, parent, at, data } => {
                self.seed_node_geometry(&id, at, data.is_group);
                self.domain = self.domain.add_node(id.clone(), &parent, data)?;
                self.clean_viewstate();
                self.register_obstacle(&id);
                self.maybe_run_layout(IntentOrigin::User, scope)?;
                self.re_project();
            }
            FreeStructuralIntent::AddEdge { id, source, target, data } => {
                self.domain = self.domain.add_edge(id.clone(), &source, &target, data)?;
                self.clean_viewstate();
                self.maybe_run_layout(IntentOrigin::User, scope)?;
                self.reroute_and_render(&[source, target]);
            }
            FreeStructuralIntent::DeleteNode { id } => {
                self.delete_node_cascading(&id);
                self.maybe_run_layout(IntentOrigin::User, scope)?;
                self.re_project();
            }
            FreeStructuralIntent::DeleteEdge { id } => {
                self.delete_edge_if_present(&id)?;
                self.re_project();
            }
            FreeStructuralIntent::MoveNodeTree { id, new_parent } => {
                let old_parent = self.domain.find_parent(&id).cloned().unwrap_or_else(NodeId::root);
                match self.domain.move_node(&id, &new_parent) {
                    Ok(d) => self.domain = d,
                    Err(e) if e.is_harmless() => {
                        self.re_project();
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                }
                self.vs.adjust_for_reparent(&id, &old_parent, &new_parent);
                self.maybe_run_layout(IntentOrigin::User, scope)?;
                self.re_project();
            }
            FreeStructuralIntent::GroupNodes { ids, parent, new_group_id } => {
                self.seed_group_geometry(&new_group_id, &ids);
                self.domain = self.domain.group_nodes(&ids, &parent, new_group_id.clone())?;
                self.clean_viewstate();
                self.register_obstacle(&new_group_id);
                self.maybe_run_layout(IntentOrigin::User, scope)?;
                self.re_project();
            }
            FreeStructuralIntent::UngroupNode { group_id } => {
                self.domain = self.domain.ungroup_node(&group_id)?;
                self.clean_viewstate();
                self.router_service.remove_obstacle(self.router_engine.as_mut(), &group_id);
                self.maybe_run_layout(IntentOrigin::User, scope)?;
                self.re_project();
            }
            FreeStructuralIntent::SetLayoutMode { scope: mode_scope, mode } => {
                self.apply_mode_change(mode_scope, mode);
            }
        }
        Ok(())
    }

    fn apply_ai_lock_structural(&mut self, intent: AiLockStructuralIntent, scope: Option<NodeId>) -> Result<()> {
        match intent {
            AiLockStructuralIntent::AddNode { id, parent, at, data } => {
                self.seed_node_geometry(&id, at.unwrap_or(Point::ZERO), data.is_group);
                self.domain = self.domain.add_node(id.clone(), &parent, data)?;
                self.clean_viewstate();
                self.register_obstacle(&id);
                self.maybe_run_layout(IntentOrigin::Agent, scope)?;
                self.re_project();
            }
            AiLockStructuralIntent::AddEdge { id, source, target, data } => {
                self.domain = self.domain.add_edge(id.clone(), &source, &target, data)?;
                self.clean_viewstate();
                self.maybe_run_layout(IntentOrigin::Agent, scope)?;
                self.reroute_and_render(&[source, target]);
            }
            AiLockStructuralIntent::DeleteNode { id } => {
                self.delete_node_cascading(&id);
                self.maybe_run_layout(IntentOrigin::Agent, scope)?;
                self.re_project();
            }
            AiLockStructuralIntent::MoveNodeTree { id, new_parent } => {
                let old_parent = self.domain.find_parent(&id).cloned().unwrap_or_else(NodeId::root);
                self.domain = match self.domain.move_node(&id, &new_parent) {
                    Ok(d) => d,
                    Err(e) if e.is_harmless() => {
                        self.re_project();
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                };
                self.vs.adjust_for_reparent(&id, &old_parent, &new_parent);
                self.maybe_run_layout(IntentOrigin::Agent, scope)?;
                self.re_project();
            }
            AiLockStructuralIntent::GroupNodes { ids, parent, new_group_id } => {
                self.seed_group_geometry(&new_group_id, &ids);
                self.domain = self.domain.group_nodes(&ids, &parent, new_group_id.clone())?;
                self.clean_viewstate();
                self.register_obstacle(&new_group_id);
                self.maybe_run_layout(IntentOrigin::Agent, scope)?;
                self.re_project();
            }
            AiLockStructuralIntent::UngroupNode { group_id } => {
                self.domain = self.domain.ungroup_node(&group_id)?;
                self.clean_viewstate();
                self.router_service.remove_obstacle(self.router_engine.as_mut(), &group_id);
                self.maybe_run_layout(IntentOrigin::Agent, scope)?;
                self.re_project();
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------
    // Drag
    // -----------------------------------------------------------------

    pub fn drag_node_to(&mut self, id: &NodeId, to: Point) {
        self.vs = drag::drag_node(&self.vs, &self.config, id, to);
        self.reroute_and_render(std::slice::from_ref(id));
    }

    pub fn drag_group_to(&mut self, group_id: &NodeId, to: Point) -> Result<()> {
        self.dragging = true;
        let (vs, moved) = drag::drag_group(&mut self.drag_tracker, &self.domain, &self.vs, &self.config, group_id, to);
        self.vs = vs;
        self.reroute_and_render(&moved);
        self.apply_reparents(group_id, &moved)?;
        Ok(())
    }

    pub fn end_drag(&mut self, group_id: &NodeId) {
        self.dragging = false;
        self.drag_tracker.clear(group_id);
    }

    fn apply_reparents(&mut self, moved_root: &NodeId, moved: &[NodeId]) -> Result<()> {
        let targets = drag::detect_reparents(&self.domain, &self.vs, moved_root, moved);
        for target in targets {
            if mode::effective_routing_mode(&target.new_parent, &self.vs, None) == LayoutMode::Lock {
                self.vs = mode::unlock_scope_to_free(&target.new_parent, &self.domain, &self.vs);
            }
            match self.domain.move_node(&target.id, &target.new_parent) {
                Ok(d) => self.domain = d,
                Err(e) if e.is_harmless() => continue,
                Err(e) => return Err(e.into()),
            }
            self.vs.adjust_for_reparent(&target.id, &NodeId::root(), &target.new_parent);
        }
        self.re_project();
        Ok(())
    }

    // -----------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------

    fn apply_mode_change(&mut self, scope: NodeId, mode: LayoutMode) {
        self.vs = match mode {
            LayoutMode::Free => mode::unlock_scope_to_free(&scope, &self.domain, &self.vs),
            LayoutMode::Lock => mode::lock_scope_and_descendants(&scope, &self.domain, &self.vs),
        };
        if self.dragging {
            let (_, edges) = render::project(&self.domain, &self.vs);
            self.render_sink.set_edges(edges);
            self.render_sink.trigger();
        } else {
            self.re_project();
        }
        let touched: Vec<NodeId> = self.domain.subtree_ids(&scope).into_iter().collect();
        self.signals.emit(Signal::ViewstateUpdated(touched));
    }

    fn maybe_run_layout(&mut self, origin: IntentOrigin, scope: Option<NodeId>) -> Result<()> {
        let Some(scope) = scope else {
            return Ok(());
        };
        let classified = policy::classify_edit(origin, &scope, &self.domain, &self.vs);
        if classified.should_run_layout {
            let delta: ViewStateDelta =
                crate::layout::run_scope_layout(&classified.resolved_scope, &self.domain, &self.vs, self.layout_engine.as_ref(), &self.config)?;
            delta.merge_into(&mut self.vs);
            self.clean_viewstate();
        }
        Ok(())
    }

    fn clean_viewstate(&mut self) {
        self.vs = self.vs.clean(&self.domain);
    }

    fn seed_node_geometry(&mut self, id: &NodeId, at: Point, is_group: bool) {
        let snapped = snap_point(at, self.config.grid_size);
        let (w, h) = if is_group {
            (self.config.default_group_w, self.config.default_group_h)
        } else {
            (self.config.default_node_w, self.config.default_node_h)
        };
        self.vs.node.insert(id.clone(), NodeGeometry::new(snapped, w, h));
        if is_group {
            self.vs.group.insert(id.clone(), GroupGeometry::new(snapped, w, h));
        }
    }

    fn seed_group_geometry(&mut self, new_group_id: &NodeId, member_ids: &[NodeId]) {
        let rect = bounding_rect(&self.vs, member_ids).unwrap_or_else(|| {
            Rect::new(0.0, 0.0, self.config.default_group_w, self.config.default_group_h)
        });
        self.vs.group.insert(new_group_id.clone(), GroupGeometry::new(rect.top_left(), rect.w, rect.h));
        self.vs.node.insert(new_group_id.clone(), NodeGeometry::new(rect.top_left(), rect.w, rect.h));
    }

    fn register_obstacle(&mut self, id: &NodeId) {
        if let Some(rect) = drag::geometry_rect(&self.vs, id) {
            self.router_service.update_obstacle(self.router_engine.as_mut(), id, rect, self.config.grid_size);
        }
    }

    fn delete_node_cascading(&mut self, id: &NodeId) {
        let subtree = self.domain.subtree_ids(id);
        let purged_edges = self.domain.edges_touching(&subtree);
        self.domain = self.domain.delete_node(id);
        self.clean_viewstate();
        for nid in &subtree {
            self.router_service.remove_obstacle(self.router_engine.as_mut(), nid);
        }
        for eid in &purged_edges {
            self.router_service.remove_edge(self.router_engine.as_mut(), eid);
        }
    }

    fn delete_edge_if_present(&mut self, id: &EdgeId) -> Result<()> {
        match self.domain.delete_edge(id) {
            Ok(d) => self.domain = d,
            Err(e) if e.is_harmless() => {}
            Err(e) => return Err(e.into()),
        }
        self.vs.edge.shift_remove(id);
        self.router_service.remove_edge(self.router_engine.as_mut(), id);
        Ok(())
    }

    fn touched_connections(&self, moved_ids: &[NodeId]) -> Vec<TouchedConnection> {
        let moved: HashSet<NodeId> = moved_ids.iter().cloned().collect();
        self.domain
            .edges_touching(&moved)
            .into_iter()
            .filter_map(|edge_id| {
                let edge = self.domain.get_edge(&edge_id)?;
                let source_rect = drag::geometry_rect(&self.vs, &edge.source)?;
                let target_rect = drag::geometry_rect(&self.vs, &edge.target)?;
                let (source_side, target_side) = pick_sides(source_rect, target_rect);
                Some(TouchedConnection {
                    edge_id,
                    source: edge.source.clone(),
                    source_side,
                    source_point: center(source_rect),
                    target: edge.target.clone(),
                    target_side,
                    target_point: center(target_rect),
                })
            })
            .collect()
    }

    fn reroute_and_render(&mut self, moved_ids: &[NodeId]) {
        let updates: Vec<ObstacleUpdate> = moved_ids
            .iter()
            .filter_map(|id| drag::geometry_rect(&self.vs, id).map(|rect| ObstacleUpdate { id: id.clone(), rect }))
            .collect();
        for u in &updates {
            self.router_service.update_obstacle(self.router_engine.as_mut(), &u.id, u.rect, self.config.grid_size);
        }
        if !updates.is_empty() {
            self.signals.emit(Signal::obstacles_moved(updates.iter().map(|u| u.id.clone())));
        }
        let touched = self.touched_connections(moved_ids);
        if !touched.is_empty() {
            if let Ok(update) = self
                .router_service
                .batch_update_obstacles_and_reroute(self.router_engine.as_mut(), &self.config, &[], &touched)
            {
                for (edge_id, waypoints) in &update.routes {
                    self.vs.edge.entry(edge_id.clone()).or_default().waypoints = Some(waypoints.clone());
                }
                self.signals.emit(Signal::RoutingUpdate(update));
            }
        }
        self.signals.emit(Signal::ViewstateUpdated(moved_ids.to_vec()));
        self.re_project();
    }

    fn re_project(&mut self) {
        let (nodes, edges) = render::project(&self.domain, &self.vs);
        self.render_sink.set_nodes(nodes);
        self.render_sink.set_edges(edges);
        self.render_sink.trigger();
    }
}

fn bounding_rect(vs: &ViewState, ids: &[NodeId]) -> Option<Rect> {
    let rects: Vec<Rect> = ids.iter().filter_map(|id| drag::geometry_rect(vs, id)).collect();
    if rects.is_empty() {
        return None;
    }
    let min_x = rects.iter().map(|r| r.x).fold(f64::INFINITY, f64::min);
    let min_y = rects.iter().map(|r| r.y).fold(f64::INFINITY, f64::min);
    let max_x = rects.iter().map(|r| r.right()).fold(f64::NEG_INFINITY, f64::max);
    let max_y = rects.iter().map(|r| r.bottom()).fold(f64::NEG_INFINITY, f64::max);
    Some(Rect::new(min_x, min_y, max_x - min_x, max_y - min_y))
}

fn center(r: Rect) -> Point {
    Point::new(r.x + r.w / 2.0, r.y + r.h / 2.0)
}

/// Picks a plausible attachment side per endpoint from their relative
/// position, for callers that haven't assigned explicit handles.
fn pick_sides(source: Rect, target: Rect) -> (Side, Side) {
    let dx = center(target).x - center(source).x;
    let dy = center(target).y - center(source).y;
    if dx.abs() >= dy.abs() {
        if dx >= 0.0 {
            (Side::Right, Side::Left)
        } else {
            (Side::Left, Side::Right)
        }
    } else if dy >= 0.0 {
        (Side::Bottom, Side::Top)
    } else {
        (Side::Top, Side::Bottom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NodeData;
    use crate::layout::DefaultLayoutEngine;
    use crate::router::DefaultRouterEngine;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            CanvasConfig::default(),
            Box::new(DefaultLayoutEngine::default()),
            Box::new(DefaultRouterEngine::new()),
            Box::new(NullRenderSink),
        )
    }

    #[test]
    fn add_node_requires_position_and_is_queryable_after() {
        let mut orch = orchestrator();
        orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::AddNode {
            id: "a".into(),
            parent: NodeId::root(),
            at: Point::new(10.0, 10.0),
            data: NodeData::default(),
        }))
        .unwrap();
        assert!(orch.domain().contains_node(&"a".into()));
        assert!(orch.view_state().node.contains_key(&NodeId::from("a")));
    }

    #[test]
    fn delete_node_purges_incident_edges_from_viewstate() {
        let mut orch = orchestrator();
        orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::AddNode {
            id: "a".into(),
            parent: NodeId::root(),
            at: Point::new(0.0, 0.0),
            data: NodeData::default(),
        }))
        .unwrap();
        orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::AddNode {
            id: "b".into(),
            parent: NodeId::root(),
            at: Point::new(200.0, 0.0),
            data: NodeData::default(),
        }))
        .unwrap();
        orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::AddEdge {
            id: "e1".into(),
            source: "a".into(),
            target: "b".into(),
            data: Default::default(),
        }))
        .unwrap();
        orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::DeleteNode { id: "a".into() })).unwrap();

        assert!(!orch.domain().contains_edge(&"e1".into()));
        assert!(!orch.view_state().edge.contains_key(&EdgeId::from("e1")));
        assert!(!orch.view_state().node.contains_key(&NodeId::from("a")));
    }

    #[test]
    fn ai_lock_add_node_always_runs_layout() {
        let mut orch = orchestrator();
        orch.apply(EditIntent::AiLockStructural(AiLockStructuralIntent::AddNode {
            id: "a".into(),
            parent: NodeId::root(),
            at: None,
            data: NodeData::default(),
        }))
        .unwrap();
        assert!(orch.view_state().node.contains_key(&NodeId::from("a")));
    }

    #[test]
    fn already_contains_on_move_is_swallowed_not_surfaced() {
        let mut orch = orchestrator();
        orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::AddNode {
            id: "a".into(),
            parent: NodeId::root(),
            at: Point::new(0.0, 0.0),
            data: NodeData::default(),
        }))
        .unwrap();
        let result = orch.apply(EditIntent::FreeStructural(FreeStructuralIntent::MoveNodeTree {
            id: "a".into(),
            new_parent: NodeId::root(),
        }));
        assert!(result.is_ok());
    }
}
