//! `RouterService`: the single long-lived router instance that owns the
//! FREE-mode routing world for the life of the session (spec §4.6).

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::config::CanvasConfig;
use crate::coord::{snap_rect, Point, Rect};
use crate::domain::{EdgeId, NodeId};
use crate::viewstate::Side;

use super::engine::{ConnHandle, Endpoint, RouterEngine, ShapeHandle};
use super::error::RouterError;
use super::pins::PinCache;

/// One obstacle position change to apply in a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleUpdate {
    pub id: NodeId,
    pub rect: Rect,
}

/// One connection whose endpoints need (re)binding in this batch, because
/// its source or target obstacle moved. `source_point`/`target_point` are
/// the endpoints' last-known world anchors, carried only for the
/// L-shaped fallback when the router yields a degenerate route.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchedConnection {
    pub edge_id: EdgeId,
    pub source: NodeId,
    pub source_side: Side,
    pub source_point: Point,
    pub target: NodeId,
    pub target_side: Side,
    pub target_point: Point,
}

/// The outcome of one `batchUpdateObstaclesAndReroute` transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RouterUpdate {
    pub routing_version: u64,
    pub routes: Vec<(EdgeId, Vec<Point>)>,
}

pub struct RouterService {
    obstacles: IndexMap<NodeId, ShapeHandle>,
    connections: IndexMap<EdgeId, ConnHandle>,
    conn_to_edge: HashMap<ConnHandle, EdgeId>,
    routes_cache: IndexMap<EdgeId, Vec<Point>>,
    pins: PinCache,
    routing_version: u64,
    /// Which edges currently occupy each `(shape, side)` pair, in
    /// registration order — gives each connection's endpoint a stable
    /// `port_index` among its real siblings instead of a hardcoded one
    /// (spec §4.6 fan-out).
    side_occupants: HashMap<(ShapeHandle, Side), Vec<EdgeId>>,
    /// The `(shape, side)` each connection last registered at, per
    /// endpoint, so a side/shape change unregisters the stale slot.
    conn_sides: HashMap<EdgeId, ((ShapeHandle, Side), (ShapeHandle, Side))>,
}

impl Default for RouterService {
    fn default() -> Self {
        Self::new()
    }
}

impl RouterService {
    pub fn new() -> Self {
        Self {
            obstacles: IndexMap::new(),
            connections: IndexMap::new(),
            conn_to_edge: HashMap::new(),
            routes_cache: IndexMap::new(),
            pins: PinCache::new(),
            routing_version: 0,
            side_occupants: HashMap::new(),
            conn_sides: HashMap::new(),
        }
    }

    pub fn routing_version(&self) -> u64 {
        self.routing_version
    }

    pub fn cached_route(&self, edge_id: &EdgeId) -> Option<&[Point]> {
        self.routes_cache.get(edge_id).map(|v| v.as_slice())
    }

    /// `updateObstacle`: snaps `rect`, then moves the existing shape or
    /// constructs a fresh `ShapeHandle`.
    pub fn update_obstacle(
        &mut self,
        engine: &mut dyn RouterEngine,
        id: &NodeId,
        rect: Rect,
        grid: f64,
    ) -> ShapeHandle {
        let snapped = snap_rect(rect, grid);
        if let Some(handle) = self.obstacles.get(id) {
            engine.move_shape(*handle, snapped);
            *handle
        } else {
            let handle = engine.create_shape(id, snapped);
            self.obstacles.insert(id.clone(), handle);
            handle
        }
    }

    /// Unregisters a removed node's obstacle, releasing its cached pins.
    pub fn remove_obstacle(&mut self, engine: &mut dyn RouterEngine, id: &NodeId) {
        if let Some(handle) = self.obstacles.shift_remove(id) {
            engine.remove_shape(handle);
            self.pins.purge_shape(handle);
        }
    }

    /// Purges a removed edge's `ConnRef` and cached route (spec "stale
    /// route prevention").
    pub fn remove_edge(&mut self, engine: &mut dyn RouterEngine, edge_id: &EdgeId) {
        if let Some(handle) = self.connections.shift_remove(edge_id) {
            engine.remove_connection(handle);
            self.conn_to_edge.remove(&handle);
        }
        self.routes_cache.shift_remove(edge_id);
        if let Some((source_slot, target_slot)) = self.conn_sides.remove(edge_id) {
            self.unregister_occupant(edge_id, source_slot);
            self.unregister_occupant(edge_id, target_slot);
        }
    }

    /// Adds `edge_id` to the occupant list of `slot` (a shape+side pair),
    /// returning this edge's `(port_index, port_count)` among its real
    /// siblings on that side.
    fn register_occupant(&mut self, edge_id: &EdgeId, slot: (ShapeHandle, Side)) -> (u32, u32) {
        let occupants = self.side_occupants.entry(slot).or_default();
        if !occupants.contains(edge_id) {
            occupants.push(edge_id.clone());
        }
        let index = occupants.iter().position(|e| e == edge_id).unwrap() as u32;
        (index, occupants.len() as u32)
    }

    fn unregister_occupant(&mut self, edge_id: &EdgeId, slot: (ShapeHandle, Side)) {
        if let Some(occupants) = self.side_occupants.get_mut(&slot) {
            occupants.retain(|e| e != edge_id);
            if occupants.is_empty() {
                self.side_occupants.remove(&slot);
            }
        }
    }

    fn ensure_connection(
        &mut self,
        engine: &mut dyn RouterEngine,
        config: &CanvasConfig,
        edge_id: &EdgeId,
        source: &NodeId,
        source_side: Side,
        target: &NodeId,
        target_side: Side,
    ) -> Result<ConnHandle, RouterError> {
        let source_shape = *self
            .obstacles
            .get(source)
            .ok_or_else(|| RouterError::UnknownShape(source.clone()))?;
        let target_shape = *self
            .obstacles
            .get(target)
            .ok_or_else(|| RouterError::UnknownShape(target.clone()))?;

        let source_slot = (source_shape, source_side);
        let target_slot = (target_shape, target_side);
        if let Some((prev_source, prev_target)) = self.conn_sides.get(edge_id).copied() {
            if prev_source != source_slot {
                self.unregister_occupant(edge_id, prev_source);
            }
            if prev_target != target_slot {
                self.unregister_occupant(edge_id, prev_target);
            }
        }
        let (source_index, source_count) = self.register_occupant(edge_id, source_slot);
        let (target_index, target_count) = self.register_occupant(edge_id, target_slot);
        self.conn_sides.insert(edge_id.clone(), (source_slot, target_slot));

        let source_pin = self.pins.get_or_create(engine, source_shape, source_side, source_index, source_count, config.port_edge_spacing);
        let target_pin = self.pins.get_or_create(engine, target_shape, target_side, target_index, target_count, config.port_edge_spacing);
        let source_ep = Endpoint { shape: source_shape, pin: source_pin };
        let target_ep = Endpoint { shape: target_shape, pin: target_pin };

        if let Some(handle) = self.connections.get(edge_id) {
            engine.update_connection_endpoints(*handle, source_ep, target_ep);
            Ok(*handle)
        } else {
            let handle = engine.create_connection(edge_id, source_ep, target_ep);
            self.connections.insert(edge_id.clone(), handle);
            self.conn_to_edge.insert(handle, edge_id.clone());
            Ok(handle)
        }
    }

    /// `batchUpdateObstaclesAndReroute`: applies every obstacle move,
    /// rebinds every touched connection's endpoints, then solves once.
    pub fn batch_update_obstacles_and_reroute(
        &mut self,
        engine: &mut dyn RouterEngine,
        config: &CanvasConfig,
        updates: &[ObstacleUpdate],
        touched: &[TouchedConnection],
    ) -> Result<RouterUpdate, RouterError> {
        for u in updates {
            self.update_obstacle(engine, &u.id, u.rect, config.grid_size);
        }
        for c in touched {
            self.ensure_connection(engine, config, &c.edge_id, &c.source, c.source_side, &c.target, c.target_side)?;
        }

        let fallbacks: HashMap<EdgeId, (Point, Point, Side)> = touched
            .iter()
            .map(|c| (c.edge_id.clone(), (c.source_point, c.target_point, c.source_side)))
            .collect();

        let mut routes = Vec::new();
        for result in engine.process_transaction() {
            let Some(edge_id) = self.conn_to_edge.get(&result.conn).cloned() else {
                continue;
            };
            let polyline = if result.polyline.len() >= 2 {
                round_polyline(&result.polyline)
            } else if let Some((src, tgt, side)) = fallbacks.get(&edge_id) {
                l_shaped_fallback(*src, *tgt, *side)
            } else {
                continue;
            };
            self.routes_cache.insert(edge_id.clone(), polyline.clone());
            routes.push((edge_id, polyline));
        }

        self.routing_version += 1;
        Ok(RouterUpdate {
            routing_version: self.routing_version,
            routes,
        })
    }
}

fn round_polyline(points: &[Point]) -> Vec<Point> {
    points
        .iter()
        .map(|p| Point::new((p.x * 100.0).round() / 100.0, (p.y * 100.0).round() / 100.0))
        .collect()
}

/// An L-shaped fallback route from `source` to `target`, elbowing along
/// `source_side`'s axis first.
fn l_shaped_fallback(source: Point, target: Point, source_side: Side) -> Vec<Point> {
    let elbow = match source_side {
        Side::Left | Side::Right => Point::new(target.x, source.y),
        Side::Top | Side::Bottom => Point::new(source.x, target.y),
    };
    round_polyline(&[source, elbow, target])
}
