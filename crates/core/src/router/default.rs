//! A small deterministic router engine used when no native
//! obstacle-avoidance library is wired in: every connection routes as a
//! single-elbow step between its two pins, recomputed in full on every
//! `process_transaction`. No actual obstacle avoidance is performed —
//! this stands in for the trait seam, not for the real router.

use indexmap::IndexMap;

use crate::coord::{Point, Rect};
use crate::domain::{EdgeId, NodeId};
use crate::viewstate::Side;

use super::engine::{ConnHandle, Endpoint, PinHandle, RerouteResult, RouterEngine, ShapeHandle};

#[derive(Debug, Clone, Copy)]
struct PinRecord {
    shape: ShapeHandle,
    side: Side,
    offset: (f64, f64),
}

#[derive(Debug, Clone)]
struct ConnRecord {
    source: Endpoint,
    target: Endpoint,
}

#[derive(Default)]
pub struct DefaultRouterEngine {
    shapes: IndexMap<ShapeHandle, Rect>,
    pins: IndexMap<PinHandle, PinRecord>,
    connections: IndexMap<ConnHandle, ConnRecord>,
    next_id: u64,
}

impl DefaultRouterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh<T>(&mut self, wrap: impl FnOnce(u64) -> T) -> T {
        self.next_id += 1;
        wrap(self.next_id)
    }

    fn anchor(&self, endpoint: Endpoint) -> Point {
        let rect = self.shapes.get(&endpoint.shape).copied().unwrap_or(Rect::zero());
        let pin = self.pins.get(&endpoint.pin);
        let offset = pin.map(|p| p.offset).unwrap_or((0.5, 0.5));
        Point::new(rect.x + offset.0 * rect.w, rect.y + offset.1 * rect.h)
    }

    fn source_side(&self, endpoint: Endpoint) -> Side {
        self.pins.get(&endpoint.pin).map(|p| p.side).unwrap_or(Side::Right)
    }
}

impl RouterEngine for DefaultRouterEngine {
    fn create_shape(&mut self, _id: &NodeId, rect: Rect) -> ShapeHandle {
        let handle = self.fresh(ShapeHandle);
        self.shapes.insert(handle, rect);
        handle
    }

    fn move_shape(&mut self, shape: ShapeHandle, rect: Rect) {
        self.shapes.insert(shape, rect);
    }

    fn remove_shape(&mut self, shape: ShapeHandle) {
        self.shapes.shift_remove(&shape);
        self.pins.retain(|_, p| p.shape != shape);
    }

    fn create_pin(&mut self, shape: ShapeHandle, side: Side, offset: (f64, f64)) -> PinHandle {
        let handle = self.fresh(PinHandle);
        self.pins.insert(handle, PinRecord { shape, side, offset });
        handle
    }

    fn create_connection(&mut self, _id: &EdgeId, source: Endpoint, target: Endpoint) -> ConnHandle {
        let handle = self.fresh(ConnHandle);
        self.connections.insert(handle, ConnRecord { source, target });
        handle
    }

    fn update_connection_endpoints(&mut self, conn: ConnHandle, source: Endpoint, target: Endpoint) {
        self.connections.insert(conn, ConnRecord { source, target });
    }

    fn remove_connection(&mut self, conn: ConnHandle) {
        self.connections.shift_remove(&conn);
    }

    fn process_transaction(&mut self) -> Vec<RerouteResult> {
        self.connections
            .keys()
            .copied()
            .collect::<Vec<_>>()
            .into_iter()
            .map(|conn| {
                let rec = self.connections[&conn].clone();
                let src = self.anchor(rec.source);
                let tgt = self.anchor(rec.target);
                let elbow = match self.source_side(rec.source) {
                    Side::Left | Side::Right => Point::new(tgt.x, src.y),
                    Side::Top | Side::Bottom => Point::new(src.x, tgt.y),
                };
                RerouteResult {
                    conn,
                    polyline: vec![src, elbow, tgt],
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_every_live_connection_on_each_transaction() {
        let mut engine = DefaultRouterEngine::new();
        let a = engine.create_shape(&"a".into(), Rect::new(0.0, 0.0, 10.0, 10.0));
        let b = engine.create_shape(&"b".into(), Rect::new(20.0, 0.0, 10.0, 10.0));
        let pa = engine.create_pin(a, Side::Right, (1.0, 0.5));
        let pb = engine.create_pin(b, Side::Left, (0.0, 0.5));
        engine.create_connection(
            &"e1".into(),
            Endpoint { shape: a, pin: pa },
            Endpoint { shape: b, pin: pb },
        );
        let results = engine.process_transaction();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].polyline.len(), 3);
    }

    #[test]
    fn removed_connection_is_not_rerouted() {
        let mut engine = DefaultRouterEngine::new();
        let a = engine.create_shape(&"a".into(), Rect::new(0.0, 0.0, 10.0, 10.0));
        let pa = engine.create_pin(a, Side::Right, (1.0, 0.5));
        let conn = engine.create_connection(
            &"e1".into(),
            Endpoint { shape: a, pin: pa },
            Endpoint { shape: a, pin: pa },
        );
        engine.remove_connection(conn);
        assert!(engine.process_transaction().is_empty());
    }
}
