//! The trait seam standing in for "the low-level obstacle-avoidance
//! router" (spec §4.6, §6 "External interfaces"). [`super::default::DefaultRouterEngine`]
//! is a small in-crate stand-in; a production build would bind this to a
//! native connector-routing library instead.

use crate::coord::{Point, Rect};
use crate::domain::{EdgeId, NodeId};
use crate::viewstate::Side;

/// Opaque identity for a registered obstacle shape. Preserved across
/// position updates so connectors don't need to be recreated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeHandle(pub u64);

/// Opaque identity for a registered connection (one per routed edge).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnHandle(pub u64);

/// Opaque identity for a cached directional pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinHandle(pub u64);

/// A connection's endpoint: which shape, and the pin attaching to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Endpoint {
    pub shape: ShapeHandle,
    pub pin: PinHandle,
}

/// The result of one `processTransaction()` pass: the fresh polyline for
/// every connection the router rerouted, in the engine's own coordinate
/// frame (world units — the engine never rescales).
#[derive(Debug, Clone, PartialEq)]
pub struct RerouteResult {
    pub conn: ConnHandle,
    pub polyline: Vec<Point>,
}

pub trait RouterEngine {
    fn create_shape(&mut self, id: &NodeId, rect: Rect) -> ShapeHandle;
    fn move_shape(&mut self, shape: ShapeHandle, rect: Rect);
    fn remove_shape(&mut self, shape: ShapeHandle);

    fn create_pin(&mut self, shape: ShapeHandle, side: Side, offset: (f64, f64)) -> PinHandle;

    fn create_connection(&mut self, id: &EdgeId, source: Endpoint, target: Endpoint) -> ConnHandle;
    fn update_connection_endpoints(&mut self, conn: ConnHandle, source: Endpoint, target: Endpoint);
    fn remove_connection(&mut self, conn: ConnHandle);

    /// Runs the router's internal solve once and reports every connection
    /// it rerouted (spec: "call `router.processTransaction()` once").
    fn process_transaction(&mut self) -> Vec<RerouteResult>;
}
