//! The event bus: a typed `Signal` enum dispatched to subscribers,
//! replacing the source system's stringly-typed event names (spec §9
//! redesign flag; spec §6 "Signals (out)").

use crate::domain::{EdgeId, NodeId};
use crate::router::RouterUpdate;

/// Signals the Orchestrator dispatches after a committed change.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// ViewState changed; the renderer should re-read geometry for these
    /// nodes (empty when the change is edge-only, e.g. a waypoint edit).
    ViewstateUpdated(Vec<NodeId>),
    /// The router produced fresh routes for one or more edges.
    RoutingUpdate(RouterUpdate),
    /// One or more obstacles moved, independent of a full reroute
    /// (e.g. mid-drag, before the batch settles).
    ObstaclesMoved(Vec<NodeId>),
}

impl Signal {
    pub fn routing_update(update: RouterUpdate) -> Self {
        Signal::RoutingUpdate(update)
    }

    pub fn obstacles_moved(ids: impl IntoIterator<Item = NodeId>) -> Self {
        Signal::ObstaclesMoved(ids.into_iter().collect())
    }

    /// The edge ids a `RoutingUpdate` touched, for subscribers that only
    /// care about specific edges.
    pub fn routed_edge_ids(&self) -> Vec<EdgeId> {
        match self {
            Signal::RoutingUpdate(update) => update.routes.iter().map(|(id, _)| id.clone()).collect(),
            _ => Vec::new(),
        }
    }
}

/// A subscriber list, in the shape of the teacher's observer-style
/// callback registries: boxed closures invoked in subscription order.
#[derive(Default)]
pub struct SignalBus {
    subscribers: Vec<Box<dyn Fn(&Signal) + Send + Sync>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Signal) + Send + Sync + 'static) {
        self.subscribers.push(Box::new(listener));
    }

    pub fn emit(&self, signal: Signal) {
        for listener in &self.subscribers {
            listener(&signal);
        }
    }
}
