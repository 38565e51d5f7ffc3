//! The FREE-mode obstacle-avoidance routing subsystem (spec §4.6).

mod default;
pub mod engine;
mod error;
mod pins;
mod service;

pub use default::DefaultRouterEngine;
pub use engine::{ConnHandle, Endpoint, PinHandle, RerouteResult, RouterEngine, ShapeHandle};
pub use error::RouterError;
pub use service::{ObstacleUpdate, RouterService, RouterUpdate, TouchedConnection};
