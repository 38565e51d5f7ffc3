//! # canvas-core
//!
//! The interactive architecture-diagram canvas's structural engine: a
//! Domain graph of nodes/groups/edges, an absolute-coordinate ViewState,
//! a hierarchical (LOCK-mode) layout runner, an obstacle-avoidance
//! (FREE-mode) router, and an [`orchestrator::Orchestrator`] that
//! sequences all of it behind one `apply(intent)` entry point.
//!
//! See the project README for details.

pub mod config;
pub mod coord;
pub mod domain;
pub mod drag;
pub mod error;
pub mod intent;
pub mod layout;
pub mod mode;
pub mod orchestrator;
pub mod persistence;
pub mod policy;
pub mod render;
pub mod router;
pub mod signals;
pub mod viewstate;

pub use config::CanvasConfig;
pub use coord::{Point, Rect, Size};
pub use domain::{Domain, EdgeData, EdgeId, Kind, NodeData, NodeId};
pub use error::{CanvasError, Harmless, Result};
pub use intent::{AiLockStructuralIntent, EditIntent, FreeStructuralIntent, GeoOnlyIntent};
pub use orchestrator::{NullRenderSink, Orchestrator, RenderSink};
pub use persistence::{now_unix_secs, FsStore, MemoryStore, Snapshot, SnapshotStore};
pub use policy::IntentOrigin;
pub use render::{RenderEdge, RenderEdgeType, RenderNode};
pub use signals::{Signal, SignalBus};
pub use viewstate::{EdgeGeometry, GroupGeometry, LayoutMode, NodeGeometry, Side, ViewState};
