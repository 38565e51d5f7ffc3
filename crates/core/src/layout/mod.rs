//! The hierarchical (LOCK-mode) layout subsystem (spec §4.5).

mod default;
pub mod engine;
mod delta;
mod error;
mod runner;

pub use default::DefaultLayoutEngine;
pub use delta::ViewStateDelta;
pub use engine::{LayoutEdgeRef, LayoutEngine, LayoutInput, LayoutNode, LayoutOptions, LayoutOutput};
pub use error::LayoutError;
pub use runner::run_scope_layout;
