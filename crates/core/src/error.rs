//! Unified error types for the canvas-core crate.
//!
//! All public-facing errors are collected here so callers can match on a
//! single enum, and so the Orchestrator can decide in one place whether a
//! sub-step's error is structurally harmless (§7: "already contains",
//! "edge not found" on a concurrent delete) or must be surfaced.

use thiserror::Error;

use crate::domain::DomainError;
use crate::layout::LayoutError;
use crate::persistence::PersistenceError;
use crate::router::RouterError;
use crate::viewstate::ViewStateError;

/// Top-level error type for the canvas-core crate.
#[derive(Error, Debug)]
pub enum CanvasError {
    /// A Domain-graph mutation failed (duplicate id, unknown endpoint, ...).
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A ViewState operation failed (missing geometry).
    #[error("view state error: {0}")]
    ViewState(#[from] ViewStateError),

    /// The external hierarchical layout call failed.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The obstacle router reported an inconsistency.
    #[error("router error: {0}")]
    Router(#[from] RouterError),

    /// Reading or writing a persistence snapshot failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An intent was missing required payload (e.g. `add-node` without a position).
    #[error("invalid intent: {0}")]
    InvalidIntent(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Marks an error as "structurally harmless" — expected, loggable as a
/// warning, and safe to swallow so the orchestrator's state machine
/// never wedges (§7, §9 "exceptions for control flow").
pub trait Harmless {
    fn is_harmless(&self) -> bool;
}

impl Harmless for DomainError {
    fn is_harmless(&self) -> bool {
        matches!(
            self,
            DomainError::AlreadyContains { .. } | DomainError::NotFound(_)
        )
    }
}

impl Harmless for CanvasError {
    fn is_harmless(&self) -> bool {
        match self {
            CanvasError::Domain(e) => e.is_harmless(),
            _ => false,
        }
    }
}
