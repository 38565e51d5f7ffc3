//! Recognised configuration options (spec §6 "Configuration").
//!
//! Plain `Default`-deriving struct in the shape of the teacher's
//! `LayoutParams` / `RenderImageOptions`: a bag of knobs threaded through
//! the coordinate primitives, the hierarchical layout runner, and the
//! obstacle router service.

use serde::{Deserialize, Serialize};

/// Tunables for the orchestrator and its two layout engines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Snap granularity for all position writes.
    pub grid_size: f64,
    /// Default width for a newly added leaf node.
    pub default_node_w: f64,
    /// Default height for a newly added leaf node.
    pub default_node_h: f64,
    /// Default width for a newly added group.
    pub default_group_w: f64,
    /// Default height for a newly added group.
    pub default_group_h: f64,
    /// Container padding applied by the hierarchical layout engine when
    /// reprojecting direct children into absolute coordinates.
    pub layout_padding: f64,
    /// Minimum distance between router obstacles and routes.
    pub shape_buffer_distance: f64,
    /// Parallel-edge spacing used by the router's nudging pass.
    pub ideal_nudging_distance: f64,
    /// Fan-out offset for multiple edges leaving the same shape side.
    pub port_edge_spacing: f64,
    /// Router penalty per routed segment.
    pub segment_penalty: f64,
    /// Router penalty for a crossing between two routes.
    pub crossing_penalty: f64,
    /// Router penalty for two routes sharing a path.
    pub shared_path_penalty: f64,
    /// Whether the router's nudging family of options is enabled.
    ///
    /// Disabled by default to prevent edge "ballooning" (spec §4.6).
    pub nudging_enabled: bool,
    /// Freshness window for a persistence snapshot, in hours.
    pub snapshot_ttl_hours: u64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            grid_size: 16.0,
            default_node_w: 96.0,
            default_node_h: 96.0,
            default_group_w: 480.0,
            default_group_h: 320.0,
            layout_padding: 24.0,
            shape_buffer_distance: 32.0,
            ideal_nudging_distance: 8.0,
            port_edge_spacing: 8.0,
            segment_penalty: 10.0,
            crossing_penalty: 100.0,
            shared_path_penalty: 10_000.0,
            nudging_enabled: false,
            snapshot_ttl_hours: 24,
        }
    }
}
