//! `runScopeLayout`: the pure hierarchical layout runner (spec §4.5).

use std::collections::HashSet;

use crate::config::CanvasConfig;
use crate::coord::{is_orthogonal_polyline, Point};
use crate::domain::{Domain, NodeId};
use crate::viewstate::{EdgeGeometry, GroupGeometry, NodeGeometry, ViewState};

use super::delta::ViewStateDelta;
use super::engine::{LayoutEdgeRef, LayoutEngine, LayoutInput, LayoutNode, LayoutOptions};
use super::error::LayoutError;

/// Runs hierarchical layout for the direct children of `scope_id` and
/// returns the resulting geometry patch. Pure: never mutates `domain` or
/// `vs`. `scope_id` may be the sentinel root.
pub fn run_scope_layout(
    scope_id: &NodeId,
    domain: &Domain,
    vs: &ViewState,
    engine: &dyn LayoutEngine,
    config: &CanvasConfig,
) -> Result<ViewStateDelta, LayoutError> {
    let children = domain.children(scope_id);
    if children.is_empty() {
        return Ok(ViewStateDelta::default());
    }

    let grid = config.grid_size.max(1.0);

    // Step 3: pre-layout anchor is the scope's current absolute top-left.
    let anchor = if scope_id.is_root() {
        Point::ZERO
    } else {
        vs.require_geometry(scope_id)?.top_left()
    };

    // Step 2: inject sizes, converted to layout units.
    let nodes: Vec<LayoutNode> = children
        .iter()
        .map(|id| {
            let rect = vs.require_geometry_or_zero(id);
            LayoutNode {
                id: id.clone(),
                w: (rect.w / grid).max(1.0),
                h: (rect.h / grid).max(1.0),
            }
        })
        .collect();

    let child_set: HashSet<NodeId> = children.iter().cloned().collect();
    let edges: Vec<LayoutEdgeRef> = domain
        .edges()
        .filter(|e| child_set.contains(&e.source) && child_set.contains(&e.target))
        .map(|e| LayoutEdgeRef {
            id: e.id.clone(),
            source: e.source.clone(),
            target: e.target.clone(),
        })
        .collect();

    let options = LayoutOptions {
        padding: config.layout_padding / grid,
    };

    // Step 3: run the external layout.
    let output = engine.layout(LayoutInput { nodes, edges, options })?;

    // Step 4: scale back to pixel units.
    let positions: Vec<(NodeId, Point)> = output
        .positions
        .into_iter()
        .map(|(id, p)| (id, Point::new(p.x * grid, p.y * grid)))
        .collect();

    // Step 5 is implicit: `positions` already holds the original
    // relative-from-layout offsets, untouched by the group translation
    // performed below.

    // Step 7's `minLayoutOffset` normalisation.
    let min_x = positions.iter().map(|(_, p)| p.x).fold(f64::INFINITY, f64::min);
    let min_y = positions.iter().map(|(_, p)| p.y).fold(f64::INFINITY, f64::min);
    let min_offset = Point::new(
        if min_x.is_finite() { min_x } else { 0.0 },
        if min_y.is_finite() { min_y } else { 0.0 },
    );

    let mut delta = ViewStateDelta::default();

    // Step 6: translate only the group — its own top-left becomes the
    // pre-layout anchor (a no-op in pixel terms since `anchor` *is* its
    // pre-layout position; recorded explicitly so a LOCK toggle always
    // re-affirms the frame).
    if !scope_id.is_root() {
        let padding = config.layout_padding;
        let max_x = positions.iter().map(|(_, p)| p.x).fold(f64::NEG_INFINITY, f64::max);
        let max_y = positions.iter().map(|(_, p)| p.y).fold(f64::NEG_INFINITY, f64::max);
        let content_w = (max_x - min_offset.x).max(0.0) + 2.0 * padding;
        let content_h = (max_y - min_offset.y).max(0.0) + 2.0 * padding;

        // Step 8: auto-fit only when ViewState has no existing size yet.
        let (w, h) = match vs.group.get(scope_id) {
            Some(existing) => (existing.w, existing.h),
            None => (content_w.max(config.default_group_w), content_h.max(config.default_group_h)),
        };
        delta.group.insert(scope_id.clone(), GroupGeometry::new(anchor, w, h));
        delta.node.insert(scope_id.clone(), NodeGeometry::new(anchor, w, h));
    }

    // Step 7: reproject children into absolute world coordinates.
    let padding = config.layout_padding;
    for (id, rel) in &positions {
        let absolute = Point::new(
            anchor.x + padding + (rel.x - min_offset.x),
            anchor.y + padding + (rel.y - min_offset.y),
        );
        let rect = vs.require_geometry_or_zero(id);
        if domain.children(id).is_empty() {
            delta.node.insert(id.clone(), NodeGeometry::new(absolute, rect.w, rect.h));
        } else {
            delta.group.insert(id.clone(), GroupGeometry::new(absolute, rect.w, rect.h));
            delta.node.insert(id.clone(), NodeGeometry::new(absolute, rect.w, rect.h));
        }
    }

    // Step 9: edge waypoints, translated and orthogonality-validated.
    for (edge_id, layout_wps) in output.routing {
        let absolute_wps: Vec<Point> = layout_wps
            .into_iter()
            .map(|p| Point::new(anchor.x + p.x * grid, anchor.y + p.y * grid))
            .collect();
        if is_orthogonal_polyline(&absolute_wps) {
            let mut geo = vs.edge.get(&edge_id).cloned().unwrap_or_default();
            geo.waypoints = Some(absolute_wps);
            delta.edge.insert(edge_id, geo);
        }
    }

    Ok(delta)
}
