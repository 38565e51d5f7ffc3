//! A small deterministic layout engine used when no external hierarchical
//! layout library is wired in. Packs children left-to-right into rows,
//! wrapping once a row exceeds [`DefaultLayoutEngine::max_row_width`], and
//! routes each edge as a single vertical-then-horizontal elbow between
//! the two node centers — enough to exercise the runner's contract
//! without claiming to be a real layout algorithm.

use indexmap::IndexMap;

use crate::coord::Point;

use super::engine::{LayoutEngine, LayoutInput, LayoutOutput};
use super::error::LayoutError;

#[derive(Debug, Clone, Copy)]
pub struct DefaultLayoutEngine {
    pub max_row_width: f64,
    pub gutter: f64,
}

impl Default for DefaultLayoutEngine {
    fn default() -> Self {
        Self {
            max_row_width: 40.0,
            gutter: 2.0,
        }
    }
}

impl LayoutEngine for DefaultLayoutEngine {
    fn layout(&self, input: LayoutInput) -> Result<LayoutOutput, LayoutError> {
        let mut positions = IndexMap::new();
        let mut cursor_x = 0.0;
        let mut cursor_y = 0.0;
        let mut row_height = 0.0_f64;

        for node in &input.nodes {
            if cursor_x > 0.0 && cursor_x + node.w > self.max_row_width {
                cursor_x = 0.0;
                cursor_y += row_height + self.gutter;
                row_height = 0.0;
            }
            positions.insert(node.id.clone(), Point::new(cursor_x, cursor_y));
            cursor_x += node.w + self.gutter;
            row_height = row_height.max(node.h);
        }

        let mut routing = IndexMap::new();
        for edge in &input.edges {
            let (Some(src), Some(tgt)) = (positions.get(&edge.source), positions.get(&edge.target)) else {
                continue;
            };
            routing.insert(edge.id.clone(), vec![*src, Point::new(src.x, tgt.y), *tgt]);
        }

        Ok(LayoutOutput { positions, routing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::engine::{LayoutEdgeRef, LayoutNode, LayoutOptions};
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_rows_when_exceeding_max_width() {
        let engine = DefaultLayoutEngine {
            max_row_width: 10.0,
            gutter: 1.0,
        };
        let input = LayoutInput {
            nodes: vec![
                LayoutNode { id: "a".into(), w: 6.0, h: 4.0 },
                LayoutNode { id: "b".into(), w: 6.0, h: 4.0 },
            ],
            edges: vec![],
            options: LayoutOptions { padding: 1.0 },
        };
        let out = engine.layout(input).unwrap();
        assert_eq!(out.positions[&crate::domain::NodeId::from("a")], Point::new(0.0, 0.0));
        assert_eq!(out.positions[&crate::domain::NodeId::from("b")], Point::new(0.0, 5.0));
    }

    #[test]
    fn routes_elbow_between_known_endpoints() {
        let engine = DefaultLayoutEngine::default();
        let input = LayoutInput {
            nodes: vec![
                LayoutNode { id: "a".into(), w: 4.0, h: 4.0 },
                LayoutNode { id: "b".into(), w: 4.0, h: 4.0 },
            ],
            edges: vec![LayoutEdgeRef {
                id: "e1".into(),
                source: "a".into(),
                target: "b".into(),
            }],
            options: LayoutOptions { padding: 1.0 },
        };
        let out = engine.layout(input).unwrap();
        assert_eq!(out.routing[&crate::domain::EdgeId::from("e1")].len(), 3);
    }
}
