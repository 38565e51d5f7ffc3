use serde::{Deserialize, Serialize};

use crate::coord::{Point, Rect};

/// A directional attachment side on a shape (spec §4.6 "Pins and direction").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

/// Absolute geometry for a node rendered as a leaf cell (spec §3
/// `ViewState.node[id]`). Groups also receive one of these as a mirror
/// for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGeometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Optional named handle → side assignments, used by the router to
    /// derive pin offsets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<indexmap::IndexMap<String, Side>>,
}

impl NodeGeometry {
    pub fn new(p: Point, w: f64, h: f64) -> Self {
        Self {
            x: p.x,
            y: p.y,
            w,
            h,
            ports: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_rect(&mut self, r: Rect) {
        self.x = r.x;
        self.y = r.y;
        self.w = r.w;
        self.h = r.h;
    }
}

/// Absolute world frame for a Group node (spec §3 `ViewState.group[id]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupGeometry {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl GroupGeometry {
    pub fn new(p: Point, w: f64, h: f64) -> Self {
        Self {
            x: p.x,
            y: p.y,
            w,
            h,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_rect(&mut self, r: Rect) {
        self.x = r.x;
        self.y = r.y;
        self.w = r.w;
        self.h = r.h;
    }
}

/// A group's layout discipline (spec §3 `layout[groupId]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LayoutMode {
    #[default]
    Free,
    Lock,
}

/// Per-edge geometry (spec §3 `ViewState.edge[id]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeGeometry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waypoints: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
    /// Explicit override; when absent the effective mode is inferred
    /// from the LCG group's mode (spec §4.7).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_mode: Option<LayoutMode>,
}
