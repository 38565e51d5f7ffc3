//! Coordinate primitives (spec §4.1).
//!
//! Points, rectangles, grid snap, and world↔relative conversion. Every
//! drag input and layout output is snapped before being stored in
//! [`crate::viewstate::ViewState`].

use serde::{Deserialize, Serialize};

/// A point in the world coordinate frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// `relative = world − parentWorld`.
    pub fn to_relative(self, parent_world: Point) -> Point {
        Point::new(self.x - parent_world.x, self.y - parent_world.y)
    }

    /// `world = relative + parentWorld`.
    pub fn to_world(self, parent_world: Point) -> Point {
        Point::new(self.x + parent_world.x, self.y + parent_world.y)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub w: f64,
    pub h: f64,
}

impl Size {
    pub fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }
}

/// An axis-aligned rectangle in absolute world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn from_point_size(p: Point, s: Size) -> Self {
        Self::new(p.x, p.y, s.w, s.h)
    }

    pub fn top_left(self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(self) -> Size {
        Size::new(self.w, self.h)
    }

    pub fn right(self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(self) -> f64 {
        self.y + self.h
    }

    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    pub fn with_top_left(self, p: Point) -> Self {
        Self::new(p.x, p.y, self.w, self.h)
    }

    /// Full containment: `other` lies entirely inside `self`.
    pub fn contains_rect(self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// Snap a single value to the grid: `round(v / grid) * grid`.
pub fn snap(v: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        return v;
    }
    (v / grid).round() * grid
}

/// Snap both components of a point to the grid.
pub fn snap_point(p: Point, grid: f64) -> Point {
    Point::new(snap(p.x, grid), snap(p.y, grid))
}

/// Snap the top-left of a rectangle to the grid, leaving size untouched.
pub fn snap_rect(r: Rect, grid: f64) -> Rect {
    let tl = snap_point(r.top_left(), grid);
    Rect::new(tl.x, tl.y, r.w, r.h)
}

/// Whether two consecutive waypoints form an orthogonal segment: they
/// differ on exactly one axis within a tolerance of 1 unit (spec §3
/// "Waypoint orthogonality").
pub fn is_orthogonal_segment(a: Point, b: Point) -> bool {
    (a.x - b.x).abs() <= 1.0 || (a.y - b.y).abs() <= 1.0
}

/// Whether an entire polyline is orthogonal (every consecutive pair passes
/// [`is_orthogonal_segment`]) and has at least two points.
pub fn is_orthogonal_polyline(points: &[Point]) -> bool {
    points.len() >= 2 && points.windows(2).all(|w| is_orthogonal_segment(w[0], w[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn snap_boundary_cases() {
        assert_eq!(snap(123.0, 16.0), 128.0);
        assert_eq!(snap(187.0, 16.0), 192.0);
        assert_eq!(snap(-23.0, 16.0), -16.0);
        assert_eq!(snap(-45.0, 16.0), -48.0);
        assert_eq!(snap(160.0, 16.0), 160.0);
        assert_eq!(snap(240.0, 16.0), 240.0);
    }

    #[test]
    fn world_relative_roundtrip() {
        let parent = Point::new(100.0, 50.0);
        let world = Point::new(230.0, 80.0);
        let rel = world.to_relative(parent);
        assert_eq!(rel, Point::new(130.0, 30.0));
        assert_eq!(rel.to_world(parent), world);
    }

    #[test]
    fn containment() {
        let outer = Rect::new(0.0, 0.0, 200.0, 200.0);
        let inner = Rect::new(10.0, 10.0, 50.0, 50.0);
        let straddling = Rect::new(190.0, 10.0, 50.0, 50.0);
        assert!(outer.contains_rect(inner));
        assert!(!outer.contains_rect(straddling));
    }

    #[test]
    fn orthogonality() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.0, 40.0);
        let c = Point::new(40.0, 40.4);
        assert!(is_orthogonal_segment(a, b));
        assert!(!is_orthogonal_segment(a, c));
        assert!(is_orthogonal_polyline(&[a, b]));
        assert!(!is_orthogonal_polyline(&[a, c]));
        assert!(!is_orthogonal_polyline(&[a]));
    }
}
