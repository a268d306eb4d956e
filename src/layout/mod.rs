//! Geometry for laid-out hierarchies.
//!
//! Every layout reads a `Hierarchy` and returns one geometry value per node,
//! indexed by `NodeId`.

mod cluster;
mod links;
mod partition;
mod treemap;

pub use cluster::{Cluster, ClusterKind, Separation};
pub use links::{link_path, LinkShape};
pub use partition::{ArcSegment, Partition, Sunburst};
pub use treemap::{squarify, Treemap};

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::hierarchy::{Hierarchy, NodeId};

/// A layout algorithm.
pub trait Layout {
    type Geometry: Clone;

    fn layout(&self, hierarchy: &Hierarchy) -> Positioned<Self::Geometry>;

    /// Whether `layout_focused` zooms. Layouts that cannot zoom collapse
    /// subtrees instead.
    fn supports_zoom(&self) -> bool {
        false
    }

    /// Geometry zoomed so `focus` fills the layout.
    fn layout_focused(&self, hierarchy: &Hierarchy, focus: NodeId) -> Positioned<Self::Geometry> {
        let _ = focus;
        self.layout(hierarchy)
    }
}

/// Per-node geometry produced by a `Layout`.
#[derive(Debug, Clone, PartialEq)]
pub struct Positioned<G> {
    items: Vec<G>,
}

impl<G> Positioned<G> {
    pub(crate) fn new(items: Vec<G>) -> Self {
        Positioned { items }
    }

    pub fn get(&self, id: NodeId) -> &G {
        &self.items[id.0]
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &G)> {
        self.items.iter().enumerate().map(|(i, g)| (NodeId(i), g))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Converts every node's geometry, keeping node order.
    pub fn map<H, F>(self, mut f: F) -> Positioned<H>
    where
        F: FnMut(NodeId, G) -> H,
    {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(i, g)| f(NodeId(i), g))
            .collect();
        Positioned { items }
    }
}

/// Axis-aligned box, `x0 <= x1` and `y0 <= y1`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Extent {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Extent { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }

    pub fn center(&self) -> Point {
        Point::new((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Same box with x and y exchanged.
    pub fn transposed(&self) -> Extent {
        Extent::new(self.y0, self.x0, self.y1, self.x1)
    }

    pub(crate) fn rounded(&self) -> Extent {
        Extent::new(self.x0.round(), self.y0.round(), self.x1.round(), self.y1.round())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Which way depth grows on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Root on the left, depth along x.
    #[default]
    Horizontal,
    /// Root on top, depth along y.
    Vertical,
}

impl Orientation {
    /// Maps a layout point (breadth on x, depth on y) to screen axes.
    pub fn apply(&self, p: Point) -> Point {
        match self {
            Orientation::Vertical => p,
            Orientation::Horizontal => Point::new(p.y, p.x),
        }
    }

    pub fn apply_extent(&self, e: &Extent) -> Extent {
        match self {
            Orientation::Vertical => *e,
            Orientation::Horizontal => e.transposed(),
        }
    }
}

/// Polar to cartesian, angle measured clockwise from 12 o'clock.
pub fn point_radial(angle: f64, radius: f64) -> Point {
    Point::new(radius * angle.sin(), -radius * angle.cos())
}

/// Angle (clockwise from 12 o'clock, in `[0, 2π)`) and radius of a point.
pub fn polar(p: Point) -> (f64, f64) {
    let angle = p.x.atan2(-p.y);
    let angle = if angle < 0.0 { angle + 2.0 * PI } else { angle };
    (angle, (p.x * p.x + p.y * p.y).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_point_radial_quadrants() {
        let top = point_radial(0.0, 10.0);
        assert!(close(top.x, 0.0) && close(top.y, -10.0));
        let right = point_radial(PI / 2.0, 10.0);
        assert!(close(right.x, 10.0) && close(right.y, 0.0));
    }

    #[test]
    fn test_polar_inverts_point_radial() {
        for angle in [0.1, 1.0, 2.5, 4.0, 6.0] {
            let (a, r) = polar(point_radial(angle, 3.0));
            assert!(close(a, angle), "{} vs {}", a, angle);
            assert!(close(r, 3.0));
        }
    }

    #[test]
    fn test_map_keeps_node_ids() {
        let positioned = Positioned::new(vec![1.0, 2.0, 3.0]);
        let mapped = positioned.map(|id, v| v * 10.0 + id.0 as f64);
        assert_eq!(mapped.get(NodeId(0)), &10.0);
        assert_eq!(mapped.get(NodeId(2)), &32.0);
        assert_eq!(mapped.len(), 3);
    }

    #[test]
    fn test_orientation_swaps_axes() {
        let p = Point::new(1.0, 2.0);
        assert_eq!(Orientation::Vertical.apply(p), p);
        assert_eq!(Orientation::Horizontal.apply(p), Point::new(2.0, 1.0));
        let e = Extent::new(0.0, 1.0, 2.0, 3.0);
        assert_eq!(Orientation::Horizontal.apply_extent(&e), Extent::new(1.0, 0.0, 3.0, 2.0));
    }

    #[test]
    fn test_extent_contains() {
        let e = Extent::new(0.0, 0.0, 2.0, 1.0);
        assert!(e.contains(1.0, 0.5));
        assert!(!e.contains(2.0, 0.5));
        assert_eq!(e.area(), 2.0);
        assert_eq!(e.center(), Point::new(1.0, 0.5));
    }
}
