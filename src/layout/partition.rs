use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{point_radial, polar, Extent, Layout, Point, Positioned};
use crate::hierarchy::{Hierarchy, NodeId};

/// Width of the strip left for neighbours and ancestors of a zoom focus.
const ZOOM_MARGIN: f64 = 20.0;
const EPSILON: f64 = 1e-9;

/// Linear map of `domain` onto `range`, clamped to `bounds`.
fn rescale(v: f64, domain: (f64, f64), range: (f64, f64), bounds: (f64, f64)) -> f64 {
    let t = (v - domain.0) / (domain.1 - domain.0);
    (range.0 + t * (range.1 - range.0)).clamp(bounds.0, bounds.1)
}

/// Adjacency (icicle) layout.
///
/// Depth runs along y in equal bands, one per level; along x each node gets
/// a slice of its parent's span proportional to its value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Partition {
    /// `[breadth, depth]` of the whole layout.
    pub size: [f64; 2],
    /// Gap subtracted from the far edge of every node on both axes.
    pub padding: f64,
    /// Round extents to whole units.
    pub round: bool,
}

impl Default for Partition {
    fn default() -> Self {
        Partition {
            size: [1.0, 1.0],
            padding: 0.0,
            round: false,
        }
    }
}

impl Partition {
    pub fn new(width: f64, height: f64) -> Self {
        Partition {
            size: [width, height],
            ..Default::default()
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }
}

impl Layout for Partition {
    type Geometry = Extent;

    fn supports_zoom(&self) -> bool {
        true
    }

    fn layout_focused(&self, hierarchy: &Hierarchy, focus: NodeId) -> Positioned<Extent> {
        self.zoom(&self.layout(hierarchy), focus)
    }

    fn layout(&self, hierarchy: &Hierarchy) -> Positioned<Extent> {
        let [dx, dy] = self.size;
        let levels = (hierarchy.max_depth() + 1) as f64;
        let mut extents = vec![Extent::default(); hierarchy.len()];

        let root = hierarchy.root();
        extents[root.0] = Extent::new(self.padding, self.padding, dx, dy / levels);

        // Pre-order: a node's children are placed from its unpadded extent,
        // then the node's own padding is applied.
        for id in hierarchy.descendants(root) {
            let node = hierarchy.node(id);
            let unpadded = extents[id.0];

            if !node.children.is_empty() {
                let y0 = dy * (node.depth + 1) as f64 / levels;
                let y1 = dy * (node.depth + 2) as f64 / levels;
                let scale = if node.value > 0.0 { unpadded.width() / node.value } else { 0.0 };
                let mut x = unpadded.x0;
                for &child in &node.children {
                    let x0 = x;
                    x += hierarchy.node(child).value * scale;
                    extents[child.0] = Extent::new(x0, y0, x, y1);
                }
            }

            extents[id.0] = pad(unpadded, self.padding);
        }

        if self.round {
            for e in extents.iter_mut() {
                *e = e.rounded();
            }
        }

        Positioned::new(extents)
    }
}

impl Partition {
    /// Rescales `extents` so `focus` spans the whole breadth and the levels
    /// from its depth down fill the depth axis.
    ///
    /// Neighbours and ancestors are squeezed into a margin strip along the
    /// edges that `focus` does not touch, everything else collapses onto
    /// the bounds.
    pub fn zoom(&self, extents: &Positioned<Extent>, focus: NodeId) -> Positioned<Extent> {
        let [dx, dy] = self.size;
        let f = *extents.get(focus);
        if f.width() <= EPSILON || dy - f.y0 <= EPSILON {
            return extents.clone();
        }

        let margin_x = ZOOM_MARGIN.min(dx / 8.0);
        let margin_y = ZOOM_MARGIN.min(dy / 8.0);
        let x_range = (
            if f.x0 > self.padding + EPSILON { margin_x } else { 0.0 },
            if f.x1 < dx - self.padding - EPSILON { dx - margin_x } else { dx },
        );
        let y_range = (if f.y0 > self.padding + EPSILON { margin_y } else { 0.0 }, dy);

        let zoomed = extents
            .iter()
            .map(|(_, e)| {
                let x = |v| rescale(v, (f.x0, f.x1), x_range, (0.0, dx));
                let y = |v| rescale(v, (f.y0, dy), y_range, (0.0, dy));
                let z = Extent::new(x(e.x0), y(e.y0), x(e.x1), y(e.y1));
                if self.round {
                    z.rounded()
                } else {
                    z
                }
            })
            .collect();
        Positioned::new(zoomed)
    }
}

fn pad(e: Extent, padding: f64) -> Extent {
    let (mut x0, mut y0) = (e.x0, e.y0);
    let (mut x1, mut y1) = (e.x1 - padding, e.y1 - padding);
    if x1 < x0 {
        x0 = (x0 + x1) / 2.0;
        x1 = x0;
    }
    if y1 < y0 {
        y0 = (y0 + y1) / 2.0;
        y1 = y0;
    }
    Extent::new(x0, y0, x1, y1)
}

/// Annular sector of a sunburst, angles clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcSegment {
    pub start_angle: f64,
    pub end_angle: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl ArcSegment {
    pub fn angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Whether the slice is too thin to carry a label.
    pub fn is_too_small(&self, min_angle_for_label: f64) -> bool {
        self.angle() < min_angle_for_label
    }

    pub fn is_empty(&self) -> bool {
        self.angle() <= 0.0 || self.outer_radius <= self.inner_radius
    }

    /// Midpoint of the sector, relative to the sunburst center.
    pub fn centroid(&self) -> Point {
        let angle = (self.start_angle + self.end_angle) / 2.0;
        let radius = (self.inner_radius + self.outer_radius) / 2.0;
        point_radial(angle, radius)
    }

    /// Hit test for a point relative to the sunburst center.
    pub fn contains(&self, p: Point) -> bool {
        let (angle, radius) = polar(p);
        radius >= self.inner_radius
            && radius < self.outer_radius
            && angle >= self.start_angle
            && angle < self.end_angle
    }

    /// Outline polygon: outer edge clockwise, inner edge back.
    pub fn outline(&self, steps_per_radian: f64) -> Vec<Point> {
        let steps = ((self.angle() * steps_per_radian).ceil() as usize).max(1);
        let mut points = Vec::with_capacity(2 * steps + 2);
        for i in 0..=steps {
            let a = self.start_angle + self.angle() * i as f64 / steps as f64;
            points.push(point_radial(a, self.outer_radius));
        }
        for i in (0..=steps).rev() {
            let a = self.start_angle + self.angle() * i as f64 / steps as f64;
            points.push(point_radial(a, self.inner_radius));
        }
        points
    }
}

/// Radial partition. The root becomes the center disc and is normally not
/// drawn; depth-one rings start at `inner_radius`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sunburst {
    pub radius: f64,
    pub inner_radius: f64,
}

impl Default for Sunburst {
    fn default() -> Self {
        Sunburst {
            radius: 90.0,
            inner_radius: 0.0,
        }
    }
}

impl Sunburst {
    pub fn new(radius: f64) -> Self {
        Sunburst { radius, inner_radius: 0.0 }
    }

    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = inner_radius;
        self
    }

    /// Rescales `arcs` so `focus` spans the full circle and its ring
    /// starts just outside a small center disc.
    ///
    /// The disc is left to the focus's ancestors, so the parent stays
    /// reachable; slices outside the focus collapse to zero angle.
    pub fn zoom(&self, arcs: &Positioned<ArcSegment>, focus: NodeId) -> Positioned<ArcSegment> {
        let f = *arcs.get(focus);
        if f.angle() <= EPSILON || self.radius - f.inner_radius <= EPSILON {
            return arcs.clone();
        }

        let full = 2.0 * PI;
        let hole = if f.inner_radius > EPSILON { ZOOM_MARGIN.min(self.radius / 4.0) } else { 0.0 };
        let angle = |v| rescale(v, (f.start_angle, f.end_angle), (0.0, full), (0.0, full));
        let radius = |v| rescale(v, (f.inner_radius, self.radius), (hole, self.radius), (0.0, self.radius));

        let zoomed = arcs
            .iter()
            .map(|(_, a)| ArcSegment {
                start_angle: angle(a.start_angle),
                end_angle: angle(a.end_angle),
                inner_radius: radius(a.inner_radius),
                outer_radius: radius(a.outer_radius),
            })
            .collect();
        Positioned::new(zoomed)
    }

    /// The slice under `p` (relative to the center), skipping the root.
    pub fn hit_test(&self, arcs: &Positioned<ArcSegment>, hierarchy: &Hierarchy, p: Point) -> Option<NodeId> {
        arcs.iter()
            .filter(|(id, _)| *id != hierarchy.root())
            .find(|(_, arc)| arc.contains(p))
            .map(|(id, _)| id)
    }
}

impl Layout for Sunburst {
    type Geometry = ArcSegment;

    fn supports_zoom(&self) -> bool {
        true
    }

    fn layout_focused(&self, hierarchy: &Hierarchy, focus: NodeId) -> Positioned<ArcSegment> {
        self.zoom(&self.layout(hierarchy), focus)
    }

    // Area-preserving rings: partition over [2π, r²] and take square roots.
    fn layout(&self, hierarchy: &Hierarchy) -> Positioned<ArcSegment> {
        let partition = Partition::new(2.0 * PI, self.radius * self.radius);
        let extents = partition.layout(hierarchy);

        let arcs = extents
            .iter()
            .map(|(id, e)| {
                let depth = hierarchy.node(id).depth;
                let inner = if depth == 1 { self.inner_radius } else { e.y0.sqrt() };
                ArcSegment {
                    start_angle: e.x0,
                    end_angle: e.x1,
                    inner_radius: inner,
                    outer_radius: e.y1.sqrt(),
                }
            })
            .collect();
        Positioned::new(arcs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataRecord;
    use crate::hierarchy::TreeBuilder;
    use crate::path_key::PathKey;

    fn hierarchy() -> Hierarchy {
        let records = vec![
            DataRecord::new(["a", "x"], 1.0),
            DataRecord::new(["a", "y"], 3.0),
            DataRecord::new(["b"], 4.0),
        ];
        TreeBuilder::new(&DataRecord::accessors()).build(&records).unwrap()
    }

    fn extent_of(h: &Hierarchy, p: &Positioned<Extent>, key: &[&str]) -> Extent {
        *p.get(h.find(&PathKey::from(key)).unwrap())
    }

    #[test]
    fn test_partition_bands_and_spans() {
        let h = hierarchy();
        let p = Partition::new(8.0, 3.0).layout(&h);

        assert_eq!(extent_of(&h, &p, &[]), Extent::new(0.0, 0.0, 8.0, 1.0));
        assert_eq!(extent_of(&h, &p, &["a"]), Extent::new(0.0, 1.0, 4.0, 2.0));
        assert_eq!(extent_of(&h, &p, &["b"]), Extent::new(4.0, 1.0, 8.0, 2.0));
        assert_eq!(extent_of(&h, &p, &["a", "x"]), Extent::new(0.0, 2.0, 1.0, 3.0));
        assert_eq!(extent_of(&h, &p, &["a", "y"]), Extent::new(1.0, 2.0, 4.0, 3.0));
    }

    #[test]
    fn test_partition_padding_and_round() {
        let h = hierarchy();
        let p = Partition::new(8.0, 3.0).with_padding(0.5).layout(&h);
        let a = extent_of(&h, &p, &["a"]);
        assert_eq!(a, Extent::new(0.5, 1.0, 3.75, 1.5));

        let rounded = Partition::new(10.0, 3.0).with_round(true).layout(&h);
        for (_, e) in rounded.iter() {
            assert_eq!(e.x0, e.x0.round());
            assert_eq!(e.x1, e.x1.round());
        }
    }

    #[test]
    fn test_zero_valued_parent_collapses_children() {
        let records = vec![DataRecord::new(["a", "b"], 0.0)];
        let h = TreeBuilder::new(&DataRecord::accessors()).build(&records).unwrap();
        let p = Partition::new(1.0, 1.0).layout(&h);
        let b = extent_of(&h, &p, &["a", "b"]);
        assert_eq!(b.width(), 0.0);
    }

    #[test]
    fn test_sunburst_rings() {
        let h = hierarchy();
        let arcs = Sunburst::new(3.0).with_inner_radius(0.5).layout(&h);

        let a = arcs.get(h.find(&PathKey::from(["a"])).unwrap());
        assert!((a.angle() - PI).abs() < 1e-9);
        assert_eq!(a.inner_radius, 0.5);
        assert!((a.outer_radius - 6.0f64.sqrt()).abs() < 1e-9);

        let ay = arcs.get(h.find(&PathKey::from(["a", "y"])).unwrap());
        assert!((ay.inner_radius - a.outer_radius).abs() < 1e-9);
        assert!((ay.outer_radius - 3.0).abs() < 1e-9);
        assert!(!ay.is_too_small(0.5));
        assert!(arcs.get(h.find(&PathKey::from(["a", "x"])).unwrap()).angle() > 0.5);
    }

    #[test]
    fn test_sunburst_hit_test_skips_root() {
        let h = hierarchy();
        let sunburst = Sunburst::new(3.0).with_inner_radius(1.0);
        let arcs = sunburst.layout(&h);

        // Right half is "a" (first half of the circle, clockwise from top).
        let hit = sunburst.hit_test(&arcs, &h, Point::new(2.0, 0.1)).unwrap();
        assert_eq!(h.node(hit).key.to_string(), "a");
        assert_eq!(sunburst.hit_test(&arcs, &h, Point::new(0.0, 0.2)), None);
        assert_eq!(sunburst.hit_test(&arcs, &h, Point::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_partition_zoom_fills_breadth() {
        let h = hierarchy();
        let partition = Partition::new(80.0, 30.0);
        let p = partition.layout(&h);

        let a = h.find(&PathKey::from(["a"])).unwrap();
        let zoomed = partition.zoom(&p, a);
        assert_eq!(extent_of(&h, &zoomed, &["a"]), Extent::new(0.0, 3.75, 70.0, 16.875));
        // Sibling and root shrink to strips along the untouched edges.
        let b = extent_of(&h, &zoomed, &["b"]);
        assert_eq!((b.x0, b.x1), (70.0, 80.0));
        assert_eq!(extent_of(&h, &zoomed, &[]), Extent::new(0.0, 0.0, 80.0, 3.75));
        assert_eq!(extent_of(&h, &zoomed, &["a", "y"]).y1, 30.0);

        let unzoomed = partition.zoom(&p, h.root());
        for ((_, z), (_, e)) in unzoomed.iter().zip(p.iter()) {
            assert!((z.x0 - e.x0).abs() < 1e-9 && (z.y1 - e.y1).abs() < 1e-9);
        }
        assert_eq!(partition.layout_focused(&h, a), zoomed);
    }

    #[test]
    fn test_sunburst_zoom_keeps_parent_reachable() {
        let h = hierarchy();
        let sunburst = Sunburst::new(3.0);
        let arcs = sunburst.layout(&h);
        let full = 2.0 * PI;

        let a = h.find(&PathKey::from(["a"])).unwrap();
        let zoomed = sunburst.zoom(&arcs, a);
        assert!((zoomed.get(a).angle() - full).abs() < 1e-9);
        assert_eq!(zoomed.get(h.find(&PathKey::from(["b"])).unwrap()).angle(), 0.0);

        let ax = h.find(&PathKey::from(["a", "x"])).unwrap();
        let zoomed = sunburst.zoom(&arcs, ax);
        let focus = zoomed.get(ax);
        assert!((focus.angle() - full).abs() < 1e-9);
        assert!((focus.inner_radius - 0.75).abs() < 1e-9);
        assert!((focus.outer_radius - 3.0).abs() < 1e-9);

        // The parent becomes the center disc and can still be hit.
        let parent = zoomed.get(a);
        assert_eq!(parent.inner_radius, 0.0);
        assert!((parent.outer_radius - 0.75).abs() < 1e-9);
        let hit = sunburst.hit_test(&zoomed, &h, Point::new(0.3, 0.1)).unwrap();
        assert_eq!(hit, a);
    }

    #[test]
    fn test_arc_outline_and_centroid() {
        let arc = ArcSegment { start_angle: 0.0, end_angle: PI / 2.0, inner_radius: 1.0, outer_radius: 2.0 };
        let outline = arc.outline(8.0);
        assert_eq!(outline.len(), 2 * 13 + 2);
        assert!(arc.contains(arc.centroid()));
    }
}
