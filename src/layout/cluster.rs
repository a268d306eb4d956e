use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::{point_radial, Layout, Orientation, Point, Positioned};
use crate::hierarchy::{Hierarchy, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClusterKind {
    /// Dendrogram: all leaves at the same depth.
    #[default]
    Cluster,
    /// Tidy tree (Reingold-Tilford): nodes at their own depth.
    Tree,
}

/// Minimum breadth distance between neighboring nodes, in units of one
/// node slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Separation {
    pub siblings: f64,
    pub cousins: f64,
}

impl Default for Separation {
    fn default() -> Self {
        Separation {
            siblings: 1.0,
            cousins: 2.0,
        }
    }
}

impl Separation {
    fn between(&self, hierarchy: &Hierarchy, a: NodeId, b: NodeId) -> f64 {
        if hierarchy.parent(a) == hierarchy.parent(b) {
            self.siblings
        } else {
            self.cousins
        }
    }
}

/// Node-link layout. Output points have breadth on x and depth on y; use
/// `to_screen` to place them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub kind: ClusterKind,
    /// `[breadth, depth]`; with `radial` the breadth is an angle span.
    pub size: [f64; 2],
    /// Fixed spacing per node instead of fitting into `size`.
    pub node_size: Option<[f64; 2]>,
    pub separation: Separation,
    pub radial: bool,
}

impl Default for Cluster {
    fn default() -> Self {
        Cluster {
            kind: ClusterKind::Cluster,
            size: [1.0, 1.0],
            node_size: None,
            separation: Separation::default(),
            radial: false,
        }
    }
}

impl Cluster {
    pub fn new(kind: ClusterKind, width: f64, height: f64) -> Self {
        Cluster {
            kind,
            size: [width, height],
            ..Default::default()
        }
    }

    /// Full circle of the given radius.
    pub fn radial(kind: ClusterKind, radius: f64) -> Self {
        Cluster {
            kind,
            size: [2.0 * PI, radius],
            radial: true,
            ..Default::default()
        }
    }

    pub fn with_node_size(mut self, dx: f64, dy: f64) -> Self {
        self.node_size = Some([dx, dy]);
        self
    }

    pub fn with_separation(mut self, separation: Separation) -> Self {
        self.separation = separation;
        self
    }

    /// Layout point to screen offset. Radial points are relative to the
    /// circle center.
    pub fn to_screen(&self, p: Point, orientation: Orientation) -> Point {
        if self.radial {
            point_radial(p.x, p.y)
        } else {
            orientation.apply(p)
        }
    }

    fn dendrogram(&self, hierarchy: &Hierarchy) -> Vec<Point> {
        let mut points = vec![Point::default(); hierarchy.len()];
        let mut previous: Option<NodeId> = None;
        let mut x = 0.0;

        for id in hierarchy.post_order(hierarchy.root()) {
            let children = hierarchy.children(id);
            if children.is_empty() {
                if let Some(prev) = previous {
                    x += self.separation.between(hierarchy, id, prev);
                }
                points[id.0] = Point::new(x, 0.0);
                previous = Some(id);
            } else {
                let mean = children.iter().map(|c| points[c.0].x).sum::<f64>() / children.len() as f64;
                let depth = 1.0 + children.iter().map(|c| points[c.0].y).fold(0.0, f64::max);
                points[id.0] = Point::new(mean, depth);
            }
        }

        let root = points[hierarchy.root().0];
        let [dx, dy] = self.size;
        if let Some([nx, ny]) = self.node_size {
            for p in points.iter_mut() {
                *p = Point::new((p.x - root.x) * nx, (root.y - p.y) * ny);
            }
            return points;
        }

        let leaves = hierarchy.leaves();
        let (left, right) = match (leaves.first(), leaves.last()) {
            (Some(&l), Some(&r)) => (l, r),
            _ => return points,
        };
        let x0 = points[left.0].x - self.separation.between(hierarchy, left, right) / 2.0;
        let x1 = points[right.0].x + self.separation.between(hierarchy, right, left) / 2.0;

        for p in points.iter_mut() {
            let y = if root.y != 0.0 { p.y / root.y } else { 1.0 };
            *p = Point::new((p.x - x0) / (x1 - x0) * dx, (1.0 - y) * dy);
        }
        points
    }

    fn tidy(&self, hierarchy: &Hierarchy) -> Vec<Point> {
        let n = hierarchy.len();
        let mut offsets = vec![0.0; n];
        // Per subtree: (leftmost, rightmost) x at each level below its root,
        // relative to the root.
        let mut contours: Vec<Vec<(f64, f64)>> = vec![Vec::new(); n];

        for id in hierarchy.post_order(hierarchy.root()) {
            let children = hierarchy.children(id);
            if children.is_empty() {
                contours[id.0] = vec![(0.0, 0.0)];
                continue;
            }

            let mut merged = std::mem::take(&mut contours[children[0].0]);
            let mut positions = vec![0.0];
            for &child in &children[1..] {
                let contour = std::mem::take(&mut contours[child.0]);
                let mut shift = f64::MIN;
                for (level, (&(_, right), &(left, _))) in merged.iter().zip(contour.iter()).enumerate() {
                    let gap = if level == 0 { self.separation.siblings } else { self.separation.cousins };
                    shift = shift.max(right - left + gap);
                }
                positions.push(shift);

                for (level, &(left, right)) in contour.iter().enumerate() {
                    if level < merged.len() {
                        merged[level].1 = right + shift;
                    } else {
                        merged.push((left + shift, right + shift));
                    }
                }
            }

            let mid = (positions[0] + positions[positions.len() - 1]) / 2.0;
            for (&child, pos) in children.iter().zip(&positions) {
                offsets[child.0] = pos - mid;
            }
            let mut contour = Vec::with_capacity(merged.len() + 1);
            contour.push((0.0, 0.0));
            contour.extend(merged.into_iter().map(|(l, r)| (l - mid, r - mid)));
            contours[id.0] = contour;
        }

        let mut xs = vec![0.0; n];
        for id in hierarchy.descendants(hierarchy.root()) {
            if let Some(parent) = hierarchy.parent(id) {
                xs[id.0] = xs[parent.0] + offsets[id.0];
            }
        }

        if let Some([nx, ny]) = self.node_size {
            return hierarchy
                .ids()
                .map(|id| Point::new(xs[id.0] * nx, hierarchy.node(id).depth as f64 * ny))
                .collect();
        }

        let by_x = |a: &NodeId, b: &NodeId| xs[a.0].total_cmp(&xs[b.0]);
        let left = hierarchy.ids().min_by(by_x).unwrap_or(hierarchy.root());
        let right = hierarchy.ids().max_by(by_x).unwrap_or(hierarchy.root());
        let bottom = hierarchy.max_depth();

        let [dx, dy] = self.size;
        let s = if left == right { 1.0 } else { self.separation.between(hierarchy, left, right) / 2.0 };
        let tx = s - xs[left.0];
        let kx = dx / (xs[right.0] + s + tx);
        let ky = dy / bottom.max(1) as f64;

        hierarchy
            .ids()
            .map(|id| Point::new((xs[id.0] + tx) * kx, hierarchy.node(id).depth as f64 * ky))
            .collect()
    }
}

impl Layout for Cluster {
    type Geometry = Point;

    fn layout(&self, hierarchy: &Hierarchy) -> Positioned<Point> {
        let points = match self.kind {
            ClusterKind::Cluster => self.dendrogram(hierarchy),
            ClusterKind::Tree => self.tidy(hierarchy),
        };
        Positioned::new(points)
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
            DataRecord::new(["a", "y"], 1.0),
            DataRecord::new(["b"], 1.0),
        ];
        TreeBuilder::new(&DataRecord::accessors()).build(&records).unwrap()
    }

    fn at(h: &Hierarchy, p: &Positioned<Point>, key: &[&str]) -> Point {
        *p.get(h.find(&PathKey::from(key)).unwrap())
    }

    #[test]
    fn test_dendrogram_aligns_leaves() {
        let h = hierarchy();
        let p = Cluster::new(ClusterKind::Cluster, 100.0, 60.0).layout(&h);

        for leaf in h.leaves() {
            assert!((p.get(leaf).y - 60.0).abs() < 1e-9);
        }
        assert_eq!(at(&h, &p, &[]).y, 0.0);

        let (ax, ay, b) = (at(&h, &p, &["a", "x"]), at(&h, &p, &["a", "y"]), at(&h, &p, &["b"]));
        assert!(ax.x < ay.x && ay.x < b.x);
        assert!((at(&h, &p, &["a"]).x - (ax.x + ay.x) / 2.0).abs() < 1e-9);
        // Leaf span: x=0, 1, 3 with half separations 1 on each end.
        assert!((ax.x - 100.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_tidy_tree_depths_and_centering() {
        let h = hierarchy();
        let p = Cluster::new(ClusterKind::Tree, 100.0, 40.0).layout(&h);

        assert!((at(&h, &p, &["a"]).y - 20.0).abs() < 1e-9);
        assert!((at(&h, &p, &["b"]).y - 20.0).abs() < 1e-9);
        assert!((at(&h, &p, &["a", "x"]).y - 40.0).abs() < 1e-9);

        let root = at(&h, &p, &[]);
        let (a, b) = (at(&h, &p, &["a"]), at(&h, &p, &["b"]));
        assert!((root.x - (a.x + b.x) / 2.0).abs() < 1e-9);
        for (_, point) in p.iter() {
            assert!(point.x >= 0.0 && point.x <= 100.0);
        }
    }

    #[test]
    fn test_tidy_tree_keeps_subtrees_apart() {
        let records = vec![
            DataRecord::new(["a", "1"], 1.0),
            DataRecord::new(["a", "2"], 1.0),
            DataRecord::new(["a", "3"], 1.0),
            DataRecord::new(["b", "1"], 1.0),
            DataRecord::new(["b", "2"], 1.0),
        ];
        let h = TreeBuilder::new(&DataRecord::accessors()).build(&records).unwrap();
        let p = Cluster::new(ClusterKind::Tree, 1.0, 1.0).with_node_size(1.0, 1.0).layout(&h);

        let a3 = at(&h, &p, &["a", "3"]);
        let b1 = at(&h, &p, &["b", "1"]);
        assert!(b1.x - a3.x >= 2.0 - 1e-9);
        assert_eq!(at(&h, &p, &[]).x, 0.0);
    }

    #[test]
    fn test_radial_screen_points() {
        let h = hierarchy();
        let cluster = Cluster::radial(ClusterKind::Cluster, 50.0);
        let p = cluster.layout(&h);
        for leaf in h.leaves() {
            let screen = cluster.to_screen(*p.get(leaf), Orientation::Vertical);
            assert!((screen.distance(&Point::new(0.0, 0.0)) - 50.0).abs() < 1e-9);
        }
        let root = cluster.to_screen(at(&h, &p, &[]), Orientation::Vertical);
        assert!(root.distance(&Point::new(0.0, 0.0)) < 1e-9);
    }

    #[test]
    fn test_single_node() {
        let h = TreeBuilder::new(&DataRecord::accessors()).build(&[]).unwrap();
        let p = Cluster::new(ClusterKind::Cluster, 10.0, 10.0).layout(&h);
        assert_eq!(*p.get(h.root()), Point::new(5.0, 0.0));
        let t = Cluster::new(ClusterKind::Tree, 10.0, 10.0).layout(&h);
        assert_eq!(t.get(h.root()).y, 0.0);
    }
}
