//! Chart kinds the viewer can switch between.
//!
//! `HierarchyChart` is generic over one layout, so the viewer wraps the
//! library layouts in `ChartLayout` and normalizes their output to
//! `NodeShape`. All shapes are in canvas-local pixels: rectangles relative to
//! the canvas corner, arcs and node points relative to `ChartLayout::origin`.

use rhier::layout::point_radial;
use rhier::{
    link_path, ArcSegment, Cluster, ClusterKind, Extent, Hierarchy, Layout, LinkShape, NodeId,
    Orientation, Partition, Point, Positioned, Sunburst, Treemap,
};
use serde::{Deserialize, Serialize};

use crate::state::ChartSettings;

/// Space kept free around node-link charts for labels.
const NODE_LINK_MARGIN: f64 = 60.0;
/// Gap between a sunburst and the canvas edge.
const SUNBURST_MARGIN: f64 = 8.0;
/// Hit radius around a node-link node, in pixels.
const NODE_HIT_RADIUS: f64 = 7.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    Sunburst,
    Partition,
    Treemap,
    Dendrogram,
    Tree,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Sunburst,
        ChartKind::Partition,
        ChartKind::Treemap,
        ChartKind::Dendrogram,
        ChartKind::Tree,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ChartKind::Sunburst => "Sunburst",
            ChartKind::Partition => "Partition",
            ChartKind::Treemap => "Treemap",
            ChartKind::Dendrogram => "Dendrogram",
            ChartKind::Tree => "Tidy Tree",
        }
    }

    /// Nodes drawn as points joined by links.
    pub fn is_node_link(&self) -> bool {
        matches!(self, ChartKind::Dendrogram | ChartKind::Tree)
    }

    /// Whether the orientation setting changes anything.
    pub fn has_orientation(&self) -> bool {
        matches!(self, ChartKind::Partition | ChartKind::Dendrogram | ChartKind::Tree)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeShape {
    Rect(Extent),
    Arc(ArcSegment),
    /// Node-link position in layout space (breadth, depth).
    Node(Point),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartLayout {
    Sunburst {
        layout: Sunburst,
        center: Point,
    },
    Partition {
        layout: Partition,
        orientation: Orientation,
    },
    Treemap(Treemap),
    Cluster {
        layout: Cluster,
        orientation: Orientation,
        origin: Point,
    },
}

impl Default for ChartLayout {
    fn default() -> Self {
        ChartLayout::from_settings(&ChartSettings::default(), 600.0, 400.0)
    }
}

impl ChartLayout {
    /// Layout for a canvas of `width` x `height` pixels.
    pub fn from_settings(settings: &ChartSettings, width: f64, height: f64) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let padding = settings.padding.max(0.0) as f64;

        match settings.kind {
            ChartKind::Sunburst => {
                let radius = (width.min(height) / 2.0 - SUNBURST_MARGIN).max(1.0);
                let inner = radius * settings.inner_radius_ratio.clamp(0.0, 0.9) as f64;
                ChartLayout::Sunburst {
                    layout: Sunburst::new(radius).with_inner_radius(inner),
                    center: Point::new(width / 2.0, height / 2.0),
                }
            }
            ChartKind::Partition => {
                let (breadth, depth) = match settings.orientation {
                    Orientation::Horizontal => (height, width),
                    Orientation::Vertical => (width, height),
                };
                ChartLayout::Partition {
                    layout: Partition::new(breadth, depth).with_padding(padding).with_round(true),
                    orientation: settings.orientation,
                }
            }
            ChartKind::Treemap => {
                let top = if padding > 0.0 { padding + 14.0 } else { 0.0 };
                ChartLayout::Treemap(
                    Treemap::new(width, height)
                        .with_padding(padding)
                        .with_padding_top(top)
                        .with_round(true),
                )
            }
            ChartKind::Dendrogram | ChartKind::Tree => {
                let kind = if settings.kind == ChartKind::Tree {
                    ClusterKind::Tree
                } else {
                    ClusterKind::Cluster
                };
                if settings.radial {
                    let radius = (width.min(height) / 2.0 - NODE_LINK_MARGIN).max(1.0);
                    ChartLayout::Cluster {
                        layout: Cluster::radial(kind, radius),
                        orientation: settings.orientation,
                        origin: Point::new(width / 2.0, height / 2.0),
                    }
                } else {
                    let inner_w = (width - 2.0 * NODE_LINK_MARGIN).max(1.0);
                    let inner_h = (height - 2.0 * NODE_LINK_MARGIN).max(1.0);
                    let (breadth, depth) = match settings.orientation {
                        Orientation::Horizontal => (inner_h, inner_w),
                        Orientation::Vertical => (inner_w, inner_h),
                    };
                    ChartLayout::Cluster {
                        layout: Cluster::new(kind, breadth, depth),
                        orientation: settings.orientation,
                        origin: Point::new(NODE_LINK_MARGIN, NODE_LINK_MARGIN),
                    }
                }
            }
        }
    }

    pub fn is_radial(&self) -> bool {
        match self {
            ChartLayout::Sunburst { .. } => true,
            ChartLayout::Cluster { layout, .. } => layout.radial,
            _ => false,
        }
    }

    /// Canvas-local point that arcs and node positions are relative to.
    pub fn origin(&self) -> Point {
        match self {
            ChartLayout::Sunburst { center, .. } => *center,
            ChartLayout::Cluster { origin, .. } => *origin,
            _ => Point::default(),
        }
    }

    /// Canvas-local position of a node-link node.
    pub fn node_position(&self, p: Point) -> Point {
        match self {
            ChartLayout::Cluster { layout, orientation, origin } => {
                let offset = layout.to_screen(p, *orientation);
                Point::new(origin.x + offset.x, origin.y + offset.y)
            }
            _ => p,
        }
    }

    /// Canvas-local polyline of the link between two node-link nodes.
    pub fn link_points(&self, source: Point, target: Point, shape: LinkShape) -> Vec<Point> {
        match self {
            ChartLayout::Cluster { layout, orientation, origin } => {
                link_path(source, target, shape, layout.radial)
                    .into_iter()
                    .map(|p| {
                        let p = if layout.radial { p } else { orientation.apply(p) };
                        Point::new(origin.x + p.x, origin.y + p.y)
                    })
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Label anchor for a node, canvas-local.
    pub fn label_anchor(&self, shape: &NodeShape) -> Point {
        match shape {
            NodeShape::Rect(e) => e.center(),
            NodeShape::Arc(arc) => {
                let c = arc.centroid();
                let o = self.origin();
                Point::new(o.x + c.x, o.y + c.y)
            }
            NodeShape::Node(p) => self.node_position(*p),
        }
    }

    /// The node under canvas-local point `p`. The root is never hit, so
    /// clicking empty space in the center does not add a filter.
    pub fn hit_test(&self, hierarchy: &Hierarchy, shapes: &Positioned<NodeShape>, p: Point) -> Option<NodeId> {
        let root = hierarchy.root();
        let candidates = shapes.iter().filter(|(id, _)| *id != root);

        match self {
            ChartLayout::Sunburst { center, .. } => {
                let local = Point::new(p.x - center.x, p.y - center.y);
                candidates
                    .filter(|(_, shape)| matches!(shape, NodeShape::Arc(arc) if !arc.is_empty() && arc.contains(local)))
                    .map(|(id, _)| id)
                    .next()
            }
            ChartLayout::Partition { .. } | ChartLayout::Treemap(_) => candidates
                .filter(|(_, shape)| matches!(shape, NodeShape::Rect(e) if e.area() > 0.0 && e.contains(p.x, p.y)))
                .map(|(id, _)| id)
                .max_by_key(|id| hierarchy.node(*id).depth),
            ChartLayout::Cluster { .. } => candidates
                .filter_map(|(id, shape)| match shape {
                    NodeShape::Node(q) => Some((id, self.node_position(*q).distance(&p))),
                    _ => None,
                })
                .filter(|(_, d)| *d <= NODE_HIT_RADIUS)
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(id, _)| id),
        }
    }
}

impl Layout for ChartLayout {
    type Geometry = NodeShape;

    fn layout(&self, hierarchy: &Hierarchy) -> Positioned<NodeShape> {
        match self {
            ChartLayout::Sunburst { layout, .. } => layout.layout(hierarchy).map(|_, arc| NodeShape::Arc(arc)),
            ChartLayout::Partition { layout, orientation } => layout
                .layout(hierarchy)
                .map(|_, e| NodeShape::Rect(orientation.apply_extent(&e))),
            ChartLayout::Treemap(layout) => layout.layout(hierarchy).map(|_, e| NodeShape::Rect(e)),
            ChartLayout::Cluster { layout, .. } => layout.layout(hierarchy).map(|_, p| NodeShape::Node(p)),
        }
    }

    fn supports_zoom(&self) -> bool {
        matches!(self, ChartLayout::Sunburst { .. } | ChartLayout::Partition { .. })
    }

    fn layout_focused(&self, hierarchy: &Hierarchy, focus: NodeId) -> Positioned<NodeShape> {
        match self {
            ChartLayout::Sunburst { layout, .. } => layout
                .layout_focused(hierarchy, focus)
                .map(|_, arc| NodeShape::Arc(arc)),
            ChartLayout::Partition { layout, orientation } => layout
                .layout_focused(hierarchy, focus)
                .map(|_, e| NodeShape::Rect(orientation.apply_extent(&e))),
            _ => self.layout(hierarchy),
        }
    }
}

/// Unit vector pointing away from the center at a radial node, used to
/// place labels outside the ring.
pub fn radial_direction(p: Point) -> Point {
    point_radial(p.x, 1.0)
}
