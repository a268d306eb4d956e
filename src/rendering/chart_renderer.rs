//! Drawing of prepared charts.
//!
//! Geometry comes from the chart cache in canvas-local pixels; everything
//! here only translates it to screen positions and paints it.

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Shape, Stroke};
use rhier::layout::point_radial;
use rhier::{
    ArcSegment, DataRecord, Extent, Filterable, Hierarchy, HierarchyChart, NodeId, Orientation,
    PathKey, Point, PreparedChart, ThemeColors,
};

use crate::domain::{radial_direction, ChartLayout, NodeShape};
use crate::presentation::color_mapping;
use crate::rendering::text_utils::fit_label;
use crate::state::ChartSettings;

/// Outline segments per radian of sunburst arc.
const ARC_STEPS_PER_RADIAN: f64 = 24.0;
const NODE_RADIUS: f32 = 4.0;
/// Gap between a node-link node and its label.
const LABEL_GAP: f32 = 7.0;
const MIN_RECT_LABEL_HEIGHT: f64 = 12.0;

/// Paints shapes relative to the canvas corner.
pub struct ChartPainter<'a> {
    painter: &'a egui::Painter,
    origin: Pos2,
    font_id: FontId,
}

impl<'a> ChartPainter<'a> {
    pub fn new(painter: &'a egui::Painter, origin: Pos2) -> Self {
        Self {
            painter,
            origin,
            font_id: FontId::proportional(11.0),
        }
    }

    fn pos(&self, p: Point) -> Pos2 {
        Pos2::new(self.origin.x + p.x as f32, self.origin.y + p.y as f32)
    }

    fn offset_pos(&self, center: Point, p: Point) -> Pos2 {
        self.pos(Point::new(center.x + p.x, center.y + p.y))
    }

    pub fn rect(&self, e: &Extent, fill: Color32, stroke: Stroke) {
        if e.width() <= 0.0 || e.height() <= 0.0 {
            return;
        }
        let rect = egui::Rect::from_min_max(self.pos(Point::new(e.x0, e.y0)), self.pos(Point::new(e.x1, e.y1)));
        self.painter.rect_filled(rect, 0.0, fill);
        self.painter.rect_stroke(rect, 0.0, stroke, egui::StrokeKind::Inside);
    }

    /// Annular sector around `center`, filled as a triangle strip.
    pub fn arc(&self, center: Point, arc: &ArcSegment, fill: Color32, stroke: Stroke) {
        if arc.is_empty() {
            return;
        }
        let steps = ((arc.angle() * ARC_STEPS_PER_RADIAN).ceil() as usize).max(1);
        let mut mesh = egui::Mesh::default();
        for i in 0..=steps {
            let a = arc.start_angle + arc.angle() * i as f64 / steps as f64;
            mesh.colored_vertex(self.offset_pos(center, point_radial(a, arc.outer_radius)), fill);
            mesh.colored_vertex(self.offset_pos(center, point_radial(a, arc.inner_radius)), fill);
            if i > 0 {
                let v = (2 * i) as u32;
                mesh.add_triangle(v - 2, v - 1, v);
                mesh.add_triangle(v - 1, v + 1, v);
            }
        }
        self.painter.add(Shape::mesh(mesh));

        let outline: Vec<Pos2> = arc
            .outline(ARC_STEPS_PER_RADIAN)
            .into_iter()
            .map(|p| self.offset_pos(center, p))
            .collect();
        self.painter.add(Shape::closed_line(outline, stroke));
    }

    pub fn link(&self, points: &[Point], stroke: Stroke) {
        if points.len() < 2 {
            return;
        }
        let points: Vec<Pos2> = points.iter().map(|p| self.pos(*p)).collect();
        self.painter.add(Shape::line(points, stroke));
    }

    pub fn node(&self, at: Point, fill: Color32, stroke: Stroke) {
        self.painter.circle(self.pos(at), NODE_RADIUS, fill, stroke);
    }

    /// Text anchored at `at`, shortened to `max_width` when given.
    pub fn label(&self, at: Point, anchor: Align2, text: &str, color: Color32, max_width: Option<f32>) {
        let text = match max_width {
            Some(width) => match fit_label(text, width, &self.font_id, self.painter) {
                Some(t) => t,
                None => return,
            },
            None => text.to_string(),
        };
        self.painter.text(self.pos(at), anchor, text, self.font_id.clone(), color);
    }
}

/// Everything a chart render needs besides the painter.
pub struct ChartScene<'a> {
    pub chart: &'a HierarchyChart<DataRecord, ChartLayout>,
    pub prepared: &'a PreparedChart<NodeShape>,
    pub palette_slots: &'a [usize],
    pub settings: &'a ChartSettings,
    pub colors: &'a ThemeColors,
    pub hovered: Option<&'a PathKey>,
}

impl ChartScene<'_> {
    fn hierarchy(&self) -> &Hierarchy {
        &self.prepared.hierarchy
    }

    fn fill(&self, id: NodeId) -> Color32 {
        let node = self.hierarchy().node(id);
        let slot = self.palette_slots.get(id.0).copied().unwrap_or(0);
        color_mapping::node_fill(slot, node.depth, self.chart.highlight(&node.key), self.colors)
    }

    fn stroke(&self, id: NodeId) -> Stroke {
        let key = &self.hierarchy().node(id).key;
        let hovered = self.hovered == Some(key);
        color_mapping::node_stroke(self.chart.highlight(key), hovered, self.colors)
    }

    fn label_text(&self, id: NodeId) -> &str {
        self.chart.key_label(&self.hierarchy().node(id).key)
    }
}

/// Draws every node of the prepared chart.
pub fn render_chart(cp: &ChartPainter, scene: &ChartScene) {
    let layout = scene.chart.layout();
    let hierarchy = scene.hierarchy();
    let geometry = &scene.prepared.geometry;

    if scene.prepared.is_empty {
        render_empty(cp, scene, layout);
        return;
    }

    if let ChartLayout::Cluster { .. } = layout {
        // Links under nodes.
        let link_stroke = Stroke::new(1.0, scene.colors.link);
        for (id, shape) in geometry.iter() {
            if let (Some(parent), NodeShape::Node(child)) = (hierarchy.parent(id), shape) {
                if let NodeShape::Node(source) = geometry.get(parent) {
                    let points = layout.link_points(*source, *child, scene.settings.link_shape);
                    cp.link(&points, link_stroke);
                }
            }
        }
    }

    for (id, shape) in geometry.iter() {
        match shape {
            NodeShape::Rect(e) => cp.rect(e, scene.fill(id), scene.stroke(id)),
            // The root is the center disc.
            NodeShape::Arc(arc) if id != hierarchy.root() => {
                cp.arc(layout.origin(), arc, scene.fill(id), scene.stroke(id))
            }
            NodeShape::Arc(_) => {}
            NodeShape::Node(p) => cp.node(layout.node_position(*p), scene.fill(id), scene.stroke(id)),
        }
    }

    if scene.settings.show_labels {
        render_labels(cp, scene, layout);
    }
}

/// The lone root of a chart without data, titled with the empty title.
fn render_empty(cp: &ChartPainter, scene: &ChartScene, layout: &ChartLayout) {
    let root = scene.hierarchy().root();
    let shape = scene.prepared.geometry.get(root);
    let fill = color_mapping::empty_fill(scene.colors);
    let stroke = Stroke::new(1.0, scene.colors.border);

    let at = match shape {
        NodeShape::Rect(e) => {
            cp.rect(e, fill, stroke);
            e.center()
        }
        NodeShape::Arc(arc) => {
            cp.arc(layout.origin(), arc, fill, stroke);
            layout.origin()
        }
        NodeShape::Node(p) => {
            let at = layout.node_position(*p);
            cp.node(at, fill, stroke);
            Point::new(at.x, at.y + LABEL_GAP as f64)
        }
    };
    let anchor = if matches!(shape, NodeShape::Node(_)) { Align2::CENTER_TOP } else { Align2::CENTER_CENTER };
    cp.label(at, anchor, scene.chart.empty_title(), scene.colors.text_dim, None);
}

fn render_labels(cp: &ChartPainter, scene: &ChartScene, layout: &ChartLayout) {
    let hierarchy = scene.hierarchy();
    let geometry = &scene.prepared.geometry;

    for (id, shape) in geometry.iter() {
        let node = hierarchy.node(id);
        let text = scene.label_text(id);
        let anchor = layout.label_anchor(shape);

        match shape {
            NodeShape::Rect(e) => {
                if e.height() < MIN_RECT_LABEL_HEIGHT {
                    continue;
                }
                let color = color_mapping::label_color(scene.fill(id));
                let is_treemap_parent = matches!(layout, ChartLayout::Treemap(_)) && !node.is_leaf();
                if is_treemap_parent {
                    cp.label(Point::new(e.x0 + 3.0, e.y0 + 1.0), Align2::LEFT_TOP, text, color, Some(e.width() as f32 - 6.0));
                } else {
                    cp.label(anchor, Align2::CENTER_CENTER, text, color, Some(e.width() as f32 - 4.0));
                }
            }
            NodeShape::Arc(arc) => {
                if id == hierarchy.root() || arc.is_too_small(scene.chart.min_angle_for_label()) {
                    continue;
                }
                let color = color_mapping::label_color(scene.fill(id));
                let ring = (arc.outer_radius - arc.inner_radius) as f32;
                cp.label(anchor, Align2::CENTER_CENTER, text, color, Some(ring.max(24.0)));
            }
            NodeShape::Node(p) => {
                let (at, align) = node_label_placement(layout, *p, anchor, node.is_leaf());
                cp.label(at, align, text, scene.colors.text, None);
            }
        }
    }
}

/// Leaves label away from the root, inner nodes toward it.
fn node_label_placement(layout: &ChartLayout, p: Point, at: Point, is_leaf: bool) -> (Point, Align2) {
    let gap = LABEL_GAP as f64;
    match layout {
        ChartLayout::Cluster { layout: cluster, .. } if cluster.radial => {
            let dir = radial_direction(p);
            let sign = if is_leaf { 1.0 } else { -1.0 };
            let pos = Point::new(at.x + sign * gap * dir.x, at.y + sign * gap * dir.y);
            let outward_right = (dir.x >= 0.0) == is_leaf;
            let align = if outward_right { Align2::LEFT_CENTER } else { Align2::RIGHT_CENTER };
            (pos, align)
        }
        ChartLayout::Cluster { orientation: Orientation::Vertical, .. } => {
            if is_leaf {
                (Point::new(at.x, at.y + gap), Align2::CENTER_TOP)
            } else {
                (Point::new(at.x, at.y - gap), Align2::CENTER_BOTTOM)
            }
        }
        _ => {
            if is_leaf {
                (Point::new(at.x + gap, at.y), Align2::LEFT_CENTER)
            } else {
                (Point::new(at.x - gap, at.y), Align2::RIGHT_CENTER)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rhier::{Cluster, ClusterKind};

    #[test]
    fn test_label_placement_sides() {
        let flat = ChartLayout::Cluster {
            layout: Cluster::new(ClusterKind::Cluster, 100.0, 100.0),
            orientation: Orientation::Horizontal,
            origin: Point::default(),
        };
        let at = Point::new(50.0, 50.0);
        let (leaf, align) = node_label_placement(&flat, at, at, true);
        assert_eq!(align, Align2::LEFT_CENTER);
        assert!(leaf.x > at.x);
        let (inner, align) = node_label_placement(&flat, at, at, false);
        assert_eq!(align, Align2::RIGHT_CENTER);
        assert!(inner.x < at.x);

        let radial = ChartLayout::Cluster {
            layout: Cluster::radial(ClusterKind::Cluster, 100.0),
            orientation: Orientation::Horizontal,
            origin: Point::default(),
        };
        // Angle π/2 points right: leaf labels extend to the right.
        let p = Point::new(std::f64::consts::FRAC_PI_2, 100.0);
        let at = radial.node_position(p);
        let (pos, align) = node_label_placement(&radial, p, at, true);
        assert_eq!(align, Align2::LEFT_CENTER);
        assert!(pos.x > at.x);
    }
}
