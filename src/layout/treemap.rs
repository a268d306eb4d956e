use serde::{Deserialize, Serialize};

use super::{Extent, Layout, Positioned};
use crate::hierarchy::Hierarchy;

/// Squarified treemap (Bruls, Huizing, van Wijk).
///
/// Each node's box is split among its children in proportion to value,
/// packing rows along the shorter side while that improves the worst aspect
/// ratio of the row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Treemap {
    pub size: [f64; 2],
    /// Gap between siblings.
    pub padding_inner: f64,
    /// Inset between a parent's box and its children on the left, right and
    /// bottom.
    pub padding_outer: f64,
    /// Inset at the top, typically taller to leave room for a label.
    pub padding_top: f64,
    pub round: bool,
}

impl Default for Treemap {
    fn default() -> Self {
        Treemap {
            size: [1.0, 1.0],
            padding_inner: 0.0,
            padding_outer: 0.0,
            padding_top: 0.0,
            round: false,
        }
    }
}

impl Treemap {
    pub fn new(width: f64, height: f64) -> Self {
        Treemap {
            size: [width, height],
            ..Default::default()
        }
    }

    /// Same padding everywhere.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding_inner = padding;
        self.padding_outer = padding;
        self.padding_top = padding;
        self
    }

    pub fn with_padding_top(mut self, padding_top: f64) -> Self {
        self.padding_top = padding_top;
        self
    }

    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }
}

impl Layout for Treemap {
    type Geometry = Extent;

    fn layout(&self, hierarchy: &Hierarchy) -> Positioned<Extent> {
        let [dx, dy] = self.size;
        let mut extents = vec![Extent::default(); hierarchy.len()];
        let root = hierarchy.root();
        extents[root.0] = Extent::new(0.0, 0.0, dx, dy);
        let half_inner = self.padding_inner / 2.0;

        for id in hierarchy.descendants(root) {
            let mut own = extents[id.0];
            if id != root {
                own = shrink(own, half_inner, half_inner, half_inner, half_inner);
                extents[id.0] = own;
            }

            let node = hierarchy.node(id);
            if node.children.is_empty() {
                continue;
            }

            let tile = shrink(
                own,
                self.padding_top - half_inner,
                self.padding_outer - half_inner,
                self.padding_outer - half_inner,
                self.padding_outer - half_inner,
            );
            let scale = if node.value > 0.0 { tile.area() / node.value } else { 0.0 };
            let areas: Vec<f64> = node
                .children
                .iter()
                .map(|&c| hierarchy.node(c).value * scale)
                .collect();

            for (&child, rect) in node.children.iter().zip(squarify(&areas, tile)) {
                extents[child.0] = rect;
            }
        }

        if self.round {
            for e in extents.iter_mut() {
                *e = e.rounded();
            }
        }

        Positioned::new(extents)
    }
}

fn shrink(e: Extent, top: f64, right: f64, bottom: f64, left: f64) -> Extent {
    let (mut x0, mut x1) = (e.x0 + left, e.x1 - right);
    let (mut y0, mut y1) = (e.y0 + top, e.y1 - bottom);
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

/// Lays out `areas` inside `rect`, returning one box per input in input
/// order. Areas are expected to add up to the area of `rect`; non-positive
/// entries get an empty box at the rect's origin.
pub fn squarify(areas: &[f64], rect: Extent) -> Vec<Extent> {
    let mut out = vec![Extent::new(rect.x0, rect.y0, rect.x0, rect.y0); areas.len()];

    let mut order: Vec<usize> = (0..areas.len()).filter(|&i| areas[i] > 0.0).collect();
    order.sort_by(|&a, &b| areas[b].total_cmp(&areas[a]));

    let (mut x, mut y) = (rect.x0, rect.y0);
    let (mut w, mut h) = (rect.width(), rect.height());

    let mut idx = 0usize;
    let mut row_start = 0usize;
    let mut row_sum = 0.0;
    let mut row_min = f64::INFINITY;
    let mut row_max = 0.0f64;

    while idx < order.len() {
        if w <= 1e-9 || h <= 1e-9 {
            break;
        }
        let c = areas[order[idx]];
        let side = w.min(h);
        let current = if row_sum > 0.0 {
            worst_aspect_ratio(row_min, row_max, row_sum, side)
        } else {
            f64::INFINITY
        };
        let next = worst_aspect_ratio(row_min.min(c), row_max.max(c), row_sum + c, side);

        if row_sum <= 0.0 || next <= current {
            row_sum += c;
            row_min = row_min.min(c);
            row_max = row_max.max(c);
            idx += 1;
            continue;
        }

        layout_row(&order[row_start..idx], areas, row_sum, (&mut x, &mut y, &mut w, &mut h), &mut out);
        row_start = idx;
        row_sum = 0.0;
        row_min = f64::INFINITY;
        row_max = 0.0;
    }

    if row_start < order.len() && w > 1e-9 && h > 1e-9 {
        layout_row(&order[row_start..idx], areas, row_sum, (&mut x, &mut y, &mut w, &mut h), &mut out);
    }

    out
}

fn layout_row(
    row: &[usize],
    areas: &[f64],
    row_sum: f64,
    (x, y, w, h): (&mut f64, &mut f64, &mut f64, &mut f64),
    out: &mut [Extent],
) {
    if row.is_empty() || row_sum <= 0.0 {
        return;
    }

    // Strip along the shorter side of the remaining space.
    let horizontal = *w <= *h;
    let short = if horizontal { *w } else { *h };
    let thickness = row_sum / short;
    if !thickness.is_finite() || thickness <= 0.0 {
        return;
    }

    let mut offset = 0.0;
    for (i, &item) in row.iter().enumerate() {
        let mut length = areas[item] / thickness;
        // Last box in the strip absorbs rounding error.
        if i == row.len() - 1 {
            length = (short - offset).max(0.0);
        }
        out[item] = if horizontal {
            Extent::new(*x + offset, *y, *x + offset + length, *y + thickness)
        } else {
            Extent::new(*x, *y + offset, *x + thickness, *y + offset + length)
        };
        offset += length;
    }

    if horizontal {
        *y += thickness;
        *h = (*h - thickness).max(0.0);
    } else {
        *x += thickness;
        *w = (*w - thickness).max(0.0);
    }
}

fn worst_aspect_ratio(min_r: f64, max_r: f64, sum: f64, side: f64) -> f64 {
    if sum <= 0.0 || side <= 0.0 || min_r <= 0.0 || max_r <= 0.0 {
        return f64::MAX;
    }
    let side_sq = side * side;
    let sum_sq = sum * sum;
    ((side_sq * max_r) / sum_sq).max(sum_sq / (side_sq * min_r))
}
