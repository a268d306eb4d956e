use serde::{Deserialize, Serialize};

use super::{point_radial, Point};

/// Shape of the edge drawn between a parent and a child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkShape {
    Direct,
    /// Across the breadth first, then down to the child.
    LShape,
    /// Down to the child's depth first, then across.
    LShapeAlt,
    /// Elbow with the bend halfway down.
    #[default]
    Dogleg,
    /// Elbow with the bend halfway across.
    DoglegAlt,
    Curved,
}

impl LinkShape {
    pub const ALL: [LinkShape; 6] = [
        LinkShape::Direct,
        LinkShape::LShape,
        LinkShape::LShapeAlt,
        LinkShape::Dogleg,
        LinkShape::DoglegAlt,
        LinkShape::Curved,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LinkShape::Direct => "direct",
            LinkShape::LShape => "l_shape",
            LinkShape::LShapeAlt => "l_shape_alt",
            LinkShape::Dogleg => "dogleg",
            LinkShape::DoglegAlt => "dogleg_alt",
            LinkShape::Curved => "curved",
        }
    }
}

const CURVE_STEPS: usize = 16;
const ARC_STEPS: usize = 12;

/// Polyline from `source` to `target`, both in layout space (breadth on x,
/// depth on y).
///
/// Cartesian output stays in layout space. Radial output is already
/// projected around the origin, with each bend following the circle it
/// lies on; a radial `Direct` link is a straight chord.
pub fn link_path(source: Point, target: Point, shape: LinkShape, radial: bool) -> Vec<Point> {
    let mid_x = (source.x + target.x) / 2.0;
    let mid_y = (source.y + target.y) / 2.0;

    let corners = match shape {
        LinkShape::Direct => {
            let ends = vec![source, target];
            return if radial { project(&ends) } else { ends };
        }
        LinkShape::LShape => vec![source, Point::new(target.x, source.y), target],
        LinkShape::LShapeAlt => vec![source, Point::new(source.x, target.y), target],
        LinkShape::Dogleg => vec![
            source,
            Point::new(source.x, mid_y),
            Point::new(target.x, mid_y),
            target,
        ],
        LinkShape::DoglegAlt => vec![
            source,
            Point::new(mid_x, source.y),
            Point::new(mid_x, target.y),
            target,
        ],
        LinkShape::Curved => bezier(
            source,
            Point::new(source.x, mid_y),
            Point::new(target.x, mid_y),
            target,
            CURVE_STEPS,
        ),
    };

    if radial {
        project(&densify(&corners, ARC_STEPS))
    } else {
        corners
    }
}

fn project(points: &[Point]) -> Vec<Point> {
    points.iter().map(|p| point_radial(p.x, p.y)).collect()
}

fn densify(points: &[Point], steps: usize) -> Vec<Point> {
    let mut out = Vec::with_capacity(points.len() * steps);
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        for i in 0..steps {
            let t = i as f64 / steps as f64;
            out.push(Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t));
        }
    }
    if let Some(&last) = points.last() {
        out.push(last);
    }
    out
}

fn bezier(p0: Point, p1: Point, p2: Point, p3: Point, steps: usize) -> Vec<Point> {
    (0..=steps)
        .map(|i| {
            let t = i as f64 / steps as f64;
            let u = 1.0 - t;
            let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            Point::new(
                a * p0.x + b * p1.x + c * p2.x + d * p3.x,
                a * p0.y + b * p1.y + c * p2.y + d * p3.y,
            )
        })
        .collect()
}
