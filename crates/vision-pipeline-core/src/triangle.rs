//! Minimal enclosing triangle of a point set.
//!
//! Searches triangles with one side flush with a hull edge. The two other
//! sides are refined by alternating updates: each update picks, among all
//! hull edges and all lines whose supporting hull vertex is the midpoint of
//! the side, the one that minimises the triangle area. Optimal enclosing
//! triangles touch the polygon at the midpoints of their sides and have at
//! least one flush side, so the search converges to them on the polygons a
//! vision pipeline sees.

use imageproc::point::Point;
use nalgebra::Point2;

use crate::shapes::{convex_hull, Triangle};

const REFINE_ITERATIONS: usize = 8;

/// Line `n · x = c` with unit outward normal `n`; the hull satisfies
/// `n · x <= c`.
#[derive(Clone, Copy, Debug)]
struct Line {
    n: [f64; 2],
    c: f64,
}

impl Line {
    fn normal_angle(&self) -> f64 {
        self.n[1].atan2(self.n[0])
    }

    fn intersect(&self, other: &Line) -> Option<[f64; 2]> {
        let det = self.n[0] * other.n[1] - self.n[1] * other.n[0];
        if det.abs() < 1e-12 {
            return None;
        }
        Some([
            (self.c * other.n[1] - other.c * self.n[1]) / det,
            (self.n[0] * other.c - other.n[0] * self.c) / det,
        ])
    }
}

fn dot(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[0] + a[1] * b[1]
}

struct Hull {
    pts: Vec<[f64; 2]>,
    edges: Vec<Line>,
}

impl Hull {
    fn new(points: &[Point<i32>]) -> Option<Self> {
        let hull = convex_hull(points);
        if hull.len() < 3 {
            return None;
        }
        let pts: Vec<[f64; 2]> = hull.iter().map(|p| [p.x as f64, p.y as f64]).collect();
        let n = pts.len();
        let edges = (0..n)
            .filter_map(|i| {
                let a = pts[i];
                let b = pts[(i + 1) % n];
                // Counter-clockwise hull: the outside is to the right.
                let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
                let len = dx.hypot(dy);
                (len > 1e-12).then(|| {
                    let normal = [dy / len, -dx / len];
                    Line {
                        n: normal,
                        c: dot(normal, a),
                    }
                })
            })
            .collect();
        Some(Self { pts, edges })
    }

    fn support(&self, angle: f64) -> Line {
        let n = [angle.cos(), angle.sin()];
        let c = self
            .pts
            .iter()
            .map(|&p| dot(n, p))
            .fold(f64::NEG_INFINITY, f64::max);
        Line { n, c }
    }

    /// Line through vertex `v` whose segment between `a` and `b` has `v` as
    /// its midpoint, if that line supports the hull.
    fn midpoint_line(&self, v: usize, a: &Line, b: &Line) -> Option<Line> {
        let p = self.pts[v];
        // Reflect `b` through `p` and intersect with `a`.
        let reflected = Line {
            n: b.n,
            c: 2.0 * dot(b.n, p) - b.c,
        };
        let x = a.intersect(&reflected)?;
        let y = [2.0 * p[0] - x[0], 2.0 * p[1] - x[1]];
        let (dx, dy) = (y[0] - x[0], y[1] - x[1]);
        let len = dx.hypot(dy);
        if len < 1e-12 {
            return None;
        }
        let count = self.pts.len();
        let prev = self.pts[(v + count - 1) % count];
        let next = self.pts[(v + 1) % count];
        for sign in [1.0, -1.0] {
            let n = [sign * dy / len, -sign * dx / len];
            let c = dot(n, p);
            let tol = 1e-9 * (1.0 + c.abs());
            if dot(n, prev) <= c + tol && dot(n, next) <= c + tol {
                return Some(Line { n, c });
            }
        }
        None
    }
}

/// Outward normals must positively span the plane for the three half-planes
/// to bound a finite triangle.
fn bounded(lines: [&Line; 3]) -> bool {
    let mut angles = lines.map(|l| l.normal_angle());
    angles.sort_by(f64::total_cmp);
    let pi = std::f64::consts::PI;
    let gaps = [
        angles[1] - angles[0],
        angles[2] - angles[1],
        std::f64::consts::TAU - (angles[2] - angles[0]),
    ];
    gaps.iter().all(|&g| g < pi - 1e-9)
}

fn triangle_of(a: &Line, b: &Line, c: &Line) -> Option<([[f64; 2]; 3], f64)> {
    if !bounded([a, b, c]) {
        return None;
    }
    let p = a.intersect(b)?;
    let q = b.intersect(c)?;
    let r = c.intersect(a)?;
    let area = 0.5 * ((q[0] - p[0]) * (r[1] - p[1]) - (q[1] - p[1]) * (r[0] - p[0])).abs();
    area.is_finite().then_some(([p, q, r], area))
}

fn best_side(hull: &Hull, fixed: &Line, other: &Line, current: Line) -> Line {
    let mut best = current;
    let mut best_area = triangle_of(fixed, &best, other).map_or(f64::INFINITY, |(_, a)| a);

    let midpoint_lines = (0..hull.pts.len()).filter_map(|v| hull.midpoint_line(v, fixed, other));
    for candidate in hull.edges.iter().copied().chain(midpoint_lines) {
        if let Some((_, area)) = triangle_of(fixed, &candidate, other) {
            if area < best_area {
                best_area = area;
                best = candidate;
            }
        }
    }
    best
}

/// Minimal-area triangle enclosing the points; `None` for fewer than three
/// non-collinear points.
pub fn min_enclosing_triangle(points: &[Point<i32>]) -> Option<Triangle> {
    let hull = Hull::new(points)?;
    let third = std::f64::consts::TAU / 3.0;

    let mut best: Option<([[f64; 2]; 3], f64)> = None;
    for flush in &hull.edges {
        let base = flush.normal_angle();
        let mut b = hull.support(base + third);
        let mut c = hull.support(base + 2.0 * third);
        for _ in 0..REFINE_ITERATIONS {
            b = best_side(&hull, flush, &c, b);
            c = best_side(&hull, flush, &b, c);
        }
        if let Some((vertices, area)) = triangle_of(flush, &b, &c) {
            if best.is_none_or(|(_, best_area)| area < best_area) {
                best = Some((vertices, area));
            }
        }
    }

    best.map(|(v, _)| Triangle {
        vertices: v.map(|p| Point2::new(p[0] as f32, p[1] as f32)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Target;
    use approx::assert_relative_eq;

    fn pts(raw: &[[i32; 2]]) -> Vec<Point<i32>> {
        raw.iter().map(|p| Point::new(p[0], p[1])).collect()
    }

    #[test]
    fn triangle_encloses_itself() {
        let tri = pts(&[[0, 0], [10, 0], [5, 8], [5, 2], [3, 4]]);
        let t = min_enclosing_triangle(&tri).expect("triangle");
        assert_relative_eq!(t.area(), 40.0, epsilon = 1e-2);
    }

    #[test]
    fn square_needs_twice_its_area() {
        let square = pts(&[[0, 0], [10, 0], [10, 10], [0, 10]]);
        let t = min_enclosing_triangle(&square).expect("triangle");
        assert_relative_eq!(t.area(), 200.0, epsilon = 1.0);
    }

    #[test]
    fn collinear_points_have_no_triangle() {
        assert!(min_enclosing_triangle(&pts(&[[0, 0], [1, 1], [2, 2]])).is_none());
    }

    #[test]
    fn enclosing_triangle_contains_every_point() {
        let hexagon = Target::from_subpixel((0..6).map(|k| {
            let a = (k as f32) * std::f32::consts::TAU / 6.0;
            Point2::new(20.0 * a.cos(), 20.0 * a.sin())
        }));
        let t = min_enclosing_triangle(hexagon.points()).expect("triangle");
        let [a, b, c] = t.vertices;
        let sign = |p: Point2<f32>, q: Point2<f32>, r: Point2<f32>| {
            (q.x - p.x) * (r.y - p.y) - (q.y - p.y) * (r.x - p.x)
        };
        let orientation = sign(a, b, c).signum();
        for p in hexagon.points() {
            let p = Point2::new(p.x as f32, p.y as f32);
            for (u, v) in [(a, b), (b, c), (c, a)] {
                assert!(sign(u, v, p) * orientation >= -1e-2);
            }
        }
        // Affine image of a regular hexagon: the optimum is 1.5x its area.
        assert_relative_eq!(t.area(), 1.5 * hexagon.area(), epsilon = 2.0);
    }
}
