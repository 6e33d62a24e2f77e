//! Enclosing shapes and polygon simplification for pixel contours.
//!
//! Hulls, rotated rectangles, arc lengths and Douglas-Peucker come from
//! `imageproc::geometry`; the minimum enclosing circle is computed here.
//! [`crate::Target`] exposes the same operations as methods.

use imageproc::geometry;
use imageproc::point::Point;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Rotated rectangle; `angle` is the direction of the `width` side in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    pub center: Point2<f32>,
    pub width: f32,
    pub height: f32,
    pub angle: f32,
}

impl RotatedRect {
    #[inline]
    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2<f32>,
    pub radius: f32,
}

impl Circle {
    #[inline]
    pub fn area(&self) -> f32 {
        crate::geometry::circle_area(self.radius)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point2<f32>; 3],
}

impl Triangle {
    pub fn area(&self) -> f32 {
        let [a, b, c] = self.vertices;
        0.5 * cross(b - a, c - a).abs()
    }
}

#[inline]
pub(crate) fn cross(u: Vector2<f32>, v: Vector2<f32>) -> f32 {
    u.x * v.y - u.y * v.x
}

/// Pixel position as a float point.
#[inline]
pub fn to_f32(p: Point<i32>) -> Point2<f32> {
    Point2::new(p.x as f32, p.y as f32)
}

/// Axis-aligned bounding rectangle of the points (zero rect when empty).
pub fn bounding_rect(points: &[Point<i32>]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::default();
    };
    let (mut min, mut max) = (*first, *first);
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Rect {
        x: min.x as f32,
        y: min.y as f32,
        width: (max.x - min.x) as f32,
        height: (max.y - min.y) as f32,
    }
}

/// Convex hull of the points, without collinear points.
pub fn convex_hull(points: &[Point<i32>]) -> Vec<Point<i32>> {
    if points.is_empty() {
        return Vec::new();
    }
    geometry::convex_hull(points)
}

/// Minimum-area enclosing rectangle; one side is flush with a hull edge.
pub fn min_area_rect(points: &[Point<i32>]) -> RotatedRect {
    if points.is_empty() {
        return RotatedRect {
            center: Point2::origin(),
            width: 0.0,
            height: 0.0,
            angle: 0.0,
        };
    }
    let corners = geometry::min_area_rect(points).map(to_f32);
    let center = Point2::from(corners.iter().map(|c| c.coords).sum::<Vector2<f32>>() / 4.0);

    // Corners in boundary order around the center.
    let mut ordered = corners;
    ordered.sort_by(|a, b| {
        let angle = |p: &Point2<f32>| (p.y - center.y).atan2(p.x - center.x);
        angle(a).total_cmp(&angle(b))
    });
    let side = ordered[1] - ordered[0];
    RotatedRect {
        center,
        width: side.norm(),
        height: (ordered[2] - ordered[1]).norm(),
        angle: side.y.atan2(side.x).to_degrees(),
    }
}

#[derive(Clone, Copy)]
struct Circle64 {
    c: [f64; 2],
    r: f64,
}

impl Circle64 {
    fn contains(&self, p: [f64; 2]) -> bool {
        let dx = p[0] - self.c[0];
        let dy = p[1] - self.c[1];
        (dx * dx + dy * dy).sqrt() <= self.r * (1.0 + 1e-7) + 1e-6
    }

    fn from_two(a: [f64; 2], b: [f64; 2]) -> Self {
        let c = [(a[0] + b[0]) * 0.5, (a[1] + b[1]) * 0.5];
        let r = ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt() * 0.5;
        Self { c, r }
    }

    fn from_three(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> Self {
        let bx = b[0] - a[0];
        let by = b[1] - a[1];
        let cx = c[0] - a[0];
        let cy = c[1] - a[1];
        let d = 2.0 * (bx * cy - by * cx);
        if d.abs() < 1e-12 {
            // Collinear: the widest pair spans the circle.
            let candidates = [Self::from_two(a, b), Self::from_two(a, c), Self::from_two(b, c)];
            return candidates
                .into_iter()
                .max_by(|l, r| l.r.total_cmp(&r.r))
                .unwrap_or(Self { c: a, r: 0.0 });
        }
        let b2 = bx * bx + by * by;
        let c2 = cx * cx + cy * cy;
        let ux = (cy * b2 - by * c2) / d;
        let uy = (bx * c2 - cx * b2) / d;
        Self {
            c: [a[0] + ux, a[1] + uy],
            r: (ux * ux + uy * uy).sqrt(),
        }
    }
}

/// Minimum enclosing circle (incremental Welzl over the hull vertices).
pub fn min_enclosing_circle(points: &[Point<i32>]) -> Circle {
    let hull = convex_hull(points);
    let pts: Vec<[f64; 2]> = hull.iter().map(|p| [p.x as f64, p.y as f64]).collect();
    let Some(&first) = pts.first() else {
        return Circle {
            center: Point2::origin(),
            radius: 0.0,
        };
    };

    let mut circle = Circle64 { c: first, r: 0.0 };
    for i in 0..pts.len() {
        if circle.contains(pts[i]) {
            continue;
        }
        circle = Circle64 { c: pts[i], r: 0.0 };
        for j in 0..i {
            if circle.contains(pts[j]) {
                continue;
            }
            circle = Circle64::from_two(pts[i], pts[j]);
            for k in 0..j {
                if !circle.contains(pts[k]) {
                    circle = Circle64::from_three(pts[i], pts[j], pts[k]);
                }
            }
        }
    }

    Circle {
        center: Point2::new(circle.c[0] as f32, circle.c[1] as f32),
        radius: circle.r as f32,
    }
}

/// Length of the polyline through the points, closing it when `closed`.
pub fn arc_length(points: &[Point<i32>], closed: bool) -> f32 {
    if points.len() < 2 {
        return 0.0;
    }
    geometry::arc_length(points, closed) as f32
}

/// Douglas-Peucker simplification of an open polyline.
pub fn approx_poly_open(points: &[Point<i32>], epsilon: f32) -> Vec<Point<i32>> {
    if points.len() <= 2 || epsilon <= 0.0 {
        return points.to_vec();
    }
    geometry::approximate_polygon_dp(points, epsilon as f64, false)
}

/// Douglas-Peucker simplification of a closed contour.
///
/// The contour is split at two mutually distant points (both extreme, so
/// both survive simplification) and each half is simplified as an open
/// chain.
pub fn approx_poly_closed(points: &[Point<i32>], epsilon: f32) -> Vec<Point<i32>> {
    let n = points.len();
    if n <= 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let farthest_from = |origin: Point<i32>| -> usize {
        (0..n)
            .max_by_key(|&k| {
                let (dx, dy) = ((points[k].x - origin.x) as i64, (points[k].y - origin.y) as i64);
                dx * dx + dy * dy
            })
            .unwrap_or(0)
    };
    let a = farthest_from(points[0]);
    let b = farthest_from(points[a]);
    if points[a] == points[b] {
        return vec![points[a]];
    }

    // Start the ring at `a`, split at `b`, close it back onto `a`.
    let mut ring: Vec<Point<i32>> = (0..=n).map(|k| points[(a + k) % n]).collect();
    let split = (b + n - a) % n;
    let second = ring.split_off(split);
    ring.push(second[0]);

    let mut out = geometry::approximate_polygon_dp(&ring, epsilon as f64, false);
    out.pop();
    let mut rest = geometry::approximate_polygon_dp(&second, epsilon as f64, false);
    rest.pop();
    out.extend(rest);
    out
}
