use imageproc::contours::Contour;
use imageproc::point::Point;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::shapes::{self, Circle, Rect, RotatedRect, Triangle};
use crate::{triangle, GeometryError};

/// Default polygon-approximation tolerance as a fraction of the perimeter.
pub const DEFAULT_APPROXIMATION_COEFFICIENT: f32 = 0.02;

/// A detected shape candidate: the boundary of a blob as an ordered, closed
/// polygon of pixel positions.
///
/// Targets are immutable; every derived attribute is computed on demand.
/// Serialized as a list of `[x, y]` pairs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<[i32; 2]>", into = "Vec<[i32; 2]>")]
pub struct Target {
    points: Vec<Point<i32>>,
}

impl From<Vec<Point<i32>>> for Target {
    fn from(points: Vec<Point<i32>>) -> Self {
        Self::new(points)
    }
}

impl From<Contour<i32>> for Target {
    fn from(contour: Contour<i32>) -> Self {
        Self::new(contour.points)
    }
}

impl From<Vec<[i32; 2]>> for Target {
    fn from(points: Vec<[i32; 2]>) -> Self {
        Self::from_xy(&points)
    }
}

impl From<Target> for Vec<[i32; 2]> {
    fn from(target: Target) -> Self {
        target.points.iter().map(|p| [p.x, p.y]).collect()
    }
}

impl Target {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Build a target from raw `[x, y]` pixel pairs.
    pub fn from_xy(points: &[[i32; 2]]) -> Self {
        Self::new(points.iter().map(|p| Point::new(p[0], p[1])).collect())
    }

    /// Build a target from sub-pixel positions, rounded to the nearest pixel.
    pub fn from_subpixel(points: impl IntoIterator<Item = Point2<f32>>) -> Self {
        Self::new(
            points
                .into_iter()
                .map(|p| Point::new(p.x.round() as i32, p.y.round() as i32))
                .collect(),
        )
    }

    #[inline]
    pub fn points(&self) -> &[Point<i32>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area with sign (positive for counter-clockwise in a y-up frame).
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0f64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc += a.x as f64 * b.y as f64 - b.x as f64 * a.y as f64;
        }
        (0.5 * acc) as f32
    }

    /// Enclosed area in square pixels.
    #[inline]
    pub fn area(&self) -> f32 {
        self.signed_area().abs()
    }

    /// Length of the closed boundary.
    #[inline]
    pub fn perimeter(&self) -> f32 {
        shapes::arc_length(&self.points, true)
    }

    /// Length of the boundary treated as an open curve.
    #[inline]
    pub fn open_arc_length(&self) -> f32 {
        shapes::arc_length(&self.points, false)
    }

    /// Moment-based centroid of the enclosed region.
    ///
    /// Fails with [`GeometryError::DegenerateShape`] when the area is zero.
    pub fn centroid(&self) -> Result<Point2<f32>, GeometryError> {
        let n = self.points.len();
        let mut m00 = 0.0f64;
        let mut m10 = 0.0f64;
        let mut m01 = 0.0f64;
        if n >= 3 {
            for i in 0..n {
                let (ax, ay) = (self.points[i].x as f64, self.points[i].y as f64);
                let b = self.points[(i + 1) % n];
                let (bx, by) = (b.x as f64, b.y as f64);
                let cross = ax * by - bx * ay;
                m00 += cross;
                m10 += (ax + bx) * cross;
                m01 += (ay + by) * cross;
            }
        }
        m00 *= 0.5;
        if m00.abs() <= f64::EPSILON {
            return Err(GeometryError::DegenerateShape {
                area: m00.abs() as f32,
            });
        }
        Ok(Point2::new(
            (m10 / (6.0 * m00)) as f32,
            (m01 / (6.0 * m00)) as f32,
        ))
    }

    #[inline]
    pub fn bounding_rect(&self) -> Rect {
        shapes::bounding_rect(&self.points)
    }

    #[inline]
    pub fn min_area_rect(&self) -> RotatedRect {
        shapes::min_area_rect(&self.points)
    }

    #[inline]
    pub fn min_enclosing_circle(&self) -> Circle {
        shapes::min_enclosing_circle(&self.points)
    }

    /// `None` when the points do not span a triangle (collinear or < 3).
    #[inline]
    pub fn min_enclosing_triangle(&self) -> Option<Triangle> {
        triangle::min_enclosing_triangle(&self.points)
    }

    #[inline]
    pub fn convex_hull(&self) -> Vec<Point<i32>> {
        shapes::convex_hull(&self.points)
    }

    /// Closed polygon approximation within `coefficient * perimeter`.
    pub fn approximate(&self, coefficient: f32) -> Vec<Point<i32>> {
        shapes::approx_poly_closed(&self.points, coefficient * self.perimeter())
    }

    /// Open polyline approximation within `coefficient * open arc length`.
    pub fn approximate_open(&self, coefficient: f32) -> Vec<Point<i32>> {
        shapes::approx_poly_open(&self.points, coefficient * self.open_arc_length())
    }

    /// Vertex count of [`Target::approximate`].
    #[inline]
    pub fn approx_vertex_count(&self, coefficient: f32) -> usize {
        self.approximate(coefficient).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn area_and_centroid_of_rectangle() {
        let t = Target::from_xy(&[[10, 20], [40, 20], [40, 30], [10, 30]]);
        assert_relative_eq!(t.area(), 300.0);
        assert_relative_eq!(t.perimeter(), 80.0);
        assert_relative_eq!(t.open_arc_length(), 70.0);
        let c = t.centroid().expect("centroid");
        assert_relative_eq!(c.x, 25.0, epsilon = 1e-4);
        assert_relative_eq!(c.y, 25.0, epsilon = 1e-4);
    }

    #[test]
    fn orientation_does_not_change_area_or_centroid() {
        let cw = Target::from_xy(&[[0, 0], [0, 6], [6, 6], [6, 0]]);
        let ccw = Target::from_xy(&[[0, 0], [6, 0], [6, 6], [0, 6]]);
        assert_relative_eq!(cw.area(), ccw.area());
        assert_eq!(cw.centroid(), ccw.centroid());
    }

    #[test]
    fn degenerate_targets_have_no_centroid() {
        let line = Target::from_xy(&[[0, 0], [5, 5], [10, 10]]);
        assert_eq!(line.area(), 0.0);
        assert!(matches!(
            line.centroid(),
            Err(GeometryError::DegenerateShape { .. })
        ));
        assert!(Target::new(Vec::new()).centroid().is_err());
    }

    #[test]
    fn subpixel_points_round_to_the_nearest_pixel() {
        let t = Target::from_subpixel([Point2::new(0.4, 1.6), Point2::new(-2.5, 3.49)]);
        assert_eq!(t, Target::from_xy(&[[0, 2], [-3, 3]]));
    }

    #[test]
    fn contours_convert_into_targets() {
        let contour = Contour {
            points: vec![Point::new(1, 1), Point::new(4, 1), Point::new(4, 3)],
            border_type: imageproc::contours::BorderType::Outer,
            parent: None,
        };
        let t = Target::from(contour);
        assert_eq!(t.len(), 3);
        assert_relative_eq!(t.area(), 3.0);
    }

    #[test]
    fn serializes_as_point_list() {
        let t = Target::from_xy(&[[1, 2], [3, 4]]);
        let json = serde_json::to_string(&t).expect("json");
        assert_eq!(json, "[[1,2],[3,4]]");
        let back: Target = serde_json::from_str(&json).expect("parse");
        assert_eq!(back, t);
    }
}
