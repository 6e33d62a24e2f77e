//! Scalar geometry helpers.
//!
//! Angles are expressed in degrees at the public boundary; filter thresholds
//! throughout the workspace rely on that convention.

use nalgebra::Point2;

use crate::FrameSize;

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Point2<f32>, b: Point2<f32>) -> f32 {
    (a - b).norm()
}

/// Area of a circle with the given radius.
#[inline]
pub fn circle_area(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}

/// Slope `dy / dx` of the line through two points; `0` for a vertical line.
pub fn slope(a: Point2<f32>, b: Point2<f32>) -> f32 {
    if a.x == b.x {
        return 0.0;
    }
    (a.y - b.y) / (a.x - b.x)
}

/// Angle in degrees between the line through two points and the x axis.
pub fn angle_between_points(a: Point2<f32>, b: Point2<f32>) -> f32 {
    slope(a, b).atan().to_degrees()
}

/// Inner angle (degrees) of a regular polygon with `sides` sides.
#[inline]
pub fn regular_polygon_inner_angle(sides: usize) -> f32 {
    let n = sides as f32;
    (n - 2.0) * (180.0 / n)
}

/// Area of a regular polygon with `sides` sides of length `side_length`.
pub fn regular_polygon_area(side_length: f32, sides: usize) -> f32 {
    let n = sides as f32;
    let half_angle = (180.0 / n).to_radians();
    0.25 * n * side_length * side_length * (half_angle.cos() / half_angle.sin())
}

/// Angle in degrees at vertex `a` of the triangle `(a, b, c)`.
///
/// Returns `0` when one of the sides meeting at `a` has zero length.
pub fn law_of_cosine_angle(a: Point2<f32>, b: Point2<f32>, c: Point2<f32>) -> f32 {
    let ab = distance(a, b);
    let ac = distance(a, c);
    let bc = distance(b, c);
    if ab <= f32::EPSILON || ac <= f32::EPSILON {
        return 0.0;
    }
    let cos = (ab * ab + ac * ac - bc * bc) / (2.0 * ab * ac);
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Focal length in pixels for an image side and the field of view (degrees)
/// along that side.
pub fn focal_length(image_side: u32, field_of_view: f32) -> f32 {
    image_side as f32 / (2.0 * (field_of_view / 2.0).to_radians().tan())
}

/// Horizontal camera angle (degrees) to a pixel column; negative is left of
/// the optical center.
pub fn horizontal_angle(x: f32, field_of_view: f32, image_width: u32) -> f32 {
    let offset = x - (image_width as f32 - 1.0) / 2.0;
    (offset / focal_length(image_width, field_of_view))
        .atan()
        .to_degrees()
}

/// Vertical camera angle (degrees) to a pixel row; negative is above the
/// optical center.
pub fn vertical_angle(y: f32, field_of_view: f32, image_height: u32) -> f32 {
    let offset = y - (image_height as f32 - 1.0) / 2.0;
    (offset / focal_length(image_height, field_of_view))
        .atan()
        .to_degrees()
}

/// Parameter `t` at which the ray `center + t * (point - center)` leaves the
/// frame rectangle. `None` when `point` is the frame center.
fn frame_exit_parameter(point: Point2<f32>, frame: &FrameSize) -> Option<f32> {
    let center = frame.center();
    let d = point - center;
    let mut t_exit = f32::INFINITY;
    for (dc, c, extent) in [
        (d.x, center.x, frame.width() as f32),
        (d.y, center.y, frame.height() as f32),
    ] {
        if dc > 0.0 {
            t_exit = t_exit.min((extent - c) / dc);
        } else if dc < 0.0 {
            t_exit = t_exit.min(-c / dc);
        }
    }
    t_exit.is_finite().then_some(t_exit)
}

/// Distance from `point` to the frame border, measured along the ray that
/// starts at the frame center and passes through `point`.
///
/// For the frame center itself this is the distance to the nearest border.
pub fn distance_from_frame(point: Point2<f32>, frame: &FrameSize) -> f32 {
    match frame_exit_parameter(point, frame) {
        Some(t) => ((t - 1.0) * (point - frame.center()).norm()).abs(),
        None => frame.center().x.min(frame.center().y),
    }
}

/// Position of `point` between the frame center (`0`) and the frame border
/// (`1`) along the ray from the center. Points outside the frame exceed `1`.
pub fn frame_center_ratio(point: Point2<f32>, frame: &FrameSize) -> f32 {
    match frame_exit_parameter(point, frame) {
        Some(t) => 1.0 / t,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn regular_polygon_formulas() {
        assert_relative_eq!(regular_polygon_inner_angle(3), 60.0);
        assert_relative_eq!(regular_polygon_inner_angle(4), 90.0);
        assert_relative_eq!(regular_polygon_inner_angle(6), 120.0);
        assert_relative_eq!(regular_polygon_area(2.0, 4), 4.0, epsilon = 1e-5);
        let hexagon = 3.0 * 3.0_f32.sqrt() / 2.0 * 10.0 * 10.0;
        assert_relative_eq!(regular_polygon_area(10.0, 6), hexagon, epsilon = 1e-2);
    }

    #[test]
    fn law_of_cosine_returns_degrees() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert_relative_eq!(law_of_cosine_angle(a, b, c), 90.0, epsilon = 1e-4);
        let e = Point2::new(0.5, 3.0_f32.sqrt() / 2.0);
        assert_relative_eq!(law_of_cosine_angle(a, b, e), 60.0, epsilon = 1e-3);
        assert_eq!(law_of_cosine_angle(a, a, c), 0.0);
    }

    #[test]
    fn center_ratio_is_zero_at_center_and_one_on_border() {
        let frame = FrameSize::new(200, 100).expect("frame");
        assert_eq!(frame_center_ratio(frame.center(), &frame), 0.0);
        assert_relative_eq!(frame_center_ratio(Point2::new(200.0, 50.0), &frame), 1.0);
        assert_relative_eq!(frame_center_ratio(Point2::new(150.0, 50.0), &frame), 0.5);
        assert_relative_eq!(frame_center_ratio(Point2::new(100.0, 25.0), &frame), 0.5);
        assert_relative_eq!(distance_from_frame(Point2::new(150.0, 50.0), &frame), 50.0);
    }

    #[test]
    fn camera_angles_are_symmetric() {
        let left = horizontal_angle(0.0, 60.0, 641);
        let right = horizontal_angle(640.0, 60.0, 641);
        assert_relative_eq!(left, -right, epsilon = 1e-4);
        assert!(left < 0.0);
        assert_relative_eq!(vertical_angle(240.0, 45.0, 481), 0.0);
    }
}
