//! Fill ratios: how much of an enclosing shape a target covers.
//!
//! Each function returns the ratio `target_area / enclosing_area` together
//! with the enclosing shape's dimensions. `reverse_div` flips the division.
//! A zero denominator yields `0` (forward) or `f32::INFINITY` (reversed)
//! instead of NaN.

use crate::Target;

fn ratio(target_area: f32, enclosing_area: f32, reverse_div: bool) -> f32 {
    let (num, den) = if reverse_div {
        (enclosing_area, target_area)
    } else {
        (target_area, enclosing_area)
    };
    if den > 0.0 {
        num / den
    } else if reverse_div {
        f32::INFINITY
    } else {
        0.0
    }
}

/// Fill ratio against the axis-aligned bounding rectangle.
/// Returns `(ratio, width, height)`.
pub fn straight_rectangle_fill_ratio(target: &Target, reverse_div: bool) -> (f32, f32, f32) {
    let rect = target.bounding_rect();
    (
        ratio(target.area(), rect.area(), reverse_div),
        rect.width,
        rect.height,
    )
}

/// Fill ratio against the minimum-area rotated rectangle.
/// Returns `(ratio, width, height)`.
pub fn rotated_rectangle_fill_ratio(target: &Target, reverse_div: bool) -> (f32, f32, f32) {
    let rect = target.min_area_rect();
    (
        ratio(target.area(), rect.area(), reverse_div),
        rect.width,
        rect.height,
    )
}

/// Fill ratio against the minimum enclosing circle. Returns `(ratio, radius)`.
pub fn circle_fill_ratio(target: &Target, reverse_div: bool) -> (f32, f32) {
    let circle = target.min_enclosing_circle();
    (
        ratio(target.area(), circle.area(), reverse_div),
        circle.radius,
    )
}

/// Fill ratio against the minimum enclosing triangle.
/// Returns `(ratio, triangle_area)`; the triangle area is `0` when the
/// target spans no triangle.
pub fn triangle_fill_ratio(target: &Target, reverse_div: bool) -> (f32, f32) {
    let triangle_area = target
        .min_enclosing_triangle()
        .map_or(0.0, |t| t.area());
    (
        ratio(target.area(), triangle_area, reverse_div),
        triangle_area,
    )
}
