//! Direction functions: turn the selected targets into a raw direction.
//!
//! Any `Fn(&[Target], &FrameSize) -> Result<D, GeometryError>` closure is a
//! direction function too.

use nalgebra::Point2;
use vision_pipeline_core::{average_center, normalized_screen_space, FrameSize, GeometryError, Target};

pub trait DirectionFunction<D>: Send + Sync {
    fn directions(&self, targets: &[Target], frame: &FrameSize) -> Result<D, GeometryError>;
}

impl<D, F> DirectionFunction<D> for F
where
    F: Fn(&[Target], &FrameSize) -> Result<D, GeometryError> + Send + Sync,
{
    fn directions(&self, targets: &[Target], frame: &FrameSize) -> Result<D, GeometryError> {
        self(targets, frame)
    }
}

/// Average centroid of the targets, in pixels.
#[derive(Clone, Copy, Debug, Default)]
pub struct CenterDirections;

impl DirectionFunction<Point2<f32>> for CenterDirections {
    fn directions(&self, targets: &[Target], _frame: &FrameSize) -> Result<Point2<f32>, GeometryError> {
        average_center(targets)
    }
}

/// Average centroid in screen space: `[-1, 1]` on both axes, `(0, 0)` at
/// the frame center.
#[derive(Clone, Copy, Debug, Default)]
pub struct XyNormalizedDirections;

impl DirectionFunction<(f32, f32)> for XyNormalizedDirections {
    fn directions(&self, targets: &[Target], frame: &FrameSize) -> Result<(f32, f32), GeometryError> {
        normalized_screen_space(targets, frame)
    }
}

/// Horizontal screen-space coordinate only.
#[derive(Clone, Copy, Debug, Default)]
pub struct XNormalizedDirections;

impl DirectionFunction<f32> for XNormalizedDirections {
    fn directions(&self, targets: &[Target], frame: &FrameSize) -> Result<f32, GeometryError> {
        Ok(normalized_screen_space(targets, frame)?.0)
    }
}

/// Vertical screen-space coordinate only.
#[derive(Clone, Copy, Debug, Default)]
pub struct YNormalizedDirections;

impl DirectionFunction<f32> for YNormalizedDirections {
    fn directions(&self, targets: &[Target], frame: &FrameSize) -> Result<f32, GeometryError> {
        Ok(normalized_screen_space(targets, frame)?.1)
    }
}

/// Number of selected targets.
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetAmountDirections;

impl DirectionFunction<usize> for TargetAmountDirections {
    fn directions(&self, targets: &[Target], _frame: &FrameSize) -> Result<usize, GeometryError> {
        Ok(targets.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square_centered(cx: i32, cy: i32) -> Target {
        Target::from_xy(&[
            [cx - 2, cy - 2],
            [cx + 2, cy - 2],
            [cx + 2, cy + 2],
            [cx - 2, cy + 2],
        ])
    }

    #[test]
    fn frame_center_maps_to_origin_for_any_frame() {
        for (w, h) in [(320, 240), (640, 480), (101, 37), (1, 1)] {
            let frame = FrameSize::new(w, h).expect("frame");
            let (w, h) = (w as i32, h as i32);
            let whole = Target::from_xy(&[[0, 0], [w, 0], [w, h], [0, h]]);
            let (x, y) = XyNormalizedDirections
                .directions(&[whole], &frame)
                .expect("directions");
            assert_relative_eq!(x, 0.0, epsilon = 1e-5);
            assert_relative_eq!(y, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn pixel_origin_maps_to_minus_one() {
        let frame = FrameSize::new(320, 240).expect("frame");
        let (x, y) = XyNormalizedDirections
            .directions(&[square_centered(0, 0)], &frame)
            .expect("directions");
        assert_relative_eq!(x, -1.0, epsilon = 1e-5);
        assert_relative_eq!(y, -1.0, epsilon = 1e-5);
        assert_relative_eq!(
            XNormalizedDirections
                .directions(&[square_centered(320, 0)], &frame)
                .expect("x"),
            1.0,
            epsilon = 1e-5
        );
        assert_relative_eq!(
            YNormalizedDirections
                .directions(&[square_centered(0, 180)], &frame)
                .expect("y"),
            0.5,
            epsilon = 1e-5
        );
    }

    #[test]
    fn center_and_amount() {
        let frame = FrameSize::default();
        let targets = [square_centered(10, 10), square_centered(30, 50)];
        let c = CenterDirections.directions(&targets, &frame).expect("center");
        assert_relative_eq!(c.x, 20.0, epsilon = 1e-4);
        assert_relative_eq!(c.y, 30.0, epsilon = 1e-4);
        assert_eq!(TargetAmountDirections.directions(&targets, &frame), Ok(2));
    }

    #[test]
    fn closures_are_direction_functions() {
        let area = |targets: &[Target], _: &FrameSize| -> Result<f32, GeometryError> {
            Ok(targets.iter().map(Target::area).sum())
        };
        let total = area
            .directions(&[square_centered(5, 5)], &FrameSize::default())
            .expect("area");
        assert_relative_eq!(total, 16.0);
    }
}
