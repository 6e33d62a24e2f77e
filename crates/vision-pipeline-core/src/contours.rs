//! Helpers over groups of targets.

use nalgebra::Point2;

use crate::{FrameSize, GeometryError, Target};

/// Sum of the areas of all targets.
pub fn target_size(targets: &[Target]) -> f32 {
    targets.iter().map(Target::area).sum()
}

/// Mean of the target centroids.
///
/// Fails with [`GeometryError::NoTargets`] on an empty slice and propagates
/// [`GeometryError::DegenerateShape`] from any zero-area target.
pub fn average_center(targets: &[Target]) -> Result<Point2<f32>, GeometryError> {
    if targets.is_empty() {
        return Err(GeometryError::NoTargets);
    }
    let mut sum = nalgebra::Vector2::<f32>::zeros();
    for target in targets {
        sum += target.centroid()?.coords;
    }
    Ok(Point2::from(sum / targets.len() as f32))
}

/// Average center mapped to `[-1, 1]` on both axes, `(0, 0)` at the frame
/// center.
pub fn normalized_screen_space(
    targets: &[Target],
    frame: &FrameSize,
) -> Result<(f32, f32), GeometryError> {
    Ok(frame.normalize(average_center(targets)?))
}
