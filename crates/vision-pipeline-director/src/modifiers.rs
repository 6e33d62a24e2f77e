//! Direction modifiers: post-processing steps run after the direction
//! function, in order. A modifier with `priority()` ends the chain.

use std::fmt;

use vision_pipeline_core::{target_size, FrameSize, Target};

use crate::{DirectorError, ModifierError};

pub trait DirectionModifier<D>: Send + Sync {
    /// When true, the director returns this modifier's result immediately.
    fn priority(&self) -> bool {
        false
    }

    /// Adjust `directions`. Must tolerate receiving the failed-detection
    /// value.
    fn modify_directions(
        &self,
        directions: D,
        targets: &[Target],
        frame: &FrameSize,
    ) -> Result<D, DirectorError>;
}

/// Sends `value_sent` once the targets cover at least `minimum_size` of
/// the frame (a fraction of `width * height`).
///
/// Values above `1.0` are accepted; overlapping targets can cover more than
/// the whole frame.
#[derive(Clone, Debug, PartialEq)]
pub struct StopIfCloseModifier<D> {
    pub minimum_size: f32,
    pub value_sent: D,
    pub priority: bool,
}

impl<D> StopIfCloseModifier<D> {
    pub fn new(minimum_size: f32, value_sent: D) -> Result<Self, ModifierError> {
        if !minimum_size.is_finite() || minimum_size < 0.0 {
            return Err(ModifierError::InvalidMinimumSize(minimum_size));
        }
        Ok(Self {
            minimum_size,
            value_sent,
            priority: false,
        })
    }

    pub fn with_priority(mut self, priority: bool) -> Self {
        self.priority = priority;
        self
    }
}

impl<D: Clone + Send + Sync> DirectionModifier<D> for StopIfCloseModifier<D> {
    fn priority(&self) -> bool {
        self.priority
    }

    fn modify_directions(
        &self,
        directions: D,
        targets: &[Target],
        frame: &FrameSize,
    ) -> Result<D, DirectorError> {
        let coverage = target_size(targets) / frame.area();
        if coverage >= self.minimum_size {
            log::debug!("targets cover {coverage:.3} of the frame, stopping");
            return Ok(self.value_sent.clone());
        }
        Ok(directions)
    }
}

/// Modifier built from a closure.
pub struct FnModifier<F> {
    priority: bool,
    f: F,
}

impl<F> FnModifier<F> {
    pub fn new(priority: bool, f: F) -> Self {
        Self { priority, f }
    }
}

impl<D, F> DirectionModifier<D> for FnModifier<F>
where
    F: Fn(D, &[Target], &FrameSize) -> Result<D, DirectorError> + Send + Sync,
{
    fn priority(&self) -> bool {
        self.priority
    }

    fn modify_directions(
        &self,
        directions: D,
        targets: &[Target],
        frame: &FrameSize,
    ) -> Result<D, DirectorError> {
        (self.f)(directions, targets, frame)
    }
}

impl<F> fmt::Debug for FnModifier<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnModifier")
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(side: i32) -> Target {
        Target::from_xy(&[[0, 0], [side, 0], [side, side], [0, side]])
    }

    #[test]
    fn stop_if_close_compares_covered_fraction() {
        let frame = FrameSize::new(100, 100).expect("frame");
        let stop = StopIfCloseModifier::new(0.5, -1.0_f32).expect("modifier");
        let far = stop
            .modify_directions(0.25, &[square(20)], &frame)
            .expect("modify");
        assert_eq!(far, 0.25);
        let close = stop
            .modify_directions(0.25, &[square(50), square(50)], &frame)
            .expect("modify");
        assert_eq!(close, -1.0);
        assert!(!DirectionModifier::<f32>::priority(&stop));
        assert!(DirectionModifier::<f32>::priority(&stop.with_priority(true)));
    }

    #[test]
    fn minimum_size_must_be_finite_and_non_negative() {
        for bad in [f32::NAN, f32::INFINITY, -0.1] {
            let err = StopIfCloseModifier::new(bad, 0).expect_err("rejected");
            assert!(matches!(err, ModifierError::InvalidMinimumSize(_)));
        }
        assert!(StopIfCloseModifier::new(0.0, 0).is_ok());
        assert!(StopIfCloseModifier::new(1.5, 0).is_ok());
    }

    #[test]
    fn closure_modifiers() {
        let double = FnModifier::new(
            false,
            |d: i32, _: &[Target], _: &FrameSize| -> Result<i32, DirectorError> { Ok(d * 2) },
        );
        let out = double
            .modify_directions(21, &[], &FrameSize::default())
            .expect("modify");
        assert_eq!(out, 42);
    }
}
