use vision_pipeline_core::GeometryError;
use vision_pipeline_filters::FilterError;

/// Invalid selector configuration, raised at construction.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("invalid target range: low ({low}) must be below high ({high})")]
    InvalidRange { low: usize, high: usize },
}

/// Invalid modifier configuration, raised at construction.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ModifierError {
    #[error("minimum_size must be a finite, non-negative fraction of the frame, got {0}")]
    InvalidMinimumSize(f32),
}

/// Fewer targets than the selector asks for.
///
/// Expected during normal operation; [`crate::Director::direct`] turns it
/// into the failed-detection value. `required` is `1` for selectors without
/// an explicit minimum.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("not enough targets: required {required}, found {found}")]
pub struct NotEnoughTargets {
    pub required: usize,
    pub found: usize,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DirectorError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Filter(#[from] FilterError),
}
