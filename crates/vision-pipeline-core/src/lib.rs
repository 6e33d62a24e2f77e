//! Core types and geometry for vision target pipelines.
//!
//! A [`Target`] is a detected contour: an ordered, closed polygon of integer
//! pixel positions, as produced by `imageproc::contours::find_contours`. This
//! crate computes everything filters and directors need to know about targets
//! (areas, centroids, enclosing shapes, fill ratios). Capturing frames and
//! thresholding them is left to the caller.

mod contours;
mod error;
mod fill_ratio;
mod frame;
pub mod geometry;
mod logger;
pub mod shapes;
mod target;
mod triangle;

pub use contours::{average_center, normalized_screen_space, target_size};
pub use error::GeometryError;
pub use fill_ratio::{
    circle_fill_ratio, rotated_rectangle_fill_ratio, straight_rectangle_fill_ratio,
    triangle_fill_ratio,
};
pub use frame::{Frame, FrameSize, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH};
pub use geometry::distance;
pub use shapes::{Circle, Rect, RotatedRect, Triangle};
pub use target::{Target, DEFAULT_APPROXIMATION_COEFFICIENT};
pub use triangle::min_enclosing_triangle;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, parse_level, LOG_ENV_VAR};

pub use imageproc::point::Point;
pub use nalgebra::Point2;
