//! Position filters based on target centroids.
//!
//! Both filters need a centroid, so zero-area targets fail with
//! [`GeometryError::DegenerateShape`]; area-filter first.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use vision_pipeline_core::geometry::frame_center_ratio;
use vision_pipeline_core::{distance, FrameSize, GeometryError, Target};

use crate::params::{check_range, unbounded};
use crate::{ConfigError, TargetPredicate};

/// Keeps targets whose centroid lies between `min_dist` and `max_dist`
/// pixels from `point`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceFilter {
    pub point: Point2<f32>,
    pub min_dist: f32,
    #[serde(with = "unbounded")]
    pub max_dist: f32,
}

impl Default for DistanceFilter {
    fn default() -> Self {
        Self {
            point: FrameSize::default().center(),
            min_dist: 0.0,
            max_dist: 50.0,
        }
    }
}

impl DistanceFilter {
    pub fn new(point: Point2<f32>, min_dist: f32, max_dist: f32) -> Result<Self, ConfigError> {
        let filter = Self {
            point,
            min_dist,
            max_dist,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(Self::NAME, "distance", self.min_dist, self.max_dist)
    }
}

impl TargetPredicate for DistanceFilter {
    const NAME: &'static str = "distance_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let d = distance(target.centroid()?, self.point);
        Ok(self.min_dist <= d && d <= self.max_dist)
    }
}

/// Keeps targets by how far their centroid sits between the frame center
/// (`0`) and the frame border (`1`), measured along the ray from the center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageCenterFilter {
    pub frame: FrameSize,
    pub min_ratio: f32,
    #[serde(with = "unbounded")]
    pub max_ratio: f32,
}

impl Default for ImageCenterFilter {
    fn default() -> Self {
        Self {
            frame: FrameSize::default(),
            min_ratio: 0.0,
            max_ratio: 0.7,
        }
    }
}

impl ImageCenterFilter {
    pub fn new(frame: FrameSize, min_ratio: f32, max_ratio: f32) -> Result<Self, ConfigError> {
        let filter = Self {
            frame,
            min_ratio,
            max_ratio,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(Self::NAME, "ratio", self.min_ratio, self.max_ratio)
    }
}

impl TargetPredicate for ImageCenterFilter {
    const NAME: &'static str = "image_center_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let ratio = frame_center_ratio(target.centroid()?, &self.frame);
        Ok(self.min_ratio <= ratio && ratio <= self.max_ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FilterError, TargetFilter};

    fn square_at(cx: i32, cy: i32) -> Target {
        Target::from_xy(&[
            [cx - 5, cy - 5],
            [cx + 5, cy - 5],
            [cx + 5, cy + 5],
            [cx - 5, cy + 5],
        ])
    }

    #[test]
    fn distance_filter_uses_centroids() {
        let filter = DistanceFilter::new(Point2::new(0.0, 0.0), 10.0, 30.0).expect("filter");
        let out = filter
            .apply(vec![square_at(5, 0), square_at(20, 0), square_at(0, 40)])
            .expect("filter");
        assert_eq!(out, vec![square_at(20, 0)]);
    }

    #[test]
    fn default_distance_filter_is_centered_on_the_default_frame() {
        let out = DistanceFilter::default()
            .apply(vec![square_at(160, 120), square_at(10, 10)])
            .expect("filter");
        assert_eq!(out, vec![square_at(160, 120)]);
    }

    #[test]
    fn image_center_filter_normalizes_by_the_frame_edge() {
        let frame = FrameSize::new(200, 100).expect("frame");
        let filter = ImageCenterFilter::new(frame, 0.0, 0.7).expect("filter");
        // Ratios: 0.0, 0.5 (horizontal), 0.8 (vertical), 0.9 (horizontal).
        let targets = vec![
            square_at(100, 50),
            square_at(150, 50),
            square_at(100, 90),
            square_at(10, 50),
        ];
        let out = filter.apply(targets).expect("filter");
        assert_eq!(out, vec![square_at(100, 50), square_at(150, 50)]);
    }

    #[test]
    fn degenerate_targets_fail_loudly() {
        let line = Target::from_xy(&[[0, 0], [4, 0]]);
        assert!(matches!(
            DistanceFilter::default().apply(vec![line.clone()]),
            Err(FilterError::Geometry(GeometryError::DegenerateShape { .. }))
        ));
        assert!(ImageCenterFilter::default().apply(vec![line]).is_err());
        assert!(ImageCenterFilter::default().apply(Vec::new()).expect("empty").is_empty());
    }
}
