//! Size filters: absolute area, area relative to the frame, contour length.

use serde::{Deserialize, Serialize};
use vision_pipeline_core::{FrameSize, GeometryError, Target};

use crate::params::{check_range, unbounded};
use crate::{ConfigError, TargetPredicate};

/// Keeps targets with `min_area <= area <= max_area` (square pixels).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaFilter {
    pub min_area: f32,
    #[serde(with = "unbounded")]
    pub max_area: f32,
}

impl Default for AreaFilter {
    fn default() -> Self {
        Self {
            min_area: 200.0,
            max_area: f32::INFINITY,
        }
    }
}

impl AreaFilter {
    pub fn new(min_area: f32, max_area: f32) -> Result<Self, ConfigError> {
        let filter = Self { min_area, max_area };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(Self::NAME, "area", self.min_area, self.max_area)
    }
}

impl TargetPredicate for AreaFilter {
    const NAME: &'static str = "area_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let area = target.area();
        Ok(self.min_area <= area && area <= self.max_area)
    }
}

/// Keeps targets covering between `min_percent` and `max_percent` of the
/// frame, both given as fractions of `width * height`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PercentAreaFilter {
    pub min_percent: f32,
    pub max_percent: f32,
    pub frame: FrameSize,
}

impl Default for PercentAreaFilter {
    fn default() -> Self {
        Self {
            min_percent: 0.02,
            max_percent: 1.0,
            frame: FrameSize::default(),
        }
    }
}

impl PercentAreaFilter {
    pub fn new(min_percent: f32, max_percent: f32, frame: FrameSize) -> Result<Self, ConfigError> {
        let filter = Self {
            min_percent,
            max_percent,
            frame,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(Self::NAME, "percent", self.min_percent, self.max_percent)
    }
}

impl TargetPredicate for PercentAreaFilter {
    const NAME: &'static str = "percent_area_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let percent = target.area() / self.frame.area();
        Ok(self.min_percent <= percent && percent <= self.max_percent)
    }
}

/// Keeps targets whose open arc length lies in `[min_length, max_length]`.
///
/// Useful for line-like contours, which have almost no area.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthFilter {
    pub min_length: f32,
    #[serde(with = "unbounded")]
    pub max_length: f32,
}

impl Default for LengthFilter {
    fn default() -> Self {
        Self {
            min_length: 50.0,
            max_length: 76_800.0,
        }
    }
}

impl LengthFilter {
    pub fn new(min_length: f32, max_length: f32) -> Result<Self, ConfigError> {
        let filter = Self {
            min_length,
            max_length,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(Self::NAME, "length", self.min_length, self.max_length)
    }
}

impl TargetPredicate for LengthFilter {
    const NAME: &'static str = "length_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let length = target.open_arc_length();
        Ok(self.min_length <= length && length <= self.max_length)
    }
}
