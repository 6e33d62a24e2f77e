//! Shape filters.
//!
//! Fill ratios compare a target's area to an enclosing shape; polygon checks
//! use the vertex count of the closed approximation at
//! `approximation_coefficient * perimeter`.

use serde::{Deserialize, Serialize};
use vision_pipeline_core::geometry::{
    law_of_cosine_angle, regular_polygon_area, regular_polygon_inner_angle,
};
use vision_pipeline_core::shapes::to_f32;
use vision_pipeline_core::{
    circle_fill_ratio, distance, rotated_rectangle_fill_ratio, straight_rectangle_fill_ratio,
    triangle_fill_ratio, GeometryError, Target, DEFAULT_APPROXIMATION_COEFFICIENT,
};

use crate::params::{check_fraction, check_non_negative, check_range, unbounded};
use crate::{ConfigError, TargetPredicate};

/// Enclosing-circle diameter over the diagonal of a square with the
/// rectangle's area; `1` for a perfect square.
fn squareness(radius: f32, width: f32, height: f32) -> f32 {
    let side = (width * height).sqrt();
    if side <= 0.0 {
        return 0.0;
    }
    2.0 * radius / (std::f32::consts::SQRT_2 * side)
}

/// Fill-ratio threshold plus approximation tolerance.
struct FillParams {
    min_area_ratio: f32,
    approximation_coefficient: f32,
}

impl FillParams {
    fn validate(&self, filter: &str) -> Result<(), ConfigError> {
        check_fraction(filter, "min_area_ratio", self.min_area_ratio)?;
        check_non_negative(filter, "approximation_coefficient", self.approximation_coefficient)
    }

    /// Returns `(width, height)` of the enclosing rectangle when the target
    /// fills more than `min_area_ratio` of it and approximates to four
    /// vertices.
    fn rectangle(&self, target: &Target, rotated: bool) -> Option<(f32, f32)> {
        let (ratio, width, height) = if rotated {
            rotated_rectangle_fill_ratio(target, false)
        } else {
            straight_rectangle_fill_ratio(target, false)
        };
        (ratio > self.min_area_ratio
            && target.approx_vertex_count(self.approximation_coefficient) == 4)
            .then_some((width, height))
    }
}

macro_rules! fill_filter {
    ($(#[$doc:meta])* $name:ident, $default_ratio:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub min_area_ratio: f32,
            pub approximation_coefficient: f32,
        }

        impl Default for $name {
            fn default() -> Self {
                Self {
                    min_area_ratio: $default_ratio,
                    approximation_coefficient: DEFAULT_APPROXIMATION_COEFFICIENT,
                }
            }
        }

        impl $name {
            pub fn new(min_area_ratio: f32) -> Result<Self, ConfigError> {
                let filter = Self {
                    min_area_ratio,
                    ..Self::default()
                };
                filter.validate()?;
                Ok(filter)
            }

            pub fn validate(&self) -> Result<(), ConfigError> {
                self.params().validate(<Self as TargetPredicate>::NAME)
            }

            fn params(&self) -> FillParams {
                FillParams {
                    min_area_ratio: self.min_area_ratio,
                    approximation_coefficient: self.approximation_coefficient,
                }
            }
        }
    };
}

fill_filter!(
    /// Axis-aligned rectangles: bounding-box fill above `min_area_ratio` and
    /// four approximated vertices.
    StraightRectangleFilter,
    0.8
);
fill_filter!(
    /// Rectangles at any rotation, measured against the minimum-area
    /// rectangle.
    RotatedRectangleFilter,
    0.8
);
fill_filter!(
    /// Straight rectangles taller than they are wide.
    VerticalRectangleFilter,
    0.7
);
fill_filter!(
    /// Straight rectangles wider than they are tall.
    HorizontalRectangleFilter,
    0.8
);
fill_filter!(
    /// Triangles: enclosing-triangle fill above `min_area_ratio` and three
    /// approximated vertices.
    TriangleFilter,
    0.8
);

impl TargetPredicate for StraightRectangleFilter {
    const NAME: &'static str = "straight_rectangle_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        Ok(self.params().rectangle(target, false).is_some())
    }
}

impl TargetPredicate for RotatedRectangleFilter {
    const NAME: &'static str = "rotated_rectangle_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        Ok(self.params().rectangle(target, true).is_some())
    }
}

impl TargetPredicate for VerticalRectangleFilter {
    const NAME: &'static str = "vertical_rectangle_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        Ok(matches!(self.params().rectangle(target, false), Some((w, h)) if w < h))
    }
}

impl TargetPredicate for HorizontalRectangleFilter {
    const NAME: &'static str = "horizontal_rectangle_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        Ok(matches!(self.params().rectangle(target, false), Some((w, h)) if w > h))
    }
}

impl TargetPredicate for TriangleFilter {
    const NAME: &'static str = "triangle_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let (ratio, _) = triangle_fill_ratio(target, false);
        Ok(ratio > self.min_area_ratio
            && target.approx_vertex_count(self.approximation_coefficient) == 3)
    }
}

/// Parameters of the square filters: a rectangle whose enclosing circle
/// diameter matches the diagonal of a square of the same area within
/// `[min_ratio, max_ratio]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquareParams {
    pub min_area_ratio: f32,
    pub min_ratio: f32,
    pub max_ratio: f32,
    pub approximation_coefficient: f32,
}

impl Default for SquareParams {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.8,
            min_ratio: 0.95,
            max_ratio: 1.05,
            approximation_coefficient: DEFAULT_APPROXIMATION_COEFFICIENT,
        }
    }
}

impl SquareParams {
    fn validate(&self, filter: &str) -> Result<(), ConfigError> {
        check_fraction(filter, "min_area_ratio", self.min_area_ratio)?;
        check_range(filter, "squareness", self.min_ratio, self.max_ratio)?;
        check_non_negative(filter, "approximation_coefficient", self.approximation_coefficient)
    }

    fn accepts(&self, target: &Target, rotated: bool) -> bool {
        let fill = FillParams {
            min_area_ratio: self.min_area_ratio,
            approximation_coefficient: self.approximation_coefficient,
        };
        let Some((width, height)) = fill.rectangle(target, rotated) else {
            return false;
        };
        let radius = target.min_enclosing_circle().radius;
        let ratio = squareness(radius, width, height);
        self.min_ratio <= ratio && ratio <= self.max_ratio
    }
}

/// Axis-aligned squares.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StraightSquareFilter(pub SquareParams);

/// Squares at any rotation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RotatedSquareFilter(pub SquareParams);

impl StraightSquareFilter {
    pub fn new(params: SquareParams) -> Result<Self, ConfigError> {
        params.validate(Self::NAME)?;
        Ok(Self(params))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.0.validate(Self::NAME)
    }
}

impl RotatedSquareFilter {
    pub fn new(params: SquareParams) -> Result<Self, ConfigError> {
        params.validate(Self::NAME)?;
        Ok(Self(params))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.0.validate(Self::NAME)
    }
}

impl TargetPredicate for StraightSquareFilter {
    const NAME: &'static str = "straight_square_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        Ok(self.0.accepts(target, false))
    }
}

impl TargetPredicate for RotatedSquareFilter {
    const NAME: &'static str = "rotated_square_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        Ok(self.0.accepts(target, true))
    }
}

/// Circles: the target fills at least `min_area_ratio` of its enclosing
/// circle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleFilter {
    pub min_area_ratio: f32,
}

impl Default for CircleFilter {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.7,
        }
    }
}

impl CircleFilter {
    pub fn new(min_area_ratio: f32) -> Result<Self, ConfigError> {
        let filter = Self { min_area_ratio };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction(Self::NAME, "min_area_ratio", self.min_area_ratio)
    }
}

impl TargetPredicate for CircleFilter {
    const NAME: &'static str = "circle_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let (ratio, _) = circle_fill_ratio(target, false);
        Ok(ratio >= self.min_area_ratio)
    }
}

/// Circles whose enclosing diameter also matches the bounding box:
/// `(2r)^2 / (w * h) >= min_len_ratio^2`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstrainingCircleFilter {
    pub min_area_ratio: f32,
    pub min_len_ratio: f32,
}

impl Default for ConstrainingCircleFilter {
    fn default() -> Self {
        Self {
            min_area_ratio: 0.8,
            min_len_ratio: 0.9,
        }
    }
}

impl ConstrainingCircleFilter {
    pub fn new(min_area_ratio: f32, min_len_ratio: f32) -> Result<Self, ConfigError> {
        let filter = Self {
            min_area_ratio,
            min_len_ratio,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction(Self::NAME, "min_area_ratio", self.min_area_ratio)?;
        check_fraction(Self::NAME, "min_len_ratio", self.min_len_ratio)
    }
}

impl TargetPredicate for ConstrainingCircleFilter {
    const NAME: &'static str = "constraining_circle_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let (fill, radius) = circle_fill_ratio(target, false);
        if fill < self.min_area_ratio {
            return Ok(false);
        }
        let rect = target.bounding_rect();
        let box_area = rect.area();
        if box_area <= 0.0 {
            return Ok(false);
        }
        let diameter = 2.0 * radius;
        Ok(diameter * diameter / box_area >= self.min_len_ratio * self.min_len_ratio)
    }
}

/// Regular polygons with `side_amount` sides.
///
/// Deviations are relative: a side passes when `|side - mean| / mean` is at
/// most `side_length_deviation`, and likewise for angles. The mean angle
/// must match the regular inner angle, and the area must be within
/// `[fill_ratio, 1 / fill_ratio]` of a regular polygon with the mean side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolygonFilter {
    pub side_amount: usize,
    pub angle_deviation: f32,
    pub side_length_deviation: f32,
    pub fill_ratio: f32,
    pub approximation_coefficient: f32,
}

impl Default for PolygonFilter {
    fn default() -> Self {
        Self {
            side_amount: 6,
            angle_deviation: 0.1,
            side_length_deviation: 0.1,
            fill_ratio: 0.7,
            approximation_coefficient: DEFAULT_APPROXIMATION_COEFFICIENT,
        }
    }
}

fn within_deviation(value: f32, mean: f32, deviation: f32) -> bool {
    mean > 0.0 && (value - mean).abs() / mean <= deviation
}

impl PolygonFilter {
    pub fn new(side_amount: usize) -> Result<Self, ConfigError> {
        let filter = Self {
            side_amount,
            ..Self::default()
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.side_amount < 3 {
            return Err(ConfigError::invalid(
                Self::NAME,
                format!("a polygon needs at least 3 sides, got {}", self.side_amount),
            ));
        }
        check_fraction(Self::NAME, "angle_deviation", self.angle_deviation)?;
        check_fraction(Self::NAME, "side_length_deviation", self.side_length_deviation)?;
        check_fraction(Self::NAME, "fill_ratio", self.fill_ratio)?;
        if self.fill_ratio <= 0.0 {
            return Err(ConfigError::invalid(Self::NAME, "fill_ratio must be positive"));
        }
        check_non_negative(Self::NAME, "approximation_coefficient", self.approximation_coefficient)
    }
}

impl TargetPredicate for PolygonFilter {
    const NAME: &'static str = "polygon_filter";

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let vertices: Vec<_> = target
            .approximate(self.approximation_coefficient)
            .into_iter()
            .map(to_f32)
            .collect();
        let n = vertices.len();
        if n != self.side_amount {
            return Ok(false);
        }

        let sides: Vec<f32> = (0..n)
            .map(|i| distance(vertices[i], vertices[(i + 1) % n]))
            .collect();
        let mean_side = sides.iter().sum::<f32>() / n as f32;
        if !sides
            .iter()
            .all(|&s| within_deviation(s, mean_side, self.side_length_deviation))
        {
            return Ok(false);
        }

        let angles: Vec<f32> = (0..n)
            .map(|i| law_of_cosine_angle(vertices[i], vertices[(i + n - 1) % n], vertices[(i + 1) % n]))
            .collect();
        let mean_angle = angles.iter().sum::<f32>() / n as f32;
        if !angles
            .iter()
            .all(|&a| within_deviation(a, mean_angle, self.angle_deviation))
        {
            return Ok(false);
        }
        let ideal = regular_polygon_inner_angle(n);
        if !within_deviation(mean_angle, ideal, self.angle_deviation) {
            return Ok(false);
        }

        let fill = target.area() / regular_polygon_area(mean_side, n);
        Ok(self.fill_ratio <= fill && fill <= 1.0 / self.fill_ratio)
    }
}

/// Bounding-box aspect ratio `width / height` (or `height / width` when
/// `reverse_ratio`) within `[min_ratio, max_ratio]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeRatioFilter {
    pub min_ratio: f32,
    #[serde(with = "unbounded")]
    pub max_ratio: f32,
    pub reverse_ratio: bool,
}

impl Default for SizeRatioFilter {
    fn default() -> Self {
        Self {
            min_ratio: 2.0,
            max_ratio: f32::INFINITY,
            reverse_ratio: false,
        }
    }
}

impl SizeRatioFilter {
    pub fn new(min_ratio: f32, max_ratio: f32, reverse_ratio: bool) -> Result<Self, ConfigError> {
        let filter = Self {
            min_ratio,
            max_ratio,
            reverse_ratio,
        };
        filter.validate()?;
        Ok(filter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(Self::NAME, "ratio", self.min_ratio, self.max_ratio)
    }
}

impl TargetPredicate for SizeRatioFilter {
    const NAME: &'static str = "size_ratio_filter";

    /// Fails with [`GeometryError::DegenerateShape`] when the bounding box
    /// has a zero side.
    fn accepts(&self, target: &Target) -> Result<bool, GeometryError> {
        let rect = target.bounding_rect();
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(GeometryError::DegenerateShape {
                area: target.area(),
            });
        }
        let ratio = if self.reverse_ratio {
            rect.height / rect.width
        } else {
            rect.width / rect.height
        };
        Ok(self.min_ratio <= ratio && ratio <= self.max_ratio)
    }
}
