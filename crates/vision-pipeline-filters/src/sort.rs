//! Sorters: batch filters that reorder targets by a numeric key.
//!
//! Sorting is stable; keys are computed once per target before sorting, so
//! a failing key (zero-area target reaching a centroid) aborts the sort
//! without partially reordering anything.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use vision_pipeline_core::{circle_fill_ratio, distance, FrameSize, GeometryError, Target};

use crate::{FilterError, TargetFilter};

fn sort_by_key(
    targets: Vec<Target>,
    descending: bool,
    key: impl Fn(&Target) -> Result<f32, GeometryError>,
) -> Result<Vec<Target>, FilterError> {
    let mut keyed = targets
        .into_iter()
        .map(|t| Ok((key(&t)?, t)))
        .collect::<Result<Vec<_>, GeometryError>>()?;
    if descending {
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    } else {
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    }
    Ok(keyed.into_iter().map(|(_, t)| t).collect())
}

/// Orders targets by area, largest first unless `descending` is off.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AreaSort {
    pub descending: bool,
}

impl Default for AreaSort {
    fn default() -> Self {
        Self { descending: true }
    }
}

impl AreaSort {
    pub const NAME: &'static str = "area_sort";
}

impl TargetFilter for AreaSort {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, FilterError> {
        sort_by_key(targets, self.descending, |t| Ok(t.area()))
    }
}

/// Orders targets by open arc length, longest first unless `descending` is
/// off.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LengthSort {
    pub descending: bool,
}

impl Default for LengthSort {
    fn default() -> Self {
        Self { descending: true }
    }
}

impl LengthSort {
    pub const NAME: &'static str = "length_sort";
}

impl TargetFilter for LengthSort {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, FilterError> {
        sort_by_key(targets, self.descending, |t| Ok(t.open_arc_length()))
    }
}

/// Orders targets by circle rating, ascending:
/// `radius_ratio * radius_factor * fill_ratio * area_factor` with
/// `radius_ratio = sqrt((2r)^2 / (w * h))` against the bounding box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircleSort {
    pub area_factor: f32,
    pub radius_factor: f32,
}

impl Default for CircleSort {
    fn default() -> Self {
        Self {
            area_factor: 0.9,
            radius_factor: 0.8,
        }
    }
}

impl CircleSort {
    pub const NAME: &'static str = "circle_sort";

    /// Fails with [`GeometryError::DegenerateShape`] when the bounding box
    /// has no area.
    pub fn rating(&self, target: &Target) -> Result<f32, GeometryError> {
        let (fill, radius) = circle_fill_ratio(target, false);
        let box_area = target.bounding_rect().area();
        if box_area <= 0.0 {
            return Err(GeometryError::DegenerateShape {
                area: target.area(),
            });
        }
        let diameter = 2.0 * radius;
        let radius_ratio = (diameter * diameter / box_area).sqrt();
        Ok(radius_ratio * self.radius_factor * fill * self.area_factor)
    }
}

impl TargetFilter for CircleSort {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, FilterError> {
        sort_by_key(targets, false, |t| self.rating(t))
    }
}

/// Orders targets by centroid distance to `point`, closest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceSort {
    pub point: Point2<f32>,
}

impl Default for DistanceSort {
    fn default() -> Self {
        Self {
            point: FrameSize::default().center(),
        }
    }
}

impl DistanceSort {
    pub const NAME: &'static str = "distance_sort";
}

impl TargetFilter for DistanceSort {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, FilterError> {
        sort_by_key(targets, false, |t| Ok(distance(t.centroid()?, self.point)))
    }
}

/// Orders targets by centroid distance to the frame center, closest first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageCenterSort {
    pub frame: FrameSize,
}

impl ImageCenterSort {
    pub const NAME: &'static str = "image_center_sort";
}

impl TargetFilter for ImageCenterSort {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, FilterError> {
        let center = self.frame.center();
        sort_by_key(targets, false, |t| Ok(distance(t.centroid()?, center)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: i32, y: i32, side: i32) -> Target {
        Target::from_xy(&[[x, y], [x + side, y], [x + side, y + side], [x, y + side]])
    }

    fn circle(cx: f32, cy: f32, radius: f32) -> Target {
        Target::from_subpixel((0..48).map(|k| {
            let a = k as f32 * std::f32::consts::TAU / 48.0;
            Point2::new(cx + radius * a.cos(), cy + radius * a.sin())
        }))
    }

    #[test]
    fn area_sort_orders_are_reverses_of_each_other() {
        let targets = vec![square(0, 0, 3), square(0, 0, 9), square(0, 0, 5)];
        let desc = AreaSort::default().apply(targets.clone()).expect("sort");
        let asc = AreaSort { descending: false }.apply(targets).expect("sort");
        assert_eq!(desc[0], square(0, 0, 9));
        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
    }

    #[test]
    fn sorting_is_stable_for_equal_keys() {
        let a = square(0, 0, 4);
        let b = square(50, 0, 4);
        let c = square(0, 0, 6);
        let out = AreaSort::default()
            .apply(vec![a.clone(), b.clone(), c.clone()])
            .expect("sort");
        assert_eq!(out, vec![c.clone(), a.clone(), b.clone()]);
        let out = AreaSort { descending: false }
            .apply(vec![a.clone(), c, b.clone()])
            .expect("sort");
        assert_eq!(&out[..2], &[a, b]);
    }

    #[test]
    fn length_sort_uses_open_arc_length() {
        let short = Target::from_xy(&[[0, 0], [10, 0]]);
        let long = Target::from_xy(&[[0, 0], [10, 0], [10, 30]]);
        let out = LengthSort::default()
            .apply(vec![short.clone(), long.clone()])
            .expect("sort");
        assert_eq!(out, vec![long, short]);
    }

    #[test]
    fn circle_sort_ranks_by_rating_ascending() {
        let round = circle(50.0, 50.0, 40.0);
        let boxy = square(0, 0, 40);
        let sorter = CircleSort::default();
        // Pixel circle: radius ratio ~1, fill ~1. Square: radius ratio
        // sqrt(2), fill 2/pi.
        let r_round = sorter.rating(&round).expect("rating");
        let r_boxy = sorter.rating(&boxy).expect("rating");
        assert!((r_round - 0.72).abs() < 0.02, "{r_round}");
        assert!((r_boxy - 0.648).abs() < 0.01, "{r_boxy}");
        let out = sorter.apply(vec![round.clone(), boxy.clone()]).expect("sort");
        assert_eq!(out, vec![boxy, round]);
    }

    #[test]
    fn distance_sorts_bring_closest_first() {
        let near = square(150, 110, 20);
        let far = square(0, 0, 20);
        let out = ImageCenterSort::default()
            .apply(vec![far.clone(), near.clone()])
            .expect("sort");
        assert_eq!(out, vec![near.clone(), far.clone()]);

        let sorter = DistanceSort {
            point: Point2::new(0.0, 0.0),
        };
        assert_eq!(sorter.apply(vec![near.clone(), far.clone()]).expect("sort"), vec![far, near]);
    }

    #[test]
    fn centroid_sorts_propagate_degenerate_shapes() {
        let line = Target::from_xy(&[[0, 0], [3, 3]]);
        let err = DistanceSort::default()
            .apply(vec![square(0, 0, 5), line])
            .unwrap_err();
        assert!(matches!(err, FilterError::Geometry(GeometryError::DegenerateShape { .. })));
    }
}
