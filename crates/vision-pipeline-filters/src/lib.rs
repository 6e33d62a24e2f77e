//! Target filters and sorters.
//!
//! Filters are configured once, before the frame loop, as plain structs with
//! validated parameters, then applied to each frame's targets:
//!
//! ```
//! use vision_pipeline_filters::{AreaFilter, AreaSort, FilterChain};
//! use vision_pipeline_core::Target;
//!
//! let chain = FilterChain::new()
//!     .with(AreaFilter::default())
//!     .with(AreaSort::default());
//! let square = Target::from_xy(&[[0, 0], [20, 0], [20, 20], [0, 20]]);
//! let kept = chain.apply(square).unwrap();
//! assert_eq!(kept.len(), 1);
//! ```

mod area;
mod distance;
mod error;
mod filter;
mod params;
mod registry;
mod shape;
mod sort;

pub use area::{AreaFilter, LengthFilter, PercentAreaFilter};
pub use distance::{DistanceFilter, ImageCenterFilter};
pub use error::{ConfigError, FilterError};
pub use filter::{
    BatchFilter, FilterChain, PredicateFilter, TargetBatch, TargetFilter, TargetPredicate,
};
pub use registry::{FilterConstructor, FilterRegistry, FilterSpec};
pub use shape::{
    CircleFilter, ConstrainingCircleFilter, HorizontalRectangleFilter, PolygonFilter,
    RotatedRectangleFilter, RotatedSquareFilter, SizeRatioFilter, SquareParams,
    StraightRectangleFilter, StraightSquareFilter, TriangleFilter, VerticalRectangleFilter,
};
pub use sort::{AreaSort, CircleSort, DistanceSort, ImageCenterSort, LengthSort};
