//! Filter detected contours and turn them into directions.
//!
//! This crate provides:
//! - re-exports of the `vision-pipeline-*` crates
//! - [`Vision`] and [`AmbientVision`], which tie a contour detector, a filter
//!   chain, a director and an output connection into a frame loop
//! - a JSON [`PipelineConfig`] that builds filter chains and directors by name
//!
//! ## Quickstart
//!
//! ```
//! use vision_pipeline::director::{Director, TargetSelector, XyNormalizedDirections};
//! use vision_pipeline::filters::{AreaFilter, AreaSort, FilterChain};
//! use vision_pipeline::{FrameSize, Target};
//!
//! let chain = FilterChain::new()
//!     .with(AreaFilter::default())
//!     .with(AreaSort::default());
//! let director = Director::new(XyNormalizedDirections, (9999.0, 9999.0), TargetSelector::limit(1));
//!
//! let frame = FrameSize::default();
//! let contours = vec![Target::from_xy(&[[150, 110], [170, 110], [170, 130], [150, 130]])];
//! let targets = chain.apply(contours).unwrap();
//! let (x, y) = director.direct(&targets, &frame).unwrap();
//! assert!(x.abs() < 1e-5 && y.abs() < 1e-5);
//! ```
//!
//! ## API map
//! - `vision_pipeline::core`: targets, frames, geometry and fill ratios.
//! - `vision_pipeline::filters`: filters, sorters, chains and the filter registry.
//! - `vision_pipeline::director`: target selection, direction functions and modifiers.

pub use vision_pipeline_core as core;
pub use vision_pipeline_director as director;
pub use vision_pipeline_filters as filters;

pub use vision_pipeline_core::{Frame, FrameSize, GeometryError, Target};
pub use vision_pipeline_director::{Director, DirectorError, ModifierError, TargetSelector};
pub use vision_pipeline_filters::{FilterChain, FilterRegistry, FilterSpec, TargetFilter};

mod config;
mod vision;

pub use config::{
    DirectionKind, DirectionValue, ModifierConfig, PipelineConfig, PipelineConfigError,
    PipelineIoError, SelectorConfig, TargetsFile,
};
pub use vision::{AmbientVision, BoxError, Connection, Detector, Vision, VisionError};
