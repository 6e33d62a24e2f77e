//! JSON pipeline configuration and contour dumps.
//!
//! A pipeline file names its filters by registry name, so user filters
//! registered on a [`FilterRegistry`] can be configured the same way as the
//! built-in ones:
//!
//! ```json
//! {
//!   "frame": { "width": 320, "height": 240 },
//!   "filters": [
//!     { "name": "area_filter", "params": { "min_area": 150 } },
//!     { "name": "area_sort" }
//!   ],
//!   "selector": { "limit": 2 },
//!   "direction": "xy_normalized",
//!   "failed_detection": 9999
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vision_pipeline_core::{FrameSize, GeometryError, Target};
use vision_pipeline_director::{
    CenterDirections, DirectionFunction, Director, DirectionModifier, ModifierError, SelectorError,
    StopIfCloseModifier, TargetAmountDirections, TargetSelector, XNormalizedDirections,
    XyNormalizedDirections, YNormalizedDirections,
};
use vision_pipeline_filters::{ConfigError, FilterChain, FilterRegistry, FilterSpec};

#[derive(thiserror::Error, Debug)]
pub enum PipelineIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineConfigError {
    #[error(transparent)]
    Filter(#[from] ConfigError),
    #[error(transparent)]
    Selector(#[from] SelectorError),
    #[error(transparent)]
    Modifier(#[from] ModifierError),
}

/// Direction value produced by a configured pipeline.
///
/// Serialized untagged: `3`, `0.25`, `[0.1, -0.4]` or `"STOP"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectionValue {
    Count(usize),
    Scalar(f32),
    Point(f32, f32),
    Text(String),
}

impl Default for DirectionValue {
    fn default() -> Self {
        DirectionValue::Count(9999)
    }
}

/// Built-in direction functions selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionKind {
    /// Average centroid in pixels.
    #[default]
    Center,
    XyNormalized,
    XNormalized,
    YNormalized,
    TargetAmount,
}

impl DirectionFunction<DirectionValue> for DirectionKind {
    fn directions(
        &self,
        targets: &[Target],
        frame: &FrameSize,
    ) -> Result<DirectionValue, GeometryError> {
        Ok(match self {
            DirectionKind::Center => {
                let c = CenterDirections.directions(targets, frame)?;
                DirectionValue::Point(c.x, c.y)
            }
            DirectionKind::XyNormalized => {
                let (x, y) = XyNormalizedDirections.directions(targets, frame)?;
                DirectionValue::Point(x, y)
            }
            DirectionKind::XNormalized => {
                DirectionValue::Scalar(XNormalizedDirections.directions(targets, frame)?)
            }
            DirectionKind::YNormalized => {
                DirectionValue::Scalar(YNormalizedDirections.directions(targets, frame)?)
            }
            DirectionKind::TargetAmount => {
                DirectionValue::Count(TargetAmountDirections.directions(targets, frame)?)
            }
        })
    }
}

/// `{"limit": 2}`, `{"range": {"low": 1, "high": 3}}` or `"unbounded"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectorConfig {
    Unbounded,
    Limit(i64),
    Range { low: usize, high: usize },
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig::Limit(1)
    }
}

impl SelectorConfig {
    pub fn build(&self) -> Result<TargetSelector, SelectorError> {
        match *self {
            SelectorConfig::Unbounded => Ok(TargetSelector::Unbounded),
            SelectorConfig::Limit(n) => Ok(TargetSelector::limit(n)),
            SelectorConfig::Range { low, high } => TargetSelector::range(low, high),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModifierConfig {
    StopIfClose {
        minimum_size: f32,
        value_sent: DirectionValue,
        #[serde(default)]
        priority: bool,
    },
}

impl ModifierConfig {
    pub fn build(&self) -> Result<Box<dyn DirectionModifier<DirectionValue>>, ModifierError> {
        match self {
            ModifierConfig::StopIfClose {
                minimum_size,
                value_sent,
                priority,
            } => Ok(Box::new(
                StopIfCloseModifier::new(*minimum_size, value_sent.clone())?
                    .with_priority(*priority),
            )),
        }
    }
}

/// Everything needed to turn a frame's raw contours into a direction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub frame: FrameSize,
    pub filters: Vec<FilterSpec>,
    pub selector: SelectorConfig,
    pub direction: DirectionKind,
    pub failed_detection: DirectionValue,
    pub modifiers: Vec<ModifierConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame: FrameSize::default(),
            filters: Vec::new(),
            selector: SelectorConfig::default(),
            direction: DirectionKind::default(),
            failed_detection: DirectionValue::default(),
            modifiers: Vec::new(),
        }
    }
}

impl PipelineConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PipelineIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PipelineIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Build the filter chain, resolving names against `registry`.
    pub fn build_chain(&self, registry: &FilterRegistry) -> Result<FilterChain, PipelineConfigError> {
        Ok(registry.build_chain(&self.filters)?)
    }

    pub fn build_director(&self) -> Result<Director<DirectionValue>, PipelineConfigError> {
        let selector = self.selector.build()?;
        let modifiers = self
            .modifiers
            .iter()
            .map(ModifierConfig::build)
            .collect::<Result<Vec<_>, _>>()?;
        let director = Director::new(self.direction, self.failed_detection.clone(), selector)
            .with_modifiers(modifiers);
        Ok(director)
    }
}

/// Contours of one frame as integer pixel `[[x, y], ...]` point lists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetsFile {
    pub targets: Vec<Target>,
}

impl TargetsFile {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, PipelineIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), PipelineIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use serde_json::json;

    #[test]
    fn empty_object_is_the_default_pipeline() {
        let config: PipelineConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.selector, SelectorConfig::Limit(1));
        assert_eq!(config.failed_detection, DirectionValue::Count(9999));
    }

    #[test]
    fn direction_values_are_untagged() {
        let values: Vec<DirectionValue> =
            serde_json::from_value(json!([3, -1, 0.5, [0.25, -0.5], "STOP"])).expect("parse");
        assert_eq!(
            values,
            vec![
                DirectionValue::Count(3),
                DirectionValue::Scalar(-1.0),
                DirectionValue::Scalar(0.5),
                DirectionValue::Point(0.25, -0.5),
                DirectionValue::Text("STOP".into()),
            ]
        );
    }

    #[test]
    fn selector_and_modifier_syntax() {
        let config: PipelineConfig = serde_json::from_value(json!({
            "selector": { "range": { "low": 1, "high": 3 } },
            "direction": "target_amount",
            "modifiers": [
                { "kind": "stop_if_close", "minimum_size": 0.4, "value_sent": "STOP" }
            ]
        }))
        .expect("parse");
        assert_eq!(config.selector, SelectorConfig::Range { low: 1, high: 3 });
        assert_eq!(config.direction, DirectionKind::TargetAmount);
        assert_eq!(
            config.modifiers,
            vec![ModifierConfig::StopIfClose {
                minimum_size: 0.4,
                value_sent: DirectionValue::Text("STOP".into()),
                priority: false,
            }]
        );
        let director = config.build_director().expect("director");
        assert_eq!(director.modifier_count(), 1);
    }

    #[test]
    fn invalid_selector_range_is_a_config_error() {
        let config = PipelineConfig {
            selector: SelectorConfig::Range { low: 3, high: 3 },
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.build_director(),
            Err(PipelineConfigError::Selector(SelectorError::InvalidRange { low: 3, high: 3 }))
        ));
    }

    #[test]
    fn negative_or_nan_minimum_size_is_a_config_error() {
        let config: PipelineConfig = serde_json::from_value(json!({
            "modifiers": [
                { "kind": "stop_if_close", "minimum_size": -0.2, "value_sent": "STOP" }
            ]
        }))
        .expect("parse");
        assert!(matches!(
            config.build_director(),
            Err(PipelineConfigError::Modifier(ModifierError::InvalidMinimumSize(v))) if v == -0.2
        ));

        let nan = ModifierConfig::StopIfClose {
            minimum_size: f32::NAN,
            value_sent: DirectionValue::Text("STOP".into()),
            priority: true,
        };
        assert!(nan.build().is_err());
    }

    #[test]
    fn unknown_filters_fail_at_build_time() {
        let config = PipelineConfig {
            filters: vec![FilterSpec::named("no_such_filter")],
            ..PipelineConfig::default()
        };
        let err = config
            .build_chain(&FilterRegistry::with_builtins())
            .expect_err("unknown");
        assert!(matches!(err, PipelineConfigError::Filter(ConfigError::UnknownFilter(_))));
    }

    #[test]
    fn configured_director_directs() {
        let config = PipelineConfig {
            direction: DirectionKind::XyNormalized,
            ..PipelineConfig::default()
        };
        let director = config.build_director().expect("director");
        let frame = FrameSize::default();
        let centered =
            Target::from_xy(&[[150, 110], [170, 110], [170, 130], [150, 130]]);
        match director.direct(&[centered], &frame) {
            Ok(DirectionValue::Point(x, y)) => {
                assert_relative_eq!(x, 0.0, epsilon = 1e-5);
                assert_relative_eq!(y, 0.0, epsilon = 1e-5);
            }
            other => panic!("expected a point, got {other:?}"),
        }
        assert_eq!(director.direct(&[], &frame), Ok(DirectionValue::Count(9999)));
    }
}
