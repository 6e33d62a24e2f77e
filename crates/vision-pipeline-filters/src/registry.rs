//! Name-to-constructor table for building filters from configuration.
//!
//! The registry is an ordinary value built at startup and handed to
//! whatever reads pipeline configuration; there is no global state.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    AreaFilter, AreaSort, CircleFilter, CircleSort, ConfigError, ConstrainingCircleFilter,
    DistanceFilter, DistanceSort, FilterChain, HorizontalRectangleFilter, ImageCenterFilter,
    ImageCenterSort, LengthFilter, LengthSort, PercentAreaFilter, PolygonFilter,
    RotatedRectangleFilter, RotatedSquareFilter, SizeRatioFilter, StraightRectangleFilter,
    StraightSquareFilter, TargetFilter, TargetPredicate, TriangleFilter, VerticalRectangleFilter,
};

/// Builds a boxed filter from its JSON parameters.
pub type FilterConstructor = fn(serde_json::Value) -> Result<Box<dyn TargetFilter>, ConfigError>;

/// A filter as written in configuration: `{"name": "area_filter", "params": {...}}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, params: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    /// A spec relying on every default parameter.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, serde_json::Value::Null)
    }
}

/// Missing params mean "all defaults".
fn parse_params<T: DeserializeOwned>(params: serde_json::Value) -> Result<T, ConfigError> {
    let params = match params {
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    };
    Ok(serde_json::from_value(params)?)
}

macro_rules! validated {
    ($ty:ty) => {
        |params| {
            let filter: $ty = parse_params(params)?;
            filter.validate()?;
            Ok(Box::new(filter) as Box<dyn TargetFilter>)
        }
    };
}

macro_rules! unvalidated {
    ($ty:ty) => {
        |params| {
            let filter: $ty = parse_params(params)?;
            Ok(Box::new(filter) as Box<dyn TargetFilter>)
        }
    };
}

#[derive(Clone, Debug, Default)]
pub struct FilterRegistry {
    constructors: BTreeMap<String, FilterConstructor>,
}

impl FilterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in filter and sorter.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(AreaFilter::NAME, validated!(AreaFilter));
        registry.register(PercentAreaFilter::NAME, validated!(PercentAreaFilter));
        registry.register(LengthFilter::NAME, validated!(LengthFilter));
        registry.register(StraightRectangleFilter::NAME, validated!(StraightRectangleFilter));
        registry.register(RotatedRectangleFilter::NAME, validated!(RotatedRectangleFilter));
        registry.register(StraightSquareFilter::NAME, validated!(StraightSquareFilter));
        registry.register(RotatedSquareFilter::NAME, validated!(RotatedSquareFilter));
        registry.register(VerticalRectangleFilter::NAME, validated!(VerticalRectangleFilter));
        registry.register(HorizontalRectangleFilter::NAME, validated!(HorizontalRectangleFilter));
        registry.register(TriangleFilter::NAME, validated!(TriangleFilter));
        registry.register(CircleFilter::NAME, validated!(CircleFilter));
        registry.register(ConstrainingCircleFilter::NAME, validated!(ConstrainingCircleFilter));
        registry.register(PolygonFilter::NAME, validated!(PolygonFilter));
        registry.register(SizeRatioFilter::NAME, validated!(SizeRatioFilter));
        registry.register(DistanceFilter::NAME, validated!(DistanceFilter));
        registry.register(ImageCenterFilter::NAME, validated!(ImageCenterFilter));
        registry.register(AreaSort::NAME, unvalidated!(AreaSort));
        registry.register(LengthSort::NAME, unvalidated!(LengthSort));
        registry.register(CircleSort::NAME, unvalidated!(CircleSort));
        registry.register(DistanceSort::NAME, unvalidated!(DistanceSort));
        registry.register(ImageCenterSort::NAME, unvalidated!(ImageCenterSort));
        registry
    }

    /// Add or replace a constructor. Returns the one it replaced, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: FilterConstructor,
    ) -> Option<FilterConstructor> {
        self.constructors.insert(name.into(), constructor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn build(&self, spec: &FilterSpec) -> Result<Box<dyn TargetFilter>, ConfigError> {
        let constructor = self
            .constructors
            .get(&spec.name)
            .ok_or_else(|| ConfigError::UnknownFilter(spec.name.clone()))?;
        constructor(spec.params.clone())
    }

    pub fn build_chain(&self, specs: &[FilterSpec]) -> Result<FilterChain, ConfigError> {
        specs.iter().map(|spec| self.build(spec)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vision_pipeline_core::Target;

    fn square(side: i32) -> Target {
        Target::from_xy(&[[0, 0], [side, 0], [side, side], [0, side]])
    }

    #[test]
    fn builtins_are_registered_by_snake_case_name() {
        let registry = FilterRegistry::with_builtins();
        assert_eq!(registry.names().count(), 21);
        for name in ["area_filter", "polygon_filter", "circle_sort", "image_center_filter"] {
            assert!(registry.contains(name), "{name}");
        }
    }

    #[test]
    fn missing_params_fall_back_to_defaults() {
        let registry = FilterRegistry::with_builtins();
        let filter = registry.build(&FilterSpec::named("area_filter")).expect("build");
        assert_eq!(filter.name(), "area_filter");
        let out = filter.apply(vec![square(10), square(20)]).expect("apply");
        assert_eq!(out, vec![square(20)]);
    }

    #[test]
    fn params_are_parsed_and_validated() {
        let registry = FilterRegistry::with_builtins();
        let filter = registry
            .build(&FilterSpec::new("area_filter", json!({"min_area": 50})))
            .expect("build");
        assert_eq!(filter.apply(vec![square(10)]).expect("apply").len(), 1);

        let inverted = FilterSpec::new("area_filter", json!({"min_area": 50, "max_area": 10}));
        assert!(matches!(
            registry.build(&inverted),
            Err(ConfigError::InvalidParameter { .. })
        ));
        let wrong_type = FilterSpec::new("polygon_filter", json!({"side_amount": "six"}));
        assert!(matches!(registry.build(&wrong_type), Err(ConfigError::Json(_))));
    }

    #[test]
    fn unknown_names_are_rejected() {
        let registry = FilterRegistry::new();
        assert!(matches!(
            registry.build(&FilterSpec::named("area_filter")),
            Err(ConfigError::UnknownFilter(name)) if name == "area_filter"
        ));
    }

    #[test]
    fn user_filters_can_be_registered() {
        let mut registry = FilterRegistry::with_builtins();
        registry.register("first_only", |_| {
            Ok(Box::new(crate::BatchFilter::new("first_only", |t: Vec<Target>| {
                Ok(t.into_iter().take(1).collect())
            })))
        });
        let chain = registry
            .build_chain(&[
                FilterSpec::new("area_sort", json!({"descending": false})),
                FilterSpec::named("first_only"),
            ])
            .expect("chain");
        let out = chain
            .apply(vec![square(5), square(2), square(9)])
            .expect("apply");
        assert_eq!(out, vec![square(2)]);
    }
}
