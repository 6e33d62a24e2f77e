//! Filter combinators.
//!
//! A filter is configured once (a struct holding its validated parameters)
//! and applied to every frame's targets. Two flavours exist:
//!
//! - [`TargetPredicate`] and [`PredicateFilter`]: decide about one target at
//!   a time and keep accepted targets in their input order.
//! - Batch filters see the whole sequence and may drop or reorder targets
//!   (sorters, [`BatchFilter`]).

use std::fmt;

use vision_pipeline_core::{GeometryError, Target};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::FilterError;

/// One target or a sequence of targets handed to a filter.
#[derive(Clone, Debug, PartialEq)]
pub enum TargetBatch {
    Single(Target),
    Many(Vec<Target>),
}

impl TargetBatch {
    pub fn into_vec(self) -> Vec<Target> {
        match self {
            TargetBatch::Single(target) => vec![target],
            TargetBatch::Many(targets) => targets,
        }
    }
}

impl From<Target> for TargetBatch {
    fn from(target: Target) -> Self {
        TargetBatch::Single(target)
    }
}

impl From<Vec<Target>> for TargetBatch {
    fn from(targets: Vec<Target>) -> Self {
        TargetBatch::Many(targets)
    }
}

impl From<&[Target]> for TargetBatch {
    fn from(targets: &[Target]) -> Self {
        TargetBatch::Many(targets.to_vec())
    }
}

/// A configured filter applied to every frame's targets.
pub trait TargetFilter: Send + Sync {
    /// Name used in logs and by the registry.
    fn name(&self) -> &str;

    fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, FilterError>;

    /// Apply to a single target or a sequence.
    fn apply_batch(&self, batch: impl Into<TargetBatch>) -> Result<Vec<Target>, FilterError>
    where
        Self: Sized,
    {
        self.apply(batch.into().into_vec())
    }
}

/// Per-target acceptance test.
pub trait TargetPredicate: Send + Sync {
    /// Registry and log name.
    const NAME: &'static str;

    fn accepts(&self, target: &Target) -> Result<bool, GeometryError>;
}

impl<P: TargetPredicate> TargetFilter for P {
    fn name(&self) -> &str {
        P::NAME
    }

    fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, FilterError> {
        retain_accepted(targets, |t| self.accepts(t))
    }
}

fn retain_accepted(
    targets: Vec<Target>,
    accepts: impl Fn(&Target) -> Result<bool, GeometryError>,
) -> Result<Vec<Target>, FilterError> {
    let mut kept = Vec::with_capacity(targets.len());
    for target in targets {
        if accepts(&target)? {
            kept.push(target);
        }
    }
    Ok(kept)
}

/// Predicate filter built from a closure.
pub struct PredicateFilter<F> {
    name: String,
    predicate: F,
}

impl<F> PredicateFilter<F>
where
    F: Fn(&Target) -> Result<bool, GeometryError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, predicate: F) -> Self {
        Self {
            name: name.into(),
            predicate,
        }
    }
}

impl<F> TargetFilter for PredicateFilter<F>
where
    F: Fn(&Target) -> Result<bool, GeometryError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, FilterError> {
        retain_accepted(targets, &self.predicate)
    }
}

impl<F> fmt::Debug for PredicateFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateFilter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Batch filter built from a closure over the whole sequence.
///
/// The closure may drop and reorder targets but never add any; a result
/// longer than the input fails with [`FilterError::InvalidCustomFilter`].
pub struct BatchFilter<F> {
    name: String,
    filter: F,
}

impl<F> BatchFilter<F>
where
    F: Fn(Vec<Target>) -> Result<Vec<Target>, FilterError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, filter: F) -> Self {
        Self {
            name: name.into(),
            filter,
        }
    }
}

impl<F> TargetFilter for BatchFilter<F>
where
    F: Fn(Vec<Target>) -> Result<Vec<Target>, FilterError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, targets: Vec<Target>) -> Result<Vec<Target>, FilterError> {
        let input = targets.len();
        let output = (self.filter)(targets)?;
        if output.len() > input {
            return Err(FilterError::InvalidCustomFilter {
                name: self.name.clone(),
                input,
                output: output.len(),
            });
        }
        Ok(output)
    }
}

impl<F> fmt::Debug for BatchFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchFilter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered list of filters applied one after another.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn TargetFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, filter: impl TargetFilter + 'static) -> Self {
        self.push(Box::new(filter));
        self
    }

    pub fn push(&mut self, filter: Box<dyn TargetFilter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.filters.iter().map(|f| f.name())
    }

    /// Run every filter in order on the targets of one frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(self, batch), fields(filters = self.filters.len()))
    )]
    pub fn apply(&self, batch: impl Into<TargetBatch>) -> Result<Vec<Target>, FilterError> {
        let mut targets = batch.into().into_vec();
        for filter in &self.filters {
            let before = targets.len();
            targets = filter.apply(targets)?;
            log::debug!("{}: {} -> {} targets", filter.name(), before, targets.len());
        }
        Ok(targets)
    }
}

impl fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl FromIterator<Box<dyn TargetFilter>> for FilterChain {
    fn from_iter<I: IntoIterator<Item = Box<dyn TargetFilter>>>(iter: I) -> Self {
        Self {
            filters: iter.into_iter().collect(),
        }
    }
}
