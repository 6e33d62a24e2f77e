//! How many targets must survive filtering before directing.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use vision_pipeline_core::Target;

use crate::{NotEnoughTargets, SelectorError};

/// Custom selection: return the chosen targets, or `None` when the frame
/// does not contain enough of them.
pub type SelectorFn = dyn Fn(&[Target]) -> Option<Vec<Target>> + Send + Sync;

/// Target selection policy, applied to targets already sorted by relevance.
#[derive(Clone, Default)]
pub enum TargetSelector {
    /// Take every target.
    #[default]
    Unbounded,
    /// Require at least `n` targets and take the first `n`.
    Limit(usize),
    /// Require at least `low` targets and take up to `high`.
    Range { low: usize, high: usize },
    Predicate(Arc<SelectorFn>),
}

impl TargetSelector {
    /// Exact amount; zero or negative means [`TargetSelector::Unbounded`].
    pub fn limit(n: i64) -> Self {
        if n <= 0 {
            TargetSelector::Unbounded
        } else {
            TargetSelector::Limit(usize::try_from(n).unwrap_or(usize::MAX))
        }
    }

    pub fn range(low: usize, high: usize) -> Result<Self, SelectorError> {
        if low >= high {
            return Err(SelectorError::InvalidRange { low, high });
        }
        Ok(TargetSelector::Range { low, high })
    }

    pub fn predicate(
        f: impl Fn(&[Target]) -> Option<Vec<Target>> + Send + Sync + 'static,
    ) -> Self {
        TargetSelector::Predicate(Arc::new(f))
    }

    /// Pick targets from a frame's sorted, filtered targets.
    ///
    /// Only `Limit` and `Range` check the target count; an unbounded
    /// selection of an empty frame is an empty success.
    pub fn select<'a>(&self, targets: &'a [Target]) -> Result<Cow<'a, [Target]>, NotEnoughTargets> {
        let found = targets.len();
        match self {
            TargetSelector::Unbounded => Ok(Cow::Borrowed(targets)),
            TargetSelector::Limit(n) => {
                if found < *n {
                    return Err(NotEnoughTargets { required: *n, found });
                }
                Ok(Cow::Borrowed(&targets[..*n]))
            }
            TargetSelector::Range { low, high } => {
                if found < *low {
                    return Err(NotEnoughTargets {
                        required: *low,
                        found,
                    });
                }
                Ok(Cow::Borrowed(&targets[..found.min(*high)]))
            }
            TargetSelector::Predicate(f) => f(targets)
                .map(Cow::Owned)
                .ok_or(NotEnoughTargets { required: 1, found }),
        }
    }
}

impl fmt::Debug for TargetSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetSelector::Unbounded => f.write_str("Unbounded"),
            TargetSelector::Limit(n) => f.debug_tuple("Limit").field(n).finish(),
            TargetSelector::Range { low, high } => f
                .debug_struct("Range")
                .field("low", low)
                .field("high", high)
                .finish(),
            TargetSelector::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(n: usize) -> Vec<Target> {
        (0..n)
            .map(|i| {
                let x = 20 * i as i32;
                Target::from_xy(&[[x, 0], [x + 10, 0], [x + 10, 10], [x, 10]])
            })
            .collect()
    }

    #[test]
    fn limit_takes_exactly_the_first_n() {
        let all = targets(5);
        let selected = TargetSelector::limit(3).select(&all).expect("select");
        assert_eq!(&selected[..], &all[..3]);
        assert_eq!(
            TargetSelector::limit(6).select(&all).unwrap_err(),
            NotEnoughTargets {
                required: 6,
                found: 5
            }
        );
    }

    #[test]
    fn limit_zero_is_unbounded() {
        assert!(matches!(TargetSelector::limit(0), TargetSelector::Unbounded));
        assert!(matches!(TargetSelector::limit(-4), TargetSelector::Unbounded));
        let all = targets(4);
        assert_eq!(TargetSelector::limit(0).select(&all).expect("select").len(), 4);
    }

    #[test]
    fn range_requires_low_and_caps_at_high() {
        let selector = TargetSelector::range(2, 4).expect("range");
        assert_eq!(selector.select(&targets(3)).expect("select").len(), 3);
        assert_eq!(selector.select(&targets(9)).expect("select").len(), 4);
        assert!(selector.select(&targets(1)).is_err());
    }

    #[test]
    fn range_must_be_increasing() {
        assert_eq!(
            TargetSelector::range(3, 3).unwrap_err(),
            SelectorError::InvalidRange { low: 3, high: 3 }
        );
        assert!(TargetSelector::range(5, 1).is_err());
        assert!(TargetSelector::range(0, 1).is_ok());
    }

    #[test]
    fn unbounded_and_zero_low_ranges_accept_empty_frames() {
        assert!(TargetSelector::Unbounded.select(&[]).expect("select").is_empty());
        assert!(TargetSelector::limit(0).select(&[]).expect("select").is_empty());
        let lenient = TargetSelector::range(0, 2).expect("range");
        assert!(lenient.select(&[]).expect("select").is_empty());
        assert_eq!(lenient.select(&targets(3)).expect("select").len(), 2);
        let nothing = TargetSelector::predicate(|_| Some(Vec::new()));
        assert!(nothing.select(&targets(3)).expect("select").is_empty());
        let never = TargetSelector::predicate(|_| None);
        assert_eq!(
            never.select(&targets(3)).unwrap_err(),
            NotEnoughTargets {
                required: 1,
                found: 3
            }
        );
    }

    #[test]
    fn predicate_decides_sufficiency() {
        let pairs = TargetSelector::predicate(|t| (t.len() % 2 == 0).then(|| t.to_vec()));
        assert_eq!(pairs.select(&targets(4)).expect("select").len(), 4);
        assert!(pairs.select(&targets(3)).is_err());
    }
}
