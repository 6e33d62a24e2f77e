//! Target selection and direction extraction.
//!
//! A [`Director`] takes one frame's filtered targets, picks the ones that
//! matter with a [`TargetSelector`], turns them into a direction value of any
//! type with a [`DirectionFunction`], then runs [`DirectionModifier`]s over
//! that value. Too few targets is not an error: the director sends its
//! configured failed-detection value instead.

mod directions;
mod director;
mod error;
mod modifiers;
mod selector;

pub use directions::{
    CenterDirections, DirectionFunction, TargetAmountDirections, XNormalizedDirections,
    XyNormalizedDirections, YNormalizedDirections,
};
pub use director::Director;
pub use error::{DirectorError, ModifierError, NotEnoughTargets, SelectorError};
pub use modifiers::{DirectionModifier, FnModifier, StopIfCloseModifier};
pub use selector::{SelectorFn, TargetSelector};
