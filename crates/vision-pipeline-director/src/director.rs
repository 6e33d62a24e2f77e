use std::fmt;

use vision_pipeline_core::{FrameSize, Target};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{DirectionFunction, DirectionModifier, DirectorError, TargetSelector};

/// Selects targets, computes a direction and runs the modifier chain.
///
/// When the selector finds too few targets the direction is the configured
/// `failed_detection` value; modifiers still run and then see the frame's
/// unselected targets. Any other error propagates.
pub struct Director<D> {
    direction_function: Box<dyn DirectionFunction<D>>,
    failed_detection: D,
    selector: TargetSelector,
    modifiers: Vec<Box<dyn DirectionModifier<D>>>,
}

impl<D: Clone> Director<D> {
    pub fn new(
        direction_function: impl DirectionFunction<D> + 'static,
        failed_detection: D,
        selector: TargetSelector,
    ) -> Self {
        Self {
            direction_function: Box::new(direction_function),
            failed_detection,
            selector,
            modifiers: Vec::new(),
        }
    }

    pub fn with_modifier(mut self, modifier: impl DirectionModifier<D> + 'static) -> Self {
        self.modifiers.push(Box::new(modifier));
        self
    }

    pub fn with_modifiers(
        mut self,
        modifiers: impl IntoIterator<Item = Box<dyn DirectionModifier<D>>>,
    ) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    pub fn failed_detection(&self) -> &D {
        &self.failed_detection
    }

    pub fn selector(&self) -> &TargetSelector {
        &self.selector
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    /// Direction for one frame's filtered targets.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip_all, fields(targets = targets.len()))
    )]
    pub fn direct(&self, targets: &[Target], frame: &FrameSize) -> Result<D, DirectorError> {
        let (mut directions, seen) = match self.selector.select(targets) {
            Ok(selected) => {
                let directions = self.direction_function.directions(&selected, frame)?;
                (directions, selected)
            }
            Err(not_enough) => {
                log::debug!("{not_enough}, sending failed detection");
                (self.failed_detection.clone(), targets.into())
            }
        };

        for modifier in &self.modifiers {
            directions = modifier.modify_directions(directions, &seen, frame)?;
            if modifier.priority() {
                break;
            }
        }
        Ok(directions)
    }
}

impl<D: fmt::Debug> fmt::Debug for Director<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Director")
            .field("failed_detection", &self.failed_detection)
            .field("selector", &self.selector)
            .field("modifiers", &self.modifiers.len())
            .finish_non_exhaustive()
    }
}
