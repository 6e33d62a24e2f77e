//! Frame-loop glue: detector, filter chain, director and connection.
//!
//! Capturing frames and extracting contours from them is left to a
//! [`Detector`]; sending the result is left to a [`Connection`]. Both are
//! plain traits so the pipeline can run against a camera, a recorded dump or
//! a test double.

use std::fmt;

use vision_pipeline_core::{Frame, FrameSize, GeometryError, Target};
use vision_pipeline_director::{Director, DirectorError};
use vision_pipeline_filters::{FilterChain, FilterError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Error type returned by detector and connection implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Extracts raw targets (contours) from a frame.
pub trait Detector<F> {
    fn detect(&mut self, frame: &F) -> Result<Vec<Target>, BoxError>;
}

impl<F, T> Detector<F> for T
where
    T: FnMut(&F) -> Result<Vec<Target>, BoxError>,
{
    fn detect(&mut self, frame: &F) -> Result<Vec<Target>, BoxError> {
        self(frame)
    }
}

/// Destination for direction values (network table, serial port, ...).
pub trait Connection<D> {
    fn send(&mut self, value: &D) -> Result<(), BoxError>;
}

#[derive(thiserror::Error, Debug)]
pub enum VisionError {
    #[error("detector failed: {0}")]
    Detector(#[source] BoxError),
    #[error("connection failed: {0}")]
    Connection(#[source] BoxError),
    #[error("no connection configured")]
    NoConnection,
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Director(#[from] DirectorError),
}

/// One detection pipeline: what to look for and what to do with it.
pub struct Vision<F, D> {
    detector: Box<dyn Detector<F>>,
    filters: FilterChain,
    director: Director<D>,
    connection: Option<Box<dyn Connection<D>>>,
}

impl<F: Frame, D: Clone> Vision<F, D> {
    pub fn new(
        detector: impl Detector<F> + 'static,
        filters: FilterChain,
        director: Director<D>,
    ) -> Self {
        Self {
            detector: Box::new(detector),
            filters,
            director,
            connection: None,
        }
    }

    pub fn with_connection(mut self, connection: impl Connection<D> + 'static) -> Self {
        self.connection = Some(Box::new(connection));
        self
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    pub fn director(&self) -> &Director<D> {
        &self.director
    }

    pub fn has_connection(&self) -> bool {
        self.connection.is_some()
    }

    /// Detect targets in `frame` and run them through the filter chain.
    pub fn detect(&mut self, frame: &F) -> Result<Vec<Target>, VisionError> {
        let raw = self.detector.detect(frame).map_err(VisionError::Detector)?;
        Ok(self.filters.apply(raw)?)
    }

    pub fn get_directions(&self, targets: &[Target], frame: &FrameSize) -> Result<D, VisionError> {
        Ok(self.director.direct(targets, frame)?)
    }

    pub fn send(&mut self, value: &D) -> Result<(), VisionError> {
        let connection = self.connection.as_mut().ok_or(VisionError::NoConnection)?;
        connection.send(value).map_err(VisionError::Connection)
    }

    /// Detect, filter and direct one frame. The direction is sent when a
    /// connection is configured and returned either way.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn process(&mut self, frame: &F) -> Result<D, VisionError> {
        let size = frame.size()?;
        let targets = self.detect(frame)?;
        log::debug!("{} targets left after filtering on {size} frame", targets.len());
        let directions = self.get_directions(&targets, &size)?;
        if self.connection.is_some() {
            self.send(&directions)?;
        }
        Ok(directions)
    }
}

impl<F, D: fmt::Debug> fmt::Debug for Vision<F, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vision")
            .field("filters", &self.filters)
            .field("director", &self.director)
            .field("connection", &self.connection.is_some())
            .finish_non_exhaustive()
    }
}

/// Two visions sharing one frame loop: the main vision runs `main_amount`
/// frames in a row, then the ambient vision runs for one.
///
/// Call [`AmbientVision::update_vision`] once per frame, after processing.
pub struct AmbientVision<F, D> {
    main: Vision<F, D>,
    ambient: Vision<F, D>,
    main_amount: usize,
    main_frames: usize,
    on_ambient: bool,
}

impl<F: Frame, D: Clone> AmbientVision<F, D> {
    pub fn new(
        main: Vision<F, D>,
        ambient: Vision<F, D>,
        main_amount: usize,
        start_ambient: bool,
    ) -> Self {
        Self {
            main,
            ambient,
            main_amount,
            main_frames: usize::from(!start_ambient),
            on_ambient: start_ambient,
        }
    }

    pub fn main_amount(&self) -> usize {
        self.main_amount
    }

    pub fn is_ambient(&self) -> bool {
        self.on_ambient
    }

    /// Advance to the vision that should handle the next frame.
    pub fn update_vision(&mut self) {
        if self.on_ambient {
            self.on_ambient = false;
            self.main_frames = 1;
        } else if self.main_frames >= self.main_amount {
            self.on_ambient = true;
            self.main_frames = 0;
        } else {
            self.main_frames += 1;
        }
    }

    pub fn current(&self) -> &Vision<F, D> {
        if self.on_ambient {
            &self.ambient
        } else {
            &self.main
        }
    }

    pub fn current_mut(&mut self) -> &mut Vision<F, D> {
        if self.on_ambient {
            &mut self.ambient
        } else {
            &mut self.main
        }
    }

    pub fn detect(&mut self, frame: &F) -> Result<Vec<Target>, VisionError> {
        self.current_mut().detect(frame)
    }

    pub fn get_directions(&self, targets: &[Target], frame: &FrameSize) -> Result<D, VisionError> {
        self.current().get_directions(targets, frame)
    }

    pub fn send(&mut self, value: &D) -> Result<(), VisionError> {
        self.current_mut().send(value)
    }

    pub fn process(&mut self, frame: &F) -> Result<D, VisionError> {
        self.current_mut().process(frame)
    }
}

impl<F, D: fmt::Debug> fmt::Debug for AmbientVision<F, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AmbientVision")
            .field("main_amount", &self.main_amount)
            .field("main_frames", &self.main_frames)
            .field("on_ambient", &self.on_ambient)
            .finish_non_exhaustive()
    }
}
