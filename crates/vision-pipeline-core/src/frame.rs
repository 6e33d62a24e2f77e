//! Frame dimensions used to normalize target coordinates.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::GeometryError;

/// Default capture width used when a filter is configured without a frame.
pub const DEFAULT_FRAME_WIDTH: u32 = 320;
/// Default capture height used when a filter is configured without a frame.
pub const DEFAULT_FRAME_HEIGHT: u32 = 240;

/// Validated frame dimensions in pixels. Both sides are strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFrameSize", into = "RawFrameSize")]
pub struct FrameSize {
    width: u32,
    height: u32,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct RawFrameSize {
    width: u32,
    height: u32,
}

impl TryFrom<RawFrameSize> for FrameSize {
    type Error = GeometryError;

    fn try_from(raw: RawFrameSize) -> Result<Self, Self::Error> {
        FrameSize::new(raw.width, raw.height)
    }
}

impl From<FrameSize> for RawFrameSize {
    fn from(size: FrameSize) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_FRAME_WIDTH,
            height: DEFAULT_FRAME_HEIGHT,
        }
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Result<Self, GeometryError> {
        if width == 0 || height == 0 {
            return Err(GeometryError::InvalidFrameSize { width, height });
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Frame area in square pixels.
    #[inline]
    pub fn area(&self) -> f32 {
        self.width as f32 * self.height as f32
    }

    /// Geometric center `(width / 2, height / 2)`.
    #[inline]
    pub fn center(&self) -> Point2<f32> {
        Point2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }

    /// Map a pixel position to screen space, `[-1, 1]` on both axes with the
    /// frame center at the origin.
    pub fn normalize(&self, p: Point2<f32>) -> (f32, f32) {
        (
            p.x / (self.width as f32 / 2.0) - 1.0,
            p.y / (self.height as f32 / 2.0) - 1.0,
        )
    }
}

/// Anything with known pixel dimensions that targets were detected in.
pub trait Frame {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Validated dimensions of this frame.
    fn size(&self) -> Result<FrameSize, GeometryError> {
        FrameSize::new(self.width(), self.height())
    }
}

impl Frame for FrameSize {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn size(&self) -> Result<FrameSize, GeometryError> {
        Ok(*self)
    }
}

#[cfg(feature = "image")]
impl<P, C> Frame for image::ImageBuffer<P, C>
where
    P: image::Pixel,
    C: std::ops::Deref<Target = [P::Subpixel]>,
{
    fn width(&self) -> u32 {
        image::ImageBuffer::width(self)
    }

    fn height(&self) -> u32 {
        image::ImageBuffer::height(self)
    }
}
