//! Pattern color space.
//!
//! A Pattern instance only exists to carry the underlying color space of
//! an uncolored tiling pattern; it has no component count and cannot
//! convert pixels. The pixel-conversion entry points on
//! [`ColorSpace`](super::ColorSpace) treat a Pattern as a caller bug and
//! panic.

use super::ColorSpace;

#[derive(Debug)]
pub struct Pattern {
    base: Option<Box<ColorSpace>>,
}

impl Pattern {
    pub fn new(base: Option<ColorSpace>) -> Self {
        Self {
            base: base.map(Box::new),
        }
    }

    /// The base color space of an uncolored pattern; `None` for colored
    /// patterns, which carry their own color data.
    pub fn base(&self) -> Option<&ColorSpace> {
        self.base.as_deref()
    }
}
