//! Canvas geometry: normalized script positions and pixel offsets.
//!
//! Scripts place things with normalized coordinates: `(0.0, 0.0)` is the
//! top-left corner, `(1.0, 1.0)` the bottom-right. Editing backends position
//! transformed strips by pixel offset from the canvas center, y pointing up.

use serde::{Deserialize, Serialize};

/// A normalized position on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub const CENTER: NormalizedPoint = NormalizedPoint { x: 0.5, y: 0.5 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Same point with y measured from the bottom edge.
    ///
    /// Text strips take their location this way.
    pub fn flip_y(&self) -> Self {
        Self {
            x: self.x,
            y: 1.0 - self.y,
        }
    }
}

impl Default for NormalizedPoint {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Horizontal and vertical scale factors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Offset in pixels from the canvas center, y pointing up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelOffset {
    pub x: f64,
    pub y: f64,
}

/// Output canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const FULL_HD: Canvas = Canvas {
        width: 1920,
        height: 1080,
    };

    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Convert a normalized position into a pixel offset from the center.
    ///
    /// `x' = width * x - width / 2`, `y' = height / 2 - height * y`.
    pub fn pixel_offset(&self, point: NormalizedPoint) -> PixelOffset {
        let w = self.width as f64;
        let h = self.height as f64;
        PixelOffset {
            x: w * point.x - w / 2.0,
            y: h / 2.0 - h * point.y,
        }
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::FULL_HD
    }
}
