// ABOUTME: Pixel geometry shared by the layout engine and its hosts.
// ABOUTME: Sizes and rectangles are in (possibly fractional) pixels.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// The width when `along_width` is set, otherwise the height.
    pub fn along(&self, along_width: bool) -> f32 {
        if along_width {
            self.width
        } else {
            self.height
        }
    }

    /// Copy of this size with one axis replaced.
    pub fn with_along(self, along_width: bool, value: f32) -> Self {
        if along_width {
            Self {
                width: value,
                ..self
            }
        } else {
            Self {
                height: value,
                ..self
            }
        }
    }
}

/// Rectangle in pixels, relative to the root pane's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn from_size(size: Size) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// True if the two rectangles share any area.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}
