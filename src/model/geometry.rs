//! Page geometry types.

use serde::{Deserialize, Serialize};

/// US Letter, used when a page has no MediaBox anywhere in its page tree.
const LETTER: (f32, f32) = (612.0, 792.0);

/// Size of a page, as described by its MediaBox.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    /// Lower-left X of the MediaBox
    pub x: f32,

    /// Lower-left Y of the MediaBox
    pub y: f32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,
}

impl PageSize {
    /// Create a page size with its origin at (0, 0).
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    /// Create a page size from MediaBox corners `[llx lly urx ury]`.
    ///
    /// Corners given in the "wrong" order are normalized.
    pub fn from_media_box(media_box: [f32; 4]) -> Self {
        let [x0, y0, x1, y1] = media_box;
        let (left, right) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (bottom, top) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            x: left,
            y: bottom,
            width: right - left,
            height: top - bottom,
        }
    }

    /// Standard Letter size (8.5 x 11 inches).
    pub fn letter() -> Self {
        Self::new(LETTER.0, LETTER.1)
    }

    /// MediaBox corners `[llx lly urx ury]`.
    pub fn media_box(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Check if the page is in landscape orientation.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::letter()
    }
}

/// An axis-aligned rectangle on a page.
///
/// Extracted content uses a top-left origin, so `y0` is the top edge there.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge (lower edge in PDF user space)
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from its edges.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width as `x1 - x0`.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height as `y1 - y0`.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}
