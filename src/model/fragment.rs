//! Positioned text.

use super::BoundingBox;
use serde::{Deserialize, Serialize};

/// One span of text with its approximate position on the page.
///
/// Coordinates use a top-left origin. `width` and `height` are derived from
/// the span's bounding box and are not validated further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// The text content
    pub text: String,

    /// Left edge
    pub x: f32,

    /// Top edge
    pub y: f32,

    /// `bbox.x1 - bbox.x0`
    pub width: f32,

    /// `bbox.y1 - bbox.y0`
    pub height: f32,

    /// Base font name (e.g., "Helvetica-Bold")
    pub font_name: String,

    /// Effective font size in points
    pub font_size: f32,
}

impl TextFragment {
    /// Build a fragment from a bounding box.
    pub fn from_bbox(
        text: impl Into<String>,
        bbox: BoundingBox,
        font_name: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self {
            text: text.into(),
            x: bbox.x0,
            y: bbox.y0,
            width: bbox.width(),
            height: bbox.height(),
            font_name: font_name.into(),
            font_size,
        }
    }

    /// The fragment's bounding box.
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}
