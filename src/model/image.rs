//! Embedded image placements.

use serde::{Deserialize, Serialize};

/// How far placement coordinates can be trusted.
///
/// Image positions are read from the transformation matrix in effect when
/// the image is drawn. Rotation, skew and clipping are not taken into
/// account, so on complex layouts the numbers may not match what a viewer
/// shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateAccuracy {
    /// Position and size are an estimate and may be wrong for rotated,
    /// clipped or otherwise transformed images.
    Approximate,
}

/// One occurrence of an embedded image on a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagePlacement {
    /// Synthesized file name: `image_{page}_{index}.png`
    pub name: String,

    /// Occurrence index on the page (0-based)
    pub index: usize,

    /// Left edge (top-left origin)
    pub x: f32,

    /// Top edge (top-left origin)
    pub y: f32,

    /// Drawn width in points
    pub width: f32,

    /// Drawn height in points
    pub height: f32,

    /// Stream bytes exactly as stored in the document
    #[serde(skip_serializing, default)]
    pub bytes: Vec<u8>,

    /// Object number and generation of the image stream
    pub object_id: (u32, u16),

    /// MIME type guessed from the stream filter
    pub mime_type: String,

    /// Trust level of the coordinate fields
    pub accuracy: CoordinateAccuracy,
}

impl ImagePlacement {
    /// File name for an image occurrence.
    pub fn file_name(page_number: u32, index: usize) -> String {
        format!("image_{}_{}.png", page_number, index)
    }

    /// Size of the stored bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// MIME type for a stream `/Filter` name.
    pub fn mime_type_for_filter(filter: Option<&str>) -> &'static str {
        match filter {
            Some("DCTDecode") => "image/jpeg",
            Some("JPXDecode") => "image/jp2",
            Some("CCITTFaxDecode") => "image/tiff",
            _ => "application/octet-stream",
        }
    }
}

/// An image occurrence that could not be resolved and was left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedImage {
    /// Occurrence index the image would have had
    pub index: usize,

    /// Name the image would have had
    pub name: String,

    /// Why it was skipped
    pub reason: String,
}
