//! Photos in a polaroid-style frame.

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use super::overlay::PageOverlay;
use crate::parser::DocumentHandle;
use crate::error::{Error, Result};
use crate::model::BoundingBox;
use crate::parser::{ContentOp, DocumentSink, DocumentSource, LopdfHandle, PdfValue};

/// Frame drawn around a placed image.
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// White margin on the left, right and top of the image
    pub padding: f32,

    /// Extra white margin below the image, on top of `padding`
    pub bottom_margin: f32,

    /// Width of the black frame border
    pub border_width: f32,

    /// Draw the frame at all
    pub framed: bool,
}

impl ImageOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_bottom_margin(mut self, margin: f32) -> Self {
        self.bottom_margin = margin;
        self
    }

    pub fn with_border_width(mut self, width: f32) -> Self {
        self.border_width = width;
        self
    }

    /// Place the bare image, without a frame.
    pub fn unframed(mut self) -> Self {
        self.framed = false;
        self
    }
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            padding: 5.0,
            bottom_margin: 30.0,
            border_width: 2.0,
            framed: true,
        }
    }
}

/// What [`place_image`] drew, in PDF user space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    /// Outer rectangle of the frame, if one was drawn
    pub frame: Option<BoundingBox>,
    /// Where the image itself sits
    pub image: BoundingBox,
    /// Width of the image in pixels
    pub pixel_width: u32,
    /// Height of the image in pixels
    pub pixel_height: u32,
    /// Format of the input bytes
    pub mime_type: String,
}

/// Draw a PNG or JPEG image into `area` (PDF user space) on page
/// `page_number`, scaled to fill it.
///
/// JPEG data is embedded as is. PNG data is decoded and stored
/// Flate-compressed, without its alpha channel. With the default options
/// the image sits on a white card with a black border, `padding` wide on
/// three sides and `padding + bottom_margin` below.
pub fn place_image<'i, 'o>(
    input: impl Into<DocumentSource<'i>>,
    output: impl Into<DocumentSink<'o>>,
    page_number: u32,
    image_bytes: &[u8],
    area: BoundingBox,
    options: &ImageOptions,
) -> Result<PlacedImage> {
    let source = input.into();
    let mut handle = LopdfHandle::open(source)?;
    let mut overlay = PageOverlay::open(&handle, page_number)?;

    let mime_type = image_mime_type(image_bytes)?;
    let stream = lopdf::xobject::image_from(image_bytes.to_vec())
        .map_err(|e| Error::ImageDecode(e.to_string()))?;
    let pixel_width = pixel_dimension(&stream.dict, b"Width");
    let pixel_height = pixel_dimension(&stream.dict, b"Height");

    let image_id = handle.raw_doc_mut().add_object(stream);
    let image_name = overlay.add_xobject(&handle, image_id);

    let frame = options.framed.then(|| frame_box(&area, options));
    let mut operations = Vec::new();
    if let Some(frame) = &frame {
        operations.extend(frame_operations(frame, options));
    }
    operations.extend(image_operations(&image_name, &area));
    overlay.apply(&mut handle, &operations)?;

    handle.save(output.into())?;
    log::debug!(
        "Placed a {}x{} {} on page {} of {}",
        pixel_width,
        pixel_height,
        mime_type,
        page_number,
        source
    );

    Ok(PlacedImage {
        frame,
        image: area,
        pixel_width,
        pixel_height,
        mime_type: mime_type.to_string(),
    })
}

/// Only formats a PDF reader can show after embedding are accepted.
fn image_mime_type(bytes: &[u8]) -> Result<&'static str> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => Ok("image/png"),
        Ok(ImageFormat::Jpeg) => Ok("image/jpeg"),
        Ok(other) => Err(Error::ImageDecode(format!(
            "unsupported format {:?}",
            other
        ))),
        Err(e) => Err(Error::ImageDecode(e.to_string())),
    }
}

fn pixel_dimension(dict: &lopdf::Dictionary, key: &[u8]) -> u32 {
    dict.get(key)
        .and_then(|o| o.as_i64())
        .map(|v| v.max(0) as u32)
        .unwrap_or(0)
}

fn frame_box(area: &BoundingBox, options: &ImageOptions) -> BoundingBox {
    BoundingBox::new(
        area.x0 - options.padding,
        area.y0 - options.padding - options.bottom_margin,
        area.x1 + options.padding,
        area.y1 + options.padding,
    )
}

fn frame_operations(frame: &BoundingBox, options: &ImageOptions) -> Vec<ContentOp> {
    let real = PdfValue::Real;
    vec![
        ContentOp::new("q", vec![]),
        ContentOp::new("rg", vec![real(1.0), real(1.0), real(1.0)]),
        ContentOp::new("RG", vec![real(0.0), real(0.0), real(0.0)]),
        ContentOp::new("w", vec![real(options.border_width)]),
        ContentOp::new(
            "re",
            vec![
                real(frame.x0),
                real(frame.y0),
                real(frame.width()),
                real(frame.height()),
            ],
        ),
        ContentOp::new("B", vec![]),
        ContentOp::new("Q", vec![]),
    ]
}

fn image_operations(image_name: &str, area: &BoundingBox) -> Vec<ContentOp> {
    let real = PdfValue::Real;
    vec![
        ContentOp::new("q", vec![]),
        ContentOp::new(
            "cm",
            vec![
                real(area.width()),
                real(0.0),
                real(0.0),
                real(area.height()),
                real(area.x0),
                real(area.y0),
            ],
        ),
        ContentOp::new("Do", vec![PdfValue::Name(image_name.as_bytes().to_vec())]),
        ContentOp::new("Q", vec![]),
    ]
}
