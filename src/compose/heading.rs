//! Boxed headings stamped onto existing pages.

use super::overlay::PageOverlay;
use crate::error::Result;
use crate::model::{BoundingBox, PageSize};
use crate::parser::{
    encode_win_ansi, ContentOp, DocumentHandle, DocumentSink, DocumentSource, LopdfHandle,
    PdfValue, StandardFont,
};

/// Layout of a stamped heading.
#[derive(Debug, Clone)]
pub struct HeadingOptions {
    /// Heading font size in points
    pub font_size: f32,

    /// Space between text and border; doubled horizontally
    pub padding: f32,

    /// Lower edge of the box, in PDF user space
    pub baseline_y: f32,

    /// Border line width
    pub border_width: f32,
}

impl HeadingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_baseline_y(mut self, y: f32) -> Self {
        self.baseline_y = y;
        self
    }

    pub fn with_border_width(mut self, width: f32) -> Self {
        self.border_width = width;
        self
    }
}

impl Default for HeadingOptions {
    fn default() -> Self {
        Self {
            font_size: 80.0,
            padding: 10.0,
            baseline_y: 750.0,
            border_width: 2.0,
        }
    }
}

/// Draw `heading` in a white, black-bordered box centered across the top of
/// page `page_number` (1-based), writing the result to `output`.
///
/// Returns the box in PDF user space. The page's existing content is kept
/// and isolated from the stamp with a save/restore pair.
pub fn stamp_heading<'i, 'o>(
    input: impl Into<DocumentSource<'i>>,
    output: impl Into<DocumentSink<'o>>,
    page_number: u32,
    heading: &str,
    options: &HeadingOptions,
) -> Result<BoundingBox> {
    let source = input.into();
    let mut handle = LopdfHandle::open(source)?;
    let mut overlay = PageOverlay::open(&handle, page_number)?;

    let page_size = handle.page_size(page_number)?;
    let font = StandardFont::HelveticaBold;
    let text_width = font.text_width(heading, options.font_size);
    let frame = heading_box(&page_size, text_width, options);

    let font_name = overlay.add_font(&mut handle, font);
    overlay.apply(
        &mut handle,
        &stamp_operations(heading, &font_name, &frame, options),
    )?;

    handle.save(output.into())?;
    log::debug!("Stamped \"{}\" on page {} of {}", heading, page_number, source);

    Ok(frame)
}

/// Box around a heading of width `text_width`, centered horizontally.
fn heading_box(page: &PageSize, text_width: f32, options: &HeadingOptions) -> BoundingBox {
    let width = text_width + 4.0 * options.padding;
    let height = options.font_size + 2.0 * options.padding;
    let x = page.x + (page.width - width) / 2.0;
    let y = options.baseline_y;
    BoundingBox::new(x, y, x + width, y + height)
}

fn stamp_operations(
    heading: &str,
    font_name: &str,
    frame: &BoundingBox,
    options: &HeadingOptions,
) -> Vec<ContentOp> {
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
        ContentOp::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
        ContentOp::new("BT", vec![]),
        ContentOp::new(
            "Tf",
            vec![
                PdfValue::Name(font_name.as_bytes().to_vec()),
                real(options.font_size),
            ],
        ),
        ContentOp::new(
            "Td",
            vec![
                real(frame.x0 + 2.0 * options.padding),
                real(frame.y0 + options.padding),
            ],
        ),
        ContentOp::new("Tj", vec![PdfValue::Str(encode_win_ansi(heading))]),
        ContentOp::new("ET", vec![]),
        ContentOp::new("Q", vec![]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_box_centered() {
        let page = PageSize::letter();
        let options = HeadingOptions::default();
        let frame = heading_box(&page, 200.0, &options);

        // 200 + 4 * 10 wide, 80 + 2 * 10 tall
        assert_eq!(frame.width(), 240.0);
        assert_eq!(frame.height(), 100.0);
        assert_eq!(frame.x0, (612.0 - 240.0) / 2.0);
        assert_eq!(frame.y0, 750.0);
    }

    #[test]
    fn test_heading_box_respects_media_box_origin() {
        let page = PageSize::from_media_box([100.0, 0.0, 712.0, 792.0]);
        let frame = heading_box(&page, 100.0, &HeadingOptions::default());
        assert_eq!(frame.x0, 100.0 + (612.0 - 140.0) / 2.0);
    }

    #[test]
    fn test_stamp_operations_text_position() {
        let options = HeadingOptions::default();
        let frame = BoundingBox::new(100.0, 750.0, 340.0, 850.0);
        let ops = stamp_operations("Hi", "FolioF1", &frame, &options);

        assert_eq!(ops.first().map(|op| op.operator.as_str()), Some("q"));
        assert_eq!(ops.last().map(|op| op.operator.as_str()), Some("Q"));
        let td = ops.iter().find(|op| op.operator == "Td").unwrap();
        assert_eq!(
            td.operands,
            vec![PdfValue::Real(120.0), PdfValue::Real(760.0)]
        );
    }
}
