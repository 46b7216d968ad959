//! Word-wrapped paragraphs on a note backdrop.

use serde::{Deserialize, Serialize};

use super::overlay::PageOverlay;
use crate::error::Result;
use crate::parser::DocumentHandle;
use crate::model::BoundingBox;
use crate::parser::{
    encode_win_ansi, ContentOp, DocumentSink, DocumentSource, LopdfHandle, PdfValue,
    StandardFont,
};

/// How a paragraph is set inside its box.
#[derive(Debug, Clone)]
pub struct ParagraphOptions {
    /// Font size in points
    pub font_size: f32,

    /// Built-in face used for the text
    pub font: StandardFont,

    /// Line height as a multiple of the font size
    pub line_spacing: f32,

    /// Left inset of the text; also kept free on the right and at the
    /// bottom when checking for overflow
    pub inset: f32,

    /// Distance from the top of the box to the first baseline
    pub top_offset: f32,

    /// Fill color of the note drawn behind the text, `None` for no note
    pub backdrop: Option<[f32; 3]>,
}

impl ParagraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    pub fn with_font(mut self, font: StandardFont) -> Self {
        self.font = font;
        self
    }

    pub fn with_line_spacing(mut self, spacing: f32) -> Self {
        self.line_spacing = spacing;
        self
    }

    pub fn with_backdrop(mut self, color: Option<[f32; 3]>) -> Self {
        self.backdrop = color;
        self
    }

    /// Distance between consecutive baselines.
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_spacing
    }
}

impl Default for ParagraphOptions {
    fn default() -> Self {
        Self {
            font_size: 15.0,
            font: StandardFont::Helvetica,
            line_spacing: 1.5,
            inset: 10.0,
            top_offset: 15.0,
            backdrop: Some([1.0, 0.94, 0.55]),
        }
    }
}

/// What [`add_paragraph`] drew.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphReport {
    /// Lines in drawing order, top to bottom
    pub lines: Vec<String>,
    /// Distance between baselines
    pub line_height: f32,
    /// The lines need more height than the box offers
    pub overflow: bool,
}

/// Word-wrap `text` into `frame` (PDF user space) on page `page_number`.
///
/// Lines are filled greedily while they stay narrower than the box minus
/// twice the inset. The first baseline sits `top_offset` below the top of
/// the box, each following one a line height lower. Text that does not fit
/// vertically is still drawn, reported as `overflow` and logged.
pub fn add_paragraph<'i, 'o>(
    input: impl Into<DocumentSource<'i>>,
    output: impl Into<DocumentSink<'o>>,
    page_number: u32,
    text: &str,
    frame: BoundingBox,
    options: &ParagraphOptions,
) -> Result<ParagraphReport> {
    let source = input.into();
    let mut handle = LopdfHandle::open(source)?;
    let mut overlay = PageOverlay::open(&handle, page_number)?;

    let max_width = frame.width() - 2.0 * options.inset;
    let lines = wrap_words(text, options.font, options.font_size, max_width);
    let line_height = options.line_height();
    let overflow = lines.len() as f32 * line_height > frame.height() - 2.0 * options.inset;
    if overflow {
        log::warn!(
            "Paragraph needs {} lines ({:.1}pt) but the box is {:.1}pt tall",
            lines.len(),
            lines.len() as f32 * line_height,
            frame.height()
        );
    }

    let font_name = overlay.add_font(&mut handle, options.font);
    overlay.apply(
        &mut handle,
        &paragraph_operations(&lines, &font_name, &frame, options),
    )?;

    handle.save(output.into())?;
    log::debug!(
        "Added a {}-line paragraph on page {} of {}",
        lines.len(),
        page_number,
        source
    );

    Ok(ParagraphReport {
        lines,
        line_height,
        overflow,
    })
}

/// Greedy word wrap. A word wider than `max_width` gets a line of its own.
fn wrap_words(text: &str, font: StandardFont, font_size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", current, word)
        };
        if font.text_width(&candidate, font_size) < max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn paragraph_operations(
    lines: &[String],
    font_name: &str,
    frame: &BoundingBox,
    options: &ParagraphOptions,
) -> Vec<ContentOp> {
    let real = PdfValue::Real;
    let mut ops = Vec::with_capacity(lines.len() * 2 + 10);

    if let Some([r, g, b]) = options.backdrop {
        ops.extend([
            ContentOp::new("q", vec![]),
            ContentOp::new("rg", vec![real(r), real(g), real(b)]),
            // The note overhangs the text box slightly on the right
            ContentOp::new(
                "re",
                vec![
                    real(frame.x0),
                    real(frame.y0),
                    real(frame.width() * 1.05),
                    real(frame.height()),
                ],
            ),
            ContentOp::new("f", vec![]),
            ContentOp::new("Q", vec![]),
        ]);
    }
    if lines.is_empty() {
        return ops;
    }

    ops.extend([
        ContentOp::new("BT", vec![]),
        ContentOp::new("rg", vec![real(0.0), real(0.0), real(0.0)]),
        ContentOp::new(
            "Tf",
            vec![
                PdfValue::Name(font_name.as_bytes().to_vec()),
                real(options.font_size),
            ],
        ),
    ]);
    for (i, line) in lines.iter().enumerate() {
        let offset = if i == 0 {
            vec![
                real(frame.x0 + options.inset),
                real(frame.y1 - options.top_offset),
            ]
        } else {
            vec![real(0.0), real(-options.line_height())]
        };
        ops.push(ContentOp::new("Td", offset));
        ops.push(ContentOp::new("Tj", vec![PdfValue::Str(encode_win_ansi(line))]));
    }
    ops.push(ContentOp::new("ET", vec![]));
    ops
}
