//! Section divider pages.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::PageSize;
use crate::parser::{
    encode_win_ansi, ContentOp, DocumentHandle, DocumentSink, DocumentSource, FontResource,
    LopdfHandle, NewPage, PdfValue, StandardFont,
};

/// Resource name of the heading font on generated pages.
const HEADING_FONT: &[u8] = b"F1";

/// How divider headings are drawn.
#[derive(Debug, Clone)]
pub struct SectionOptions {
    /// Heading font size in points
    pub font_size: f32,

    /// Baseline origin of the heading, in PDF user space
    pub origin: (f32, f32),

    /// Built-in face used for the heading
    pub font: StandardFont,
}

impl SectionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading font size.
    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set where the heading baseline starts.
    pub fn with_origin(mut self, x: f32, y: f32) -> Self {
        self.origin = (x, y);
        self
    }

    /// Set the heading face.
    pub fn with_font(mut self, font: StandardFont) -> Self {
        self.font = font;
        self
    }
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            font_size: 20.0,
            origin: (100.0, 100.0),
            font: StandardFont::HelveticaBold,
        }
    }
}

/// Summary of an append run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppendReport {
    /// Pages copied from the input
    pub original_pages: u32,

    /// Divider pages added after them
    pub generated_pages: u32,

    /// Size given to every divider page
    pub page_size: PageSize,
}

impl AppendReport {
    /// Page count of the written document.
    pub fn total_pages(&self) -> u32 {
        self.original_pages + self.generated_pages
    }
}

/// Append `count` divider pages titled `"{label} - Page {i}"` to a document.
///
/// The input is read in full and never modified; the result, original
/// pages first, is written to `output`. Divider pages take the size of the
/// last original page.
///
/// # Example
///
/// ```no_run
/// use folio::append_sections;
///
/// let report = append_sections("yearbook.pdf", "yearbook_out.pdf", 3, "MEMORIES")?;
/// assert_eq!(report.generated_pages, 3);
/// # Ok::<(), folio::Error>(())
/// ```
pub fn append_sections<'i, 'o>(
    input: impl Into<DocumentSource<'i>>,
    output: impl Into<DocumentSink<'o>>,
    count: u32,
    label: &str,
) -> Result<AppendReport> {
    append_sections_with_options(input, output, count, label, &SectionOptions::default())
}

/// [`append_sections`] with custom heading options.
pub fn append_sections_with_options<'i, 'o>(
    input: impl Into<DocumentSource<'i>>,
    output: impl Into<DocumentSink<'o>>,
    count: u32,
    label: &str,
    options: &SectionOptions,
) -> Result<AppendReport> {
    let source = input.into();
    let mut handle = LopdfHandle::open(source)?;

    let report = append_to(&mut handle, count, label, options)?;
    handle.save(output.into())?;

    log::debug!(
        "Appended {} section pages to {} ({} pages total)",
        report.generated_pages,
        source,
        report.total_pages()
    );
    Ok(report)
}

/// Add the divider pages to an open document.
pub(crate) fn append_to<H: DocumentHandle>(
    handle: &mut H,
    count: u32,
    label: &str,
    options: &SectionOptions,
) -> Result<AppendReport> {
    let original_pages = handle.page_count();
    if original_pages == 0 {
        return Err(Error::EmptyDocument);
    }
    let page_size = handle.page_size(original_pages)?;

    if label.is_empty() {
        log::debug!("Section label is empty; headings will read \" - Page N\"");
    }

    for i in 1..=count {
        let heading = format!("{} - Page {}", label, i);
        handle.append_page(&page_size, divider_page(&heading, options))?;
    }

    Ok(AppendReport {
        original_pages,
        generated_pages: count,
        page_size,
    })
}

/// A page showing one line of text.
fn divider_page(heading: &str, options: &SectionOptions) -> NewPage {
    let (x, y) = options.origin;
    NewPage {
        operations: vec![
            ContentOp::new("BT", vec![]),
            ContentOp::new(
                "Tf",
                vec![
                    PdfValue::Name(HEADING_FONT.to_vec()),
                    PdfValue::Real(options.font_size),
                ],
            ),
            ContentOp::new("Td", vec![PdfValue::Real(x), PdfValue::Real(y)]),
            ContentOp::new("Tj", vec![PdfValue::Str(encode_win_ansi(heading))]),
            ContentOp::new("ET", vec![]),
        ],
        fonts: vec![FontResource {
            name: HEADING_FONT.to_vec(),
            base_font: options.font.base_font().to_string(),
        }],
    }
}
