//! # folio
//!
//! Append section pages to PDF documents and extract positioned content
//! from them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use folio::{append_sections, extract_page, render};
//!
//! fn main() -> folio::Result<()> {
//!     // Add three "MEMORIES - Page N" dividers after the last page
//!     let report = append_sections("yearbook.pdf", "yearbook_out.pdf", 3, "MEMORIES")?;
//!     println!("{} pages written", report.total_pages());
//!
//!     // Read text and images back from one page
//!     let content = extract_page("yearbook_out.pdf", 1)?;
//!     println!("{}", render::to_listing(&content));
//!     content.save_images("images")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Section dividers**: generated pages sized like the document's last page
//! - **Heading stamps**: boxed, centered headings drawn over existing pages
//! - **Photos and paragraphs**: framed images and word-wrapped notes drawn
//!   onto existing pages
//! - **Content extraction**: text fragments and image placements with
//!   top-left-origin coordinates
//! - **Raw image bytes**: embedded image streams saved exactly as stored
//!
//! Image coordinates are approximate: they come from the transformation in
//! effect when the image is drawn, ignoring rotation, skew and clipping.
//! Every placement carries [`CoordinateAccuracy::Approximate`] to say so.

pub mod compose;
pub mod detect;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use compose::{
    add_paragraph, append_sections, append_sections_with_options, place_image, stamp_heading,
    AppendReport, HeadingOptions, ImageOptions, ParagraphOptions, ParagraphReport, PlacedImage,
    SectionOptions,
};
pub use detect::{detect_header_from_bytes, detect_header_from_path, is_pdf_bytes, PdfHeader};
pub use error::{Error, Result};
pub use extract::{extract_page, extract_page_with_options};
pub use model::{
    BoundingBox, CoordinateAccuracy, ImagePlacement, PageContent, PageSize, SkippedImage,
    TextFragment,
};
pub use parser::{DocumentSink, DocumentSource, ErrorMode, ExtractOptions, StandardFont};
pub use render::JsonFormat;

use parser::{DocumentHandle, LopdfHandle};

/// Number of pages in a document.
///
/// # Example
///
/// ```no_run
/// let pages = folio::page_count("yearbook.pdf")?;
/// # Ok::<(), folio::Error>(())
/// ```
pub fn page_count<'i>(input: impl Into<DocumentSource<'i>>) -> Result<u32> {
    let handle = LopdfHandle::open(input.into())?;
    Ok(handle.page_count())
}

/// Size of every page, in document order.
pub fn page_sizes<'i>(input: impl Into<DocumentSource<'i>>) -> Result<Vec<PageSize>> {
    let handle = LopdfHandle::open(input.into())?;
    (1..=handle.page_count())
        .map(|page_number| handle.page_size(page_number))
        .collect()
}
