//! Page content extraction.
//!
//! Text is reported one fragment per text-showing operator, in the order the
//! content stream shows it. Images are reported once per `Do`, so an image
//! drawn twice appears twice.

mod images;

use crate::error::{Error, Result};
use crate::model::{
    BoundingBox, ImagePlacement, PageContent, PageSize, SkippedImage, TextFragment,
};
use crate::parser::{
    ContentInterpreter, DocumentHandle, DocumentSource, ErrorMode, ExtractOptions, LopdfHandle,
    TextSpan,
};

/// Extract positioned text and images from page `page_number` (1-based).
///
/// # Example
///
/// ```no_run
/// use folio::extract_page;
///
/// let content = extract_page("yearbook.pdf", 53)?;
/// for fragment in &content.text {
///     println!("{} at ({}, {})", fragment.text, fragment.x, fragment.y);
/// }
/// content.save_images("out")?;
/// # Ok::<(), folio::Error>(())
/// ```
pub fn extract_page<'i>(
    input: impl Into<DocumentSource<'i>>,
    page_number: u32,
) -> Result<PageContent> {
    extract_page_with_options(input, page_number, &ExtractOptions::default())
}

/// [`extract_page`] with custom options.
pub fn extract_page_with_options<'i>(
    input: impl Into<DocumentSource<'i>>,
    page_number: u32,
    options: &ExtractOptions,
) -> Result<PageContent> {
    let source = input.into();
    let handle = LopdfHandle::open(source)?;

    let page_count = handle.page_count();
    if page_number < 1 || page_number > page_count {
        return Err(Error::PageIndex {
            page: page_number,
            page_count,
        });
    }
    let page_id = handle.page_id(page_number)?;
    let page_size = handle.page_size(page_number)?;

    let scan = ContentInterpreter::new(handle.raw_doc(), options).scan_page(page_id)?;
    log::debug!(
        "Page {} of {}: {} text blocks, {} lines, {} image draws",
        page_number,
        source,
        scan.blocks.len(),
        scan.line_count(),
        scan.images.len()
    );

    let mut content = PageContent::new(page_number, page_size);
    content.text = scan
        .spans()
        .map(|span| to_fragment(span, &page_size))
        .collect();

    for (index, occurrence) in scan.images.iter().enumerate() {
        match images::resolve_image(handle.raw_doc(), page_number, index, occurrence, &page_size)
        {
            Ok(placement) => content.images.push(placement),
            Err(reason) => match options.error_mode {
                ErrorMode::Strict => return Err(Error::ImageResolution { index, reason }),
                ErrorMode::Lenient => {
                    log::warn!(
                        "Skipping image {} (/{}) on page {}: {}",
                        index,
                        occurrence.resource_name,
                        page_number,
                        reason
                    );
                    content.skipped_images.push(SkippedImage {
                        index,
                        name: ImagePlacement::file_name(page_number, index),
                        reason,
                    });
                }
            },
        }
    }

    Ok(content)
}

/// Place a span on the page with a top-left origin.
fn to_fragment(span: &TextSpan, page: &PageSize) -> TextFragment {
    let top = page.y + page.height;
    let x0 = span.x - page.x;
    let y0 = top - span.top();
    let bbox = BoundingBox::new(x0, y0, x0 + span.width, y0 + span.font_size);
    TextFragment::from_bbox(span.text.clone(), bbox, span.font_name.clone(), span.font_size)
}
