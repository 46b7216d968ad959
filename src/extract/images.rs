//! Image occurrence resolution.

use lopdf::{Document as LopdfDocument, Object};

use crate::model::{CoordinateAccuracy, ImagePlacement, PageSize};
use crate::parser::ImageOccurrence;

/// Fetch an occurrence's stream and place it on the page.
///
/// The position comes from the CTM's translation and axis scales only.
pub(crate) fn resolve_image(
    doc: &LopdfDocument,
    page_number: u32,
    index: usize,
    occurrence: &ImageOccurrence,
    page: &PageSize,
) -> std::result::Result<ImagePlacement, String> {
    let id = occurrence.target.clone()?;
    let stream = match doc.get_object(id) {
        Ok(Object::Stream(stream)) => stream,
        Ok(_) => return Err(format!("object {} {} R is not a stream", id.0, id.1)),
        Err(e) => return Err(format!("object {} {} R: {}", id.0, id.1, e)),
    };

    let filter = match stream.dict.get(b"Filter") {
        Ok(Object::Name(name)) => Some(name.as_slice()),
        Ok(Object::Array(filters)) => match filters.last() {
            Some(Object::Name(name)) => Some(name.as_slice()),
            _ => None,
        },
        _ => None,
    };
    let filter = filter.and_then(|name| std::str::from_utf8(name).ok());

    let ctm = &occurrence.ctm;
    let width = ctm.horizontal_scale();
    let height = ctm.vertical_scale();
    let top = page.y + page.height;

    Ok(ImagePlacement {
        name: ImagePlacement::file_name(page_number, index),
        index,
        x: ctm.e - page.x,
        y: top - (ctm.f + height),
        width,
        height,
        bytes: stream.content.clone(),
        object_id: id,
        mime_type: ImagePlacement::mime_type_for_filter(filter).to_string(),
        accuracy: CoordinateAccuracy::Approximate,
    })
}
