//! Drawing on top of an existing page.

use lopdf::{Dictionary, Object, ObjectId, Stream};

use crate::error::{Error, Result};
use crate::parser::{
    encode_content, resolve_dict, ContentOp, DocumentHandle, LopdfHandle, PageId, StandardFont,
};

/// Prefix for font resource names we add.
const FONT_PREFIX: &str = "FolioF";

/// Prefix for image resource names we add.
const IMAGE_PREFIX: &str = "FolioIm";

/// New content for one existing page, committed with [`PageOverlay::apply`].
///
/// The page's effective resources are copied onto the page itself, so a
/// dictionary shared through the page tree is left alone.
pub(crate) struct PageOverlay {
    page_number: u32,
    page_id: PageId,
    resources: Dictionary,
}

impl PageOverlay {
    /// Start an overlay on a 1-based page.
    pub(crate) fn open(handle: &LopdfHandle, page_number: u32) -> Result<Self> {
        if handle.page_count() == 0 {
            return Err(Error::EmptyDocument);
        }
        let page_id = handle.page_id(page_number)?;
        let resources = handle
            .inherited_attribute(page_id, b"Resources")
            .and_then(|o| o.as_dict().ok())
            .cloned()
            .unwrap_or_else(Dictionary::new);

        Ok(Self {
            page_number,
            page_id,
            resources,
        })
    }

    /// Register a built-in font and return its resource name.
    pub(crate) fn add_font(&mut self, handle: &mut LopdfHandle, font: StandardFont) -> String {
        let id = handle.font_object(font.base_font());
        self.add_resource(handle, b"Font", FONT_PREFIX, id)
    }

    /// Register an XObject and return its resource name.
    pub(crate) fn add_xobject(&mut self, handle: &LopdfHandle, id: ObjectId) -> String {
        self.add_resource(handle, b"XObject", IMAGE_PREFIX, id)
    }

    fn add_resource(
        &mut self,
        handle: &LopdfHandle,
        category: &[u8],
        prefix: &str,
        id: ObjectId,
    ) -> String {
        let mut entries = self
            .resources
            .get(category)
            .ok()
            .and_then(|o| resolve_dict(handle.raw_doc(), o))
            .cloned()
            .unwrap_or_else(Dictionary::new);
        let name = unused_name(&entries, prefix);
        entries.set(name.clone(), Object::Reference(id));
        self.resources
            .set(category.to_vec(), Object::Dictionary(entries));
        name
    }

    /// Put `operations` after the page's content.
    ///
    /// The existing streams are kept in order between an added `q` stream
    /// and the new one, which starts with the matching `Q`.
    pub(crate) fn apply(self, handle: &mut LopdfHandle, operations: &[ContentOp]) -> Result<()> {
        let existing = existing_contents(handle, self.page_id);

        let doc = handle.raw_doc_mut();
        let open_id = doc.add_object(Stream::new(Dictionary::new(), b"q\n".to_vec()));
        let mut close = b"Q\n".to_vec();
        close.extend(encode_content(operations)?);
        let overlay_id = doc.add_object(Stream::new(Dictionary::new(), close));

        let mut contents = Vec::with_capacity(existing.len() + 2);
        contents.push(Object::Reference(open_id));
        contents.extend(existing);
        contents.push(Object::Reference(overlay_id));

        let page = doc
            .get_object_mut(self.page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| Error::DocumentWrite(format!("page {}: {}", self.page_number, e)))?;
        page.set("Resources", Object::Dictionary(self.resources));
        page.set("Contents", Object::Array(contents));
        Ok(())
    }
}

/// First `{prefix}{n}` not already used in a resource dictionary.
fn unused_name(entries: &Dictionary, prefix: &str) -> String {
    (1..)
        .map(|n| format!("{}{}", prefix, n))
        .find(|name| !entries.has(name.as_bytes()))
        .unwrap_or_else(|| prefix.to_string())
}

/// The page's content stream references, in order.
fn existing_contents(handle: &LopdfHandle, page_id: PageId) -> Vec<Object> {
    let doc = handle.raw_doc();
    let Ok(contents) = doc
        .get_dictionary(page_id)
        .and_then(|page| page.get(b"Contents"))
    else {
        return Vec::new();
    };

    match contents {
        Object::Reference(id) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Object::Array(items) => items.clone(),
        _ => Vec::new(),
    }
}
